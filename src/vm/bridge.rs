//! VM桥接层：连接Slint UI与Session视图模型
//!
//! 注意：回调绑定在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供公共常量

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_PARSED: &str = "解析完成";
pub const STATUS_BEAUTIFIED: &str = "已格式化";
pub const STATUS_SAVED: &str = "已保存到历史记录";
pub const STATUS_SAVE_SKIPPED: &str = "输入为空，未保存";
pub const STATUS_HISTORY_LOADED: &str = "已从历史记录载入";
pub const STATUS_SELECTED: &str = "已选中节点";
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_NOTHING_SELECTED: &str = "没有选中的节点";
pub const STATUS_QUERY_DONE: &str = "查询完成";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

/// 实时预览解析失败时显示的文本
pub const INVALID_JSON_PREVIEW: &str = "Invalid JSON";
/// 未选中节点时详情区显示的文本
pub const NO_NODE_SELECTED: &str = "No node selected";
