//! 解析/序列化网关：原始文本 ↔ Value，以及格式化输出

use serde_json::Value;

use crate::model::data_core::AppError;

/// 允许的最大嵌套层数（serde_json 递归上限为 128 层，含 128 即拒绝）
pub const MAX_NESTING_DEPTH: usize = 127;

/// 将原始文本解析为 JSON 值；失败时返回 `AppError::Parse`，调用方缓冲区不受影响。
/// 嵌套超过 [`MAX_NESTING_DEPTH`] 的合法文本返回 `AppError::TooDeep`
pub fn parse_text(raw: &str) -> Result<Value, AppError> {
    serde_json::from_str(raw).map_err(|e| {
        if e.to_string().starts_with("recursion limit exceeded") {
            tracing::warn!("文档嵌套过深: {}", e);
            AppError::TooDeep(MAX_NESTING_DEPTH)
        } else {
            AppError::Parse(e)
        }
    })
}

/// 规范的 pretty 形式（两空格缩进），保持键顺序与数组顺序
pub fn serialize(value: &Value) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// 紧凑单行形式
pub fn minify(value: &Value) -> Result<String, AppError> {
    Ok(serde_json::to_string(value)?)
}

/// `serialize(parse_text(raw))`
pub fn beautify(raw: &str) -> Result<String, AppError> {
    let v = parse_text(raw)?;
    serialize(&v)
}
