//! JSON浏览工具库
//!
//! 提供文本解析、可折叠树形投影、基于路径的节点选中与持久化历史记录
//! 遵循MVVM架构模式：model 为纯数据层，vm 为意图分发，UI 在 main.rs 中绑定

pub mod config;
pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use config::AppConfig;
pub use model::codec::{beautify, parse_text, serialize};
pub use model::data_core::{AppError, Selection, TreeState};
pub use model::history::{HistoryEntry, HistoryStore};
pub use model::node::{classify, NodeKind};
pub use model::path::{NodePath, Segment};
pub use model::shadow_tree::TreeRow;
pub use vm::session::{Intent, Session, SessionSnapshot};
