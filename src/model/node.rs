//! 值分类器：把解码后的 JSON 值归类为节点类型，并按原始顺序列出子节点

use serde_json::Value;

use crate::model::path::Segment;

/// 预览文本中字符串的最大字符数
pub const PREVIEW_MAX_CHARS: usize = 32;

/// JSON 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl NodeKind {
    /// 是否为容器类型（对象/数组）
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Object | NodeKind::Array)
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Bool => "boolean",
            NodeKind::Null => "null",
        }
    }
}

pub fn classify(v: &Value) -> NodeKind {
    match v {
        Value::Object(_) => NodeKind::Object,
        Value::Array(_) => NodeKind::Array,
        Value::String(_) => NodeKind::String,
        Value::Number(_) => NodeKind::Number,
        Value::Bool(_) => NodeKind::Bool,
        Value::Null => NodeKind::Null,
    }
}

/// 有序子节点：对象按原始键顺序，数组按下标；叶子节点返回空列表
pub fn children(v: &Value) -> Vec<(Segment, &Value)> {
    match v {
        Value::Object(map) => map
            .iter()
            .map(|(k, child)| (Segment::Key(k.clone()), child))
            .collect(),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(idx, child)| (Segment::Index(idx), child))
            .collect(),
        _ => Vec::new(),
    }
}

/// 子元素数量（对象字段数 / 数组长度）
pub fn child_count(v: &Value) -> usize {
    match v {
        Value::Object(m) => m.len(),
        Value::Array(a) => a.len(),
        _ => 0,
    }
}

/// 非空数组或至少含一个键的对象才可展开
pub fn is_expandable(v: &Value) -> bool {
    child_count(v) > 0
}

/// 轻量预览（字符串截断、数字/布尔/空的简短描述）
pub fn preview_of(v: &Value) -> String {
    match v {
        Value::String(s) => {
            if s.chars().count() > PREVIEW_MAX_CHARS {
                let truncated: String = s.chars().take(PREVIEW_MAX_CHARS).collect();
                format!("\"{}...\"", truncated)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(m) => format!("Object{{{}}}", m.len()),
        Value::Array(a) => format!("Array[{}]", a.len()),
    }
}
