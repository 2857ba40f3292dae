//! 节点路径：有序的键/下标段序列，根路径为空序列
//!
//! 点号拼接的显示串只用于展示，键名本身含 `.` 时无法反解析回路径；
//! 需要精确寻址时使用 [`NodePath::to_json_path`]。

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Segment {
    fn from(k: &str) -> Self {
        Segment::Key(k.to_string())
    }
}

impl From<String> for Segment {
    fn from(k: String) -> Self {
        Segment::Key(k)
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<Segment>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// 便捷构造：规范十进制形式的数字段（`"0"`、`"12"`，无前导零）视为数组下标，
    /// 其余（包括 `"01"`）视为键名。不用于解析显示串。
    #[cfg(test)]
    pub(crate) fn from_keys(keys: &[&str]) -> Self {
        Self(
            keys.iter()
                .map(|k| match k.parse::<usize>() {
                    Ok(i) if is_canonical_index(k) => Segment::Index(i),
                    _ => Segment::Key((*k).to_string()),
                })
                .collect(),
        )
    }

    /// 追加一段，返回新路径（原路径不变）
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// 以 `.` 拼接的显示串，根路径为空串
    pub fn to_display_string(&self) -> String {
        self.0
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// RFC 9535 JSONPath 形式，可无歧义地定位节点
    pub fn to_json_path(&self) -> String {
        let mut out = String::from("$");
        for seg in &self.0 {
            match seg {
                Segment::Index(i) => out.push_str(&format!("[{}]", i)),
                // 字段含特殊字符时使用 bracket-notation
                Segment::Key(k)
                    if !k.is_empty()
                        && !k.starts_with(|c: char| c.is_ascii_digit())
                        && k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
                {
                    out.push('.');
                    out.push_str(k);
                }
                Segment::Key(k) => {
                    let escaped = k.replace('\\', "\\\\").replace('\'', "\\'");
                    out.push_str(&format!("['{}']", escaped));
                }
            }
        }
        out
    }
}

impl From<Vec<Segment>> for NodePath {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

#[cfg(test)]
fn is_canonical_index(k: &str) -> bool {
    !k.is_empty() && k.chars().all(|c| c.is_ascii_digit()) && (k == "0" || !k.starts_with('0'))
}
