//! 影子树（Shadow Tree）：把（文档树, 展开集合, 选中路径）投影为扁平的可见行列表
//!
//! 只下钻到已展开的容器，投影成本与可见行数成正比，而非整棵树的大小。
//! 根节点总是展开的。

use std::collections::HashSet;

use serde_json::Value;

use crate::model::node::{child_count, children, classify, is_expandable, preview_of, NodeKind};
use crate::model::path::{NodePath, Segment};

/// 根节点的显示名
pub const ROOT_NAME: &str = "$";

#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    /// 节点在父级中的键名，数组元素为 `[i]`，根为 `$`
    pub name: String,
    pub path: NodePath,
    pub kind: NodeKind,
    /// 子元素数量（对象字段数 / 数组长度）
    pub children: usize,
    pub preview: String,
    /// 节点深度（用于UI缩进显示）
    pub depth: usize,
    pub expandable: bool,
    pub expanded: bool,
    pub selected: bool,
}

fn row_name(seg: Option<&Segment>) -> String {
    match seg {
        None => ROOT_NAME.to_string(),
        Some(Segment::Key(k)) => k.clone(),
        Some(Segment::Index(i)) => format!("[{}]", i),
    }
}

pub fn project(
    root: &Value,
    expanded: &HashSet<NodePath>,
    selected: Option<&NodePath>,
) -> Vec<TreeRow> {
    let mut out = Vec::new();

    fn walk(
        out: &mut Vec<TreeRow>,
        v: &Value,
        path: NodePath,
        expanded: &HashSet<NodePath>,
        selected: Option<&NodePath>,
    ) {
        let is_open = path.is_root() || expanded.contains(&path);
        let expandable = is_expandable(v);
        out.push(TreeRow {
            name: row_name(path.last()),
            kind: classify(v),
            children: child_count(v),
            preview: preview_of(v),
            depth: path.depth(),
            expandable,
            expanded: expandable && is_open,
            selected: selected == Some(&path),
            path: path.clone(),
        });
        if !expandable || !is_open {
            return;
        }
        for (seg, child) in children(v) {
            walk(out, child, path.child(seg), expanded, selected);
        }
    }

    walk(&mut out, root, NodePath::root(), expanded, selected);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(paths: &[NodePath]) -> HashSet<NodePath> {
        paths.iter().cloned().collect()
    }

    #[test]
    fn test_collapsed_tree_shows_root_and_first_level() {
        let v = json!({
            "name": "测试",
            "nested": {"deep": {"deeper": 1}},
            "list": [1, 2, 3]
        });
        let rows = project(&v, &HashSet::new(), None);

        assert_eq!(rows.len(), 4, "应该只有根节点与第一层");
        assert_eq!(rows[0].name, "$");
        assert_eq!(rows[0].depth, 0);
        assert!(rows[0].expanded);
        assert_eq!(rows[0].children, 3);

        let names: Vec<&str> = rows.iter().skip(1).map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["name", "nested", "list"]);
        assert!(!rows[2].expanded);
        assert!(rows[2].expandable);
    }

    #[test]
    fn test_expanded_containers_emit_children_in_order() {
        let v = json!({"items": ["第一项", {"id": 1}, [1, 2]]});
        let items = NodePath::root().child("items");
        let rows = project(&v, &set(&[items.clone()]), None);

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["$", "items", "[0]", "[1]", "[2]"]);
        assert_eq!(rows[3].path, items.child(1usize));
        assert_eq!(rows[3].depth, 2);
        assert_eq!(rows[3].preview, "Object{1}");
    }

    #[test]
    fn test_collapsed_parent_hides_expanded_descendant() {
        let v = json!({"a": {"b": {"c": 1}}});
        let a = NodePath::root().child("a");
        let ab = a.child("b");
        // b 在展开集合中，但父节点 a 折叠，b 的子节点不应出现
        let rows = project(&v, &set(&[ab.clone()]), None);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.path != ab));
    }

    #[test]
    fn test_selected_row_is_marked() {
        let v = json!({"a": 1, "b": 2});
        let b = NodePath::root().child("b");
        let rows = project(&v, &HashSet::new(), Some(&b));
        let marked: Vec<&TreeRow> = rows.iter().filter(|r| r.selected).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].path, b);
    }

    #[test]
    fn test_scalar_root() {
        let rows = project(&json!("just a string"), &HashSet::new(), None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, NodeKind::String);
        assert!(!rows[0].expandable);
        assert!(!rows[0].expanded);
    }

    #[test]
    fn test_special_characters_in_keys() {
        let v = json!({
            "key with spaces": "value2",
            "key.with.dots": "value4"
        });
        let rows = project(&v, &HashSet::new(), None);
        assert_eq!(rows[1].name, "key with spaces");
        assert_eq!(rows[1].path.to_json_path(), "$['key with spaces']");
        assert_eq!(rows[2].path.to_display_string(), "key.with.dots");
        assert_eq!(rows[2].path.depth(), 1);
    }
}
