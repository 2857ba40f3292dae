//! TreeState：当前文档树、展开集合与选中状态

use std::collections::HashSet;
use std::fmt;

use jsonpath_rust::JsonPath; // 提供 query 扩展
use serde_json::Value;
use thiserror::Error;

use crate::model::codec::serialize;
use crate::model::node::{children, is_expandable};
use crate::model::path::{NodePath, Segment};
use crate::model::shadow_tree::{project, TreeRow};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("文档嵌套超过 {0} 层，无法载入")]
    TooDeep(usize),
    #[error("未找到: {0}")]
    NotFound(String),
    #[error("持久化数据损坏: {0}")]
    PersistenceCorrupt(String),
    #[error("JSONPath错误: {0}")]
    JsonPath(String),
    #[error("状态错误: {0}")]
    State(String),
}

/// 选中节点：路径 + 选中时的值快照
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub path: NodePath,
    pub value: Value,
}

/// 选中成功后通知详情面板
pub type DetailsObserver = Box<dyn FnMut(&NodePath, &Value)>;

/// 沿路径逐段下钻；段不存在或在叶子节点上继续下钻时返回 None
pub fn resolve<'a>(root: &'a Value, path: &NodePath) -> Option<&'a Value> {
    let mut cur = root;
    for seg in path.segments() {
        cur = match (seg, cur) {
            (Segment::Key(k), Value::Object(map)) => map.get(k)?,
            (Segment::Index(i), Value::Array(arr)) => arr.get(*i)?,
            _ => return None,
        };
    }
    Some(cur)
}

#[derive(Default)]
pub struct TreeState {
    dom: Option<Value>,
    expanded: HashSet<NodePath>,
    selection: Option<Selection>,
    observer: Option<DetailsObserver>,
}

impl fmt::Debug for TreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeState")
            .field("dom", &self.dom)
            .field("expanded", &self.expanded)
            .field("selection", &self.selection)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_details_observer(&mut self, observer: DetailsObserver) {
        self.observer = Some(observer);
    }

    /// 整体替换文档树，清空展开集合与选中状态
    pub fn load_document(&mut self, value: Value) {
        self.expanded.clear();
        self.selection = None;
        self.dom = Some(value);
        tracing::info!("文档已加载，展开与选中状态已重置");
    }

    pub fn document(&self) -> Option<&Value> {
        self.dom.as_ref()
    }

    pub fn value_at(&self, path: &NodePath) -> Result<&Value, AppError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| AppError::NotFound("文档尚未加载".into()))?;
        resolve(dom, path).ok_or_else(|| AppError::NotFound(format!("路径不存在: {}", path.to_json_path())))
    }

    /// 切换节点的展开状态；节点不存在、不可展开或为根节点时不做任何事
    pub fn toggle_expand(&mut self, path: &NodePath) {
        if path.is_root() {
            return;
        }
        let expandable = self.value_at(path).map(is_expandable).unwrap_or(false);
        if !expandable {
            tracing::debug!("忽略不可展开节点: {}", path.to_json_path());
            return;
        }
        if !self.expanded.remove(path) {
            self.expanded.insert(path.clone());
        }
    }

    pub fn is_expanded(&self, path: &NodePath) -> bool {
        path.is_root() || self.expanded.contains(path)
    }

    pub fn expanded_paths(&self) -> &HashSet<NodePath> {
        &self.expanded
    }

    /// 展开所有可展开节点
    pub fn expand_all(&mut self) {
        let Some(dom) = self.dom.as_ref() else {
            return;
        };
        fn walk(v: &Value, path: NodePath, out: &mut HashSet<NodePath>) {
            for (seg, child) in children(v) {
                if is_expandable(child) {
                    let child_path = path.child(seg);
                    out.insert(child_path.clone());
                    walk(child, child_path, out);
                }
            }
        }
        let mut all = HashSet::new();
        walk(dom, NodePath::root(), &mut all);
        self.expanded = all;
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// 选中节点并通知详情观察者；路径无法解析时保持原选中状态
    pub fn select_node(&mut self, path: &NodePath) -> Result<(), AppError> {
        let value = self.value_at(path)?.clone();
        if let Some(observer) = self.observer.as_mut() {
            observer(path, &value);
        }
        self.selection = Some(Selection {
            path: path.clone(),
            value,
        });
        Ok(())
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// 选中节点的 pretty 字符串
    pub fn selected_pretty(&self) -> Result<Option<String>, AppError> {
        self.selection
            .as_ref()
            .map(|sel| serialize(&sel.value))
            .transpose()
    }

    /// 投影为可见行列表：只下钻到已展开的容器
    pub fn project(&self) -> Vec<TreeRow> {
        match self.dom.as_ref() {
            Some(dom) => project(dom, &self.expanded, self.selection.as_ref().map(|s| &s.path)),
            None => Vec::new(),
        }
    }

    /// 按 JSONPath 查询当前文档，返回全部命中值
    pub fn query(&self, json_path: &str) -> Result<Vec<Value>, AppError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| AppError::State("文档尚未加载".into()))?;
        let hits: Vec<&Value> = dom
            .query(json_path)
            .map_err(|e| AppError::JsonPath(e.to_string()))?;
        Ok(hits.into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::codec::parse_text;
    use crate::model::node::{classify, NodeKind};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn scenario_state() -> TreeState {
        let mut state = TreeState::new();
        let v = parse_text(r#"{"a":1,"b":[1,2,{"c":null}]}"#).expect("解析应该成功");
        state.load_document(v);
        state
    }

    fn p(keys: &[&str]) -> NodePath {
        NodePath::from_keys(keys)
    }

    #[test]
    fn test_scenario_classify_and_resolve() {
        let state = scenario_state();
        let root = state.document().unwrap();
        assert_eq!(classify(root), NodeKind::Object);

        let kids = children(root);
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0].0, Segment::Key("a".into()));
        assert_eq!(kids[0].1, &json!(1));
        assert_eq!(kids[1].0, Segment::Key("b".into()));
        assert_eq!(classify(kids[1].1), NodeKind::Array);

        assert_eq!(state.value_at(&p(&["b", "2", "c"])).unwrap(), &Value::Null);
    }

    #[test]
    fn test_scenario_toggle_reveals_nested_path() {
        let mut state = scenario_state();
        state.toggle_expand(&p(&["b"]));
        state.toggle_expand(&p(&["b", "2"]));

        let rows = state.project();
        assert!(
            rows.iter().any(|r| r.path == p(&["b", "2", "c"])),
            "展开后 b.2.c 应该可见"
        );
    }

    #[test]
    fn test_value_at_not_found() {
        let state = scenario_state();
        assert!(matches!(state.value_at(&p(&["missing"])), Err(AppError::NotFound(_))));
        assert!(matches!(state.value_at(&p(&["b", "9"])), Err(AppError::NotFound(_))));
        // 在叶子节点上继续下钻
        assert!(matches!(state.value_at(&p(&["a", "x"])), Err(AppError::NotFound(_))));
        // 对数组使用键名
        assert!(state.value_at(&NodePath::root().child("b").child("0")).is_err());
    }

    #[test]
    fn test_value_at_without_document() {
        let state = TreeState::new();
        assert!(matches!(state.value_at(&NodePath::root()), Err(AppError::NotFound(_))));
        assert!(state.project().is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut state = scenario_state();
        let b = p(&["b"]);
        assert!(!state.is_expanded(&b));
        state.toggle_expand(&b);
        assert!(state.is_expanded(&b));
        state.toggle_expand(&b);
        assert!(!state.is_expanded(&b));

        state.toggle_expand(&b);
        state.toggle_expand(&b);
        state.toggle_expand(&b);
        assert!(state.is_expanded(&b));
    }

    #[test]
    fn test_toggle_ignores_leaves_and_missing_paths() {
        let mut state = scenario_state();
        state.toggle_expand(&p(&["a"]));
        state.toggle_expand(&p(&["nope"]));
        state.toggle_expand(&p(&["b", "2", "c"]));
        state.toggle_expand(&NodePath::root());
        assert!(state.expanded_paths().is_empty(), "叶子/不存在/根节点不应进入展开集合");
    }

    #[test]
    fn test_toggle_ignores_empty_containers() {
        let mut state = TreeState::new();
        state.load_document(json!({"empty_obj": {}, "empty_arr": []}));
        state.toggle_expand(&p(&["empty_obj"]));
        state.toggle_expand(&p(&["empty_arr"]));
        assert!(state.expanded_paths().is_empty());
    }

    #[test]
    fn test_select_node_sets_selection_and_notifies() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let mut state = scenario_state();
        {
            let seen = seen.clone();
            state.set_details_observer(Box::new(move |path: &NodePath, value: &Value| {
                seen.borrow_mut().push(format!("{}={}", path, value));
            }));
        }

        state.select_node(&p(&["b", "1"])).expect("选中应该成功");
        let sel = state.selection().unwrap();
        assert_eq!(sel.path, p(&["b", "1"]));
        assert_eq!(sel.value, json!(2));
        assert_eq!(seen.borrow().as_slice(), ["b.1=2"]);
    }

    #[test]
    fn test_select_missing_keeps_previous_selection() {
        let mut state = scenario_state();
        state.select_node(&p(&["a"])).unwrap();
        let result = state.select_node(&p(&["zzz"]));
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(state.selection().unwrap().path, p(&["a"]), "失败时选中状态应保持不变");

        state.clear_selection();
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_load_document_resets_state() {
        let mut state = scenario_state();
        state.toggle_expand(&p(&["b"]));
        state.select_node(&p(&["b", "0"])).unwrap();

        state.load_document(json!({"other": [1]}));
        assert!(state.expanded_paths().is_empty(), "展开集合应被清空");
        assert!(state.selection().is_none(), "选中状态应被清空");
    }

    #[test]
    fn test_every_projected_path_resolves() {
        let mut state = TreeState::new();
        state.load_document(json!({
            "users": [
                {"name": "张三", "tags": ["a", "b"], "meta": {}},
                {"name": "李四", "tags": []}
            ],
            "key.with.dots": {"x": 1},
            "flag": true
        }));
        state.expand_all();

        let rows = state.project();
        assert!(rows.len() > 10);
        for row in &rows {
            assert!(state.value_at(&row.path).is_ok(), "路径应可解析: {}", row.path.to_json_path());
        }
    }

    #[test]
    fn test_expand_all_and_collapse_all() {
        let mut state = scenario_state();
        state.expand_all();
        assert!(state.is_expanded(&p(&["b"])));
        assert!(state.is_expanded(&p(&["b", "2"])));
        assert_eq!(state.expanded_paths().len(), 2);

        state.collapse_all();
        assert!(state.expanded_paths().is_empty());
        assert_eq!(state.project().len(), 3, "折叠后只显示根与第一层");
    }

    #[test]
    fn test_selected_pretty() {
        let mut state = scenario_state();
        assert_eq!(state.selected_pretty().unwrap(), None);
        state.select_node(&p(&["b", "2"])).unwrap();
        assert_eq!(
            state.selected_pretty().unwrap().as_deref(),
            Some("{\n  \"c\": null\n}")
        );
    }

    #[test]
    fn test_query_matches_value_at() {
        let state = scenario_state();
        let path = p(&["b", "2", "c"]);
        let hits = state.query(&path.to_json_path()).expect("查询应该成功");
        assert_eq!(hits, vec![Value::Null]);

        let all = state.query("$.b[*]").unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_query_errors() {
        let state = TreeState::new();
        assert!(matches!(state.query("$.a"), Err(AppError::State(_))));

        let state = scenario_state();
        assert!(matches!(state.query("$["), Err(AppError::JsonPath(_))));
    }

    #[test]
    fn test_deepest_document_projects_and_selects() {
        use crate::model::codec::MAX_NESTING_DEPTH;
        let raw = format!("{}{}", "[".repeat(MAX_NESTING_DEPTH), "]".repeat(MAX_NESTING_DEPTH));
        let mut state = TreeState::new();
        state.load_document(parse_text(&raw).unwrap());

        state.expand_all();
        let rows = state.project();
        assert_eq!(rows.len(), MAX_NESTING_DEPTH);
        let deepest = rows.last().unwrap();
        assert_eq!(deepest.depth, MAX_NESTING_DEPTH - 1);
        assert!(!deepest.expandable, "最内层空数组不可展开");

        state.select_node(&deepest.path).unwrap();
        assert_eq!(state.selected_pretty().unwrap().as_deref(), Some("[]"));
    }
}
