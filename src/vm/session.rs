//! Session：单线程意图分发器
//!
//! 持有原始输入文本、当前文档树状态与历史记录。每个意图同步执行完毕后
//! 才处理下一个，因此树、展开集合与选中状态无需加锁。

use crate::model::codec::{beautify, minify, parse_text, serialize};
use crate::model::data_core::{AppError, TreeState};
use crate::model::history::HistoryStore;
use crate::model::path::NodePath;
use crate::model::shadow_tree::TreeRow;
use crate::utils::clipboard::Clipboard;
use crate::utils::store::KeyValueStore;
use crate::vm::bridge::*;

/// 显示层发出的意图
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Toggle(NodePath),
    Select(NodePath),
    InputChanged(String),
    ParseRequested,
    BeautifyRequested,
    SaveToHistory,
    LoadFromHistory(String),
    ExpandAll,
    CollapseAll,
    QueryRequested(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub id: String,
    pub preview: String,
    pub time: String,
}

/// 显示层渲染所需的全部数据
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub input: String,
    pub beautified: String,
    pub error: Option<String>,
    pub status: String,
    pub rows: Vec<TreeRow>,
    pub selected_path: String,
    pub selected_json_path: String,
    pub node_content: String,
    pub query_result: String,
    pub history: Vec<HistoryItem>,
}

#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    input: String,
    beautified: String,
    error: Option<String>,
    status: String,
    query_result: String,
    tree: TreeState,
    history: HistoryStore<S>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self {
            input: String::new(),
            beautified: String::new(),
            error: None,
            status: STATUS_READY.to_string(),
            query_result: String::new(),
            tree: TreeState::new(),
            history,
        }
    }

    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Toggle(path) => self.tree.toggle_expand(&path),
            Intent::Select(path) => self.select(&path),
            Intent::InputChanged(text) => self.input_changed(text),
            Intent::ParseRequested => self.parse_requested(),
            Intent::BeautifyRequested => self.beautify_requested(),
            Intent::SaveToHistory => self.save_to_history(),
            Intent::LoadFromHistory(id) => self.load_from_history(&id),
            Intent::ExpandAll => self.tree.expand_all(),
            Intent::CollapseAll => self.tree.collapse_all(),
            Intent::QueryRequested(expr) => self.query_requested(&expr),
        }
    }

    /// 替换输入缓冲区并刷新实时预览；不重新载入文档树
    pub fn input_changed(&mut self, text: String) {
        self.input = text;
        self.error = None;
        self.beautified = if self.input.trim().is_empty() {
            String::new()
        } else {
            beautify(&self.input).unwrap_or_else(|_| INVALID_JSON_PREVIEW.to_string())
        };
    }

    /// 解析输入；失败时文档树与选中状态保持不变
    pub fn parse_requested(&mut self) {
        match parse_text(&self.input) {
            Ok(value) => {
                self.beautified = serialize(&value).unwrap_or_default();
                self.tree.load_document(value);
                self.query_result.clear();
                self.error = None;
                self.status = STATUS_PARSED.to_string();
            }
            Err(e) => self.fail(e),
        }
    }

    /// 格式化输入；失败时输入保持原样
    pub fn beautify_requested(&mut self) {
        match beautify(&self.input) {
            Ok(pretty) => {
                self.beautified = pretty.clone();
                self.input = pretty;
                self.error = None;
                self.status = STATUS_BEAUTIFIED.to_string();
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn save_to_history(&mut self) {
        self.status = match self.history.save(&self.input) {
            Some(_) => STATUS_SAVED.to_string(),
            None => STATUS_SAVE_SKIPPED.to_string(),
        };
    }

    pub fn load_from_history(&mut self, id: &str) {
        match self.history.load(id).map(str::to_string) {
            Ok(raw) => {
                self.input_changed(raw);
                self.parse_requested();
                if self.error.is_none() {
                    self.status = STATUS_HISTORY_LOADED.to_string();
                }
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn toggle(&mut self, path: &NodePath) {
        self.tree.toggle_expand(path);
    }

    pub fn select(&mut self, path: &NodePath) {
        match self.tree.select_node(path) {
            Ok(()) => self.status = STATUS_SELECTED.to_string(),
            Err(e) => {
                tracing::warn!("节点选择失败: {}", e);
                self.status = format!("{}{}", STATUS_ERROR_PREFIX, e);
            }
        }
    }

    pub fn query_requested(&mut self, expr: &str) {
        match self.tree.query(expr) {
            Ok(hits) => {
                self.query_result = serialize(&serde_json::Value::Array(hits)).unwrap_or_default();
                self.status = STATUS_QUERY_DONE.to_string();
            }
            Err(e) => {
                self.query_result.clear();
                self.status = format!("{}{}", STATUS_ERROR_PREFIX, e);
            }
        }
    }

    /// 复制选中节点的 pretty JSON；剪贴板失败只记录日志
    pub fn copy_selected(&mut self, clipboard: &mut dyn Clipboard) {
        let text = self.tree.selection().map(|sel| serialize(&sel.value));
        self.copy_text(text, clipboard);
    }

    /// 复制选中节点的紧凑 JSON
    pub fn copy_selected_compact(&mut self, clipboard: &mut dyn Clipboard) {
        let text = self.tree.selection().map(|sel| minify(&sel.value));
        self.copy_text(text, clipboard);
    }

    fn copy_text(&mut self, text: Option<Result<String, AppError>>, clipboard: &mut dyn Clipboard) {
        let text = match text {
            None => {
                self.status = STATUS_NOTHING_SELECTED.to_string();
                return;
            }
            Some(Err(e)) => return self.fail(e),
            Some(Ok(text)) => text,
        };
        match clipboard.write_text(&text) {
            Ok(()) => {
                self.status = STATUS_COPIED.to_string();
                tracing::info!("内容已复制到剪贴板，长度: {} 字符", text.len());
            }
            Err(e) => tracing::warn!("复制失败（已忽略）: {}", e),
        }
    }

    fn fail(&mut self, e: AppError) {
        tracing::error!("{}", e);
        self.status = format!("{}{}", STATUS_ERROR_PREFIX, e);
        self.error = Some(e.to_string());
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn tree(&self) -> &TreeState {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TreeState {
        &mut self.tree
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let selection = self.tree.selection();
        SessionSnapshot {
            input: self.input.clone(),
            beautified: self.beautified.clone(),
            error: self.error.clone(),
            status: self.status.clone(),
            rows: self.tree.project(),
            selected_path: selection
                .map(|s| s.path.to_display_string())
                .unwrap_or_default(),
            selected_json_path: selection.map(|s| s.path.to_json_path()).unwrap_or_default(),
            node_content: self
                .tree
                .selected_pretty()
                .ok()
                .flatten()
                .unwrap_or_else(|| NO_NODE_SELECTED.to_string()),
            query_result: self.query_result.clone(),
            history: self
                .history
                .entries()
                .iter()
                .map(|e| HistoryItem {
                    id: e.id.clone(),
                    preview: e.preview(),
                    time: e.time_label(),
                })
                .collect(),
        }
    }
}
