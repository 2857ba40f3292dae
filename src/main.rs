//! 程序入口：初始化日志、加载历史记录与 Slint UI，并绑定 VM 回调

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

use json_lens::model::history::HistoryStore;
use json_lens::model::node::preview_of;
use json_lens::utils::clipboard::SystemClipboard;
use json_lens::utils::fs::read_text_file;
use json_lens::utils::store::FileStore;
use json_lens::vm::session::HistoryItem;
use json_lens::{AppConfig, Intent, NodePath, Session, TreeRow};

slint::include_modules!();

type AppSession = Session<FileStore>;

// TreeNodeData转换实现
impl From<&TreeRow> for TreeNodeData {
    fn from(row: &TreeRow) -> Self {
        Self {
            name: row.name.as_str().into(),
            kind: row.kind.label().into(),
            preview: row.preview.as_str().into(),
            depth: row.depth as i32,
            expandable: row.expandable,
            expanded: row.expanded,
            selected: row.selected,
        }
    }
}

impl From<&HistoryItem> for HistoryItemData {
    fn from(item: &HistoryItem) -> Self {
        Self {
            id: item.id.as_str().into(),
            preview: item.preview.as_str().into(),
            time: item.time.as_str().into(),
        }
    }
}

/// VM桥接器：管理UI与Session的交互
struct ViewModelBridge {
    session: Rc<RefCell<AppSession>>,
    /// 当前可见行对应的节点路径，UI 以行号回传
    row_paths: Rc<RefCell<Vec<NodePath>>>,
    clipboard: Rc<RefCell<SystemClipboard>>,
}

impl ViewModelBridge {
    fn new(app_window: &AppWindow, session: Rc<RefCell<AppSession>>) -> Self {
        let bridge = Self {
            session,
            row_paths: Rc::new(RefCell::new(Vec::new())),
            clipboard: Rc::new(RefCell::new(SystemClipboard)),
        };
        bridge.setup_callbacks(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        // === 输入与解析 ===
        {
            let dispatch = self.dispatcher(app_window);
            app_window.on_input_changed(move |text: SharedString| {
                dispatch(Intent::InputChanged(text.to_string()));
            });
        }
        {
            let dispatch = self.dispatcher(app_window);
            app_window.on_parse_requested(move || dispatch(Intent::ParseRequested));
        }
        {
            let dispatch = self.dispatcher(app_window);
            app_window.on_beautify_requested(move || dispatch(Intent::BeautifyRequested));
        }

        // === 历史记录 ===
        {
            let dispatch = self.dispatcher(app_window);
            app_window.on_save_to_history(move || dispatch(Intent::SaveToHistory));
        }
        {
            let dispatch = self.dispatcher(app_window);
            app_window.on_load_from_history(move |id: SharedString| {
                dispatch(Intent::LoadFromHistory(id.to_string()));
            });
        }

        // === 树形视图：行号 → 路径 ===
        {
            let dispatch = self.dispatcher(app_window);
            let row_paths = self.row_paths.clone();
            app_window.on_toggle_node(move |idx: i32| {
                let path = Self::path_for_row(&row_paths, idx);
                if let Some(path) = path {
                    dispatch(Intent::Toggle(path));
                }
            });
        }
        {
            let dispatch = self.dispatcher(app_window);
            let row_paths = self.row_paths.clone();
            app_window.on_select_node(move |idx: i32| {
                let path = Self::path_for_row(&row_paths, idx);
                if let Some(path) = path {
                    dispatch(Intent::Select(path));
                }
            });
        }
        {
            let dispatch = self.dispatcher(app_window);
            app_window.on_expand_all(move || dispatch(Intent::ExpandAll));
        }
        {
            let dispatch = self.dispatcher(app_window);
            app_window.on_collapse_all(move || dispatch(Intent::CollapseAll));
        }
        {
            let dispatch = self.dispatcher(app_window);
            app_window.on_query_requested(move |expr: SharedString| {
                dispatch(Intent::QueryRequested(expr.to_string()));
            });
        }

        // === 复制 ===
        {
            let session = self.session.clone();
            let row_paths = self.row_paths.clone();
            let clipboard = self.clipboard.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_selected(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    session.borrow_mut().copy_selected(&mut *clipboard.borrow_mut());
                    Self::refresh(&app_window, &session.borrow(), &row_paths);
                }
            });
        }
        {
            let session = self.session.clone();
            let row_paths = self.row_paths.clone();
            let clipboard = self.clipboard.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_selected_compact(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    session.borrow_mut().copy_selected_compact(&mut *clipboard.borrow_mut());
                    Self::refresh(&app_window, &session.borrow(), &row_paths);
                }
            });
        }
    }

    /// 生成一个分发闭包：执行意图后刷新界面
    fn dispatcher(&self, app_window: &AppWindow) -> impl Fn(Intent) + 'static {
        let session = self.session.clone();
        let row_paths = self.row_paths.clone();
        let app_window_weak = app_window.as_weak();
        move |intent: Intent| {
            if let Some(app_window) = app_window_weak.upgrade() {
                tracing::debug!("处理意图: {:?}", intent);
                session.borrow_mut().dispatch(intent);
                Self::refresh(&app_window, &session.borrow(), &row_paths);
            }
        }
    }

    fn path_for_row(row_paths: &Rc<RefCell<Vec<NodePath>>>, idx: i32) -> Option<NodePath> {
        let paths = row_paths.borrow();
        let path = usize::try_from(idx).ok().and_then(|i| paths.get(i)).cloned();
        if path.is_none() {
            tracing::warn!("行号超出范围: {}", idx);
        }
        path
    }

    /// 把 Session 快照推送到界面
    fn refresh(app_window: &AppWindow, session: &AppSession, row_paths: &Rc<RefCell<Vec<NodePath>>>) {
        let snap = session.snapshot();

        // 编辑中的文本与快照一致时不回写
        if app_window.get_input_text().as_str() != snap.input {
            app_window.set_input_text(snap.input.as_str().into());
        }
        app_window.set_beautified_text(snap.beautified.as_str().into());
        app_window.set_status_message(snap.status.as_str().into());
        app_window.set_error_message(snap.error.as_deref().unwrap_or_default().into());
        app_window.set_selected_path(snap.selected_path.as_str().into());
        app_window.set_selected_json_path(snap.selected_json_path.as_str().into());
        app_window.set_node_content(snap.node_content.as_str().into());
        app_window.set_query_result(snap.query_result.as_str().into());

        let tree_data: Vec<TreeNodeData> = snap.rows.iter().map(TreeNodeData::from).collect();
        *row_paths.borrow_mut() = snap.rows.into_iter().map(|row| row.path).collect();
        app_window.set_tree_model(ModelRc::new(VecModel::from(tree_data)));

        let history_data: Vec<HistoryItemData> =
            snap.history.iter().map(HistoryItemData::from).collect();
        app_window.set_history_model(ModelRc::new(VecModel::from(history_data)));
    }

    /// 启动时预载入命令行指定的文件
    fn preload_file(&self, app_window: &AppWindow, path: PathBuf) {
        match read_text_file(&path) {
            Ok(raw) => {
                tracing::info!("预载入文件: {}", path.display());
                let mut session = self.session.borrow_mut();
                session.dispatch(Intent::InputChanged(raw));
                session.dispatch(Intent::ParseRequested);
            }
            Err(e) => tracing::error!("文件读取失败: {} ({})", path.display(), e),
        }
        Self::refresh(app_window, &self.session.borrow(), &self.row_paths);
    }
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(config.log_level)
        .try_init();
    tracing::info!("数据目录: {}", config.data_dir.display());

    let store = FileStore::open(config.store_path());
    let history = HistoryStore::open(store, config.history_capacity);
    let session = Rc::new(RefCell::new(Session::new(history)));
    session
        .borrow_mut()
        .tree_mut()
        .set_details_observer(Box::new(|path: &NodePath, value: &serde_json::Value| {
            tracing::info!("详情已更新: {} = {}", path.to_json_path(), preview_of(value));
        }));

    let app = AppWindow::new().map_err(|e| anyhow::anyhow!("UI 初始化失败: {}", e))?;
    let bridge = ViewModelBridge::new(&app, session);
    match std::env::args_os().nth(1) {
        Some(path) => bridge.preload_file(&app, PathBuf::from(path)),
        None => ViewModelBridge::refresh(&app, &bridge.session.borrow(), &bridge.row_paths),
    }

    tracing::info!("应用启动成功，UI已初始化");
    app.run().map_err(|e| anyhow::anyhow!("UI 运行失败: {}", e))?;
    Ok(())
}
