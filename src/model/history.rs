//! 历史记录：最近保存的原始文档，新的在前，容量有上限，每次变更后写回存储

use chrono::{Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::data_core::AppError;
use crate::utils::store::KeyValueStore;

/// 存储键
pub const HISTORY_KEY: &str = "jsonHistory";
/// 默认容量
pub const DEFAULT_CAPACITY: usize = 10;
/// 历史条目预览的最大字符数
pub const ENTRY_PREVIEW_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// 毫秒级 Unix 时间戳
    pub timestamp: i64,
    pub json: String,
}

impl HistoryEntry {
    fn new(raw: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            json: raw.to_string(),
        }
    }

    pub fn preview(&self) -> String {
        if self.json.chars().count() > ENTRY_PREVIEW_CHARS {
            let head: String = self.json.chars().take(ENTRY_PREVIEW_CHARS).collect();
            format!("{}...", head)
        } else {
            self.json.clone()
        }
    }

    /// 本地时间 `HH:MM:SS`
    pub fn time_label(&self) -> String {
        Local
            .timestamp_millis_opt(self.timestamp)
            .single()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct HistoryStore<S: KeyValueStore> {
    store: S,
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// 从存储加载历史；数据损坏时记录警告并以空历史启动
    pub fn open(store: S, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = match store.get(HISTORY_KEY) {
            None => Vec::new(),
            Some(raw) => match decode_entries(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("{}，历史记录已重置为空", e);
                    Vec::new()
                }
            },
        };
        entries.truncate(capacity);
        tracing::info!("历史记录已加载: {} 条（容量 {}）", entries.len(), capacity);
        Self {
            store,
            entries,
            capacity,
        }
    }

    /// 保存原始文本为新条目；空白文本不保存。超出容量时淘汰最旧的条目
    pub fn save(&mut self, raw: &str) -> Option<HistoryEntry> {
        if raw.trim().is_empty() {
            return None;
        }
        let entry = HistoryEntry::new(raw);
        self.entries.insert(0, entry.clone());
        self.entries.truncate(self.capacity);
        self.persist();
        tracing::info!("已保存到历史记录: {}（共 {} 条）", entry.id, self.entries.len());
        Some(entry)
    }

    pub fn load(&self, id: &str) -> Result<&str, AppError> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.json.as_str())
            .ok_or_else(|| AppError::NotFound(format!("历史记录不存在: {}", id)))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 写回存储；失败只记录日志，不影响内存中的历史
    fn persist(&mut self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(AppError::from)
            .and_then(|raw| self.store.set(HISTORY_KEY, raw));
        if let Err(e) = result {
            tracing::error!("历史记录写回失败: {}", e);
        }
    }
}

fn decode_entries(raw: &str) -> Result<Vec<HistoryEntry>, AppError> {
    serde_json::from_str(raw).map_err(|e| AppError::PersistenceCorrupt(e.to_string()))
}
