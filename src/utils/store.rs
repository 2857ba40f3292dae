//! 持久化契约：按键读写字符串的存储后端

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::model::data_core::AppError;
use crate::utils::fs::{read_text_file, write_text_file};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), AppError>;
}

/// 内存存储：测试与无需落盘的会话使用
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// 文件存储：一个 JSON 对象文件，键 → 字符串
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl FileStore {
    /// 打开存储文件；文件不存在视为空，内容损坏时记录警告并视为空
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = if path.exists() {
            match read_text_file(&path).and_then(|raw| Ok(serde_json::from_str::<Value>(&raw)?)) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    tracing::warn!("存储文件不是JSON对象，按空存储处理: {}", path.display());
                    Map::new()
                }
                Err(e) => {
                    tracing::warn!("存储文件读取失败，按空存储处理: {} ({})", path.display(), e);
                    Map::new()
                }
            }
        } else {
            Map::new()
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), Value::String(value));
        let raw = serde_json::to_string_pretty(&self.entries)?;
        write_text_file(&self.path, &raw)
    }
}
