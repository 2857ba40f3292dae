//! 运行配置：默认值 + 环境变量覆盖

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::model::history::DEFAULT_CAPACITY;

pub const ENV_HISTORY_CAPACITY: &str = "JSON_LENS_HISTORY_CAPACITY";
pub const ENV_DATA_DIR: &str = "JSON_LENS_DATA_DIR";
pub const ENV_LOG: &str = "JSON_LENS_LOG";

/// 存储文件名
pub const STORE_FILE_NAME: &str = "store.json";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub history_capacity: usize,
    pub data_dir: PathBuf,
    pub log_level: tracing::Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("", "", "json_lens")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".json_lens"));
        Self {
            history_capacity: DEFAULT_CAPACITY,
            data_dir,
            log_level: tracing::Level::INFO,
        }
    }
}

impl AppConfig {
    /// 默认配置 + 进程环境变量覆盖
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// 按给定的查找函数覆盖配置；非法值记录警告后忽略
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_HISTORY_CAPACITY) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => self.history_capacity = n,
                _ => tracing::warn!("忽略非法的历史容量配置: {}", raw),
            }
        }
        if let Some(raw) = lookup(ENV_DATA_DIR) {
            if raw.trim().is_empty() {
                tracing::warn!("忽略空的数据目录配置");
            } else {
                self.data_dir = PathBuf::from(raw);
            }
        }
        if let Some(raw) = lookup(ENV_LOG) {
            match raw.trim().parse::<tracing::Level>() {
                Ok(level) => self.log_level = level,
                Err(_) => tracing::warn!("忽略非法的日志级别配置: {}", raw),
            }
        }
        self
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.history_capacity, 10);
        assert_eq!(cfg.log_level, tracing::Level::INFO);
        assert!(cfg.store_path().ends_with(STORE_FILE_NAME));
    }

    #[test]
    fn test_overrides_applied() {
        let cfg = AppConfig::default().with_overrides(lookup_from(&[
            (ENV_HISTORY_CAPACITY, "25"),
            (ENV_DATA_DIR, "/tmp/lens"),
            (ENV_LOG, "debug"),
        ]));
        assert_eq!(cfg.history_capacity, 25);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/lens"));
        assert_eq!(cfg.store_path(), PathBuf::from("/tmp/lens/store.json"));
        assert_eq!(cfg.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let base = AppConfig::default();
        let cfg = base.clone().with_overrides(lookup_from(&[
            (ENV_HISTORY_CAPACITY, "zero"),
            (ENV_DATA_DIR, "  "),
            (ENV_LOG, "loud"),
        ]));
        assert_eq!(cfg, base);

        let cfg = base.clone().with_overrides(lookup_from(&[(ENV_HISTORY_CAPACITY, "0")]));
        assert_eq!(cfg.history_capacity, 10);
    }
}
