//! IO helper: safe file read/write

use std::{fs, path::Path};

use crate::model::data_core::AppError;

/// 读取文本文件（启动时预载入输入区）
pub fn read_text_file(p: &Path) -> Result<String, AppError> {
    Ok(fs::read_to_string(p)?)
}

/// 写入文本文件：先写临时文件再重命名
pub fn write_text_file(p: &Path, content: &str) -> Result<(), AppError> {
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = p.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, p)?;
    Ok(())
}
