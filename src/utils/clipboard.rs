//! Clipboard  cross-platform clipboard helpers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard error: {0}")]
    Clip(String),
}

/// 剪贴板契约：尽力写入，调用方记录失败后忽略
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// 系统剪贴板（copypasta）
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        copy_to_clipboard(text)
    }
}

/// 将文本复制到系统剪贴板
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.set_contents(text.to_string())
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

/// 记录写入内容的剪贴板，用于测试
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub writes: Vec<String>,
    pub fail: bool,
}

#[cfg(test)]
impl Clipboard for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Clip("模拟失败".into()));
        }
        self.writes.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_clipboard() {
        let mut clip = RecordingClipboard::default();
        clip.write_text("🚀 JSON 测试Unicode字符 ✨").unwrap();
        assert_eq!(clip.writes, vec!["🚀 JSON 测试Unicode字符 ✨".to_string()]);

        clip.fail = true;
        assert!(clip.write_text("x").is_err());
        assert_eq!(clip.writes.len(), 1);
    }

    #[test]
    fn test_clipboard_error_message() {
        let err = ClipboardError::Clip("no display".into());
        assert_eq!(err.to_string(), "clipboard error: no display");
    }
}
