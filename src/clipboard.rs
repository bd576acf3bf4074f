//! System clipboard access

use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Init(arboard::Error),
    #[error("clipboard write failed: {0}")]
    Write(arboard::Error),
    #[error("nothing to copy")]
    Empty,
    #[error("clipboard task failed: {0}")]
    Task(String),
}

/// Write `text` through a fresh clipboard handle
pub fn set_text(text: String) -> Result<(), ClipboardError> {
    if text.is_empty() {
        return Err(ClipboardError::Empty);
    }
    Clipboard::new()
        .map_err(ClipboardError::Init)?
        .set_text(text)
        .map_err(ClipboardError::Write)
}

/// Copy on a blocking thread so the clipboard handle never crosses tasks
pub async fn copy_text(text: String) -> Result<(), ClipboardError> {
    tokio::task::spawn_blocking(move || set_text(text))
        .await
        .unwrap_or_else(|e| Err(ClipboardError::Task(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_rejected_before_touching_the_clipboard() {
        assert!(matches!(set_text(String::new()), Err(ClipboardError::Empty)));
    }

    #[tokio::test]
    async fn test_copy_text_reports_empty_from_blocking_task() {
        assert!(matches!(copy_text(String::new()).await, Err(ClipboardError::Empty)));
    }
}
