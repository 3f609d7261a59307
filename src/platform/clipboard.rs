//! Clipboard collaborator
//!
//! Accepts one finished string and reports success or failure, either
//! right away or, for platforms that settle asynchronously, through
//! [`Clipboard::poll`]. Failures are recovered by the caller; nothing here
//! is fatal.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard API is not available")]
    Unavailable,
    #[error("clipboard write was rejected: {0}")]
    Rejected(String),
}

/// How far a write got when `write_text` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    /// The text is on the clipboard
    Done,
    /// The platform settles later; the outcome comes from `poll`
    Pending,
}

/// Anything that can take the final share text
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<CopyStatus, ClipboardError>;

    /// Outcome of the latest pending write, reported once
    fn poll(&mut self) -> Option<Result<(), ClipboardError>> {
        None
    }
}

/// Keeps the last written text; can be told to fail
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    pub writes: usize,
    /// Reject every write, as a browser does without permission
    pub deny: bool,
}

impl MemoryClipboard {
    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Default::default()
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<CopyStatus, ClipboardError> {
        if self.deny {
            return Err(ClipboardError::Rejected("permission denied".to_string()));
        }
        self.contents = Some(text.to_string());
        self.writes += 1;
        Ok(CopyStatus::Done)
    }
}

/// Native stand-in: logs the text instead of copying it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogClipboard;

impl Clipboard for LogClipboard {
    fn write_text(&mut self, text: &str) -> Result<CopyStatus, ClipboardError> {
        log::info!("Share text:\n{}", text);
        Ok(CopyStatus::Done)
    }
}

impl<C: Clipboard + ?Sized> Clipboard for &mut C {
    fn write_text(&mut self, text: &str) -> Result<CopyStatus, ClipboardError> {
        (**self).write_text(text)
    }

    fn poll(&mut self) -> Option<Result<(), ClipboardError>> {
        (**self).poll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::default();
        assert_eq!(clipboard.write_text("hi"), Ok(CopyStatus::Done));
        assert_eq!(clipboard.poll(), None);
        assert_eq!(clipboard.contents.as_deref(), Some("hi"));
        assert_eq!(clipboard.writes, 1);

        let mut denied = MemoryClipboard::denying();
        assert!(matches!(
            denied.write_text("hi"),
            Err(ClipboardError::Rejected(_))
        ));
        assert_eq!(denied.contents, None);
    }
}
