/*
[INPUT]:  Plain text produced by log export
[OUTPUT]: Text placed on the system (or an in-memory) clipboard
[POS]:    Platform seam - clipboard access behind a trait
[UPDATE]: When adding clipboard backends
*/

use std::sync::Mutex;

use crate::http::{ClientError, Result};

/// Somewhere exported text can be copied to
pub trait ClipboardService: Send + Sync + std::fmt::Debug {
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Desktop clipboard through `arboard`.
///
/// A handle is opened per copy; headless hosts without a display fail here.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardService for SystemClipboard {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClientError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClientError::Clipboard(e.to_string()))
    }
}

/// Keeps the last copied text in memory
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    fail: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write
    pub fn failing() -> Self {
        Self {
            contents: Mutex::new(None),
            fail: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ClipboardService for MemoryClipboard {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(ClientError::Clipboard("clipboard write rejected".to_string()));
        }
        *self.contents.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
        Ok(())
    }
}
