//! System clipboard access for copy, cut and paste of the display.

use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to access clipboard: {0}")]
    Unavailable(#[source] arboard::Error),
    #[error("failed to copy to clipboard: {0}")]
    Copy(#[source] arboard::Error),
    #[error("failed to read from clipboard: {0}")]
    Paste(#[source] arboard::Error),
}

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(ClipboardError::Unavailable)?;

    clipboard
        .set_text(text.to_string())
        .map_err(ClipboardError::Copy)
}

/// Read text from the system clipboard.
pub fn paste_from_clipboard() -> Result<String, ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(ClipboardError::Unavailable)?;

    clipboard.get_text().map_err(ClipboardError::Paste)
}
