//! Export artifacts: mask text for the clipboard and selection payloads
//! saved as a JSON file.
//!
//! Exports never mutate the trait data. Failures are reported as short
//! status strings for the user instead of being propagated.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name used when saving a selection payload.
pub const DOWNLOAD_FILENAME: &str = "selected-variant-punks.json";

/// Characters of mask text shown before truncating the summary.
pub const SUMMARY_LIMIT: usize = 200;

/// Error type for export operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// `"Pixels (<n>): <mask>"`, truncated with an ellipsis past [`SUMMARY_LIMIT`] characters.
pub fn format_pixel_summary(mask: &str, count: usize) -> String {
    match mask.char_indices().nth(SUMMARY_LIMIT) {
        None => format!("Pixels ({}): {}", count, mask),
        Some((cut, _)) => format!("Pixels ({}): {}…", count, &mask[..cut]),
    }
}

/// Destination for plain-text copies.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// The operating system clipboard.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        let mut clip = arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
        clip.set_text(text.to_string()).map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

/// Copy `text`, returning the status line to show.
///
/// Empty text is not copied and yields `None`.
pub fn copy_with_status(clipboard: &mut dyn Clipboard, text: &str, success: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    Some(match clipboard.write_text(text) {
        Ok(()) => success.to_string(),
        Err(e) => {
            log::warn!("copy failed: {}", e);
            "Copy failed".to_string()
        }
    })
}

/// Curation selection: alternates to include and canonicals to remove.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionExport {
    pub include: Vec<String>,
    pub remove: Vec<String>,
}

impl SelectionExport {
    pub fn new(include: Vec<String>, remove: Vec<String>) -> Self {
        Self { include, remove }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.remove.is_empty()
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the payload as [`DOWNLOAD_FILENAME`] inside `dir`.
    pub fn save_download(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(DOWNLOAD_FILENAME);
        fs::write(&path, self.to_pretty_json()?)?;
        Ok(path)
    }

    /// Save and return the status line to show, as `Err` on failure.
    pub fn save_with_status(&self, dir: &Path) -> Result<String, String> {
        match self.save_download(dir) {
            Ok(path) => {
                log::debug!("saved selection to {}", path.display());
                Ok("Saved selection as file.".to_string())
            }
            Err(e) => {
                log::warn!("saving selection failed: {}", e);
                Err("Could not save selection.".to_string())
            }
        }
    }

    /// Copy the payload, returning the status line to show.
    pub fn copy_with_status(&self, clipboard: &mut dyn Clipboard) -> String {
        let outcome = self.to_pretty_json().and_then(|payload| clipboard.write_text(&payload));
        match outcome {
            Ok(()) => "Copied selection to clipboard.".to_string(),
            Err(e) => {
                log::warn!("copying selection failed: {}", e);
                "Could not copy to clipboard. Copy manually from below.".to_string()
            }
        }
    }
}
