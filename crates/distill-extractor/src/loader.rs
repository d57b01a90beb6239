//! Document loader - reads plain-text documents from disk

use crate::error::{DistillError, Result};
use std::path::Path;
use tracing::debug;

/// File extensions the loader accepts (files without an extension are read
/// as plain text too)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "text"];

/// Read a document as UTF-8 text
///
/// Binary or non-UTF-8 content is rejected here so the pipeline only ever
/// sees valid text.
pub fn load_document(path: &Path) -> Result<String> {
    if let Some(ext) = path.extension() {
        let ext = ext.to_string_lossy().to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(DistillError::UnsupportedFormat(format!(
                "'.{}' files are not supported (expected {})",
                ext,
                SUPPORTED_EXTENSIONS
                    .iter()
                    .map(|e| format!(".{}", e))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
    }

    let bytes = std::fs::read(path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    String::from_utf8(bytes).map_err(|e| {
        DistillError::InvalidEncoding(format!(
            "{} is not valid UTF-8 (at byte {})",
            path.display(),
            e.utf8_error().valid_up_to()
        ))
    })
}
