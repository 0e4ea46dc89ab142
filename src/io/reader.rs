//! Document reading
//!
//! Failures are returned per document so one bad file never stops a batch.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::DocumentError;
use crate::types::Document;

/// Read a UTF-8 text file into a [`Document`] identified by its path
///
/// A leading byte-order mark is dropped. Content with NUL bytes or invalid
/// UTF-8 is rejected as not text.
pub fn read_document(path: &Path) -> Result<Document, DocumentError> {
    let document = path.display().to_string();

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(source) => return Err(DocumentError::Unreadable { document, source }),
    };

    if let Some(offset) = bytes.iter().position(|&b| b == 0) {
        return Err(DocumentError::NotText {
            document,
            reason: format!("NUL byte at offset {offset}"),
        });
    }

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            return Err(DocumentError::NotText {
                document,
                reason: format!("invalid UTF-8 at byte {}", err.utf8_error().valid_up_to()),
            })
        }
    };

    let text = match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    };

    Ok(Document { id: document, text })
}

/// Read every path, keeping failures in place
pub fn read_documents(paths: &[PathBuf]) -> Vec<Result<Document, DocumentError>> {
    paths.iter().map(|p| read_document(p)).collect()
}
