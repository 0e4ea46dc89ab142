//! Input discovery
//!
//! Resolves the input path into the list of document files to rank.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{Result, TextRankError};

/// Which files under an input directory are documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Required file-name suffix; `None` accepts every file
    pub suffix: Option<String>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            suffix: Some(".txt".to_string()),
        }
    }
}

impl DiscoverOptions {
    fn accepts(&self, path: &Path) -> bool {
        match (&self.suffix, path.file_name()) {
            (None, _) => true,
            (Some(suffix), Some(name)) => name.to_string_lossy().ends_with(suffix.as_str()),
            (Some(_), None) => false,
        }
    }
}

/// List the documents under `input`, sorted by path
///
/// A file input is returned as-is, whatever its suffix. Entries that cannot
/// be traversed are logged and skipped.
pub fn discover_documents(input: &Path, options: &DiscoverOptions) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(input).map_err(|source| TextRankError::Input {
        path: input.to_path_buf(),
        source,
    })?;

    if metadata.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(input)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };

        if entry.file_type().is_file() && options.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(input = %input.display(), found = files.len(), "discovered documents");
    Ok(files)
}
