//! CSV export of result rows
//!
//! Every table starts with the `document,phrase,score,rank` header, even when
//! it has no rows.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::errors::{Result, TextRankError};
use crate::pipeline::runner::DocumentRanking;
use crate::types::ResultRow;

/// Column names of the result table
pub const HEADER: [&str; 4] = ["document", "phrase", "score", "rank"];

/// Incremental writer for one result table
///
/// The header goes out on construction; rows can then be appended batch by
/// batch.
pub struct RowWriter<W: Write> {
    inner: Writer<W>,
    rows: usize,
}

impl<W: Write> RowWriter<W> {
    pub fn new(writer: W) -> Result<Self> {
        let mut inner = WriterBuilder::new().has_headers(false).from_writer(writer);
        inner.write_record(HEADER)?;
        Ok(Self { inner, rows: 0 })
    }

    /// Append rows to the table
    pub fn append(&mut self, rows: &[ResultRow]) -> Result<()> {
        for row in rows {
            self.inner.serialize(row)?;
        }
        self.rows += rows.len();
        Ok(())
    }

    /// Rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush everything to the underlying writer
    pub fn finish(mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

impl RowWriter<BufWriter<File>> {
    /// Create a table file, creating parent directories as needed
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        if path.is_file() {
            warn!("overwriting existing file {}", path.display());
        }
        Self::new(BufWriter::new(File::create(path)?))
    }
}

/// Write rows as CSV to any writer
pub fn write_rows<W: Write>(writer: W, rows: &[ResultRow]) -> Result<()> {
    let mut table = RowWriter::new(writer)?;
    table.append(rows)?;
    table.finish()
}

/// Write rows to a CSV file, creating parent directories as needed
pub fn write_csv(path: &Path, rows: &[ResultRow]) -> Result<()> {
    let mut table = RowWriter::create(path)?;
    table.append(rows)?;
    table.finish()?;
    debug!(path = %path.display(), rows = rows.len(), "wrote CSV");
    Ok(())
}

/// Output path for one document when writing a file per document
///
/// The document's location relative to `input_root` is mirrored under
/// `output_dir`, with the extension replaced by `csv`.
pub fn per_document_path(input_root: &Path, output_dir: &Path, document: &str) -> PathBuf {
    let source = Path::new(document);
    let relative = source
        .strip_prefix(input_root)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| source.file_name().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("document"));

    output_dir.join(relative).with_extension("csv")
}

/// Output paths for a set of documents, in order
///
/// Fails with [`TextRankError::OutputCollision`] when two documents map to the
/// same file, e.g. `post.txt` and `post.md`.
pub fn per_document_paths<'a, I>(
    input_root: &Path,
    output_dir: &Path,
    documents: I,
) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut owners: FxHashMap<PathBuf, &'a str> = FxHashMap::default();
    let mut paths = Vec::new();

    for document in documents {
        let path = per_document_path(input_root, output_dir, document);
        if let Some(first) = owners.insert(path.clone(), document) {
            return Err(TextRankError::OutputCollision {
                path,
                first: first.to_string(),
                second: document.to_string(),
            });
        }
        paths.push(path);
    }

    Ok(paths)
}

/// Write one CSV per ranked document; returns the number of files written
///
/// Documents without phrases are skipped.
pub fn write_per_document(
    input_root: &Path,
    output_dir: &Path,
    rankings: &[DocumentRanking],
) -> Result<usize> {
    let paths = per_document_paths(
        input_root,
        output_dir,
        rankings.iter().map(|r| r.document.as_str()),
    )?;

    let mut written = 0;
    for (ranking, path) in rankings.iter().zip(&paths) {
        if ranking.phrases.is_empty() {
            warn!("no phrases found in {}, skipping", ranking.document);
            continue;
        }
        write_csv(path, &ranking.rows())?;
        written += 1;
    }
    Ok(written)
}
