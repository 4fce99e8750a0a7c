//! FLORES-style parallel corpus loading and batching
//!
//! A corpus directory holds one file per language column, named
//! `<code>.devtest`, one sentence per line, all files row-aligned.

use std::path::Path;

use tracing::{debug, info};

use crate::core::errors::{Result, ValidationError};
use crate::eval::languages::flores_code;

/// One language column of the corpus
#[derive(Debug, Clone)]
struct Column {
    code: String,
    sentences: Vec<String>,
}

/// Row-aligned parallel corpus
#[derive(Debug, Clone)]
pub struct Corpus {
    columns: Vec<Column>,
    rows: usize,
}

impl Corpus {
    /// Load every `.devtest` column in the directory
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ValidationError::CorpusError {
                path: dir.display().to_string(),
                message: "not a directory".to_string(),
            });
        }

        let mut columns = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_devtest = path
                .extension()
                .map(|ext| ext == "devtest")
                .unwrap_or(false);
            if !path.is_file() || !is_devtest {
                continue;
            }

            let code = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();
            let content = std::fs::read_to_string(&path)?;
            let sentences: Vec<String> = content.lines().map(str::to_string).collect();

            debug!("loaded column {} ({} rows)", code, sentences.len());
            columns.push(Column { code, sentences });
        }

        if columns.is_empty() {
            return Err(ValidationError::CorpusError {
                path: dir.display().to_string(),
                message: "no .devtest files found".to_string(),
            });
        }

        // Deterministic column order regardless of directory iteration
        columns.sort_by(|a, b| a.code.cmp(&b.code));

        let rows = columns[0].sentences.len();
        for column in &columns {
            if column.sentences.len() != rows {
                return Err(ValidationError::CorpusError {
                    path: dir.display().to_string(),
                    message: format!(
                        "column {} has {} rows, expected {}",
                        column.code,
                        column.sentences.len(),
                        rows
                    ),
                });
            }
        }

        info!("loaded corpus: {} columns, {} rows", columns.len(), rows);
        Ok(Self { columns, rows })
    }

    /// Number of aligned rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column codes, sorted
    pub fn codes(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.code.as_str()).collect()
    }

    /// Resolve a model's language code to its column.
    ///
    /// The code is first mapped through the FLORES script overrides, then
    /// matched by prefix, so a bare `fra` finds the `fra_Latn` column the
    /// same way the full code does.
    pub fn column(&self, code: &str) -> Result<&[String]> {
        let target = flores_code(code);
        self.columns
            .iter()
            .find(|c| c.code.starts_with(target))
            .map(|c| c.sentences.as_slice())
            .ok_or_else(|| ValidationError::UnmappedLanguage {
                code: code.to_string(),
                column: target.to_string(),
            })
    }
}

/// Split a batch of sentences into `parts` near-equal chunks and join each
/// chunk into a single space-separated text.
///
/// The first `len % parts` chunks take one extra sentence; a batch smaller
/// than `parts` yields trailing empty chunks.
pub fn split_join(batch: &[String], parts: usize) -> Vec<String> {
    let base = batch.len() / parts;
    let extra = batch.len() % parts;

    let mut chunks = Vec::with_capacity(parts);
    let mut start = 0;
    for part in 0..parts {
        let size = if part < extra { base + 1 } else { base };
        chunks.push(batch[start..start + size].join(" "));
        start += size;
    }
    chunks
}
