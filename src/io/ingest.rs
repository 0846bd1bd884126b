//! Corpus ingestion from tab-separated files.
//!
//! The engine itself only consumes `(id, text)` pairs; this module supplies
//! them from the `id<TAB>text` record format the CLI reads. Retrieval from
//! anything richer (a database, an HTML extractor) belongs to external
//! collaborators.

use std::fs;
use std::path::Path;

use crate::core::errors::{NeardupError, Result};
use crate::engine::matrix::DocumentId;

/// Read `(id, text)` pairs from a tab-separated file.
///
/// Each non-empty line holds `id<TAB>text`; only the first tab splits, so
/// text may contain further tabs. A line without a tab carries text only and
/// gets no id (the engine defaults the id to the text).
pub fn read_corpus(path: &Path) -> Result<Vec<(Option<DocumentId>, String)>> {
    let contents = fs::read_to_string(path)
        .map_err(|err| NeardupError::io(format!("failed to read corpus {}", path.display()), err))?;

    let mut records = Vec::new();
    for line in contents.lines() {
        if line.is_empty() {
            continue;
        }

        match line.split_once('\t') {
            Some((id, text)) => records.push((Some(DocumentId::from(id)), text.to_string())),
            None => records.push((None, line.to_string())),
        }
    }

    Ok(records)
}
