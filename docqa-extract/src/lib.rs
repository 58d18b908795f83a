//! # docqa-extract
//!
//! PDF text extraction for the DocQA indexing job. Extraction is
//! deliberately tolerant: a document that fails to parse is logged and
//! skipped, because partial corpus coverage beats aborting a whole
//! indexing run. An entirely empty result is left to the caller to
//! treat as fatal.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The source folder could not be read at all.
    #[error("Failed to read folder {folder}: {source}")]
    Folder {
        /// The folder that could not be scanned.
        folder: String,
        #[source]
        source: walkdir::Error,
    },

    /// A single document could not be parsed.
    #[error("Failed to extract text from {file}: {message}")]
    Document {
        /// The file that failed.
        file: String,
        /// The underlying parser error.
        message: String,
    },
}

/// A convenience result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Extract the text of a single PDF.
///
/// # Errors
///
/// Returns [`ExtractError::Document`] if the file cannot be parsed.
pub fn extract_text(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path).map_err(|e| ExtractError::Document {
        file: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Extract text from every PDF directly inside `folder`.
///
/// Scans non-recursively for files with a `.pdf` extension
/// (case-insensitive), keyed by filename in a `BTreeMap` so the
/// combined corpus text is deterministic. A file that fails to parse
/// is logged with `warn!` and skipped. Returns an empty map when no
/// PDF yields text — callers must treat that as a failed indexing run.
///
/// # Errors
///
/// Returns [`ExtractError::Folder`] only if the folder itself cannot
/// be scanned.
pub fn extract_folder(folder: &Path) -> Result<BTreeMap<String, String>> {
    let mut texts = BTreeMap::new();

    for entry in walkdir::WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ExtractError::Folder {
            folder: folder.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_pdf(path) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        info!(file = %name, "extracting");
        match extract_text(path) {
            Ok(text) if !text.trim().is_empty() => {
                texts.insert(name, text);
            }
            Ok(_) => {
                warn!(file = %name, "extracted no text, skipping");
            }
            Err(e) => {
                warn!(file = %name, error = %e, "extraction failed, skipping");
            }
        }
    }

    if texts.is_empty() {
        warn!(folder = %folder.display(), "no PDF text extracted");
    }
    Ok(texts)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_folder_yields_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let texts = extract_folder(dir.path()).unwrap();
        assert!(texts.is_empty());
    }

    #[test]
    fn non_pdf_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "plain text").unwrap();
        let texts = extract_folder(dir.path()).unwrap();
        assert!(texts.is_empty());
    }

    #[test]
    fn corrupt_pdf_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"not actually a pdf").unwrap();
        let texts = extract_folder(dir.path()).unwrap();
        assert!(texts.is_empty());
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(extract_folder(&missing), Err(ExtractError::Folder { .. })));
    }

    #[test]
    fn pdf_extension_matching_is_case_insensitive() {
        assert!(is_pdf(Path::new("a.pdf")));
        assert!(is_pdf(Path::new("a.PDF")));
        assert!(!is_pdf(Path::new("a.pdfx")));
        assert!(!is_pdf(Path::new("pdf")));
    }
}
