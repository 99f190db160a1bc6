use std::path::PathBuf;

use thiserror::Error;

/// Failure of one page conversion. Every variant is terminal.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to open document {path:?}: {reason}")]
    DocumentOpen { path: PathBuf, reason: String },

    #[error("page index {index} out of range (document has {page_count} pages)")]
    PageIndex { index: usize, page_count: usize },

    #[error("failed to render page {index}: {reason}")]
    Render { index: usize, reason: String },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn render(index: usize, reason: impl ToString) -> Self {
        Self::Render {
            index,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// No pdfium shared library could be bound.
#[derive(Error, Debug)]
#[error("pdfium library unavailable (searched {searched:?}): {reason}")]
pub struct BindError {
    pub searched: Vec<PathBuf>,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
