//! Error and diagnostic types for tileset loading

use std::path::PathBuf;
use thiserror::Error;

/// A non-fatal problem found while indexing sheets or resolving tiles.
///
/// Diagnostics never abort a load; the affected sheet, entry, or reference is skipped
/// and the rest of the document is still processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// A declared sheet image could not be opened or probed
    #[error("Image file not found or unreadable: {file} ({reason})")]
    MissingSheetFile { file: String, reason: String },
    /// A sheet declaration field has the wrong shape
    #[error("Malformed sheet declaration {sheet}: {reason}")]
    MalformedSheet { sheet: String, reason: String },
    /// A sheet's effective cell size has a zero dimension
    #[error("Sheet '{file}' has unusable cell size {width}x{height}")]
    InvalidCellSize { file: String, width: u32, height: u32 },
    /// A tile entry lacks identifiers or has a foreground element of unknown shape
    #[error("Malformed tile entry #{entry} in sheet '{sheet}': {reason}")]
    MalformedTileEntry { sheet: String, entry: usize, reason: String },
    /// A global sprite index falls outside every declared range
    #[error("Global sprite index {index} (tile {}) is outside of any defined image range", ids.join(", "))]
    IndexOutOfRange { index: i64, ids: Vec<String> },
}

impl Diagnostic {
    /// Short machine-friendly name of the diagnostic kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MissingSheetFile { .. } => "missing-sheet-file",
            Diagnostic::MalformedSheet { .. } => "malformed-sheet",
            Diagnostic::InvalidCellSize { .. } => "invalid-cell-size",
            Diagnostic::MalformedTileEntry { .. } => "malformed-tile-entry",
            Diagnostic::IndexOutOfRange { .. } => "index-out-of-range",
        }
    }
}

/// Fatal error for a document load. No partial result is produced.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The document file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is not a valid tileset (bad JSON or wrong structure)
    #[error("Document unreadable: {0}")]
    DocumentUnreadable(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::DocumentUnreadable(e.to_string())
    }
}
