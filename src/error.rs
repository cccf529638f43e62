//! Error types for GeoLint

use thiserror::Error;

/// Result type alias for GeoLint operations
pub type Result<T> = std::result::Result<T, GeoLintError>;

/// Main error type for GeoLint operations.
///
/// The validator core itself never fails: malformed command input degrades
/// to `ValidationIssue`s. These variants only surface at the crate boundary
/// when loading a catalog or reading a script file.
#[derive(Error, Debug)]
pub enum GeoLintError {
    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
