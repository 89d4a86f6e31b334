use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize jobs to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported export format '{0}' (expected csv or json)")]
    UnsupportedFormat(String),
}
