use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("invalid token '{text}': {reason}")]
    InvalidToken { text: String, reason: String },

    #[error("invalid layout profile: {0}")]
    InvalidProfile(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("document has no pages")]
    NoPages,
}
