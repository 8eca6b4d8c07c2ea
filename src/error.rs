//! Error types shared by the report model, exporters and server

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: std::path::PathBuf },

    #[cfg(feature = "xlsx")]
    #[error("Excel writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet export is unavailable: this build has no Excel writer (enable the `xlsx` feature)")]
    SpreadsheetUnavailable,

    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("Element {id} does not accept {event} events")]
    InvalidEvent { id: String, event: &'static str },
}

pub type Result<T> = std::result::Result<T, ReportError>;
