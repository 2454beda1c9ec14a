//! Unified application error type.
//! All modules (config, sheets, render, core, cli) return AppError to keep
//! the error handling consistent and easy to manage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration file '{}': {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },

    // ---------------------------
    // Spreadsheet access
    // ---------------------------
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Spreadsheet API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Worksheet error: {0}")]
    Worksheet(String),

    #[error("Invalid service URL: {0}")]
    Url(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // ---------------------------
    // Record / rendering errors
    // ---------------------------
    #[error("Missing field '{field}' in record at sheet row {row}")]
    FieldMissing { field: String, row: u32 },

    #[error("Invalid value for field '{field}' at sheet row {row}: '{value}'")]
    InvalidField {
        field: String,
        row: u32,
        value: String,
    },

    #[error("Invalid sent-status '{value}' at sheet row {row} (expected 'Y' or 'N')")]
    InvalidSentStatus { row: u32, value: String },

    #[error("Render error: {0}")]
    Render(String),

    // ---------------------------
    // Run outcome
    // ---------------------------
    #[error("{failed} of {attempted} invoice(s) failed")]
    RunFailed { failed: usize, attempted: usize },
}

pub type AppResult<T> = Result<T, AppError>;
