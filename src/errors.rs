//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError so the CLI and any
//! HTTP front-end can map failures the same way.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Caller input
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Session lifecycle
    // ---------------------------
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Config
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Status code an HTTP layer should answer with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::InvalidDate(_) | AppError::InvalidTime(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::Storage(_)
            | AppError::Migration(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Config(_) => 500,
        }
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(AppError::Validation("x".into()).http_status(), 400);
        assert_eq!(AppError::InvalidDate("x".into()).http_status(), 400);
        assert_eq!(AppError::NotFound("x".into()).http_status(), 404);
        assert_eq!(AppError::Conflict("x".into()).http_status(), 409);
        assert_eq!(
            AppError::Storage(rusqlite::Error::QueryReturnedNoRows).http_status(),
            500
        );
    }
}
