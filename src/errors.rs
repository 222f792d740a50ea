//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

/// Coarse classification used by the grid controllers to decide how a
/// failure affects dirty state and how it is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Local input problem, never reaches the data layer.
    Validation,
    /// The targeted stat line no longer exists server-side.
    ConflictOrNotFound,
    /// Any other failed create/update/delete. Not retried automatically.
    Transient,
    /// Misuse of the edit protocol, permissions or configuration.
    Protocol,
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Request failed: {0}")]
    Transient(String),

    // ---------------------------
    // Validation errors
    // ---------------------------
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Select a player before adding a stat line")]
    MissingPlayer,

    #[error("Player #{0} already has a stat line for this game")]
    DuplicatePlayer(i64),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ---------------------------
    // Remote state errors
    // ---------------------------
    #[error("{0} not found (it may have been deleted)")]
    NotFound(String),

    // ---------------------------
    // Edit protocol errors
    // ---------------------------
    #[error("Stat line #{dirty} has unsaved changes; save or discard them first")]
    DirtyRowConflict { dirty: i64 },

    #[error("Another unsaved-changes prompt is already open")]
    PromptBusy,

    #[error("Not in edit mode")]
    NotEditing,

    #[error("No cell selected")]
    NoFocus,

    #[error("Account '{account}' cannot manage stats for team #{team}")]
    PermissionDenied { account: String, team: i64 },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::Validation { .. }
            | AppError::MissingPlayer
            | AppError::DuplicatePlayer(_)
            | AppError::InvalidDate(_) => ErrorClass::Validation,
            AppError::NotFound(_) => ErrorClass::ConflictOrNotFound,
            AppError::Io(_) | AppError::Db(_) | AppError::Transient(_) => ErrorClass::Transient,
            AppError::Migration(_)
            | AppError::DirtyRowConflict { .. }
            | AppError::PromptBusy
            | AppError::NotEditing
            | AppError::NoFocus
            | AppError::PermissionDenied { .. }
            | AppError::Config(_)
            | AppError::Other(_) => ErrorClass::Protocol,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
