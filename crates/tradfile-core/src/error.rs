//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Startup error: {message}")]
    Startup { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration directory could not be resolved")]
    NoConfigDir,

    // ─────────────────────────────────────────────────────────────
    // Settings Store Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Settings store error: {message}")]
    Store { message: String },

    #[error("OPENAI_API_KEY not found in store")]
    CredentialMissing,

    // ─────────────────────────────────────────────────────────────
    // Translation Backend Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Translation backend error: {message}")]
    Backend { message: String },

    #[error("Input and output path counts differ: {inputs} inputs, {outputs} outputs")]
    BatchMismatch { inputs: usize, outputs: usize },

    #[error("No translator command configured")]
    TranslatorNotConfigured,

    #[error("Translation of {path} failed: {reason}")]
    DocumentFailed { path: PathBuf, reason: String },

    // ─────────────────────────────────────────────────────────────
    // File Picker Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No native file dialog available (tried zenity, kdialog)")]
    PickerUnavailable,

    #[error("File picker error: {message}")]
    Picker { message: String },

    // ─────────────────────────────────────────────────────────────
    // Headless Input Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid command: {message}")]
    Command { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn startup(message: impl Into<String>) -> Self {
        Self::Startup {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn document_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DocumentFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn picker(message: impl Into<String>) -> Self {
        Self::Picker {
            message: message.into(),
        }
    }

    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Startup { .. } | Error::NoConfigDir)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Log the error with `context` and convert it
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }
}
