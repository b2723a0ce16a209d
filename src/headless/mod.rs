//! Headless mode - stdin commands in, NDJSON events out
//!
//! The headless front-end stands in for the desktop shell: it publishes
//! drop-zone bounds, replays drag-drop gestures, presses the buttons of both
//! pages, and reports every observable state change as one JSON object per
//! line on stdout.
//!
//! # Example Session
//!
//! ```text
//! > zone 0 0 400 300
//! > drag drop 120 80 /home/me/report.pdf /home/me/notes.txt
//! {"event":"files_changed","files":[{"path":"/home/me/report.pdf","name":"report.pdf","translating":false}],"timestamp":1704700001000}
//! > translate
//! {"event":"files_changed","files":[{"path":"/home/me/report.pdf","name":"report.pdf","translating":true}],"timestamp":1704700002000}
//! {"event":"submitting_changed","submitting":true,"timestamp":1704700002000}
//! ```

pub mod command;
pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;

use tradfile_app::{AppState, EngineEvent};
use tradfile_core::{StagedFile, ZoneBounds};

pub use runner::run_headless;

/// A staged file as reported on stdout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileView {
    pub path: String,
    pub name: String,
    pub translating: bool,
}

impl From<&StagedFile> for FileView {
    fn from(file: &StagedFile) -> Self {
        Self {
            path: file.path.to_string_lossy().into_owned(),
            name: file.display_name(),
            translating: file.translating,
        }
    }
}

/// Credential field as reported on stdout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialView {
    pub mode: String,
    pub display: String,
    pub saving: bool,
}

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Engine started and is reading commands
    Ready { version: String, timestamp: i64 },

    FilesChanged {
        files: Vec<FileView>,
        timestamp: i64,
    },

    SubmittingChanged { submitting: bool, timestamp: i64 },

    TranslationSucceeded {
        translated: Vec<String>,
        timestamp: i64,
    },

    TranslationFailed { reason: String, timestamp: i64 },

    CredentialChanged {
        #[serde(flatten)]
        credential: CredentialView,
        timestamp: i64,
    },

    LanguageChanged { language: String, timestamp: i64 },

    PageChanged { page: String, timestamp: i64 },

    /// Full state snapshot (reply to `status`)
    Status {
        page: String,
        files: Vec<FileView>,
        submitting: bool,
        succeeded: bool,
        last_error: Option<String>,
        credential: CredentialView,
        language: String,
        drop_zone: Option<ZoneBounds>,
        timestamp: i64,
    },

    /// Error occurred
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    /// The engine is shutting down
    Quitting { timestamp: i64 },
}

impl HeadlessEvent {
    /// Write this event as one NDJSON line.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let json = serde_json::to_string(self).map_err(io::Error::other)?;
        writeln!(out, "{}", json)?;
        out.flush()
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Get a string label for the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "ready",
            Self::FilesChanged { .. } => "files_changed",
            Self::SubmittingChanged { .. } => "submitting_changed",
            Self::TranslationSucceeded { .. } => "translation_succeeded",
            Self::TranslationFailed { .. } => "translation_failed",
            Self::CredentialChanged { .. } => "credential_changed",
            Self::LanguageChanged { .. } => "language_changed",
            Self::PageChanged { .. } => "page_changed",
            Self::Status { .. } => "status",
            Self::Error { .. } => "error",
            Self::Quitting { .. } => "quitting",
        }
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn ready() -> Self {
        Self::Ready {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }

    pub fn quitting() -> Self {
        Self::Quitting {
            timestamp: Self::now(),
        }
    }

    /// Snapshot of everything a front-end would render.
    pub fn status(state: &AppState, drop_zone: Option<ZoneBounds>) -> Self {
        let credential = &state.settings.credential;
        Self::Status {
            page: state.page.as_str().to_string(),
            files: state.staging.snapshot().iter().map(FileView::from).collect(),
            submitting: state.is_submitting(),
            succeeded: state.translation.succeeded(),
            last_error: state.translation.last_error().map(str::to_string),
            credential: CredentialView {
                mode: credential.mode().as_str().to_string(),
                display: credential.display().to_string(),
                saving: credential.is_saving(),
            },
            language: state.settings.target_language.name().to_string(),
            drop_zone,
            timestamp: Self::now(),
        }
    }

    /// Translate an engine event. `Shutdown` has no line of its own; the
    /// runner reports `quitting` instead.
    pub fn from_engine(event: &EngineEvent) -> Option<Self> {
        let timestamp = Self::now();
        let converted = match event {
            EngineEvent::FilesChanged { files } => Self::FilesChanged {
                files: files.iter().map(FileView::from).collect(),
                timestamp,
            },
            EngineEvent::SubmittingChanged { submitting } => Self::SubmittingChanged {
                submitting: *submitting,
                timestamp,
            },
            EngineEvent::TranslationSucceeded { translated } => Self::TranslationSucceeded {
                translated: translated
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect(),
                timestamp,
            },
            EngineEvent::TranslationFailed { reason } => Self::TranslationFailed {
                reason: reason.clone(),
                timestamp,
            },
            EngineEvent::CredentialChanged {
                mode,
                display,
                saving,
            } => Self::CredentialChanged {
                credential: CredentialView {
                    mode: mode.as_str().to_string(),
                    display: display.clone(),
                    saving: *saving,
                },
                timestamp,
            },
            EngineEvent::LanguageChanged { language } => Self::LanguageChanged {
                language: language.name().to_string(),
                timestamp,
            },
            EngineEvent::PageChanged { page } => Self::PageChanged {
                page: page.as_str().to_string(),
                timestamp,
            },
            EngineEvent::Shutdown => return None,
        };
        Some(converted)
    }
}
