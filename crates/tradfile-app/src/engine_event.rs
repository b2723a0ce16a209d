//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use std::path::PathBuf;

use tradfile_core::{Language, StagedFile};

use crate::credential::CredentialMode;
use crate::state::Page;

/// Domain events emitted by the Engine for external consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Staging
    // ─────────────────────────────────────────────────────────
    /// The staged collection changed (admission, dismissal, flags, removal)
    FilesChanged { files: Vec<StagedFile> },

    // ─────────────────────────────────────────────────────────
    // Translation
    // ─────────────────────────────────────────────────────────
    /// The observable `submitting` flag flipped
    SubmittingChanged { submitting: bool },

    /// A batch completed; `translated` lists the removed inputs
    TranslationSucceeded { translated: Vec<PathBuf> },

    /// A batch failed; its files stay flagged
    TranslationFailed { reason: String },

    // ─────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────
    /// Credential field mode, visible text or saving flag changed
    CredentialChanged {
        mode: CredentialMode,
        display: String,
        saving: bool,
    },

    LanguageChanged { language: Language },

    PageChanged { page: Page },

    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Get a string label for the event type (for logging/debugging)
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FilesChanged { .. } => "files_changed",
            Self::SubmittingChanged { .. } => "submitting_changed",
            Self::TranslationSucceeded { .. } => "translation_succeeded",
            Self::TranslationFailed { .. } => "translation_failed",
            Self::CredentialChanged { .. } => "credential_changed",
            Self::LanguageChanged { .. } => "language_changed",
            Self::PageChanged { .. } => "page_changed",
            Self::Shutdown => "shutdown",
        }
    }
}
