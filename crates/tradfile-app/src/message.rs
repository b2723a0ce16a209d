//! Message types for the application (TEA pattern)

use std::path::PathBuf;

use tradfile_core::Language;

use crate::credential::Secret;
use crate::state::Page;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Force quit (signal handler, stdin closed)
    Quit,

    /// Process-exit command from the settings page
    ExitApp,

    /// Switch the active page
    ShowPage(Page),

    // ─────────────────────────────────────────────────────────
    // Staging Messages
    // ─────────────────────────────────────────────────────────
    /// Files dropped inside the drop zone
    FilesDropped { paths: Vec<PathBuf> },

    /// Open the native file picker
    OpenFilePicker,

    /// Picker returned a selection
    FilesPicked { paths: Vec<PathBuf> },

    /// Picker closed without a selection
    FilePickerCancelled,

    /// Picker could not be shown
    FilePickerFailed { error: String },

    /// Remove a staged file (ignored while it is being translated)
    DismissFile { path: PathBuf },

    // ─────────────────────────────────────────────────────────
    // Translation Messages
    // ─────────────────────────────────────────────────────────
    /// Submit every staged file as one batch
    SubmitBatch,

    /// Backend finished the batch
    TranslationSucceeded { outputs: Vec<PathBuf> },

    /// Backend failed, or the batch task died
    TranslationFailed { error: String },

    /// Clear the in-flight flag on files left by a failed batch
    ReleaseFailedFiles,

    // ─────────────────────────────────────────────────────────
    // Settings Messages
    // ─────────────────────────────────────────────────────────
    /// Read persisted preferences
    LoadSettings,

    /// Persisted preferences were read
    SettingsLoaded {
        has_credential: bool,
        language: Language,
    },

    /// Reading preferences failed; defaults stay in place
    SettingsLoadFailed { error: String },

    BeginCredentialEdit,
    CancelCredentialEdit,
    CredentialInput(Secret),
    ConfirmCredential,

    /// Store accepted the confirmed credential
    CredentialSaved,

    /// Store rejected the confirmed credential
    CredentialSaveFailed { error: String },

    /// Target language picked from the list (persisted immediately)
    SelectLanguage(Language),

    LanguageSaved(Language),
    LanguageSaveFailed { language: Language, error: String },
}
