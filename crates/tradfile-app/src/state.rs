//! Application state (Model in TEA pattern)

use std::path::PathBuf;

use tradfile_core::Language;

use crate::config::Settings;
use crate::credential::CredentialField;
use crate::job::TranslationJob;
use crate::staging::FileStagingManager;

/// Whether the application keeps running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Active page. The drop zone only exists on [`Page::Main`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Main,
    Settings,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Main => "main",
            Page::Settings => "settings",
        }
    }
}

/// Settings page state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsState {
    pub credential: CredentialField,
    pub target_language: Language,
    /// Persisted preferences have been read (or failed to read)
    pub loaded: bool,
}

/// Complete application state (the Model in TEA)
#[derive(Debug, Default)]
pub struct AppState {
    pub phase: AppPhase,
    pub page: Page,

    /// Staged documents
    pub staging: FileStagingManager,

    /// Batch submission state
    pub translation: TranslationJob,

    pub settings: SettingsState,

    /// Loaded configuration
    pub config: Settings,

    /// A picker dialog is currently open
    pub picker_open: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(config: Settings) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Admit candidate paths into the staging area.
    ///
    /// Always clears the previous batch outcome, even when nothing new was
    /// accepted.
    pub fn admit_files(&mut self, paths: Vec<PathBuf>) -> usize {
        self.translation.clear_outcome();
        self.staging.admit(paths)
    }

    pub fn is_submitting(&self) -> bool {
        self.translation.is_submitting()
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    /// Whether the drop zone is on screen
    pub fn drop_zone_active(&self) -> bool {
        self.page == Page::Main && !self.should_quit()
    }
}
