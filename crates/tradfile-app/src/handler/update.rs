//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::{AppPhase, AppState};
use tracing::info;

use super::{settings, staging, translation, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::ExitApp => {
            info!("Exit requested");
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::ShowPage(page) => {
            state.page = page;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Staging Messages
        // ─────────────────────────────────────────────────────────
        Message::FilesDropped { paths } => staging::handle_files_dropped(state, paths),
        Message::OpenFilePicker => staging::handle_open_file_picker(state),
        Message::FilesPicked { paths } => staging::handle_files_picked(state, paths),
        Message::FilePickerCancelled => staging::handle_file_picker_cancelled(state),
        Message::FilePickerFailed { error } => staging::handle_file_picker_failed(state, error),
        Message::DismissFile { path } => staging::handle_dismiss_file(state, &path),

        // ─────────────────────────────────────────────────────────
        // Translation Messages
        // ─────────────────────────────────────────────────────────
        Message::SubmitBatch => translation::handle_submit_batch(state),
        Message::TranslationSucceeded { outputs } => {
            translation::handle_translation_succeeded(state, outputs)
        }
        Message::TranslationFailed { error } => {
            translation::handle_translation_failed(state, error)
        }
        Message::ReleaseFailedFiles => translation::handle_release_failed_files(state),

        // ─────────────────────────────────────────────────────────
        // Settings Messages
        // ─────────────────────────────────────────────────────────
        Message::LoadSettings => settings::handle_load_settings(state),
        Message::SettingsLoaded {
            has_credential,
            language,
        } => settings::handle_settings_loaded(state, has_credential, language),
        Message::SettingsLoadFailed { error } => settings::handle_settings_load_failed(state, error),
        Message::BeginCredentialEdit => settings::handle_begin_credential_edit(state),
        Message::CancelCredentialEdit => settings::handle_cancel_credential_edit(state),
        Message::CredentialInput(value) => settings::handle_credential_input(state, value),
        Message::ConfirmCredential => settings::handle_confirm_credential(state),
        Message::CredentialSaved => settings::handle_credential_saved(state),
        Message::CredentialSaveFailed { error } => {
            settings::handle_credential_save_failed(state, error)
        }
        Message::SelectLanguage(language) => settings::handle_select_language(state, language),
        Message::LanguageSaved(language) => settings::handle_language_saved(language),
        Message::LanguageSaveFailed { language, error } => {
            settings::handle_language_save_failed(language, error)
        }
    }
}
