//! Settings page handlers: credential field and target language

use tracing::{debug, info, warn};
use tradfile_core::Language;

use crate::credential::Secret;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub fn handle_load_settings(_state: &mut AppState) -> UpdateResult {
    UpdateResult::action(UpdateAction::LoadSettings)
}

pub fn handle_settings_loaded(
    state: &mut AppState,
    has_credential: bool,
    language: Language,
) -> UpdateResult {
    let settings = &mut state.settings;
    if !settings.credential.initialize(has_credential) {
        debug!("Credential field busy, keeping current display");
    }
    settings.target_language = language;
    settings.loaded = true;
    debug!(
        "Settings loaded (credential stored: {}, language: {})",
        has_credential, language
    );
    UpdateResult::none()
}

pub fn handle_settings_load_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Failed to load settings, using defaults: {}", error);
    state.settings.loaded = true;
    UpdateResult::none()
}

pub fn handle_begin_credential_edit(state: &mut AppState) -> UpdateResult {
    if !state.settings.credential.begin_edit() {
        debug!("Begin edit ignored");
    }
    UpdateResult::none()
}

pub fn handle_cancel_credential_edit(state: &mut AppState) -> UpdateResult {
    if !state.settings.credential.cancel() {
        debug!("Cancel edit ignored");
    }
    UpdateResult::none()
}

pub fn handle_credential_input(state: &mut AppState, value: Secret) -> UpdateResult {
    if !state.settings.credential.input(value) {
        debug!("Credential input ignored");
    }
    UpdateResult::none()
}

pub fn handle_confirm_credential(state: &mut AppState) -> UpdateResult {
    match state.settings.credential.confirm() {
        Some(value) => UpdateResult::action(UpdateAction::PersistCredential { value }),
        None => {
            debug!("Confirm ignored");
            UpdateResult::none()
        }
    }
}

pub fn handle_credential_saved(state: &mut AppState) -> UpdateResult {
    if state.settings.credential.save_succeeded() {
        info!("Credential saved");
    }
    UpdateResult::none()
}

pub fn handle_credential_save_failed(state: &mut AppState, error: String) -> UpdateResult {
    if state.settings.credential.save_failed() {
        warn!("Failed to save credential: {}", error);
    }
    UpdateResult::none()
}

/// Language changes apply at once and are persisted in the background.
pub fn handle_select_language(state: &mut AppState, language: Language) -> UpdateResult {
    state.settings.target_language = language;
    UpdateResult::action(UpdateAction::PersistLanguage { language })
}

pub fn handle_language_saved(language: Language) -> UpdateResult {
    debug!("Target language {} saved", language);
    UpdateResult::none()
}

pub fn handle_language_save_failed(language: Language, error: String) -> UpdateResult {
    warn!("Failed to save target language {}: {}", language, error);
    UpdateResult::none()
}
