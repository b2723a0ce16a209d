//! Staging handlers: drag-drop, file picker and dismissal

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::picker::PickRequest;
use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

pub fn handle_files_dropped(state: &mut AppState, paths: Vec<PathBuf>) -> UpdateResult {
    let offered = paths.len();
    let added = state.admit_files(paths);
    info!("Drop admitted {} of {} file(s)", added, offered);
    UpdateResult::none()
}

/// Open the picker unless one is already showing.
pub fn handle_open_file_picker(state: &mut AppState) -> UpdateResult {
    if state.picker_open {
        debug!("File picker already open");
        return UpdateResult::none();
    }
    state.picker_open = true;
    UpdateResult::action(UpdateAction::OpenFilePicker {
        request: PickRequest::pdf_documents(),
    })
}

pub fn handle_files_picked(state: &mut AppState, paths: Vec<PathBuf>) -> UpdateResult {
    state.picker_open = false;
    if paths.is_empty() {
        return handle_file_picker_cancelled(state);
    }
    let offered = paths.len();
    let added = state.admit_files(paths);
    info!("Picker admitted {} of {} file(s)", added, offered);
    UpdateResult::none()
}

/// A cancelled picker changes nothing else.
pub fn handle_file_picker_cancelled(state: &mut AppState) -> UpdateResult {
    state.picker_open = false;
    debug!("File picker cancelled");
    UpdateResult::none()
}

pub fn handle_file_picker_failed(state: &mut AppState, error: String) -> UpdateResult {
    state.picker_open = false;
    warn!("File picker failed: {}", error);
    UpdateResult::none()
}

pub fn handle_dismiss_file(state: &mut AppState, path: &Path) -> UpdateResult {
    if state.staging.dismiss(path) {
        debug!("Dismissed {}", path.display());
    } else {
        debug!("Dismiss ignored for {}", path.display());
    }
    UpdateResult::none()
}
