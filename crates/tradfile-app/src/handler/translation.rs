//! Batch submission and completion handlers

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::state::AppState;

use super::{UpdateAction, UpdateResult};

/// Mark every staged file in flight and dispatch the batch.
///
/// Flags are set here, before the backend runs, so files admitted while the
/// batch is in flight stay out of it.
pub fn handle_submit_batch(state: &mut AppState) -> UpdateResult {
    match state.translation.submit(&mut state.staging) {
        Some(request) => {
            info!("Submitting batch of {} file(s)", request.len());
            UpdateResult::action(UpdateAction::TranslateBatch { request })
        }
        None if state.is_submitting() => {
            debug!("Submit ignored: batch already in flight");
            UpdateResult::none()
        }
        None => {
            debug!("Submit ignored: nothing staged");
            UpdateResult::none()
        }
    }
}

pub fn handle_translation_succeeded(state: &mut AppState, outputs: Vec<PathBuf>) -> UpdateResult {
    match state.translation.succeed(&mut state.staging) {
        Some(removed) => info!(
            "Batch succeeded: {} file(s) translated, {} output(s)",
            removed.len(),
            outputs.len()
        ),
        None => debug!("Ignoring completion with no batch in flight"),
    }
    UpdateResult::none()
}

pub fn handle_translation_failed(state: &mut AppState, error: String) -> UpdateResult {
    if state.translation.fail(error.clone()) {
        warn!(
            "Batch failed, {} file(s) left in flight: {}",
            state.staging.translating_count(),
            error
        );
    } else {
        debug!("Ignoring failure with no batch in flight: {}", error);
    }
    UpdateResult::none()
}

pub fn handle_release_failed_files(state: &mut AppState) -> UpdateResult {
    if state.is_submitting() {
        debug!("Release ignored: batch in flight");
        return UpdateResult::none();
    }
    let released = state.translation.release(&mut state.staging);
    if released > 0 {
        info!("Released {} file(s) from a failed batch", released);
    }
    UpdateResult::none()
}
