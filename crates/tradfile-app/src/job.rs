//! Batch translation job
//!
//! A single job drives the whole staged collection through one backend call
//! at a time. It never owns files: it operates on the
//! [`FileStagingManager`] passed in by the handler.

use std::path::PathBuf;

use tradfile_core::{translated_output_path, StagedFile};

use crate::staging::FileStagingManager;

/// Whether a batch is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobPhase {
    #[default]
    Idle,
    Submitting,
}

/// Parallel input/output lists handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
}

impl BatchRequest {
    /// Build the request for `files`, deriving each output from its input.
    pub fn for_files(files: &[StagedFile]) -> Self {
        let inputs: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        let outputs = inputs.iter().map(|p| translated_output_path(p)).collect();
        Self { inputs, outputs }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Submission state, success indicator and last failure reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationJob {
    phase: JobPhase,
    succeeded: bool,
    last_error: Option<String>,
}

impl TranslationJob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == JobPhase::Submitting
    }

    /// Success indicator: the last batch completed and nothing was admitted
    /// or submitted since.
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start a batch over every staged file.
    ///
    /// Returns `None` (and changes nothing) when a batch is already in flight
    /// or nothing is staged.
    pub fn submit(&mut self, staging: &mut FileStagingManager) -> Option<BatchRequest> {
        if self.is_submitting() || staging.is_empty() {
            return None;
        }

        staging.mark_all_translating();
        self.phase = JobPhase::Submitting;
        self.clear_outcome();

        Some(BatchRequest::for_files(staging.snapshot()))
    }

    /// Backend reported success: drop every in-flight file.
    ///
    /// Returns the removed files, or `None` when no batch was in flight.
    pub fn succeed(&mut self, staging: &mut FileStagingManager) -> Option<Vec<StagedFile>> {
        if !self.is_submitting() {
            return None;
        }
        self.phase = JobPhase::Idle;
        self.succeeded = true;
        self.last_error = None;
        Some(staging.remove_translating())
    }

    /// Backend reported failure. Files keep their in-flight flag.
    ///
    /// Returns `false` when no batch was in flight.
    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        if !self.is_submitting() {
            return false;
        }
        self.phase = JobPhase::Idle;
        self.succeeded = false;
        self.last_error = Some(reason.into());
        true
    }

    /// Clear the in-flight flag on files left behind by a failed batch.
    ///
    /// Returns the number of files released; always 0 while submitting.
    pub fn release(&mut self, staging: &mut FileStagingManager) -> usize {
        if self.is_submitting() {
            return 0;
        }
        staging.release_translating()
    }

    /// Forget the previous outcome (called on admission and submission).
    pub fn clear_outcome(&mut self) {
        self.succeeded = false;
        self.last_error = None;
    }
}
