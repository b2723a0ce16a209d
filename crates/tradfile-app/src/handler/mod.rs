//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `staging`: Drop, picker and dismiss handlers
//! - `translation`: Batch submission and completion handlers
//! - `settings`: Credential field and language handlers

pub(crate) mod settings;
pub(crate) mod staging;
pub(crate) mod translation;
pub(crate) mod update;


use tradfile_core::Language;

use crate::credential::Secret;
use crate::job::BatchRequest;
use crate::message::Message;
use crate::picker::PickRequest;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Read the credential flag and target language from the store
    LoadSettings,

    /// Show the native file picker
    OpenFilePicker { request: PickRequest },

    /// Hand the batch to the translation backend
    TranslateBatch { request: BatchRequest },

    /// `set` + `save` the confirmed credential
    PersistCredential { value: Secret },

    /// `set` + `save` the selected language
    PersistLanguage { language: Language },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
