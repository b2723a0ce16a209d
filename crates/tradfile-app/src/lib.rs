//! tradfile-app - Staging, batch orchestration and settings state for tradfile
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management, the Engine that front-ends drive, configuration loading, the
//! collaborator traits (store, backend, picker) with their concrete
//! implementations, and the drop-zone subscription.

pub mod actions;
pub mod backend;
pub mod config;
pub mod credential;
pub mod drop_zone;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod job;
pub mod message;
pub mod picker;
pub mod process;
pub mod services;
pub mod signals;
pub mod staging;
pub mod state;
pub mod store;

// Re-export primary types
pub use backend::{BatchTranslator, CommandTranslator, DocumentTranslator, TranslationBackend};
pub use credential::{CredentialField, CredentialMode, Secret};
pub use drop_zone::{DropEventSource, DropListener, DropZone};
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use job::{BatchRequest, JobPhase, TranslationJob};
pub use message::Message;
pub use picker::{DialogFilePicker, FilePicker, PickRequest};
pub use services::Services;
pub use staging::FileStagingManager;
pub use state::{AppPhase, AppState, Page};
pub use store::{JsonFileStore, MemoryStore, SettingsStore};
