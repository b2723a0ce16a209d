//! Action handlers: UpdateAction dispatch and background task spawning

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backend::TranslationBackend;
use crate::message::Message;
use crate::picker::FilePicker;
use crate::services::Services;
use crate::store::SettingsStore;
use crate::UpdateAction;

pub(super) mod picker;
pub(super) mod settings;
pub(super) mod translation;

/// Execute an action by spawning a background task.
///
/// Every task reports back through `msg_tx`; the returned handle lets the
/// engine wait for in-flight work on shutdown.
pub fn handle_action<S, B, P>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    services: &Services<S, B, P>,
) -> JoinHandle<()>
where
    S: SettingsStore + Sync + 'static,
    B: TranslationBackend + Sync + 'static,
    P: FilePicker + Sync + 'static,
{
    match action {
        UpdateAction::LoadSettings => {
            settings::spawn_load_settings(services.store.clone(), msg_tx)
        }

        UpdateAction::OpenFilePicker { request } => {
            picker::spawn_file_picker(services.picker.clone(), request, msg_tx)
        }

        UpdateAction::TranslateBatch { request } => {
            translation::spawn_translate_batch(services.backend.clone(), request, msg_tx)
        }

        UpdateAction::PersistCredential { value } => {
            settings::spawn_persist_credential(services.store.clone(), value, msg_tx)
        }

        UpdateAction::PersistLanguage { language } => {
            settings::spawn_persist_language(services.store.clone(), language, msg_tx)
        }
    }
}
