//! Message processing
//!
//! Runs the TEA update loop for one incoming message, following any chained
//! messages, and dispatches the resulting actions.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actions::handle_action;
use crate::backend::TranslationBackend;
use crate::handler;
use crate::message::Message;
use crate::picker::FilePicker;
use crate::services::Services;
use crate::state::AppState;
use crate::store::SettingsStore;

/// Process a message through the TEA update function.
///
/// Returns the handles of any background tasks spawned along the way.
pub fn process_message<S, B, P>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    services: &Services<S, B, P>,
) -> Vec<JoinHandle<()>>
where
    S: SettingsStore + Sync + 'static,
    B: TranslationBackend + Sync + 'static,
    P: FilePicker + Sync + 'static,
{
    let mut spawned = Vec::new();

    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            spawned.push(handle_action(action, msg_tx.clone(), services));
        }

        // Continue with follow-up message
        msg = result.message;
    }

    spawned
}
