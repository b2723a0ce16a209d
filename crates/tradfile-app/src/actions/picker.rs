//! File picker task

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::message::Message;
use crate::picker::{FilePicker, PickRequest};

pub fn spawn_file_picker<P>(
    picker: Arc<P>,
    request: PickRequest,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()>
where
    P: FilePicker + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match picker.pick(&request).await {
            Ok(paths) if paths.is_empty() => Message::FilePickerCancelled,
            Ok(paths) => {
                debug!("Picker returned {} path(s)", paths.len());
                Message::FilesPicked { paths }
            }
            Err(e) => Message::FilePickerFailed {
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    })
}
