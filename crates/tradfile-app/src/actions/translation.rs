//! Batch translation task

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;

use crate::backend::TranslationBackend;
use crate::job::BatchRequest;
use crate::message::Message;

/// Run the batch and report exactly one completion message.
///
/// The backend call runs in its own task so a panic or abort there is still
/// reported as a failure.
pub fn spawn_translate_batch<B>(
    backend: Arc<B>,
    request: BatchRequest,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()>
where
    B: TranslationBackend + Sync + 'static,
{
    tokio::spawn(async move {
        let work = tokio::spawn(async move {
            backend
                .translate_batch(&request.inputs, &request.outputs)
                .await
        });

        let msg = match work.await {
            Ok(Ok(outputs)) => Message::TranslationSucceeded { outputs },
            Ok(Err(e)) => Message::TranslationFailed {
                error: e.to_string(),
            },
            Err(e) => {
                error!("Translation task ended without a result: {}", e);
                Message::TranslationFailed {
                    error: format!("translation task ended without a result: {}", e),
                }
            }
        };
        let _ = msg_tx.send(msg).await;
    })
}
