//! OS signal handling
//!
//! SIGINT/SIGTERM (Ctrl+C on Windows) become [`Message::Quit`], so a signal
//! shuts the engine down the same way the `quit` command does.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tradfile_core::prelude::*;

use crate::message::Message;

/// Spawn the listener. Abort the returned handle to stop listening.
pub fn spawn_signal_handler(msg_tx: mpsc::Sender<Message>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                info!("Received {}, quitting", signal);
                let _ = msg_tx.send(Message::Quit).await;
            }
            Err(e) => error!("Signal handler error: {}", e),
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| Error::startup(format!("Failed to create SIGINT handler: {}", e)))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| Error::startup(format!("Failed to create SIGTERM handler: {}", e)))?;

    let name = tokio::select! {
        _ = sigint.recv() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
    };
    Ok(name)
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| Error::startup(format!("Failed to listen for Ctrl+C: {}", e)))?;
    Ok("Ctrl+C")
}
