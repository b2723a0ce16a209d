//! Drop-zone subscription
//!
//! The layout layer publishes the zone bounds into a [`DropZone`]; the shell
//! broadcasts drag-drop notifications through a [`DropEventSource`]. A
//! [`DropListener`] joins the two: while alive it forwards drops that land
//! inside the current bounds to the engine as [`Message::FilesDropped`].

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tradfile_core::prelude::*;
use tradfile_core::{is_inside, DragDropEvent, ZoneBounds};

use crate::message::Message;

/// Buffered drag-drop events per subscriber before lagging.
const DROP_EVENT_CAPACITY: usize = 64;

/// Current bounds of the drop target (`None` = not rendered).
#[derive(Debug, Clone)]
pub struct DropZone {
    bounds: Arc<watch::Sender<Option<ZoneBounds>>>,
}

impl Default for DropZone {
    fn default() -> Self {
        Self::new()
    }
}

impl DropZone {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            bounds: Arc::new(tx),
        }
    }

    /// Publish new bounds after a layout pass.
    pub fn set_bounds(&self, bounds: Option<ZoneBounds>) {
        self.bounds.send_replace(bounds);
    }

    pub fn bounds(&self) -> Option<ZoneBounds> {
        *self.bounds.borrow()
    }

    fn watch(&self) -> watch::Receiver<Option<ZoneBounds>> {
        self.bounds.subscribe()
    }
}

/// Fan-out of drag-drop notifications from the shell.
#[derive(Debug, Clone)]
pub struct DropEventSource {
    tx: broadcast::Sender<DragDropEvent>,
}

impl Default for DropEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DropEventSource {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(DROP_EVENT_CAPACITY);
        Self { tx }
    }

    /// Deliver an event to every live listener. Returns the listener count.
    pub fn emit(&self, event: DragDropEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn subscribe(&self) -> broadcast::Receiver<DragDropEvent> {
        self.tx.subscribe()
    }
}

/// Scoped drop subscription. Dropping it stops forwarding immediately.
#[derive(Debug)]
pub struct DropListener {
    task: JoinHandle<()>,
}

impl DropListener {
    /// Subscribe and start forwarding.
    ///
    /// The subscription exists as soon as this returns, so events emitted
    /// right after are not missed.
    pub fn spawn(
        source: &DropEventSource,
        zone: &DropZone,
        msg_tx: mpsc::Sender<Message>,
    ) -> Self {
        let mut events = source.subscribe();
        let bounds = zone.watch();

        let task = tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Drop listener lagged, skipped {} event(s)", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                // Bounds can change between layout passes; read them per event
                let current = *bounds.borrow();
                let (x, y) = (event.position.x, event.position.y);
                if !is_inside(x, y, current.as_ref()) {
                    trace!("Drag event at ({}, {}) outside drop zone", x, y);
                    continue;
                }

                if !event.is_drop() {
                    debug!("Drag {:?} inside drop zone", event.kind);
                    continue;
                }

                if msg_tx
                    .send(Message::FilesDropped { paths: event.paths })
                    .await
                    .is_err()
                {
                    break;
                }
            }
        });

        Self { task }
    }
}

impl Drop for DropListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}
