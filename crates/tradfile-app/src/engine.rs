//! Engine - orchestration state shared by every front-end
//!
//! The Engine owns the TEA state, the message channel, the collaborators and
//! the drop-zone subscription. Front-ends feed it messages and observe it
//! through [`EngineEvent`]s.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tradfile_core::{Language, StagedFile};

use crate::backend::TranslationBackend;
use crate::config::Settings;
use crate::credential::CredentialMode;
use crate::drop_zone::{DropEventSource, DropListener, DropZone};
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::picker::FilePicker;
use crate::process;
use crate::services::Services;
use crate::state::{AppState, Page};
use crate::store::SettingsStore;

/// Message channel capacity
const MESSAGE_CAPACITY: usize = 256;

/// Event broadcast capacity
const EVENT_CAPACITY: usize = 256;

/// How long shutdown waits for in-flight tasks before aborting them
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    files: Vec<StagedFile>,
    submitting: bool,
    succeeded: bool,
    last_error: Option<String>,
    credential_mode: CredentialMode,
    credential_display: String,
    credential_saving: bool,
    language: Language,
    page: Page,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        let credential = &state.settings.credential;
        Self {
            files: state.staging.snapshot().to_vec(),
            submitting: state.translation.is_submitting(),
            succeeded: state.translation.succeeded(),
            last_error: state.translation.last_error().map(str::to_string),
            credential_mode: credential.mode(),
            credential_display: credential.display().to_string(),
            credential_saving: credential.is_saving(),
            language: state.settings.target_language,
            page: state.page,
        }
    }

    fn credential_differs(&self, other: &Self) -> bool {
        self.credential_mode != other.credential_mode
            || self.credential_display != other.credential_display
            || self.credential_saving != other.credential_saving
    }
}

/// Orchestration engine for tradfile.
///
/// Encapsulates:
/// - TEA state management
/// - Message channel
/// - Background task tracking
/// - Drop-zone bounds, drag-drop source and the scoped listener
/// - Event broadcasting for external consumers
pub struct Engine<S, B, P> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, stdin).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    services: Services<S, B, P>,

    /// Background tasks spawned by actions
    tasks: Vec<JoinHandle<()>>,

    drop_events: DropEventSource,
    drop_zone: DropZone,

    /// Present exactly while the drop zone is on screen
    drop_listener: Option<DropListener>,

    event_tx: broadcast::Sender<EngineEvent>,
}

impl<S, B, P> Engine<S, B, P>
where
    S: SettingsStore + Sync + 'static,
    B: TranslationBackend + Sync + 'static,
    P: FilePicker + Sync + 'static,
{
    /// Create an engine. Nothing is spawned until [`Engine::start`].
    pub fn new(config: Settings, services: Services<S, B, P>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            state: AppState::with_settings(config),
            msg_tx,
            msg_rx,
            services,
            tasks: Vec::new(),
            drop_events: DropEventSource::new(),
            drop_zone: DropZone::new(),
            drop_listener: None,
            event_tx,
        }
    }

    /// Subscribe to the drop zone and load persisted preferences.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        info!("Engine starting");
        self.process_message(Message::LoadSettings);
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Runs handler::update(), dispatches resulting actions, keeps the drop
    /// listener in step with the active page and emits EngineEvents for
    /// whatever changed.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        let spawned =
            process::process_message(&mut self.state, msg, &self.msg_tx, &self.services);
        self.track_tasks(spawned);
        self.sync_drop_listener();

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message and process it.
    ///
    /// Returns `false` when the channel is closed.
    pub async fn recv_and_process(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.process_message(msg);
                true
            }
            None => false,
        }
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Where the shell delivers drag-drop events.
    pub fn drop_events(&self) -> &DropEventSource {
        &self.drop_events
    }

    /// Where the layout layer publishes drop-zone bounds.
    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    pub fn is_drop_listener_active(&self) -> bool {
        self.drop_listener.is_some()
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Whether any action task is still running.
    pub fn has_pending_tasks(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    /// Release the drop listener and wait briefly for in-flight tasks.
    pub async fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);

        self.drop_listener = None;

        let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;
        for mut task in self.tasks.drain(..) {
            match tokio::time::timeout_at(deadline, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Background task ended abnormally: {}", e),
                Err(_) => {
                    warn!("Background task still running at shutdown, aborting");
                    task.abort();
                }
            }
        }

        info!("Engine shut down");
    }

    fn track_tasks(&mut self, spawned: Vec<JoinHandle<()>>) {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.extend(spawned);
    }

    /// Hold a listener exactly while the drop zone is on screen.
    fn sync_drop_listener(&mut self) {
        let wanted = self.state.drop_zone_active();
        match (wanted, self.drop_listener.is_some()) {
            (true, false) => {
                debug!("Subscribing to drag-drop events");
                self.drop_listener = Some(DropListener::spawn(
                    &self.drop_events,
                    &self.drop_zone,
                    self.msg_tx.clone(),
                ));
            }
            (false, true) => {
                debug!("Releasing drag-drop subscription");
                self.drop_listener = None;
            }
            _ => {}
        }
    }

    /// Emit EngineEvents based on state changes after processing.
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.files != post.files {
            self.emit(EngineEvent::FilesChanged {
                files: post.files.clone(),
            });
        }

        if pre.submitting != post.submitting {
            self.emit(EngineEvent::SubmittingChanged {
                submitting: post.submitting,
            });
        }

        // Batch resolution: Submitting -> Idle
        if pre.submitting && !post.submitting {
            if post.succeeded {
                let translated: Vec<PathBuf> = pre
                    .files
                    .iter()
                    .filter(|f| f.translating && !post.files.iter().any(|p| p.path == f.path))
                    .map(|f| f.path.clone())
                    .collect();
                self.emit(EngineEvent::TranslationSucceeded { translated });
            } else if let Some(reason) = &post.last_error {
                self.emit(EngineEvent::TranslationFailed {
                    reason: reason.clone(),
                });
            }
        }

        if pre.credential_differs(post) {
            self.emit(EngineEvent::CredentialChanged {
                mode: post.credential_mode,
                display: post.credential_display.clone(),
                saving: post.credential_saving,
            });
        }

        if pre.language != post.language {
            self.emit(EngineEvent::LanguageChanged {
                language: post.language,
            });
        }

        if pre.page != post.page {
            self.emit(EngineEvent::PageChanged { page: post.page });
        }
    }

    /// Emit a single EngineEvent to all subscribers.
    ///
    /// send() only fails when nobody is subscribed, which is fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

impl<S, B, P> Drop for Engine<S, B, P> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
