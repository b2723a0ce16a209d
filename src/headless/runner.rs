//! Headless mode runner - main event loop without a GUI
//!
//! Reads commands from stdin on a blocking thread, feeds them to the engine
//! and writes every engine event as an NDJSON line.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use tradfile_app::config::{self, Settings};
use tradfile_app::{
    signals, BatchTranslator, CommandTranslator, DialogFilePicker, Engine, EngineEvent,
    FilePicker, JsonFileStore, Message, Secret, Services, SettingsStore, TranslationBackend,
};
use tradfile_core::is_inside;
use tradfile_core::prelude::*;

use super::command::{parse_command, HeadlessCommand, KeyCommand};
use super::HeadlessEvent;

/// Poll interval while waiting for in-flight work after stdin closed
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Buffered stdin lines
const LINE_CAPACITY: usize = 64;

/// Upper bound on waiting for the drop listener to forward a drop
const DROP_FORWARD_TIMEOUT: Duration = Duration::from_secs(1);

/// Run in headless mode with the given config directory.
pub async fn run_headless(config_dir: &Path) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("tradfile starting in HEADLESS mode");
    info!("Config dir: {}", config_dir.display());
    info!("═══════════════════════════════════════════════════════");

    if let Err(e) = config::init_config_dir(config_dir) {
        warn!("Failed to initialize config dir: {}", e);
    }
    let settings = config::load_settings(config_dir);
    if !settings.translator.is_configured() {
        warn!(
            "No translator command in {}; batches will fail until one is set",
            config_dir.join("config.toml").display()
        );
    }

    let mut engine = build_engine(config_dir, settings);
    let signal_task = signals::spawn_signal_handler(engine.msg_sender());

    let (line_tx, line_rx) = mpsc::channel::<String>(LINE_CAPACITY);
    std::thread::spawn(move || read_stdin_blocking(line_tx));

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let mut stdout = std::io::stdout();
    let result = drive(&mut engine, line_rx, &cwd, &mut stdout).await;

    signal_task.abort();
    info!("tradfile headless mode exiting");
    result
}

/// Wire the production collaborators into an engine.
fn build_engine(
    config_dir: &Path,
    settings: Settings,
) -> Engine<JsonFileStore, BatchTranslator<CommandTranslator<JsonFileStore>>, DialogFilePicker> {
    let store = Arc::new(JsonFileStore::open(settings.store.path_in(config_dir)));
    let backend = BatchTranslator::new(CommandTranslator::new(
        settings.translator.clone(),
        Arc::clone(&store),
    ));
    let picker = DialogFilePicker::detect();

    Engine::new(
        settings,
        Services::new(store, Arc::new(backend), Arc::new(picker)),
    )
}

/// Run the engine until it quits.
///
/// `lines` carries raw command lines; when it closes, the loop waits for
/// in-flight work (a running batch, an open picker, a pending save) and then
/// quits. Events are written to `out`.
pub async fn drive<S, B, P>(
    engine: &mut Engine<S, B, P>,
    mut lines: mpsc::Receiver<String>,
    cwd: &Path,
    out: &mut impl Write,
) -> Result<()>
where
    S: SettingsStore + Sync + 'static,
    B: TranslationBackend + Sync + 'static,
    P: FilePicker + Sync + 'static,
{
    let mut events = engine.subscribe();
    engine.start();
    write_event(out, &HeadlessEvent::ready())?;

    let mut input_open = true;

    loop {
        forward_engine_events(&mut events, out)?;

        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        if !input_open && !engine.state.is_submitting() && !engine.has_pending_tasks() {
            // Pick up anything a just-finished task sent
            if engine.drain_pending_messages() == 0 {
                info!("Input closed and no work in flight");
                engine.process_message(Message::Quit);
            }
            continue;
        }

        // Engine messages first, so a line never overtakes work it depends on
        tokio::select! {
            biased;

            msg = engine.msg_rx.recv() => match msg {
                Some(msg) => engine.process_message(msg),
                None => {
                    info!("Message channel closed");
                    break;
                }
            },
            line = lines.recv(), if input_open => match line {
                Some(line) => {
                    if handle_line(engine, &line, cwd, out)? == LineOutcome::DropForwarded {
                        await_forwarded_drop(engine).await;
                    }
                }
                None => {
                    debug!("Stdin closed");
                    input_open = false;
                }
            },
            _ = tokio::time::sleep(DRAIN_POLL), if !input_open => {}
        }
    }

    forward_engine_events(&mut events, out)?;
    write_event(out, &HeadlessEvent::quitting())?;
    engine.shutdown().await;
    Ok(())
}

/// What applying a stdin line left pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineOutcome {
    Done,
    /// A drop landed in the zone; the listener will send `FilesDropped`
    DropForwarded,
}

/// Apply one stdin line. Bad input becomes an `error` event.
fn handle_line<S, B, P>(
    engine: &mut Engine<S, B, P>,
    line: &str,
    cwd: &Path,
    out: &mut impl Write,
) -> Result<LineOutcome>
where
    S: SettingsStore + Sync + 'static,
    B: TranslationBackend + Sync + 'static,
    P: FilePicker + Sync + 'static,
{
    let command = match parse_command(line, cwd) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(LineOutcome::Done),
        Err(e) => {
            warn!("Rejected stdin line {:?}: {}", line, e);
            write_event(out, &HeadlessEvent::error(e.to_string(), e.is_fatal()))?;
            return Ok(LineOutcome::Done);
        }
    };

    let msg = match command {
        HeadlessCommand::Zone(bounds) => {
            engine.drop_zone().set_bounds(bounds);
            return Ok(LineOutcome::Done);
        }
        HeadlessCommand::Drag(event) => {
            // The zone is only published from here, so the listener sees the
            // same bounds when it hit-tests this event
            let lands = event.is_drop()
                && engine.is_drop_listener_active()
                && is_inside(
                    event.position.x,
                    event.position.y,
                    engine.drop_zone().bounds().as_ref(),
                );
            if engine.drop_events().emit(event) == 0 {
                debug!("Drag event with no listener (drop zone not on screen)");
                return Ok(LineOutcome::Done);
            }
            return Ok(if lands {
                LineOutcome::DropForwarded
            } else {
                LineOutcome::Done
            });
        }
        HeadlessCommand::Status => {
            let status = HeadlessEvent::status(&engine.state, engine.drop_zone().bounds());
            write_event(out, &status)?;
            return Ok(LineOutcome::Done);
        }
        HeadlessCommand::Pick => Message::OpenFilePicker,
        HeadlessCommand::Dismiss(path) => Message::DismissFile { path },
        HeadlessCommand::Translate => Message::SubmitBatch,
        HeadlessCommand::Release => Message::ReleaseFailedFiles,
        HeadlessCommand::Page(page) => Message::ShowPage(page),
        HeadlessCommand::Key(KeyCommand::Edit) => Message::BeginCredentialEdit,
        HeadlessCommand::Key(KeyCommand::Cancel) => Message::CancelCredentialEdit,
        HeadlessCommand::Key(KeyCommand::Save) => Message::ConfirmCredential,
        HeadlessCommand::Key(KeyCommand::Type(value)) => {
            Message::CredentialInput(Secret::new(value))
        }
        HeadlessCommand::Lang(language) => Message::SelectLanguage(language),
        HeadlessCommand::Quit => Message::ExitApp,
    };

    engine.process_message(msg);
    Ok(LineOutcome::Done)
}

/// Process engine messages until the listener's `FilesDropped` arrives.
async fn await_forwarded_drop<S, B, P>(engine: &mut Engine<S, B, P>)
where
    S: SettingsStore + Sync + 'static,
    B: TranslationBackend + Sync + 'static,
    P: FilePicker + Sync + 'static,
{
    let deadline = tokio::time::Instant::now() + DROP_FORWARD_TIMEOUT;
    loop {
        match tokio::time::timeout_at(deadline, engine.msg_rx.recv()).await {
            Ok(Some(msg)) => {
                let dropped = matches!(msg, Message::FilesDropped { .. });
                engine.process_message(msg);
                if dropped {
                    return;
                }
            }
            Ok(None) => return,
            Err(_) => {
                warn!("Drop listener did not forward a drop in time");
                return;
            }
        }
    }
}

fn forward_engine_events(
    events: &mut broadcast::Receiver<EngineEvent>,
    out: &mut impl Write,
) -> Result<()> {
    loop {
        match events.try_recv() {
            Ok(event) => {
                if let Some(line) = HeadlessEvent::from_engine(&event) {
                    write_event(out, &line)?;
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} event(s) dropped", skipped);
                write_event(
                    out,
                    &HeadlessEvent::error(format!("{} event(s) dropped", skipped), false),
                )?;
            }
            Err(_) => return Ok(()),
        }
    }
}

fn write_event(out: &mut impl Write, event: &HeadlessEvent) -> Result<()> {
    event.write_to(out).map_err(|e| {
        error!("Failed to write headless event: {}", e);
        Error::from(e)
    })
}

/// Forward stdin lines until EOF (blocking; runs on its own thread)
fn read_stdin_blocking(line_tx: mpsc::Sender<String>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}
