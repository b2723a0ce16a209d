//! Headless front-end: stdin command lines in, NDJSON events out

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_test::assert_ok;
use tradfile::headless::runner::drive;

use super::fakes::{Harness, ScriptedBackend};

const STEP: Duration = Duration::from_millis(50);

/// Feed `script` one line per step, then close stdin.
async fn feed(tx: mpsc::Sender<String>, script: &[&str]) {
    for line in script {
        tx.send(line.to_string()).await.unwrap();
        tokio::time::sleep(STEP).await;
    }
}

fn parse_events(out: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn event_names(events: &[Value]) -> Vec<String> {
    events
        .iter()
        .map(|e| e["event"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn position(names: &[String], name: &str) -> usize {
    names
        .iter()
        .position(|n| n == name)
        .unwrap_or_else(|| panic!("no {} event in {:?}", name, names))
}

#[tokio::test]
async fn test_drop_and_translate_session() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding());
    let (tx, rx) = mpsc::channel(16);
    let mut out = Vec::new();

    let script = [
        "# session",
        "zone 0 0 400 300",
        "drag drop 120 80 /home/me/report.pdf /home/me/notes.txt",
        "translate",
        "status",
        "quit",
    ];
    let (result, ()) = tokio::join!(
        drive(&mut h.engine, rx, Path::new("/home/me"), &mut out),
        feed(tx, &script),
    );
    assert_ok!(result);

    let events = parse_events(&out);
    let names = event_names(&events);
    assert_eq!(names.first().map(String::as_str), Some("ready"));
    assert_eq!(names.last().map(String::as_str), Some("quitting"));

    let staged = &events[position(&names, "files_changed")];
    assert_eq!(staged["files"].as_array().unwrap().len(), 1);
    assert_eq!(staged["files"][0]["name"], "report.pdf");
    assert_eq!(staged["files"][0]["translating"], false);

    let succeeded = position(&names, "translation_succeeded");
    assert!(position(&names, "submitting_changed") < succeeded);
    assert_eq!(
        events[succeeded]["translated"][0],
        "/home/me/report.pdf"
    );

    let status = &events[position(&names, "status")];
    assert_eq!(status["page"], "main");
    assert_eq!(status["succeeded"], true);
    assert!(status["files"].as_array().unwrap().is_empty());
    assert_eq!(status["drop_zone"]["right"], 400.0);

    assert_eq!(
        h.backend.calls()[0].outputs,
        vec![std::path::PathBuf::from("/home/me/report_translated.pdf")]
    );
}

/// Queue the whole script and close stdin before the session starts.
async fn queued(script: &[&str]) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(script.len().max(1));
    for line in script {
        tx.send(line.to_string()).await.unwrap();
    }
    rx
}

#[tokio::test]
async fn test_piped_drop_is_staged_before_next_line() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding());
    let rx = queued(&["zone 0 0 100 100", "drag drop 5 5 /d/a.pdf", "translate"]).await;
    let mut out = Vec::new();

    assert_ok!(drive(&mut h.engine, rx, Path::new("/"), &mut out).await);

    let calls = h.backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].inputs, vec![std::path::PathBuf::from("/d/a.pdf")]);
    assert!(h.engine.state.staging.is_empty());

    let names = event_names(&parse_events(&out));
    assert!(position(&names, "translation_succeeded") < position(&names, "quitting"));
}

#[tokio::test]
async fn test_piped_drops_outside_zone_do_not_stall() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding());
    let rx = queued(&[
        "zone 0 0 100 100",
        "drag over 5 5 /d/a.pdf",
        "drag drop 500 5 /d/b.pdf",
        "drag drop 5 5 /d/c.pdf /d/d.txt",
        "dismiss /d/c.pdf",
        "status",
    ])
    .await;
    let mut out = Vec::new();

    let started = tokio::time::Instant::now();
    assert_ok!(drive(&mut h.engine, rx, Path::new("/"), &mut out).await);
    assert!(started.elapsed() < Duration::from_secs(1));

    let events = parse_events(&out);
    let names = event_names(&events);
    let status = &events[position(&names, "status")];
    assert!(status["files"].as_array().unwrap().is_empty());
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn test_bad_lines_reported_and_session_continues() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding());
    let (tx, rx) = mpsc::channel(16);
    let mut out = Vec::new();

    let script = ["explode", "lang Vulcan", "settings", "lang German", "quit"];
    let (result, ()) = tokio::join!(
        drive(&mut h.engine, rx, Path::new("/"), &mut out),
        feed(tx, &script),
    );
    assert_ok!(result);

    let events = parse_events(&out);
    let errors: Vec<&Value> = events.iter().filter(|e| e["event"] == "error").collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("unknown command"));
    assert_eq!(errors[0]["fatal"], false);

    let names = event_names(&events);
    let page = &events[position(&names, "page_changed")];
    assert_eq!(page["page"], "settings");
    let language = &events[position(&names, "language_changed")];
    assert_eq!(language["language"], "German");
}

#[tokio::test]
async fn test_drop_ignored_on_settings_page() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding());
    let (tx, rx) = mpsc::channel(16);
    let mut out = Vec::new();

    let script = [
        "zone 0 0 100 100",
        "settings",
        "drag drop 10 10 /d/a.pdf",
        "main",
        "drag drop 500 500 /d/b.pdf",
        "status",
        "quit",
    ];
    let (result, ()) = tokio::join!(
        drive(&mut h.engine, rx, Path::new("/"), &mut out),
        feed(tx, &script),
    );
    assert_ok!(result);

    let events = parse_events(&out);
    let names = event_names(&events);
    assert!(!names.iter().any(|n| n == "files_changed"));
    assert!(h.engine.state.staging.is_empty());
}

#[tokio::test]
async fn test_end_of_input_waits_for_running_batch() {
    let mut h = Harness::with_backend(ScriptedBackend::gated());
    let backend = Arc::clone(&h.backend);
    let (tx, rx) = mpsc::channel(16);
    let mut out = Vec::new();

    let script = ["zone 0 0 10 10", "drag drop 5 5 /d/a.pdf", "translate"];
    let session = async move {
        feed(tx, &script).await;
        // stdin is closed here; the batch is still running
        tokio::time::sleep(STEP * 2).await;
        backend.open_gate();
    };
    let (result, ()) = tokio::join!(
        drive(&mut h.engine, rx, Path::new("/"), &mut out),
        session,
    );
    assert_ok!(result);

    let names = event_names(&parse_events(&out));
    assert!(position(&names, "translation_succeeded") < position(&names, "quitting"));
    assert!(h.engine.state.staging.is_empty());
}
