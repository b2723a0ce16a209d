//! Admission, dismissal, picker and drop-zone behaviour

use std::path::PathBuf;
use std::time::Duration;

use tokio_test::assert_ok;
use tradfile_app::{Message, Page};
use tradfile_core::{DragDropEvent, DragDropKind, Point, ZoneBounds};

use super::fakes::{paths, Harness, ScriptedBackend, ScriptedPicker};

fn drop_at(x: f64, y: f64, items: &[&str]) -> DragDropEvent {
    DragDropEvent {
        kind: DragDropKind::Drop,
        position: Point::new(x, y),
        paths: paths(items),
    }
}

#[tokio::test]
async fn test_duplicate_paths_staged_once() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding())
        .started()
        .await;

    h.stage(&["/d/a.pdf", "/d/a.pdf"]);
    h.stage(&["/d/a.pdf", "/d/b.pdf"]);

    assert_eq!(h.staged_paths(), paths(&["/d/a.pdf", "/d/b.pdf"]));
}

#[tokio::test]
async fn test_only_pdf_extension_admitted() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding())
        .started()
        .await;

    h.stage(&["/d/a.PDF", "/d/b.txt", "/d/c", "/d/d.pdf.bak", "/d/e.pdf"]);

    assert_eq!(h.staged_paths(), paths(&["/d/a.PDF", "/d/e.pdf"]));
}

#[tokio::test]
async fn test_dismiss_removes_idle_file() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding())
        .started()
        .await;
    h.stage(&["/d/a.pdf", "/d/b.pdf"]);

    h.engine.process_message(Message::DismissFile {
        path: PathBuf::from("/d/a.pdf"),
    });
    h.engine.process_message(Message::DismissFile {
        path: PathBuf::from("/d/missing.pdf"),
    });

    assert_eq!(h.staged_paths(), paths(&["/d/b.pdf"]));
}

#[tokio::test]
async fn test_dismiss_refused_while_in_flight() {
    let mut h = Harness::with_backend(ScriptedBackend::gated())
        .started()
        .await;
    h.stage(&["/d/a.pdf"]);
    h.engine.process_message(Message::SubmitBatch);

    h.engine.process_message(Message::DismissFile {
        path: PathBuf::from("/d/a.pdf"),
    });
    assert_eq!(h.staged_paths(), paths(&["/d/a.pdf"]));

    h.backend.open_gate();
    h.wait_until(|e| !e.state.is_submitting()).await;
    assert!(h.staged_paths().is_empty());
}

#[tokio::test]
async fn test_picker_selection_is_staged() {
    let mut h = Harness::new(
        Default::default(),
        ScriptedBackend::succeeding(),
        ScriptedPicker::selecting(&["/d/a.pdf", "/d/notes.txt"]),
    )
    .started()
    .await;

    h.engine.process_message(Message::OpenFilePicker);
    h.wait_until(|e| !e.state.picker_open).await;

    assert_eq!(h.staged_paths(), paths(&["/d/a.pdf"]));
    let requests = h.picker.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].allow_multiple);
    assert!(!requests[0].create_directories);
    assert_eq!(requests[0].extension_filter, vec!["pdf".to_string()]);
}

#[tokio::test]
async fn test_second_picker_request_ignored_while_open() {
    let mut h = Harness::new(
        Default::default(),
        ScriptedBackend::succeeding(),
        ScriptedPicker::cancelling(),
    )
    .started()
    .await;

    h.engine.process_message(Message::OpenFilePicker);
    h.engine.process_message(Message::OpenFilePicker);
    h.wait_until(|e| !e.state.picker_open).await;
    h.settle_for(Duration::from_millis(20)).await;

    assert_eq!(h.picker.requests().len(), 1);
}

#[tokio::test]
async fn test_picker_cancel_keeps_success_outcome() {
    let mut h = Harness::new(
        Default::default(),
        ScriptedBackend::succeeding(),
        ScriptedPicker::cancelling(),
    )
    .started()
    .await;
    h.stage(&["/d/a.pdf"]);
    h.engine.process_message(Message::SubmitBatch);
    h.wait_until(|e| e.state.translation.succeeded()).await;

    h.engine.process_message(Message::OpenFilePicker);
    h.wait_until(|e| !e.state.picker_open).await;

    assert!(h.engine.state.translation.succeeded());
    assert!(h.staged_paths().is_empty());
}

#[tokio::test]
async fn test_unavailable_picker_leaves_state_alone() {
    let mut h = Harness::new(
        Default::default(),
        ScriptedBackend::succeeding(),
        ScriptedPicker::unavailable(),
    )
    .started()
    .await;
    h.stage(&["/d/a.pdf"]);

    h.engine.process_message(Message::OpenFilePicker);
    h.wait_until(|e| !e.state.picker_open).await;

    assert_eq!(h.staged_paths(), paths(&["/d/a.pdf"]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Drop zone
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_drop_inside_zone_is_staged() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding())
        .started()
        .await;
    h.engine
        .drop_zone()
        .set_bounds(Some(ZoneBounds::new(0.0, 0.0, 100.0, 100.0)));

    h.engine
        .drop_events()
        .emit(drop_at(100.0, 0.0, &["/d/edge.pdf", "/d/skip.txt"]));
    h.wait_until(|e| !e.state.staging.is_empty()).await;

    assert_eq!(h.staged_paths(), paths(&["/d/edge.pdf"]));
}

#[tokio::test]
async fn test_drop_outside_zone_or_without_bounds_ignored() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding())
        .started()
        .await;

    // No bounds published yet
    h.engine
        .drop_events()
        .emit(drop_at(10.0, 10.0, &["/d/a.pdf"]));

    h.engine
        .drop_zone()
        .set_bounds(Some(ZoneBounds::new(0.0, 0.0, 100.0, 100.0)));
    h.engine
        .drop_events()
        .emit(drop_at(100.5, 50.0, &["/d/b.pdf"]));

    // Non-drop kinds never stage anything
    h.engine.drop_events().emit(DragDropEvent {
        kind: DragDropKind::Over,
        position: Point::new(10.0, 10.0),
        paths: paths(&["/d/c.pdf"]),
    });

    h.settle_for(Duration::from_millis(50)).await;
    assert!(h.staged_paths().is_empty());
}

#[tokio::test]
async fn test_drop_listener_follows_page() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding())
        .started()
        .await;
    h.engine
        .drop_zone()
        .set_bounds(Some(ZoneBounds::new(0.0, 0.0, 100.0, 100.0)));
    assert!(h.engine.is_drop_listener_active());

    h.engine.process_message(Message::ShowPage(Page::Settings));
    assert!(!h.engine.is_drop_listener_active());

    // Delivered while the settings page is showing: nobody listens
    h.engine
        .drop_events()
        .emit(drop_at(10.0, 10.0, &["/d/hidden.pdf"]));
    h.settle_for(Duration::from_millis(30)).await;
    assert!(h.staged_paths().is_empty());

    h.engine.process_message(Message::ShowPage(Page::Main));
    assert!(h.engine.is_drop_listener_active());
    assert_eq!(h.engine.drop_events().listener_count(), 1);

    h.engine
        .drop_events()
        .emit(drop_at(10.0, 10.0, &["/d/shown.pdf"]));
    h.wait_until(|e| !e.state.staging.is_empty()).await;
    assert_eq!(h.staged_paths(), paths(&["/d/shown.pdf"]));
}

#[tokio::test]
async fn test_quit_releases_drop_listener() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding())
        .started()
        .await;
    assert!(h.engine.is_drop_listener_active());

    h.engine.process_message(Message::Quit);
    assert!(h.engine.should_quit());
    assert!(!h.engine.is_drop_listener_active());

    h.engine.shutdown().await;
    assert!(!h.engine.has_pending_tasks());
}

#[tokio::test]
async fn test_engine_events_report_staged_files() {
    let mut h = Harness::with_backend(ScriptedBackend::succeeding())
        .started()
        .await;
    let mut events = h.engine.subscribe();

    h.stage(&["/d/a.pdf"]);

    let event = assert_ok!(events.try_recv());
    match event {
        tradfile_app::EngineEvent::FilesChanged { files } => {
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].path, PathBuf::from("/d/a.pdf"));
            assert!(!files[0].translating);
        }
        other => panic!("expected FilesChanged, got {:?}", other),
    }
}
