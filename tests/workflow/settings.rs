//! Credential editing, language selection and persistence across restarts

use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use tradfile_app::config::Settings;
use tradfile_app::{
    CredentialMode, Engine, EngineEvent, JsonFileStore, MemoryStore, Message, Secret, Services,
    SettingsStore,
};
use tradfile_core::{Language, MASKED_CREDENTIAL, STORE_KEY_API_KEY, STORE_KEY_TRANSLATE_TO};

use super::fakes::{Harness, ScriptedBackend, ScriptedPicker};

async fn harness_with(store: MemoryStore) -> Harness {
    Harness::new(
        store,
        ScriptedBackend::succeeding(),
        ScriptedPicker::cancelling(),
    )
    .started()
    .await
}

fn credential_display(h: &Harness) -> String {
    h.engine.state.settings.credential.display().to_string()
}

async fn enter_credential(h: &mut Harness, value: &str) {
    h.engine.process_message(Message::BeginCredentialEdit);
    h.engine
        .process_message(Message::CredentialInput(Secret::new(value)));
    h.engine.process_message(Message::ConfirmCredential);
    h.wait_until(|e| !e.state.settings.credential.is_saving())
        .await;
}

#[tokio::test]
async fn test_fresh_install_shows_empty_field() {
    let h = harness_with(MemoryStore::new()).await;

    assert_eq!(
        h.engine.state.settings.credential.mode(),
        CredentialMode::Viewing
    );
    assert_eq!(credential_display(&h), "");
    assert_eq!(h.engine.state.settings.target_language, Language::English);
}

#[tokio::test]
async fn test_credential_survives_restart_masked() {
    let mut h = harness_with(MemoryStore::new()).await;

    enter_credential(&mut h, "sk-live-123").await;
    assert_eq!(
        h.engine.state.settings.credential.mode(),
        CredentialMode::Viewing
    );
    assert_eq!(credential_display(&h), MASKED_CREDENTIAL);
    assert_eq!(
        h.store.persisted_values().get(STORE_KEY_API_KEY),
        Some(&"sk-live-123".to_string())
    );

    let restarted = harness_with(h.store.reopen()).await;
    assert_eq!(credential_display(&restarted), MASKED_CREDENTIAL);
    assert!(restarted.engine.state.settings.credential.has_stored());
}

#[tokio::test]
async fn test_cancel_discards_draft() {
    let mut h = harness_with(MemoryStore::with_values([(STORE_KEY_API_KEY, "sk-old")])).await;
    assert_eq!(credential_display(&h), MASKED_CREDENTIAL);

    h.engine.process_message(Message::BeginCredentialEdit);
    assert_eq!(
        h.engine.state.settings.credential.mode(),
        CredentialMode::Editing
    );
    assert_eq!(credential_display(&h), "");

    h.engine
        .process_message(Message::CredentialInput(Secret::new("sk-new")));
    assert_eq!(
        h.engine.state.settings.credential.mode(),
        CredentialMode::Modified
    );
    assert_eq!(credential_display(&h), "sk-new");

    h.engine.process_message(Message::CancelCredentialEdit);
    assert_eq!(credential_display(&h), MASKED_CREDENTIAL);

    h.settle_for(Duration::from_millis(20)).await;
    assert_eq!(h.store.save_count(), 0);
    assert_eq!(
        h.store.persisted_values().get(STORE_KEY_API_KEY),
        Some(&"sk-old".to_string())
    );
}

#[tokio::test]
async fn test_cancel_without_stored_credential_shows_mask() {
    let mut h = harness_with(MemoryStore::new()).await;
    assert_eq!(credential_display(&h), "");

    h.engine.process_message(Message::BeginCredentialEdit);
    h.engine.process_message(Message::CancelCredentialEdit);
    assert_eq!(
        h.engine.state.settings.credential.mode(),
        CredentialMode::Viewing
    );
    assert_eq!(credential_display(&h), MASKED_CREDENTIAL);
    assert!(!h.engine.state.settings.credential.has_stored());

    h.engine.process_message(Message::BeginCredentialEdit);
    h.engine
        .process_message(Message::CredentialInput(Secret::new("sk-draft")));
    h.engine.process_message(Message::CancelCredentialEdit);
    assert_eq!(credential_display(&h), MASKED_CREDENTIAL);

    h.settle_for(Duration::from_millis(20)).await;
    assert_eq!(h.store.save_count(), 0);
    assert!(h.store.persisted_values().is_empty());
}

#[tokio::test]
async fn test_confirm_without_changes_is_ignored() {
    let mut h = harness_with(MemoryStore::new()).await;

    h.engine.process_message(Message::BeginCredentialEdit);
    h.engine.process_message(Message::ConfirmCredential);
    h.settle_for(Duration::from_millis(20)).await;

    assert_eq!(
        h.engine.state.settings.credential.mode(),
        CredentialMode::Editing
    );
    assert_eq!(h.store.save_count(), 0);
}

#[tokio::test]
async fn test_failed_save_keeps_draft_for_retry() {
    let store = MemoryStore::new();
    store.set_fail_saves(true);
    let mut h = harness_with(store).await;

    enter_credential(&mut h, "sk-retry").await;
    assert_eq!(
        h.engine.state.settings.credential.mode(),
        CredentialMode::Modified
    );
    assert_eq!(credential_display(&h), "sk-retry");
    assert_eq!(h.store.get(STORE_KEY_API_KEY).await.unwrap(), None);

    h.store.set_fail_saves(false);
    h.engine.process_message(Message::ConfirmCredential);
    h.wait_until(|e| e.state.settings.credential.mode() == CredentialMode::Viewing)
        .await;
    assert_eq!(credential_display(&h), MASKED_CREDENTIAL);
}

#[tokio::test]
async fn test_credential_events_never_leak_saved_value() {
    let mut h = harness_with(MemoryStore::with_values([(STORE_KEY_API_KEY, "sk-secret")])).await;
    let mut events = h.engine.subscribe();

    h.engine.process_message(Message::BeginCredentialEdit);
    h.engine.process_message(Message::CancelCredentialEdit);

    let mut displays = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let EngineEvent::CredentialChanged { display, .. } = event {
            displays.push(display);
        }
    }
    assert_eq!(displays, vec!["".to_string(), MASKED_CREDENTIAL.to_string()]);
}

#[tokio::test]
async fn test_language_selection_persisted() {
    let mut h = harness_with(MemoryStore::new()).await;

    h.engine
        .process_message(Message::SelectLanguage(Language::German));
    assert_eq!(h.engine.state.settings.target_language, Language::German);

    let store = Arc::clone(&h.store);
    h.wait_until(move |_| store.save_count() == 1).await;

    let restarted = harness_with(h.store.reopen()).await;
    assert_eq!(
        restarted.engine.state.settings.target_language,
        Language::German
    );
}

#[tokio::test]
async fn test_unsupported_stored_language_falls_back() {
    let h = harness_with(MemoryStore::with_values([(STORE_KEY_TRANSLATE_TO, "Klingon")])).await;
    assert_eq!(h.engine.state.settings.target_language, Language::English);

    let h = harness_with(MemoryStore::with_values([(STORE_KEY_TRANSLATE_TO, "french")])).await;
    assert_eq!(h.engine.state.settings.target_language, Language::English);

    let h = harness_with(MemoryStore::with_values([(STORE_KEY_TRANSLATE_TO, "French")])).await;
    assert_eq!(h.engine.state.settings.target_language, Language::French);
}

#[tokio::test]
async fn test_failed_language_save_keeps_selection() {
    let store = MemoryStore::new();
    store.set_fail_saves(true);
    let mut h = harness_with(store).await;

    h.engine
        .process_message(Message::SelectLanguage(Language::Japanese));
    h.settle_for(Duration::from_millis(30)).await;

    assert_eq!(h.engine.state.settings.target_language, Language::Japanese);
    assert!(h.store.persisted_values().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON file store
// ─────────────────────────────────────────────────────────────────────────────

fn json_engine(
    store: Arc<JsonFileStore>,
) -> Engine<JsonFileStore, ScriptedBackend, ScriptedPicker> {
    Engine::new(
        Settings::default(),
        Services::new(
            store,
            Arc::new(ScriptedBackend::succeeding()),
            Arc::new(ScriptedPicker::cancelling()),
        ),
    )
}

async fn wait_loaded(engine: &mut Engine<JsonFileStore, ScriptedBackend, ScriptedPicker>) {
    while !engine.state.settings.loaded {
        assert!(engine.recv_and_process().await);
    }
}

#[tokio::test]
async fn test_json_store_round_trip_across_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storeTradFile.json");

    let mut engine = json_engine(Arc::new(JsonFileStore::open(&path)));
    engine.start();
    wait_loaded(&mut engine).await;

    engine.process_message(Message::BeginCredentialEdit);
    engine.process_message(Message::CredentialInput(Secret::new("sk-file")));
    engine.process_message(Message::ConfirmCredential);
    while engine.state.settings.credential.is_saving() {
        assert!(engine.recv_and_process().await);
    }
    engine.process_message(Message::SelectLanguage(Language::Spanish));
    engine.shutdown().await;

    let reopened = JsonFileStore::open(&path);
    assert_eq!(
        reopened.get(STORE_KEY_API_KEY).await.unwrap(),
        Some("sk-file".to_string())
    );
    assert_eq!(
        reopened.get(STORE_KEY_TRANSLATE_TO).await.unwrap(),
        Some("Spanish".to_string())
    );

    let mut restarted = json_engine(Arc::new(reopened));
    restarted.start();
    wait_loaded(&mut restarted).await;
    assert_eq!(
        restarted.state.settings.credential.display(),
        MASKED_CREDENTIAL
    );
    assert_eq!(restarted.state.settings.target_language, Language::Spanish);
    restarted.shutdown().await;
}

#[tokio::test]
async fn test_malformed_json_store_opens_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storeTradFile.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = Arc::new(JsonFileStore::open(&path));
    let mut engine = json_engine(Arc::clone(&store));
    engine.start();
    wait_loaded(&mut engine).await;

    assert_eq!(engine.state.settings.credential.display(), "");
    assert_eq!(engine.state.settings.target_language, Language::English);

    // The next save replaces the broken file
    store
        .set(STORE_KEY_TRANSLATE_TO, "Korean".to_string())
        .await
        .unwrap();
    store.save().await.unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed[STORE_KEY_TRANSLATE_TO], "Korean");
    engine.shutdown().await;
}
