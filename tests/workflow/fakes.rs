//! Scripted collaborators and engine helpers shared by the workflow tests

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Semaphore;
use tradfile_app::config::Settings;
use tradfile_app::{Engine, FilePicker, MemoryStore, PickRequest, Services, TranslationBackend};
use tradfile_core::prelude::*;

pub type TestEngine = Engine<MemoryStore, ScriptedBackend, ScriptedPicker>;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub struct BatchCall {
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
}

/// Backend whose result and completion time are controlled by the test.
///
/// A gated backend blocks every batch until [`ScriptedBackend::open_gate`].
pub struct ScriptedBackend {
    failure: Mutex<Option<String>>,
    panics: bool,
    gate: Semaphore,
    calls: Mutex<Vec<BatchCall>>,
}

impl ScriptedBackend {
    fn build(failure: Option<String>, panics: bool, permits: usize) -> Self {
        Self {
            failure: Mutex::new(failure),
            panics,
            gate: Semaphore::new(permits),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::build(None, false, Semaphore::MAX_PERMITS)
    }

    pub fn failing(reason: &str) -> Self {
        Self::build(Some(reason.to_string()), false, Semaphore::MAX_PERMITS)
    }

    pub fn gated() -> Self {
        Self::build(None, false, 0)
    }

    pub fn panicking() -> Self {
        Self::build(None, true, Semaphore::MAX_PERMITS)
    }

    /// Let one waiting (or future) batch complete.
    pub fn open_gate(&self) {
        self.gate.add_permits(1);
    }

    pub fn set_failure(&self, reason: Option<&str>) {
        *self.failure.lock().unwrap() = reason.map(str::to_string);
    }

    pub fn calls(&self) -> Vec<BatchCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl TranslationBackend for ScriptedBackend {
    async fn translate_batch(
        &self,
        inputs: &[PathBuf],
        outputs: &[PathBuf],
    ) -> Result<Vec<PathBuf>> {
        self.calls.lock().unwrap().push(BatchCall {
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        });

        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| Error::backend("gate closed"))?;
        permit.forget();

        if self.panics {
            panic!("backend crashed");
        }

        let failure = self.failure.lock().unwrap().clone();
        match failure {
            Some(reason) => Err(Error::backend(reason)),
            None => Ok(outputs.to_vec()),
        }
    }
}

/// Picker returning a canned selection (empty = cancelled).
pub struct ScriptedPicker {
    selection: Mutex<Result<Vec<PathBuf>>>,
    requests: Mutex<Vec<PickRequest>>,
}

impl ScriptedPicker {
    pub fn selecting(paths: &[&str]) -> Self {
        Self {
            selection: Mutex::new(Ok(paths.iter().map(PathBuf::from).collect())),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn cancelling() -> Self {
        Self::selecting(&[])
    }

    pub fn unavailable() -> Self {
        Self {
            selection: Mutex::new(Err(Error::PickerUnavailable)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PickRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl FilePicker for ScriptedPicker {
    async fn pick(&self, request: &PickRequest) -> Result<Vec<PathBuf>> {
        self.requests.lock().unwrap().push(request.clone());
        match &*self.selection.lock().unwrap() {
            Ok(paths) => Ok(paths.clone()),
            Err(_) => Err(Error::PickerUnavailable),
        }
    }
}

/// Collaborators kept by the test after they are handed to the engine
pub struct Harness {
    pub engine: TestEngine,
    pub store: Arc<MemoryStore>,
    pub backend: Arc<ScriptedBackend>,
    pub picker: Arc<ScriptedPicker>,
}

impl Harness {
    pub fn new(store: MemoryStore, backend: ScriptedBackend, picker: ScriptedPicker) -> Self {
        let store = Arc::new(store);
        let backend = Arc::new(backend);
        let picker = Arc::new(picker);
        let engine = Engine::new(
            Settings::default(),
            Services::new(store.clone(), backend.clone(), picker.clone()),
        );
        Self {
            engine,
            store,
            backend,
            picker,
        }
    }

    pub fn with_backend(backend: ScriptedBackend) -> Self {
        Self::new(MemoryStore::new(), backend, ScriptedPicker::cancelling())
    }

    /// Start the engine and wait for preferences to load.
    pub async fn started(mut self) -> Self {
        self.engine.start();
        self.wait_until(|e| e.state.settings.loaded).await;
        self
    }

    /// Process incoming messages until `done` holds (panics after 2s).
    pub async fn wait_until(&mut self, done: impl Fn(&TestEngine) -> bool) {
        for _ in 0..400 {
            self.engine.drain_pending_messages();
            if done(&self.engine) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached within 2s");
    }

    /// Process whatever arrives within `window`.
    pub async fn settle_for(&mut self, window: Duration) {
        let deadline = tokio::time::Instant::now() + window;
        while tokio::time::Instant::now() < deadline {
            self.engine.drain_pending_messages();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.engine.drain_pending_messages();
    }

    pub fn stage(&mut self, paths: &[&str]) {
        self.engine
            .process_message(tradfile_app::Message::FilesDropped {
                paths: paths.iter().map(PathBuf::from).collect(),
            });
    }

    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.engine.state.staging.paths()
    }

    pub fn translating_flags(&self) -> Vec<bool> {
        self.engine
            .state
            .staging
            .snapshot()
            .iter()
            .map(|f| f.translating)
            .collect()
    }
}

pub fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}
