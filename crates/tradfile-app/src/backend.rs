//! Translation backend
//!
//! The orchestrator sees a single batch call ([`TranslationBackend`]). The
//! shipped backend, [`BatchTranslator`], fans the batch out to a per-document
//! [`DocumentTranslator`] and fails the whole batch on the first error.
//! [`CommandTranslator`] is the document translator that shells out to the
//! configured external program.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::process::Command;
use tradfile_core::prelude::*;
use tradfile_core::{Language, STORE_KEY_API_KEY, STORE_KEY_TRANSLATE_TO};

use crate::config::TranslatorSettings;
use crate::store::SettingsStore;

/// Batch translation contract.
///
/// `inputs` and `outputs` are parallel lists; on success the produced output
/// paths are returned in the same order.
#[trait_variant::make(TranslationBackend: Send)]
pub trait LocalTranslationBackend {
    async fn translate_batch(&self, inputs: &[PathBuf], outputs: &[PathBuf])
        -> Result<Vec<PathBuf>>;
}

/// Translates a single document into `output`.
#[trait_variant::make(DocumentTranslator: Send)]
pub trait LocalDocumentTranslator {
    async fn translate_document(&self, input: &Path, output: &Path) -> Result<PathBuf>;
}

// ─────────────────────────────────────────────────────────────────────────────
// BatchTranslator
// ─────────────────────────────────────────────────────────────────────────────

/// Runs every document of a batch concurrently.
#[derive(Debug)]
pub struct BatchTranslator<T> {
    documents: T,
}

impl<T> BatchTranslator<T> {
    pub fn new(documents: T) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &T {
        &self.documents
    }
}

impl<T> TranslationBackend for BatchTranslator<T>
where
    T: DocumentTranslator + Sync,
{
    async fn translate_batch(
        &self,
        inputs: &[PathBuf],
        outputs: &[PathBuf],
    ) -> Result<Vec<PathBuf>> {
        if inputs.len() != outputs.len() {
            return Err(Error::BatchMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }

        info!("Translating batch of {} document(s)", inputs.len());

        let results = join_all(
            inputs
                .iter()
                .zip(outputs)
                .map(|(input, output)| self.documents.translate_document(input, output)),
        )
        .await;

        results.into_iter().collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CommandTranslator
// ─────────────────────────────────────────────────────────────────────────────

/// Runs `<command> <args...> <input> <output>` for each document.
///
/// Credential and target language are read from the store on every call so
/// changes made on the settings page apply to the next batch.
pub struct CommandTranslator<S> {
    settings: TranslatorSettings,
    store: Arc<S>,
}

impl<S> CommandTranslator<S> {
    pub fn new(settings: TranslatorSettings, store: Arc<S>) -> Self {
        Self { settings, store }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs.max(1))
    }
}

impl<S> std::fmt::Debug for CommandTranslator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTranslator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<S> CommandTranslator<S>
where
    S: SettingsStore + Sync,
{
    async fn read_environment(&self) -> Result<(String, Language)> {
        let api_key = self
            .store
            .get(STORE_KEY_API_KEY)
            .await?
            .filter(|key| !key.is_empty())
            .ok_or(Error::CredentialMissing)?;

        let stored = self.store.get(STORE_KEY_TRANSLATE_TO).await?;
        Ok((api_key, Language::from_stored(stored.as_deref())))
    }
}

impl<S> DocumentTranslator for CommandTranslator<S>
where
    S: SettingsStore + Send + Sync,
{
    async fn translate_document(&self, input: &Path, output: &Path) -> Result<PathBuf> {
        if !self.settings.is_configured() {
            return Err(Error::TranslatorNotConfigured);
        }

        let (api_key, language) = self.read_environment().await?;

        debug!(
            "Running {} for {} -> {} ({})",
            self.settings.command,
            input.display(),
            output.display(),
            language
        );

        let child = Command::new(&self.settings.command)
            .args(&self.settings.args)
            .arg(input)
            .arg(output)
            .env(STORE_KEY_API_KEY, api_key)
            .env(STORE_KEY_TRANSLATE_TO, language.name())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::document_failed(
                    input,
                    format!("failed to start {}: {}", self.settings.command, e),
                )
            })?;

        let finished = tokio::time::timeout(self.timeout(), child.wait_with_output())
            .await
            .map_err(|_| {
                Error::document_failed(
                    input,
                    format!("timed out after {}s", self.settings.timeout_secs),
                )
            })?
            .map_err(|e| Error::document_failed(input, e.to_string()))?;

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            let reason = match stderr.trim() {
                "" => format!("exited with {}", finished.status),
                msg => format!("exited with {}: {}", finished.status, msg),
            };
            return Err(Error::document_failed(input, reason));
        }

        info!("Translated {}", output.display());
        Ok(output.to_path_buf())
    }
}
