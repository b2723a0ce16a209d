//! Settings store tasks

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tradfile_core::prelude::*;
use tradfile_core::{Language, STORE_KEY_API_KEY, STORE_KEY_TRANSLATE_TO};

use crate::credential::Secret;
use crate::message::Message;
use crate::store::SettingsStore;

/// Read whether a credential is stored and which language is selected.
///
/// The credential value itself is only checked for presence.
pub async fn load_settings<S>(store: &S) -> Result<(bool, Language)>
where
    S: SettingsStore + Sync,
{
    let has_credential = store
        .get(STORE_KEY_API_KEY)
        .await?
        .is_some_and(|key| !key.is_empty());
    let stored = store.get(STORE_KEY_TRANSLATE_TO).await?;
    let language = Language::from_stored(stored.as_deref());
    if stored.is_some() && stored.as_deref() != Some(language.name()) {
        warn!(
            "Stored language {:?} is not supported, using {}",
            stored, language
        );
    }
    Ok((has_credential, language))
}

/// Stage and save one value. On a failed save the working copy is rolled
/// back, so readers of the store never see a value that was not saved.
async fn persist<S>(store: &S, key: &str, value: String) -> Result<()>
where
    S: SettingsStore + Sync,
{
    let previous = store.get(key).await?;
    store.set(key, value).await?;

    if let Err(e) = store.save().await {
        let rollback = match previous {
            Some(old) => store.set(key, old).await,
            None => store.remove(key).await,
        };
        if let Err(rollback_err) = rollback {
            warn!("Failed to roll back unsaved {}: {}", key, rollback_err);
        }
        return Err(e);
    }
    Ok(())
}

pub fn spawn_load_settings<S>(store: Arc<S>, msg_tx: mpsc::Sender<Message>) -> JoinHandle<()>
where
    S: SettingsStore + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match load_settings(store.as_ref()).await {
            Ok((has_credential, language)) => Message::SettingsLoaded {
                has_credential,
                language,
            },
            Err(e) => Message::SettingsLoadFailed {
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    })
}

pub fn spawn_persist_credential<S>(
    store: Arc<S>,
    value: Secret,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()>
where
    S: SettingsStore + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match persist(store.as_ref(), STORE_KEY_API_KEY, value.into_inner()).await {
            Ok(()) => Message::CredentialSaved,
            Err(e) => Message::CredentialSaveFailed {
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    })
}

pub fn spawn_persist_language<S>(
    store: Arc<S>,
    language: Language,
    msg_tx: mpsc::Sender<Message>,
) -> JoinHandle<()>
where
    S: SettingsStore + Sync + 'static,
{
    tokio::spawn(async move {
        let value = language.name().to_string();
        let msg = match persist(store.as_ref(), STORE_KEY_TRANSLATE_TO, value).await {
            Ok(()) => Message::LanguageSaved(language),
            Err(e) => Message::LanguageSaveFailed {
                language,
                error: e.to_string(),
            },
        };
        let _ = msg_tx.send(msg).await;
    })
}
