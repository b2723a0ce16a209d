//! Configuration types for tradfile
//!
//! Defines:
//! - `Settings` - Global application settings
//! - `TranslatorSettings` - External translator command
//! - `StoreSettings` - Preferences store location

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default per-document translation timeout.
pub const DEFAULT_TRANSLATE_TIMEOUT_SECS: u64 = 600;

/// Default preferences store file name.
pub const DEFAULT_STORE_FILE: &str = "storeTradFile.json";

/// Global application settings from config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub translator: TranslatorSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

/// External program that translates one document.
///
/// Invoked as `<command> <args...> <input> <output>` with `OPENAI_API_KEY`
/// and `TRANSLATE_TO` set in its environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslatorSettings {
    /// Program to run (empty = not configured)
    #[serde(default)]
    pub command: String,

    /// Arguments placed before the input/output paths
    #[serde(default)]
    pub args: Vec<String>,

    /// Per-document timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TranslatorSettings {
    pub fn is_configured(&self) -> bool {
        !self.command.trim().is_empty()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TRANSLATE_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreSettings {
    /// Store file name, relative to the config directory (or absolute)
    #[serde(default = "default_store_file")]
    pub file_name: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            file_name: default_store_file(),
        }
    }
}

fn default_store_file() -> String {
    DEFAULT_STORE_FILE.to_string()
}

impl StoreSettings {
    /// Resolve the store file against the config directory.
    pub fn path_in(&self, config_dir: &Path) -> PathBuf {
        let name = if self.file_name.trim().is_empty() {
            DEFAULT_STORE_FILE
        } else {
            self.file_name.as_str()
        };
        config_dir.join(name)
    }
}
