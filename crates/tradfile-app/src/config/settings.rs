//! Settings parser for `<config dir>/config.toml`

use super::types::Settings;
use std::path::{Path, PathBuf};
use tradfile_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "tradfile";

/// Environment override for the config directory.
pub const CONFIG_DIR_ENV_VAR: &str = "TRADFILE_CONFIG_DIR";

// ─────────────────────────────────────────────────────────────────────────────
// Config Directory
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve the config directory.
///
/// Priority: explicit flag, then `$TRADFILE_CONFIG_DIR`, then the platform
/// config dir (`~/.config/tradfile` on Linux).
pub fn resolve_config_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }

    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV_VAR) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(Error::NoConfigDir)
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from `<config_dir>/config.toml`
///
/// Returns default settings if file doesn't exist or can't be parsed.
pub fn load_settings(config_dir: &Path) -> Settings {
    let config_path = config_dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create the config directory and a commented default config.toml.
///
/// An existing config.toml is left untouched.
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).map_err(|e| {
            Error::config(format!(
                "Failed to create config dir {}: {}",
                config_dir.display(),
                e
            ))
        })?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# tradfile configuration

[translator]
# Program that translates a single PDF. Invoked as:
#   <command> <args...> <input.pdf> <output_translated.pdf>
# with OPENAI_API_KEY and TRANSLATE_TO set in its environment.
# Leave empty until a translator is installed.
command = ""
args = []
timeout_secs = 600

[store]
# Preferences file, relative to this directory
file_name = "storeTradFile.json"
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
    }

    Ok(())
}
