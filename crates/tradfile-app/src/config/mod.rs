//! Configuration file parsing for tradfile
//!
//! Supports:
//! - `<config dir>/config.toml` - Translator command and store location
//!
//! The config directory also holds the settings store file.

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, resolve_config_dir, CONFIG_DIR_ENV_VAR};
pub use types::*;
