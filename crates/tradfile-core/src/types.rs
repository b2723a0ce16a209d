//! Core domain types for staged documents and translation preferences

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension (without the dot) of documents accepted for staging.
pub const PDF_EXTENSION: &str = "pdf";

/// Replaces the `.pdf` extension when deriving a batch output path.
pub const TRANSLATED_SUFFIX: &str = "_translated.pdf";

/// Placeholder shown in place of a stored credential. Never persisted.
pub const MASKED_CREDENTIAL: &str = "***********";

/// Store key holding the translation provider credential.
pub const STORE_KEY_API_KEY: &str = "OPENAI_API_KEY";

/// Store key holding the target language display name.
pub const STORE_KEY_TRANSLATE_TO: &str = "TRANSLATE_TO";

// ─────────────────────────────────────────────────────────────────────────────
// Staged files
// ─────────────────────────────────────────────────────────────────────────────

/// A document accepted into the working set.
///
/// The display name is always derived from `path`; there is no separate field
/// that could drift out of sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub translating: bool,
}

impl StagedFile {
    /// Create a freshly admitted file (not in flight).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            translating: false,
        }
    }

    /// Last path segment, or the whole path when it has none.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Whether `path` carries a `.pdf` extension (case-insensitive).
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}

/// Derive the output path for a batch input.
///
/// The trailing `.pdf` extension (any case) is replaced with
/// `_translated.pdf`; the parent directory is kept.
pub fn translated_output_path(input: &Path) -> PathBuf {
    let mut name: OsString = if is_pdf_path(input) {
        input.file_stem().map(|s| s.to_os_string()).unwrap_or_default()
    } else {
        input
            .file_name()
            .map(|s| s.to_os_string())
            .unwrap_or_default()
    };
    name.push(TRANSLATED_SUFFIX);
    input.with_file_name(name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Languages
// ─────────────────────────────────────────────────────────────────────────────

/// Target languages offered by the settings page.
///
/// Persisted by display name; anything that does not match exactly falls
/// back to [`Language::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    French,
    Spanish,
    German,
    Italian,
    Portuguese,
    Dutch,
    Polish,
    Russian,
    Ukrainian,
    Turkish,
    Arabic,
    Hindi,
    Chinese,
    Japanese,
    Korean,
}

impl Language {
    pub const ALL: [Language; 16] = [
        Language::English,
        Language::French,
        Language::Spanish,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Dutch,
        Language::Polish,
        Language::Russian,
        Language::Ukrainian,
        Language::Turkish,
        Language::Arabic,
        Language::Hindi,
        Language::Chinese,
        Language::Japanese,
        Language::Korean,
    ];

    /// Display name, also used as the persisted value.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Dutch => "Dutch",
            Language::Polish => "Polish",
            Language::Russian => "Russian",
            Language::Ukrainian => "Ukrainian",
            Language::Turkish => "Turkish",
            Language::Arabic => "Arabic",
            Language::Hindi => "Hindi",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
        }
    }

    /// Look up a language by its exact display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.name() == name)
    }

    /// Resolve a persisted value, falling back to the default when it is
    /// missing or not one of the supported names.
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(Self::from_name).unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
