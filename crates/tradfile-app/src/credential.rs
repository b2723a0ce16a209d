//! Masked credential field
//!
//! The settings page shows the provider credential through a small state
//! machine: the stored secret is never read back into the field, a new edit
//! always starts empty, and a confirmed value only leaves the draft once the
//! store reports it saved.
//!
//! ```text
//! Viewing --begin_edit--> Editing --input--> Modified --confirm--> (saving)
//!    ^                       |                  |                     |
//!    +-------cancel----------+------cancel------+<----save_succeeded--+
//! ```

use std::fmt;

use tradfile_core::MASKED_CREDENTIAL;

/// A secret string whose `Debug` output is redacted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(<redacted>)")
        }
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CredentialMode {
    #[default]
    Viewing,
    Editing,
    Modified,
}

impl CredentialMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialMode::Viewing => "viewing",
            CredentialMode::Editing => "editing",
            CredentialMode::Modified => "modified",
        }
    }
}

/// Credential field state.
///
/// Every transition method returns whether the event was accepted; ignored
/// events leave the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialField {
    mode: CredentialMode,
    draft: Secret,
    stored: bool,
    /// `Viewing` shows the placeholder rather than an empty field
    masked: bool,
    saving: bool,
}

impl CredentialField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> CredentialMode {
        self.mode
    }

    /// A confirmed value is waiting for the store.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether a non-empty credential is known to be stored.
    pub fn has_stored(&self) -> bool {
        self.stored
    }

    /// Text shown in the field.
    pub fn display(&self) -> &str {
        match self.mode {
            CredentialMode::Viewing if self.masked => MASKED_CREDENTIAL,
            CredentialMode::Viewing | CredentialMode::Editing => "",
            CredentialMode::Modified => self.draft.expose(),
        }
    }

    /// Apply what the store reported at start-up.
    ///
    /// Only takes effect while resting in `Viewing`; an edit in progress wins.
    pub fn initialize(&mut self, stored: bool) -> bool {
        if self.mode != CredentialMode::Viewing || self.saving {
            return false;
        }
        self.stored = stored;
        self.masked |= stored;
        true
    }

    pub fn begin_edit(&mut self) -> bool {
        if self.mode != CredentialMode::Viewing || self.saving {
            return false;
        }
        self.mode = CredentialMode::Editing;
        self.draft = Secret::default();
        true
    }

    /// Leave editing without persisting. A `Modified` draft is discarded.
    ///
    /// The field always returns to the placeholder, stored credential or not.
    pub fn cancel(&mut self) -> bool {
        if self.mode == CredentialMode::Viewing || self.saving {
            return false;
        }
        self.mode = CredentialMode::Viewing;
        self.masked = true;
        self.draft = Secret::default();
        true
    }

    /// The user changed the field text.
    pub fn input(&mut self, value: Secret) -> bool {
        if self.mode == CredentialMode::Viewing || self.saving {
            return false;
        }
        self.mode = CredentialMode::Modified;
        self.draft = value;
        true
    }

    /// Confirm the draft. Yields the raw value to persist.
    pub fn confirm(&mut self) -> Option<Secret> {
        if self.mode != CredentialMode::Modified || self.saving {
            return None;
        }
        self.saving = true;
        Some(self.draft.clone())
    }

    /// The store accepted the confirmed value.
    pub fn save_succeeded(&mut self) -> bool {
        if !self.saving {
            return false;
        }
        self.saving = false;
        self.stored = !self.draft.is_empty();
        self.masked = true;
        self.mode = CredentialMode::Viewing;
        self.draft = Secret::default();
        true
    }

    /// The store rejected the confirmed value; the draft stays editable.
    pub fn save_failed(&mut self) -> bool {
        if !self.saving {
            return false;
        }
        self.saving = false;
        true
    }
}
