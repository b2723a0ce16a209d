//! # tradfile-core - Core Domain Types
//!
//! Foundation crate for tradfile. Provides domain types, error handling,
//! drop-zone geometry and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`StagedFile`] - A document accepted into the working set
//! - [`Language`] - Supported translation target languages
//! - [`translated_output_path()`] - Output path derivation for a batch input
//!
//! ### Geometry (`geometry`)
//! - [`Point`], [`ZoneBounds`] - Pointer position and drop-zone rectangle
//! - [`is_inside()`] - Inclusive hit test against optional bounds
//!
//! ### Events (`events`)
//! - [`DragDropEvent`], [`DragDropKind`] - Drag-drop notifications from the shell
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! ```rust
//! use tradfile_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod geometry;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all tradfile crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result, ResultExt};
pub use events::{DragDropEvent, DragDropKind};
pub use geometry::{is_inside, Point, ZoneBounds};
pub use types::{
    is_pdf_path, translated_output_path, Language, StagedFile, MASKED_CREDENTIAL, PDF_EXTENSION,
    STORE_KEY_API_KEY, STORE_KEY_TRANSLATE_TO, TRANSLATED_SUFFIX,
};
