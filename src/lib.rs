//! tradfile library
//!
//! Headless front-end for the tradfile engine. All staging, batch and
//! settings logic lives in `tradfile-app`.

pub mod headless;

pub use headless::run_headless;
