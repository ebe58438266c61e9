//! Library interface for stillhouse (still), a source-build installer for
//! libxo release formulae.
//!
//! This library exposes the descriptor catalog and install pipeline for
//! testing and potential future use.

pub mod cellar;
pub mod commands;
pub mod deps;
pub mod download;
pub mod error;
pub mod extract;
pub mod formula;
pub mod receipt;
pub mod steps;

// Re-export commonly used items
pub use error::{Result, StillError};
pub use formula::Formula;
