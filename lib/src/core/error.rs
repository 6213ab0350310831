//! # Arcdown Error Types (`core::error`)
//!
//! File: lib/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used
//! throughout arcdown. It provides a consistent approach to error management
//! with detailed error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ArcdownError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover the failure surfaces of the builder pipeline:
//! - Configuration errors
//! - Filesystem port errors (missing or unreadable source paths)
//! - Archive codec errors (entry writes, finalization)
//! - Builder lifecycle errors (reuse after finalization)
//!
//! ## Examples
//!
//! Using the error system:
//!
//! ```rust,ignore
//! // Return a specific error type
//! if self.finalized {
//!     anyhow::bail!(ArcdownError::AlreadyFinalized);
//! }
//!
//! // Add context to errors using anyhow
//! let bytes = fs::read(&resolved)
//!     .with_context(|| format!("Failed to read source file: {}", resolved.display()))?;
//!
//! // Pattern matching on error types
//! match result {
//!     Ok(response) => emit(response),
//!     Err(e) if e.downcast_ref::<ArcdownError>()
//!         .map_or(false, |ae| matches!(ae, ArcdownError::PathNotFound { .. })) => {
//!         eprintln!("source file missing, nothing to pack");
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```
//!
//! Every failure aborts the current builder instance; there are no retries
//! and no partial-archive recovery. The caller decides whether to start over
//! with a fresh builder.
//!
use thiserror::Error;

/// Custom error type for the arcdown library.
#[derive(Error, Debug)]
pub enum ArcdownError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path '{path}' not found in the configured filesystem.")]
    PathNotFound { path: String },

    #[error("Failed to read source: {0}")]
    SourceRead(String),

    #[error("Archive write failed: {0}")]
    ArchiveWrite(String),

    #[error("Entry '{name}' not found in the archive.")]
    EntryNotFound { name: String },

    #[error("Archive was already finalized; create a new builder to produce another response.")]
    AlreadyFinalized,
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
