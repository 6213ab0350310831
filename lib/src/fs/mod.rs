//! # Arcdown Filesystem Port (`fs`)
//!
//! File: lib/src/fs/mod.rs
//!
//! ## Overview
//!
//! This module defines the filesystem boundary the archive builders read
//! source files through. The builders never touch `std::fs` directly for
//! source content; everything goes through the [`Filesystem`] trait so the
//! storage behind a textual path stays swappable (local disk sandbox,
//! in-memory fixtures, or anything a caller implements).
//!
//! ## Architecture
//!
//! - **`Filesystem`**: the port itself — read whole files, open read
//!   streams, and report last-modified times for textual paths.
//! - **`local`**: [`LocalFilesystem`], disk-backed and sandboxed to one
//!   explicitly chosen root directory.
//! - **`memory`**: [`MemoryFilesystem`], map-backed, used by tests and
//!   handy for serving generated content.
//!
//! There is no implicit default implementation. A builder must be handed a
//! filesystem value; nothing ever silently binds to the local filesystem
//! root.
//!
use crate::core::error::Result;
use std::io::Read;

mod local;
mod memory;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;

/// Capability to read file content and metadata for a textual path.
///
/// Implementations report missing paths as `ArcdownError::PathNotFound` and
/// unreadable ones as `ArcdownError::SourceRead`.
pub trait Filesystem: Send + Sync {
    /// Reads the entire content of the file at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Opens a sequential read stream over the file at `path`.
    ///
    /// Backends that copy entries straight into an archive structure use
    /// this instead of [`Filesystem::read`] to avoid materializing the whole
    /// file in memory when the underlying storage can stream.
    fn read_stream(&self, path: &str) -> Result<Box<dyn Read + Send>>;

    /// Returns the last-modified time of `path` as unix seconds.
    fn last_modified(&self, path: &str) -> Result<i64>;
}
