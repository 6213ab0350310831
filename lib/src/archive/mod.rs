//! # Arcdown Archive Builder Abstraction (`archive`)
//!
//! File: lib/src/archive/mod.rs
//!
//! ## Overview
//!
//! This module defines the format-agnostic archive builder contract and
//! aggregates the two format backends that satisfy it. A caller adds entries
//! (from the filesystem port or from in-memory buffers) and asks for an HTTP
//! download response without knowing which container format sits underneath.
//!
//! ## Architecture
//!
//! - **`ArchiveDownload`**: the capability trait — entry-adding operations
//!   plus response production. The format is chosen once, at construction,
//!   by picking the implementing type; there is no runtime format switch.
//! - **`tar`**: [`TarArchive`] — streams entries onto a gzip-compressed
//!   spool file as they are added, then serves the file back as the body.
//! - **`zip`**: [`ZipArchive`] — accumulates entries in memory and
//!   serializes the whole container once, when the response is produced.
//!
//! The two backends reconcile incompatible construction models behind the
//! one trait: incremental-stream-to-disk versus build-then-serialize.
//!
//! ## Examples
//!
//! ```rust,ignore
//! let fs = LocalFilesystem::new("/srv/exports")?;
//! let mut archive = ZipArchive::new(fs);
//! archive.add_file("reports/january.csv", None)?;
//! archive.add_file_data(b"generated", "manifest.txt", 0)?;
//! let response = archive.to_response("reports")?;
//! // response: 200, Content-Disposition: attachment; filename="reports.zip"
//! ```
//!
use crate::core::error::Result;
use crate::emit::Emitter;
use crate::response::Body;
use http::Response;
use tracing::info;

pub mod tar;
pub mod zip;

pub use tar::TarArchive;
pub use zip::ZipArchive;

/// Base name used for the attachment when the caller does not pick one.
pub const DEFAULT_BASENAME: &str = "archive";

/// Format-agnostic archive builder.
///
/// One builder instance corresponds to one archive-building session: entries
/// are appended (never removed or mutated), the response is produced once,
/// and the builder is then spent. A second [`ArchiveDownload::to_response`]
/// fails with `ArcdownError::AlreadyFinalized`.
///
/// Builders are not thread-safe per instance; a builder owns its backend
/// state exclusively and callers must serialize access externally if they
/// move one across threads.
pub trait ArchiveDownload {
    /// Reads the file at `file_path` through the filesystem port and appends
    /// it, stored under `new_filename` when that is non-empty after trimming
    /// and under the source path's final segment otherwise.
    ///
    /// # Errors
    ///
    /// Fails with `PathNotFound`/`SourceRead` when the port cannot resolve
    /// or read the path, and `ArchiveWrite` when the codec rejects the entry.
    fn add_file(&mut self, file_path: &str, new_filename: Option<&str>) -> Result<()>;

    /// Identical contract to [`ArchiveDownload::add_file`]; the text/binary
    /// distinction lives at the filesystem boundary, not here. Kept as a
    /// separate operation for API symmetry with
    /// [`ArchiveDownload::add_binary_file_data`].
    fn add_binary_file(&mut self, file_path: &str, new_filename: Option<&str>) -> Result<()>;

    /// Appends an entry directly from an in-memory buffer, bypassing the
    /// filesystem port.
    ///
    /// `time` is a unix timestamp; `0` means "no explicit modification time
    /// override". What that yields in the container is backend-defined: the
    /// tar backend writes the value through literally (so 0 becomes the
    /// epoch), while the zip backend leaves its codec's default timestamp
    /// in place. See the backend docs.
    fn add_file_data(&mut self, data: &[u8], filename: &str, time: i64) -> Result<()>;

    /// Same contract as [`ArchiveDownload::add_file_data`]; distinguished
    /// only by caller intent.
    fn add_binary_file_data(&mut self, data: &[u8], filename: &str, time: i64) -> Result<()>;

    /// Finalizes the container and wraps it as an HTTP download response
    /// with attachment filename `<name><ext>`. Callable once per builder.
    ///
    /// # Errors
    ///
    /// Fails with `AlreadyFinalized` on a second call and `ArchiveWrite`
    /// when finalizing the container fails.
    fn to_response(&mut self, name: &str) -> Result<Response<Body>>;

    /// Produces the response for `name` and hands it to `emitter`.
    /// Pure convenience; no logic beyond [`ArchiveDownload::to_response`].
    fn download(&mut self, name: &str, emitter: &mut dyn Emitter) -> Result<()> {
        let response = self.to_response(name)?;
        info!("Emitting download response for '{}'", name);
        emitter.emit(response)
    }
}

/// Resolves the name an entry is stored under inside the container.
///
/// A caller-supplied `new_filename` wins when it is non-empty after trimming
/// surrounding whitespace (and is used trimmed); otherwise the final path
/// segment of `file_path` is used. Applied identically by every backend.
pub fn resolve_filename(file_path: &str, new_filename: Option<&str>) -> String {
    if let Some(name) = new_filename {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    basename(file_path).to_string()
}

/// Final path segment of a slash-separated textual path.
fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
