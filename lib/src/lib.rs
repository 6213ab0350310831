//! # arcdown
//!
//! Build downloadable archive containers (gzip-compressed tar, and zip) from
//! source files or raw byte buffers, then materialize the result as an HTTP
//! download response with the correct headers.
//!
//! The core is the format-agnostic [`ArchiveDownload`] trait: callers add
//! entries without knowing which container format is used underneath, and
//! the two backends satisfy that contract with different finalization
//! strategies — [`TarArchive`] streams onto a temporary spool file as
//! entries arrive, [`ZipArchive`] accumulates in memory and serializes once.
//! Source bytes come in through the [`Filesystem`] port; the finished
//! response goes out through an [`Emitter`].
//!
//! Everything is synchronous, blocking I/O; a builder instance is owned by
//! one caller for one request/response cycle and is not thread-safe.
//!
//! ## Example
//!
//! ```no_run
//! use arcdown::{ArchiveDownload, LocalFilesystem, TarArchive, WriteEmitter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let fs = LocalFilesystem::new("./exports")?;
//!     let mut archive = TarArchive::new(fs)?;
//!     archive.add_file("reports/january.csv", None)?;
//!     archive.add_file_data(b"generated at build time", "manifest.txt", 0)?;
//!
//!     // Serialize the HTTP download response to stdout.
//!     let mut emitter = WriteEmitter::new(std::io::stdout().lock());
//!     archive.download("reports", &mut emitter)?;
//!     Ok(())
//! }
//! ```

pub mod archive; // The builder contract and the tar/zip backends.
pub mod core; // Core infrastructure (errors, config).
pub mod emit; // Emitter boundary (response -> transport).
pub mod fs; // Filesystem port (source bytes -> builder).
pub mod response; // Response materializer (artifact -> status/headers/body).

pub use archive::{resolve_filename, ArchiveDownload, TarArchive, ZipArchive, DEFAULT_BASENAME};
// `crate::` disambiguates our `core` module from the language's core crate.
pub use crate::core::config::{load_config, Config};
pub use crate::core::error::{ArcdownError, Result};
pub use emit::{Emitter, WriteEmitter};
pub use fs::{Filesystem, LocalFilesystem, MemoryFilesystem};
pub use response::{attachment_response, Body};
