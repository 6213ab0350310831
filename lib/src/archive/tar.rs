//! # Arcdown TAR Backend (`archive::tar`)
//!
//! File: lib/src/archive/tar.rs
//!
//! ## Overview
//!
//! Builds a gzip-compressed tar container by streaming entries onto a
//! uniquely named spool file as they are added. Nothing is buffered across
//! entries: each `add_*` call writes one complete tar member through the
//! gzip encoder, so memory use stays flat no matter how large the archive
//! grows (disk is the only bound).
//!
//! ## Architecture
//!
//! The backend leverages the `tar` crate for the archive structure and the
//! `flate2` crate for gzip compression, chained as
//! `tar::Builder<GzEncoder<File>>` over a `tempfile::NamedTempFile`.
//!
//! The spool file is a scoped resource: it is acquired at construction and
//! removed when the `TarArchive` value is dropped, on every exit path,
//! including failures midway through entry adding. The response body holds
//! its own open handle to the spool file, so on Unix an emitted response
//! stays readable even after the builder (and with it the directory entry)
//! is gone.
//!
//! ## Timestamps
//!
//! `add_file_data` writes the caller's `time` into the tar member header
//! literally — `0` is a valid tar timestamp meaning the epoch, and this
//! backend does not substitute "now" for it. Callers that want the current
//! time must pass it explicitly. (The zip backend handles `0` differently;
//! see `archive::zip`.)
//!
use super::{resolve_filename, ArchiveDownload};
use crate::core::config::Config;
use crate::core::error::{ArcdownError, Result};
use crate::fs::{Filesystem, LocalFilesystem};
use crate::response::{attachment_response, Body};
use flate2::write::GzEncoder;
use flate2::Compression;
use http::Response;
use std::fs::File;
use std::path::Path;
use tar::Builder as TarBuilder;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Gzip-compressed tar archive builder, spooled to a temporary file.
pub struct TarArchive {
    ext: String,
    mimetype: String,
    filesystem: Box<dyn Filesystem>,
    /// Owns the spool file path; dropping it deletes the file.
    spool: NamedTempFile,
    /// `None` once the archive has been finalized by `to_response`.
    writer: Option<TarBuilder<GzEncoder<File>>>,
}

impl TarArchive {
    /// Creates a builder with the default extension (`.tar.gz`), MIME type
    /// (`application/x-gzip`), and platform temp directory for the spool.
    pub fn new<F: Filesystem + 'static>(filesystem: F) -> Result<Self> {
        Self::with_options(".tar.gz", "application/x-gzip", filesystem, None)
    }

    /// Creates a builder with explicit extension, MIME type, and spool
    /// directory. `ext` and `mimetype` are trimmed; `tmp_path` falls back
    /// to the platform temp directory when `None`.
    ///
    /// # Errors
    ///
    /// Fails with `ArchiveWrite` when the spool file cannot be created.
    pub fn with_options<F: Filesystem + 'static>(
        ext: &str,
        mimetype: &str,
        filesystem: F,
        tmp_path: Option<&Path>,
    ) -> Result<Self> {
        let spool_dir = tmp_path
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        let spool = tempfile::Builder::new()
            .prefix("tar_")
            .suffix(".tar.gz")
            .tempfile_in(&spool_dir)
            .map_err(|e| {
                ArcdownError::ArchiveWrite(format!(
                    "Failed to create spool file in {}: {}",
                    spool_dir.display(),
                    e
                ))
            })?;
        // The spool value keeps the path (and deletion duty); writes go
        // through an independent handle so finalization can drop the
        // encoder without giving up the file.
        let write_handle = spool.reopen().map_err(|e| {
            ArcdownError::ArchiveWrite(format!("Failed to open spool file for writing: {}", e))
        })?;
        debug!("Allocated tar spool file {}", spool.path().display());

        let encoder = GzEncoder::new(write_handle, Compression::default());
        Ok(TarArchive {
            ext: ext.trim().to_string(),
            mimetype: mimetype.trim().to_string(),
            filesystem: Box::new(filesystem),
            spool,
            writer: Some(TarBuilder::new(encoder)),
        })
    }

    /// Creates a builder from a loaded configuration: filesystem sandbox
    /// from `[filesystem].root`, extension/MIME/spool dir from `[tar]`.
    ///
    /// # Errors
    ///
    /// Fails with `Config` when no filesystem root is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let root = config.filesystem.root.as_ref().ok_or_else(|| {
            ArcdownError::Config("No [filesystem] root configured".to_string())
        })?;
        Self::with_options(
            &config.tar.ext,
            &config.tar.mimetype,
            LocalFilesystem::new(root)?,
            config.tar.tmp_dir.as_deref(),
        )
    }

    /// Writes one tar member with the given name, content, and literal
    /// modification time.
    fn add_entry(&mut self, name: &str, data: &[u8], time: i64) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or(ArcdownError::AlreadyFinalized)?;

        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        // tar mtimes are unsigned; a (nonsensical) negative input collapses
        // to the epoch, everything else passes through literally.
        header.set_mtime(u64::try_from(time).unwrap_or(0));
        header.set_cksum();
        writer
            .append_data(&mut header, name, data)
            .map_err(|e| ArcdownError::ArchiveWrite(format!("Failed to add '{}': {}", name, e)))?;
        debug!("Added tar entry '{}' ({} bytes)", name, data.len());
        Ok(())
    }
}

impl ArchiveDownload for TarArchive {
    fn add_file(&mut self, file_path: &str, new_filename: Option<&str>) -> Result<()> {
        let data = self.filesystem.read(file_path)?;
        let mtime = self.filesystem.last_modified(file_path)?;
        let name = resolve_filename(file_path, new_filename);
        self.add_entry(&name, &data, mtime)
    }

    fn add_binary_file(&mut self, file_path: &str, new_filename: Option<&str>) -> Result<()> {
        self.add_file(file_path, new_filename)
    }

    fn add_file_data(&mut self, data: &[u8], filename: &str, time: i64) -> Result<()> {
        self.add_entry(filename, data, time)
    }

    fn add_binary_file_data(&mut self, data: &[u8], filename: &str, time: i64) -> Result<()> {
        self.add_file_data(data, filename, time)
    }

    fn to_response(&mut self, name: &str) -> Result<Response<Body>> {
        let writer = self.writer.take().ok_or(ArcdownError::AlreadyFinalized)?;

        // Close the tar structure, then the gzip stream, flushing both
        // footers onto the spool file.
        let encoder = writer.into_inner().map_err(|e| {
            ArcdownError::ArchiveWrite(format!("Failed to finalize tar structure: {}", e))
        })?;
        encoder.finish().map_err(|e| {
            ArcdownError::ArchiveWrite(format!("Failed to finish gzip stream: {}", e))
        })?;

        let body = File::open(self.spool.path()).map_err(|e| {
            ArcdownError::ArchiveWrite(format!("Failed to reopen spool file for reading: {}", e))
        })?;
        info!(
            "Finalized tar archive '{}{}' at {}",
            name,
            self.ext,
            self.spool.path().display()
        );
        attachment_response(&self.mimetype, &self.ext, name, Body::File(body))
    }
}
