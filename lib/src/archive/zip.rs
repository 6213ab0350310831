//! # Arcdown ZIP Backend (`archive::zip`)
//!
//! File: lib/src/archive/zip.rs
//!
//! ## Overview
//!
//! Builds a zip container entirely in memory, deferring all serialization to
//! the point of response production. Entries accumulate in insertion order;
//! `to_response` runs them through the `zip` crate's writer exactly once and
//! hands back the resulting byte buffer as the response body.
//!
//! Filesystem-backed entries capture the port's read stream when they are
//! added and are copied into the zip structure only during serialization, so
//! a large source file is never held in full next to its compressed form.
//! The whole archive, however, is buffered in memory; available memory is
//! the capacity bound for this backend (the tar backend trades that for
//! disk).
//!
//! ## Timestamps
//!
//! `add_file_data` sets the just-added entry's modification time only when
//! `time > 0`; a `time` of `0` leaves the zip codec's default header
//! timestamp untouched. This deliberately differs from the tar backend,
//! which writes `0` through literally as the epoch — the two policies are
//! part of the observable output and are not unified.
//!
use super::{resolve_filename, ArchiveDownload};
use crate::core::config::Config;
use crate::core::error::{ArcdownError, Result};
use crate::fs::{Filesystem, LocalFilesystem};
use crate::response::{attachment_response, Body};
use chrono::{Datelike, TimeZone, Timelike, Utc};
use http::Response;
use std::io::{self, Cursor, Read, Write};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Content source captured for one pending entry.
enum EntrySource {
    /// Buffer copied in at add time.
    Bytes(Vec<u8>),
    /// Read stream captured from the filesystem port, drained at
    /// serialization time.
    Stream(Box<dyn Read + Send>),
}

/// One pending entry, in insertion order.
struct ZipEntry {
    name: String,
    source: EntrySource,
    /// Explicit modification time; `None` leaves the codec default.
    time: Option<i64>,
}

/// In-memory zip archive builder.
pub struct ZipArchive {
    ext: String,
    mimetype: String,
    filesystem: Box<dyn Filesystem>,
    entries: Vec<ZipEntry>,
    finalized: bool,
}

impl ZipArchive {
    /// Creates a builder with the default extension (`.zip`) and MIME type
    /// (`application/x-zip`).
    pub fn new<F: Filesystem + 'static>(filesystem: F) -> Self {
        Self::with_options(".zip", "application/x-zip", filesystem)
    }

    /// Creates a builder with explicit extension and MIME type, both trimmed.
    pub fn with_options<F: Filesystem + 'static>(
        ext: &str,
        mimetype: &str,
        filesystem: F,
    ) -> Self {
        ZipArchive {
            ext: ext.trim().to_string(),
            mimetype: mimetype.trim().to_string(),
            filesystem: Box::new(filesystem),
            entries: Vec::new(),
            finalized: false,
        }
    }

    /// Creates a builder from a loaded configuration: filesystem sandbox
    /// from `[filesystem].root`, extension/MIME from `[zip]`.
    ///
    /// # Errors
    ///
    /// Fails with `Config` when no filesystem root is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let root = config.filesystem.root.as_ref().ok_or_else(|| {
            ArcdownError::Config("No [filesystem] root configured".to_string())
        })?;
        Ok(Self::with_options(
            &config.zip.ext,
            &config.zip.mimetype,
            LocalFilesystem::new(root)?,
        ))
    }

    /// Sets the modification time of the most recently inserted entry named
    /// `name`.
    ///
    /// # Errors
    ///
    /// Fails with `EntryNotFound` when no entry with that name exists.
    /// Should not occur under correct use, but it surfaces rather than
    /// being swallowed.
    fn set_entry_time(&mut self, name: &str, time: i64) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .rev()
            .find(|e| e.name == name)
            .ok_or_else(|| ArcdownError::EntryNotFound { name: name.into() })?;
        entry.time = Some(time);
        Ok(())
    }

    /// Serializes the accumulated entries into a single zip byte buffer.
    /// Called exactly once, by `to_response`.
    fn output_as_bytes(&mut self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let entries = std::mem::take(&mut self.entries);
        let count = entries.len();

        for entry in entries {
            let mut options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o644);
            if let Some(time) = entry.time {
                options = options.last_modified_time(zip_datetime(time)?);
            }
            writer.start_file(entry.name.as_str(), options).map_err(|e| {
                ArcdownError::ArchiveWrite(format!("Failed to start entry '{}': {}", entry.name, e))
            })?;
            match entry.source {
                EntrySource::Bytes(bytes) => writer.write_all(&bytes).map_err(|e| {
                    ArcdownError::ArchiveWrite(format!(
                        "Failed to write entry '{}': {}",
                        entry.name, e
                    ))
                })?,
                EntrySource::Stream(mut reader) => {
                    io::copy(&mut reader, &mut writer).map_err(|e| {
                        ArcdownError::ArchiveWrite(format!(
                            "Failed to stream entry '{}': {}",
                            entry.name, e
                        ))
                    })?;
                }
            }
        }

        let cursor = writer.finish().map_err(|e| {
            ArcdownError::ArchiveWrite(format!("Failed to finalize zip structure: {}", e))
        })?;
        debug!("Serialized zip archive with {} entries", count);
        Ok(cursor.into_inner())
    }
}

impl ArchiveDownload for ZipArchive {
    fn add_file(&mut self, file_path: &str, new_filename: Option<&str>) -> Result<()> {
        let reader = self.filesystem.read_stream(file_path)?;
        let name = resolve_filename(file_path, new_filename);
        debug!("Queued zip entry '{}' from '{}'", name, file_path);
        self.entries.push(ZipEntry {
            name,
            source: EntrySource::Stream(reader),
            time: None,
        });
        Ok(())
    }

    fn add_binary_file(&mut self, file_path: &str, new_filename: Option<&str>) -> Result<()> {
        self.add_file(file_path, new_filename)
    }

    fn add_file_data(&mut self, data: &[u8], filename: &str, time: i64) -> Result<()> {
        self.entries.push(ZipEntry {
            name: filename.to_string(),
            source: EntrySource::Bytes(data.to_vec()),
            time: None,
        });
        if time > 0 {
            self.set_entry_time(filename, time)?;
        }
        Ok(())
    }

    fn add_binary_file_data(&mut self, data: &[u8], filename: &str, time: i64) -> Result<()> {
        self.add_file_data(data, filename, time)
    }

    fn to_response(&mut self, name: &str) -> Result<Response<Body>> {
        if self.finalized {
            anyhow::bail!(ArcdownError::AlreadyFinalized);
        }
        self.finalized = true;

        let bytes = self.output_as_bytes()?;
        info!("Finalized zip archive '{}{}' ({} bytes)", name, self.ext, bytes.len());
        attachment_response(&self.mimetype, &self.ext, name, Body::Buffer(bytes))
    }
}

/// Converts unix seconds into a zip header date/time.
///
/// Zip headers use DOS date fields, which only cover 1980..=2107; values
/// outside that window (or not representable as a calendar time) are
/// reported as `ArchiveWrite`.
fn zip_datetime(time: i64) -> Result<zip::DateTime> {
    let utc = Utc
        .timestamp_opt(time, 0)
        .single()
        .ok_or_else(|| ArcdownError::ArchiveWrite(format!("Invalid entry timestamp: {}", time)))?;
    zip::DateTime::from_date_and_time(
        utc.year() as u16,
        utc.month() as u8,
        utc.day() as u8,
        utc.hour() as u8,
        utc.minute() as u8,
        utc.second() as u8,
    )
    .map_err(|_| {
        ArcdownError::ArchiveWrite(format!("Timestamp {} not representable in zip header", time))
            .into()
    })
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFilesystem;
    use zip::ZipArchive as ZipReader;

    fn read_names_in_order(bytes: &[u8]) -> Vec<String> {
        let mut reader = ZipReader::new(Cursor::new(bytes.to_vec())).expect("valid zip");
        (0..reader.len())
            .map(|i| reader.by_index(i).expect("entry").name().to_string())
            .collect()
    }

    fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
        let mut reader = ZipReader::new(Cursor::new(bytes.to_vec())).expect("valid zip");
        let mut entry = reader.by_name(name).expect("entry present");
        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("readable entry");
        content
    }

    #[test]
    fn test_data_entries_round_trip() -> Result<()> {
        let mut archive = ZipArchive::new(MemoryFilesystem::new());
        archive.add_file_data(b"A", "a.txt", 0)?;
        archive.add_binary_file_data(b"B", "b.txt", 0)?;

        let response = archive.to_response("pack")?;
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/x-zip"
        );
        assert_eq!(
            response
                .headers()
                .get(http::header::CONTENT_DISPOSITION)
                .unwrap(),
            "attachment; filename=\"pack.zip\""
        );

        let bytes = response.into_body().into_bytes()?;
        assert!(!bytes.is_empty());
        assert_eq!(read_names_in_order(&bytes), vec!["a.txt", "b.txt"]);
        assert_eq!(read_entry(&bytes, "a.txt"), b"A");
        assert_eq!(read_entry(&bytes, "b.txt"), b"B");
        Ok(())
    }

    #[test]
    fn test_add_file_streams_from_port() -> Result<()> {
        let mut mfs = MemoryFilesystem::new();
        mfs.write("docs/report.txt", b"quarterly".to_vec());
        let mut archive = ZipArchive::new(mfs);
        archive.add_file("docs/report.txt", None)?;
        archive.add_binary_file("docs/report.txt", Some(" copy.txt "))?;

        let bytes = archive.to_response("pack")?.into_body().into_bytes()?;
        assert_eq!(read_entry(&bytes, "report.txt"), b"quarterly");
        assert_eq!(read_entry(&bytes, "copy.txt"), b"quarterly");
        Ok(())
    }

    #[test]
    fn test_positive_time_sets_entry_mtime() -> Result<()> {
        let mut archive = ZipArchive::new(MemoryFilesystem::new());
        // 2020-09-13 12:26:40 UTC
        archive.add_file_data(b"A", "stamped.txt", 1_600_000_000)?;

        let bytes = archive.to_response("pack")?.into_body().into_bytes()?;
        let mut reader = ZipReader::new(Cursor::new(bytes))?;
        let entry = reader.by_name("stamped.txt")?;
        let modified = entry.last_modified();
        assert_eq!(modified.year(), 2020);
        assert_eq!(modified.month(), 9);
        assert_eq!(modified.day(), 13);
        assert_eq!(modified.hour(), 12);
        assert_eq!(modified.minute(), 26);
        assert_eq!(modified.second(), 40);
        Ok(())
    }

    #[test]
    fn test_zero_time_leaves_codec_default() -> Result<()> {
        let mut archive = ZipArchive::new(MemoryFilesystem::new());
        archive.add_file_data(b"A", "plain.txt", 0)?;

        let bytes = archive.to_response("pack")?.into_body().into_bytes()?;
        let mut reader = ZipReader::new(Cursor::new(bytes))?;
        let entry = reader.by_name("plain.txt")?;
        // The zip crate's default header time is its DateTime default
        // (1980-01-01), not the unix epoch the tar backend would produce.
        let modified = entry.last_modified();
        assert_eq!(modified.year(), zip::DateTime::default().year());
        Ok(())
    }

    #[test]
    fn test_duplicate_names_pass_through() -> Result<()> {
        let mut archive = ZipArchive::new(MemoryFilesystem::new());
        archive.add_file_data(b"first", "dup.txt", 0)?;
        // The timestamp lands on the most recently inserted duplicate.
        archive.add_file_data(b"second", "dup.txt", 1_600_000_000)?;

        let bytes = archive.to_response("pack")?.into_body().into_bytes()?;
        let mut reader = ZipReader::new(Cursor::new(bytes))?;
        assert_eq!(reader.len(), 2);
        let second = reader.by_index(1)?;
        assert_eq!(second.last_modified().year(), 2020);
        Ok(())
    }

    #[test]
    fn test_set_entry_time_on_missing_name() {
        let mut archive = ZipArchive::new(MemoryFilesystem::new());
        let err = archive
            .set_entry_time("ghost.txt", 1_600_000_000)
            .expect_err("must fail");
        assert!(matches!(
            err.downcast_ref::<ArcdownError>(),
            Some(ArcdownError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_archive_is_valid() -> Result<()> {
        let mut archive = ZipArchive::new(MemoryFilesystem::new());
        let bytes = archive.to_response("empty")?.into_body().into_bytes()?;
        assert!(!bytes.is_empty()); // End-of-central-directory record at least.
        let reader = ZipReader::new(Cursor::new(bytes))?;
        assert_eq!(reader.len(), 0);
        Ok(())
    }

    #[test]
    fn test_second_to_response_is_already_finalized() -> Result<()> {
        let mut archive = ZipArchive::new(MemoryFilesystem::new());
        archive.add_file_data(b"A", "a.txt", 0)?;
        let first = archive.to_response("pack")?;

        let err = archive.to_response("pack").expect_err("second call fails");
        assert!(matches!(
            err.downcast_ref::<ArcdownError>(),
            Some(ArcdownError::AlreadyFinalized)
        ));

        let bytes = first.into_body().into_bytes()?;
        assert_eq!(read_entry(&bytes, "a.txt"), b"A");
        Ok(())
    }

    #[test]
    fn test_datetime_conversion_bounds() {
        assert!(zip_datetime(1_600_000_000).is_ok());
        // 1970 predates the DOS date range zip headers can express.
        assert!(zip_datetime(1).is_err());
    }
}
