//! # Arcdown In-Memory Filesystem (`fs::memory`)
//!
//! File: lib/src/fs/memory.rs
//!
//! ## Overview
//!
//! Map-backed [`Filesystem`] implementation. Entries are written up front
//! with [`MemoryFilesystem::write`] and then read back through the port like
//! any other source. Each entry remembers the unix time it was written as
//! its last-modified time.
//!
//! Primarily used by the test suites, but also useful when archive content
//! is generated in-process and never touches disk.
//!
use super::Filesystem;
use crate::core::error::{ArcdownError, Result};
use std::{collections::HashMap, io::Cursor, io::Read};

struct MemoryEntry {
    data: Vec<u8>,
    mtime: i64,
}

/// In-memory filesystem keyed by textual path.
#[derive(Default)]
pub struct MemoryFilesystem {
    entries: HashMap<String, MemoryEntry>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `path`, stamping it with the current time.
    /// Writing an existing path replaces its content and timestamp.
    pub fn write(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.write_with_mtime(path, data, chrono::Utc::now().timestamp());
    }

    /// Stores `data` under `path` with an explicit last-modified time.
    pub fn write_with_mtime(
        &mut self,
        path: impl Into<String>,
        data: impl Into<Vec<u8>>,
        mtime: i64,
    ) {
        self.entries.insert(
            path.into(),
            MemoryEntry {
                data: data.into(),
                mtime,
            },
        );
    }

    /// Paths currently stored, in arbitrary order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn entry(&self, path: &str) -> Result<&MemoryEntry> {
        self.entries
            .get(path)
            .ok_or_else(|| ArcdownError::PathNotFound { path: path.into() }.into())
    }
}

impl Filesystem for MemoryFilesystem {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.entry(path)?.data.clone())
    }

    fn read_stream(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.entry(path)?.data.clone())))
    }

    fn last_modified(&self, path: &str) -> Result<i64> {
        Ok(self.entry(path)?.mtime)
    }
}
