//! # Arcdown Tar Download Integration Tests
//!
//! File: lib/tests/tar_download.rs
//!
//! ## Overview
//!
//! End-to-end tests for the tar backend through the public API: an
//! in-memory filesystem is populated with fixtures, entries are added
//! through the `ArchiveDownload` contract, and the produced response is
//! checked for the exact header contract and for byte-identical content
//! after decompressing and unpacking the body.
//!
use arcdown::{ArchiveDownload, Body, LocalFilesystem, MemoryFilesystem, Result, TarArchive};
use flate2::read::GzDecoder;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, EXPIRES, PRAGMA};
use std::collections::HashMap;
use std::io::Read;

/// Decompresses and unpacks a tar.gz response body into name -> content.
fn unpack(body: Body) -> Result<HashMap<String, Vec<u8>>> {
    let bytes = body.into_bytes()?;
    assert!(!bytes.is_empty());
    let mut archive = tar::Archive::new(GzDecoder::new(bytes.as_slice()));
    let mut entries = HashMap::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.to_string_lossy().to_string();
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        entries.insert(path, content);
    }
    Ok(entries)
}

#[test]
fn two_files_from_memory_filesystem() -> Result<()> {
    let mut filesystem = MemoryFilesystem::new();
    filesystem.write("a.txt", b"A".to_vec());
    filesystem.write("b.txt", b"B".to_vec());

    let mut downloader = TarArchive::new(filesystem)?;
    let mut paths = vec!["a.txt".to_string(), "b.txt".to_string()];
    paths.sort();
    for path in &paths {
        downloader.add_file(path, Some(path))?;
    }

    let response = downloader.to_response("pack")?;
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/x-gzip"
    );
    assert_eq!(
        response.headers().get(CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"pack.tar.gz\""
    );
    assert_eq!(response.headers().get(EXPIRES).unwrap(), "0");
    assert_eq!(response.headers().get(PRAGMA).unwrap(), "no-cache");

    let entries = unpack(response.into_body())?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["a.txt"], b"A");
    assert_eq!(entries["b.txt"], b"B");
    Ok(())
}

#[test]
fn files_from_local_sandbox() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("docs"))?;
    std::fs::write(dir.path().join("docs/report.txt"), b"quarterly")?;

    let mut downloader = TarArchive::new(LocalFilesystem::new(dir.path())?)?;
    downloader.add_file("docs/report.txt", None)?;

    let entries = unpack(downloader.to_response("export")?.into_body())?;
    // Stored name is the final path segment, not the sandbox-relative path.
    assert_eq!(entries["report.txt"], b"quarterly");
    Ok(())
}

#[test]
fn mixed_data_and_file_entries_preserve_order_and_bytes() -> Result<()> {
    let mut filesystem = MemoryFilesystem::new();
    filesystem.write("binary.dat", vec![0u8, 159, 146, 150, 255]);

    let mut downloader = TarArchive::new(filesystem)?;
    downloader.add_file_data(b"plain text", "notes.txt", 1_600_000_000)?;
    downloader.add_binary_file("binary.dat", None)?;
    downloader.add_binary_file_data(&[1, 2, 3], "raw.bin", 0)?;

    let bytes = downloader.to_response("mixed")?.into_body().into_bytes()?;
    let mut archive = tar::Archive::new(GzDecoder::new(bytes.as_slice()));
    let names: Vec<String> = archive
        .entries()?
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().to_string())
        .collect();
    // Sequential write order matches addition order.
    assert_eq!(names, vec!["notes.txt", "binary.dat", "raw.bin"]);
    Ok(())
}
