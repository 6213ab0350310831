//! # Arcdown Response Materializer (`response`)
//!
//! File: lib/src/response/mod.rs
//!
//! ## Overview
//!
//! Turns a finalized archive artifact into an HTTP download response. The
//! response carries exactly the headers a browser needs to treat the body
//! as a file download and never cache it:
//!
//! ```text
//! Content-Type: <mimetype>
//! Content-Disposition: attachment; filename="<name><ext>"
//! Expires: 0
//! Pragma: no-cache
//! ```
//!
//! ## Architecture
//!
//! - **`Body`**: the two shapes an artifact's bytes arrive in — a buffer
//!   (zip backend) or an open file handle (tar backend's spool file).
//!   Implements `std::io::Read` so emitters can stream either shape.
//! - **`attachment_response`**: the pure materializer. No error paths of
//!   its own beyond header-value construction; any real failure happens
//!   upstream during backend finalization.
//!
use crate::core::error::Result;
use anyhow::Context;
use http::{
    header::{CONTENT_DISPOSITION, CONTENT_TYPE, EXPIRES, PRAGMA},
    Response, StatusCode,
};
use std::fs::File;
use std::io::{self, Read};

/// Byte source backing a download response.
pub enum Body {
    /// Fully serialized archive held in memory.
    Buffer(Vec<u8>),
    /// Archive spooled to disk, opened for binary read.
    File(File),
}

impl Body {
    /// Drains the body into a byte vector. Consumes file bodies by reading
    /// them to the end from their current position.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Body::Buffer(bytes) => Ok(bytes),
            Body::File(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)
                    .context("Failed to read spooled archive body")?;
                Ok(bytes)
            }
        }
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Body::Buffer(bytes) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                bytes.drain(..n);
                Ok(n)
            }
            Body::File(file) => file.read(buf),
        }
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Body::File(_) => f.debug_tuple("File").finish(),
        }
    }
}

/// Builds the download response for a finalized archive artifact.
///
/// Status is always 200; the attachment filename is `<name><ext>` with both
/// parts used verbatim. Stateless: one call, one response.
///
/// # Errors
///
/// Fails only when a header value cannot be constructed (e.g. a MIME type
/// or name containing bytes that are invalid in an HTTP header).
pub fn attachment_response(
    mimetype: &str,
    ext: &str,
    name: &str,
    body: Body,
) -> Result<Response<Body>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, mimetype)
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}{}\"", name, ext),
        )
        .header(EXPIRES, "0")
        .header(PRAGMA, "no-cache")
        .body(body)
        .context("Failed to construct download response")
}
