//! # Arcdown Response Emitter (`emit`)
//!
//! File: lib/src/emit/mod.rs
//!
//! ## Overview
//!
//! The emitter is the transport-facing edge of the pipeline: it accepts one
//! finished download response and writes it somewhere exactly once. The core
//! never consults a return value beyond success; everything transport-shaped
//! (sockets, servers, frameworks) stays behind the [`Emitter`] trait.
//!
//! [`WriteEmitter`] is the bundled implementation: it serializes the
//! response as HTTP/1.1 text onto any `std::io::Write` — stdout for the
//! `arcdown` binary, a file, or a test buffer.
//!
use crate::core::error::Result;
use crate::response::Body;
use anyhow::Context;
use http::Response;
use std::io::{self, Write};
use tracing::debug;

/// Writes one download response to a live transport.
pub trait Emitter {
    fn emit(&mut self, response: Response<Body>) -> Result<()>;
}

/// Emitter that serializes the response as HTTP/1.1 text to a writer.
pub struct WriteEmitter<W: Write> {
    writer: W,
}

impl<W: Write> WriteEmitter<W> {
    pub fn new(writer: W) -> Self {
        WriteEmitter { writer }
    }

    /// Returns the underlying writer, e.g. to inspect a test buffer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Emitter for WriteEmitter<W> {
    fn emit(&mut self, response: Response<Body>) -> Result<()> {
        let (parts, mut body) = response.into_parts();
        debug!(status = %parts.status, "Emitting response");

        write!(
            self.writer,
            "HTTP/1.1 {} {}\r\n",
            parts.status.as_u16(),
            parts.status.canonical_reason().unwrap_or("")
        )
        .context("Failed to write status line")?;
        for (header_name, value) in parts.headers.iter() {
            write!(
                self.writer,
                "{}: {}\r\n",
                header_name,
                value.to_str().unwrap_or("")
            )
            .context("Failed to write header")?;
        }
        write!(self.writer, "\r\n").context("Failed to terminate header block")?;

        io::copy(&mut body, &mut self.writer).context("Failed to write response body")?;
        self.writer.flush().context("Failed to flush emitter")?;
        Ok(())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::attachment_response;

    #[test]
    fn test_write_emitter_serializes_response() -> Result<()> {
        let response =
            attachment_response("application/x-zip", ".zip", "pack", Body::Buffer(b"ZZ".to_vec()))?;
        let mut emitter = WriteEmitter::new(Vec::new());
        emitter.emit(response)?;
        let out = String::from_utf8(emitter.into_inner()).expect("ascii output");
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(out.contains("content-disposition: attachment; filename=\"pack.zip\"\r\n"));
        assert!(out.contains("pragma: no-cache\r\n"));
        assert!(out.ends_with("\r\nZZ"));
        Ok(())
    }
}
