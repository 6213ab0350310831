//! # Arcdown CLI Definitions (`cli`)
//!
//! File: lib/src/cli.rs
//!
//! ## Overview
//!
//! Clap derive structures for the `arcdown` binary. The binary is a thin
//! front-end over the library: it wires a sandboxed local filesystem into
//! one of the two archive backends, packs the files named on the command
//! line, and emits the HTTP download response to stdout or a file.
//!
//! ## Examples
//!
//! ```bash
//! # Pack two files from ./exports into a tar.gz download response
//! arcdown tar --root ./exports reports/january.csv manifest.txt
//!
//! # Same content as a zip, written to a file, with a custom base name
//! arcdown zip --root ./exports --name reports --output response.http reports/january.csv
//! ```
//!
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level command-line arguments for the `arcdown` binary.
#[derive(Parser, Debug)]
#[command(
    name = "arcdown",
    about = "Pack files into a downloadable archive and emit it as an HTTP response",
    propagate_version = true,
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available archive formats, one subcommand each.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a gzip-compressed tar archive.
    Tar(PackArgs),
    /// Build a zip archive.
    Zip(PackArgs),
}

/// Arguments shared by both formats.
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Source files to pack, as paths relative to the sandbox root.
    #[arg(required = false)]
    pub files: Vec<String>,

    /// Directory the source paths are resolved under.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Base name of the download (extension is appended per format).
    #[arg(long, default_value = arcdown::DEFAULT_BASENAME)]
    pub name: String,

    /// Write the response here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Optional configuration file overriding the built-in defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
