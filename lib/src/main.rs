//! # Arcdown Binary Entry Point
//!
//! File: lib/src/main.rs
//!
//! ## Overview
//!
//! This file is the entry point for the `arcdown` binary. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Wiring a sandboxed filesystem into the chosen archive backend
//! - Emitting the finished HTTP download response
//!
//! ## Architecture
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load configuration (built-in defaults unless `--config` names a file)
//! 4. Build the requested archive and emit it through a `WriteEmitter`
//! 5. Format and display any errors that occur
//!
use arcdown::{
    load_config, ArchiveDownload, LocalFilesystem, TarArchive, WriteEmitter, ZipArchive,
};
use clap::Parser;
use std::fs::File;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
use cli::{Cli, Commands, PackArgs};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", args);

    let command_result = match args.command {
        Commands::Tar(pack) => handle_tar(pack),
        Commands::Zip(pack) => handle_zip(pack),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Builds and emits a gzip-compressed tar download.
fn handle_tar(args: PackArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let filesystem = LocalFilesystem::new(&args.root)?;
    let mut archive = TarArchive::with_options(
        &config.tar.ext,
        &config.tar.mimetype,
        filesystem,
        config.tar.tmp_dir.as_deref(),
    )?;
    for file in &args.files {
        archive.add_file(file, None)?;
    }
    emit(&mut archive, &args)
}

/// Builds and emits a zip download.
fn handle_zip(args: PackArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let filesystem = LocalFilesystem::new(&args.root)?;
    let mut archive = ZipArchive::with_options(&config.zip.ext, &config.zip.mimetype, filesystem);
    for file in &args.files {
        archive.add_file(file, None)?;
    }
    emit(&mut archive, &args)
}

/// Emits the response to the chosen sink (stdout unless `--output` is set).
fn emit(archive: &mut dyn ArchiveDownload, args: &PackArgs) -> anyhow::Result<()> {
    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            let mut emitter = WriteEmitter::new(file);
            archive.download(&args.name, &mut emitter)?;
            tracing::info!("Wrote response to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut emitter = WriteEmitter::new(stdout.lock());
            archive.download(&args.name, &mut emitter)?;
        }
    }
    Ok(())
}
