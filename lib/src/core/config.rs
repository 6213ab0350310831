//! # Arcdown Configuration System (`core::config`)
//!
//! File: lib/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for arcdown, handling
//! loading, validation, and access to configuration data. Builders can be
//! constructed straight from a `Config` value, which keeps deployment-level
//! decisions (where the filesystem sandbox sits, where tar spool files go,
//! what extension/MIME pair each format advertises) out of call sites.
//!
//! ## Architecture
//!
//! The configuration follows these principles:
//! - Configuration is loaded from a TOML file (`arcdown.toml`) when present
//! - Default values defined in code apply for every omitted field
//! - Structured data models ensure type safety
//! - Unknown fields are rejected rather than silently ignored
//!
//! ## Examples
//!
//! Loading and using configuration:
//!
//! ```rust,ignore
//! let cfg = config::load_config(None)?;
//!
//! // Access the filesystem sandbox root
//! let root = &cfg.filesystem.root;
//!
//! // Access per-format settings
//! let tar_ext = &cfg.tar.ext;
//! let zip_mime = &cfg.zip.mimetype;
//! ```
//!
//! The configuration is loaded once and passed to the builder constructors
//! (`TarArchive::from_config`, `ZipArchive::from_config`) that need it.
//!
use crate::core::error::{ArcdownError, Result};
use anyhow::Context;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Name of the configuration file searched for in the current directory when
/// no explicit path is supplied.
const CONFIG_FILENAME: &str = "arcdown.toml";

/// Represents the main configuration structure, loaded from a TOML file.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in the TOML
pub struct Config {
    #[serde(default)]
    pub filesystem: FilesystemConfig,
    #[serde(default)]
    pub tar: TarConfig,
    #[serde(default)]
    pub zip: ZipConfig,
}

/// Configuration for the local filesystem sandbox used to resolve source paths.
///
/// There is deliberately no implicit default root: binding the port to the
/// whole local filesystem would let any relative path reach arbitrary files.
/// Callers must name the directory they intend to expose.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FilesystemConfig {
    /// Directory all source paths are resolved under. Required for any
    /// operation that reads from disk; left unset, `from_config` fails.
    pub root: Option<PathBuf>,
}

/// Configuration specific to the tar backend.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TarConfig {
    /// File extension appended to the download name.
    #[serde(default = "default_tar_ext")]
    pub ext: String,
    /// MIME type advertised in the Content-Type header.
    #[serde(default = "default_tar_mimetype")]
    pub mimetype: String,
    /// Directory the spool file is created in; platform temp dir when unset.
    #[serde(default)]
    pub tmp_dir: Option<PathBuf>,
}

/// Configuration specific to the zip backend.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ZipConfig {
    /// File extension appended to the download name.
    #[serde(default = "default_zip_ext")]
    pub ext: String,
    /// MIME type advertised in the Content-Type header.
    #[serde(default = "default_zip_mimetype")]
    pub mimetype: String,
}

impl Default for TarConfig {
    fn default() -> Self {
        TarConfig {
            ext: default_tar_ext(),
            mimetype: default_tar_mimetype(),
            tmp_dir: None,
        }
    }
}

impl Default for ZipConfig {
    fn default() -> Self {
        ZipConfig {
            ext: default_zip_ext(),
            mimetype: default_zip_mimetype(),
        }
    }
}

// --- Default value functions ---
fn default_tar_ext() -> String {
    ".tar.gz".to_string()
}
fn default_tar_mimetype() -> String {
    "application/x-gzip".to_string()
}
fn default_zip_ext() -> String {
    ".zip".to_string()
}
fn default_zip_mimetype() -> String {
    "application/x-zip".to_string()
}

/// Loads the arcdown configuration.
///
/// When `path` is given, that file must exist and parse; when it is `None`,
/// an `arcdown.toml` in the current directory is used if present, and the
/// in-code defaults apply otherwise.
///
/// # Errors
///
/// Returns an `Err` if an explicitly named file is missing or unreadable,
/// or if any found file fails to parse as the expected TOML structure.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(explicit) => {
            if !explicit.is_file() {
                anyhow::bail!(ArcdownError::Config(format!(
                    "Configuration file not found: {}",
                    explicit.display()
                )));
            }
            load_config_from_path(explicit)?
        }
        None => {
            let local = Path::new(CONFIG_FILENAME);
            if local.is_file() {
                load_config_from_path(local)?
            } else {
                debug!("No {} found, using built-in defaults", CONFIG_FILENAME);
                Config::default()
            }
        }
    };
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.filesystem.root, None);
        assert_eq!(cfg.tar.ext, ".tar.gz");
        assert_eq!(cfg.tar.mimetype, "application/x-gzip");
        assert_eq!(cfg.tar.tmp_dir, None);
        assert_eq!(cfg.zip.ext, ".zip");
        assert_eq!(cfg.zip.mimetype, "application/x-zip");
    }

    #[test]
    fn test_parse_partial_file() {
        let cfg: Config = toml::from_str(
            r#"
            [filesystem]
            root = "/srv/files"

            [zip]
            mimetype = "application/zip"
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.filesystem.root, Some(PathBuf::from("/srv/files")));
        // Omitted sections and fields fall back to the in-code defaults.
        assert_eq!(cfg.tar.ext, ".tar.gz");
        assert_eq!(cfg.zip.ext, ".zip");
        assert_eq!(cfg.zip.mimetype, "application/zip");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let parsed: std::result::Result<Config, _> = toml::from_str(
            r#"
            [tar]
            compression_level = 9
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = load_config(Some(Path::new("/definitely/not/here/arcdown.toml")))
            .expect_err("explicit missing file must fail");
        assert!(matches!(
            err.downcast_ref::<ArcdownError>(),
            Some(ArcdownError::Config(_))
        ));
    }
}
