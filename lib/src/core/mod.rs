//! # Arcdown Core Infrastructure (`core`)
//!
//! File: lib/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure shared by the rest of the
//! crate: error types and configuration loading. These components provide
//! foundational capabilities used across the builder backends, the
//! filesystem port, and the binary front-end, ensuring consistent behavior.
//!
//! ## Usage
//!
//! Core infrastructure is imported by the other modules:
//!
//! ```rust,ignore
//! use crate::core::config;                         // For loading configuration
//! use crate::core::error::{ArcdownError, Result}; // For error handling
//! ```
//!

/// Configuration loading and validation (arcdown.toml).
pub mod config;
/// Error types and error handling utilities.
pub mod error;
