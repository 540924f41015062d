//! # targz Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by the archiver and the
//! command-line front end.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation for the CLI
//! - `error`: Error kinds and the crate-wide `Result` alias
//!
//! ```rust
//! use targz::core::config; // For loading configuration
//! use targz::core::error::{Result, TargzError}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
