//! # targz Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the commands of the `targz` binary. Each command
//! defines its own clap argument struct and a handler function that `main.rs`
//! dispatches to.
//!
//! ## Commands
//!
//! - `compress`: Package a directory into a `.tar.gz` archive
//!

/// Archive a directory tree (`targz compress <SOURCE> <DESTINATION>`).
pub mod compress;
