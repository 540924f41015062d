//! # targz Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration layer used by the `targz` binary.
//! The library API itself takes no configuration beyond `ArchiveOptions`; the
//! CLI builds those options from a multi-level configuration that combines
//! defaults, user settings, and project-specific overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (applied by the `compress` command)
//! 2. Project-specific `.targz.toml` in the current directory or ancestors
//! 3. User-specific `<config dir>/targz/config.toml`
//! 4. Default values defined in the code
//!
//! The project search stops at the first directory containing `.git`.
//! Merged configuration is validated before use.
//!
//! ## Examples
//!
//! ```toml
//! [archive]
//! compression_level = 9
//! ```
//!
//! ```rust,no_run
//! let cfg = targz::core::config::load_config()?;
//! let options = cfg.archive_options();
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
use crate::common::archive::{ArchiveOptions, DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL};
use crate::core::error::{Result, TargzError}; // Standard Result and error kinds
use anyhow::{anyhow, Context}; // Error construction and context
use directories::ProjectDirs; // Platform config directory lookup
use serde::Deserialize; // For deserializing TOML
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Settings that shape the produced archive.
///
/// Fields are `None` when the file does not set them, so a layer that
/// explicitly sets a value (even the default one) still overrides the layers
/// below it.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Gzip level, 0 (store) through 9 (smallest).
    #[serde(default)]
    pub compression_level: Option<u32>,
}

impl Config {
    /// Converts the validated configuration into archiver options, filling
    /// unset fields with the archiver defaults.
    pub fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            compression_level: self
                .archive
                .compression_level
                .unwrap_or(DEFAULT_COMPRESSION_LEVEL),
        }
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".targz.toml";

/// Loads, merges and validates the user and project configuration.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "targz") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.is_file() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.targz.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Layers the project configuration over the user configuration.
///
/// # Arguments
///
/// * `user` - Settings from the user config file (or defaults).
/// * `project` - Settings from `.targz.toml`, if one was found.
///
/// # Returns
///
/// * `Config` - Each field taken from the project if it sets it, else from the user.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    Config {
        archive: ArchiveConfig {
            compression_level: project_cfg
                .archive
                .compression_level
                .or(user.archive.compression_level),
        },
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if let Some(level) = config.archive.compression_level {
        if level > MAX_COMPRESSION_LEVEL {
            return Err(anyhow!(TargzError::Config(format!(
                "compression_level {} is out of range (0-{})",
                level, MAX_COMPRESSION_LEVEL
            ))));
        }
    }
    Ok(())
}
