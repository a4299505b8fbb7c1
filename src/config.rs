// SPDX-License-Identifier: MIT
//
// Configuration file loading.
//
// tinct reads an optional TOML file:
//
//   log_level = "info"
//
//   [engine]
//   max_passes = 64
//
// Lookup order: `--config <path>` (must exist), then `./tinct.toml` (if
// present), then built-in defaults. Command-line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tinct_theme::EngineConfig;

use crate::cli::LogLevel;

/// File consulted when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "tinct.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Log level used when neither the command line nor `RUST_LOG` sets one.
    pub log_level: Option<LogLevel>,
    pub engine: EngineConfig,
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.is_file() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in config {}", path.display()))
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.max_passes == 0 {
            bail!("engine.max_passes must be at least 1");
        }
        Ok(())
    }

    /// Apply a command-line pass limit on top of the file.
    pub fn with_max_passes(mut self, max_passes: Option<usize>) -> Result<Self> {
        if let Some(max_passes) = max_passes {
            self.engine.max_passes = max_passes;
            self.validate()?;
        }
        Ok(self)
    }
}
