//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.ngcc/config.toml` - User-wide defaults
//! - Project: `.ngcc/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! arguments take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::format::{FormatError, ModuleFormat};

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compile settings
    pub compile: CompileConfig,

    /// Transformer settings
    pub transform: TransformConfig,
}

/// Discovery and scheduling settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Formats compiled when none are given on the command line
    pub formats: Option<Vec<String>>,

    /// Discovery root, relative to the project directory
    pub root: Option<PathBuf>,

    /// Number of packages compiled in parallel (None or 1 = sequential)
    pub jobs: Option<usize>,
}

/// External transformer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Program and leading arguments, e.g. `["node", "transform.js"]`
    pub command: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.compile.formats.is_some() {
            self.compile.formats = other.compile.formats;
        }
        if other.compile.root.is_some() {
            self.compile.root = other.compile.root;
        }
        if other.compile.jobs.is_some() {
            self.compile.jobs = other.compile.jobs;
        }

        if other.transform.command.is_some() {
            self.transform.command = other.transform.command;
        }
    }

    /// Configured default formats, validated.
    pub fn formats(&self) -> Result<Option<Vec<ModuleFormat>>, FormatError> {
        self.compile
            .formats
            .as_ref()
            .map(|formats| {
                formats
                    .iter()
                    .map(|f| f.parse::<ModuleFormat>())
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.ngcc/config.toml)
/// 2. Global config (~/.ngcc/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.ngcc).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".ngcc"))
}
