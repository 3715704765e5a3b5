//! Global context for driver invocations.
//!
//! Provides centralized access to the working directory and configuration
//! paths, so that library operations never read process state themselves.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::NODE_MODULES;
use crate::util::config::{global_config_dir, load_config, Config};
use crate::util::fs::absolutize;

/// Name of the project-local configuration directory.
pub const PROJECT_CONFIG_DIR: &str = ".ngcc";

/// Global context containing paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global configuration (~/.ngcc/)
    home: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            home: global_config_dir(),
        }
    }

    /// Override the global configuration directory.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|home| home.join("config.toml"))
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.cwd.join(PROJECT_CONFIG_DIR).join("config.toml")
    }

    /// Load global and project configuration, merged.
    pub fn load_config(&self) -> Config {
        load_config(self.config_path().as_deref(), &self.project_config_path())
    }

    /// The default discovery root, `<cwd>/node_modules`.
    pub fn default_root(&self) -> PathBuf {
        self.cwd.join(NODE_MODULES)
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        absolutize(&self.cwd, path)
    }
}
