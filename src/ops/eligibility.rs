//! Decide whether a single directory is a package that needs compiling.
//!
//! A directory qualifies when it is a real directory (not a symlink), is not
//! itself a `node_modules` folder, carries a `package.json` declaring
//! `typings`, and has the compiled metadata file that goes with those typings.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{PackageManifest, NODE_MODULES, PACKAGE_JSON};

/// Outcome of inspecting one directory, with the reason for a rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// The directory is a compilable package
    Compilable,
    /// The path is a symbolic link
    Symlink,
    /// The directory is a dependency container
    DependencyContainer,
    /// No `package.json` directly inside the directory
    NoManifest,
    /// `package.json` declares no typings entry
    NoTypings,
    /// The derived metadata file does not exist
    NoMetadata(PathBuf),
}

impl Eligibility {
    pub fn is_compilable(&self) -> bool {
        matches!(self, Eligibility::Compilable)
    }
}

/// Inspect `dir`, short-circuiting on the first failed check.
///
/// A malformed `package.json` is an error, not a rejection.
pub fn check(dir: &Path) -> Result<Eligibility> {
    let meta = std::fs::symlink_metadata(dir)
        .with_context(|| format!("failed to stat {}", dir.display()))?;
    if meta.file_type().is_symlink() {
        return Ok(Eligibility::Symlink);
    }

    if dir.file_name() == Some(OsStr::new(NODE_MODULES)) {
        return Ok(Eligibility::DependencyContainer);
    }

    let manifest_path = dir.join(PACKAGE_JSON);
    if !manifest_path.exists() {
        return Ok(Eligibility::NoManifest);
    }

    let manifest = PackageManifest::load(&manifest_path)?;
    let Some(metadata_path) = manifest.metadata_path(dir) else {
        return Ok(Eligibility::NoTypings);
    };

    if metadata_path.exists() {
        Ok(Eligibility::Compilable)
    } else {
        Ok(Eligibility::NoMetadata(metadata_path))
    }
}

/// Whether `dir` itself is a compilable package.
pub fn is_compilable(dir: &Path) -> Result<bool> {
    let eligibility = check(dir)?;
    tracing::debug!("{}: {:?}", dir.display(), eligibility);
    Ok(eligibility.is_compilable())
}
