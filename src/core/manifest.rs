//! `package.json` reading.
//!
//! Only the fields the compiler driver looks at are modelled. Everything else
//! in the document is accepted and ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File name of the package descriptor inside a package directory.
pub const PACKAGE_JSON: &str = "package.json";

/// Conventional name of the directory holding installed packages.
pub const NODE_MODULES: &str = "node_modules";

/// Key written into `package.json` by a transformer once a package is compiled.
pub const COMPILED_MARKER: &str = "__processed_by_ngcc__";

/// Suffix of type declaration files referenced by `typings`.
pub const DECLARATION_SUFFIX: &str = ".d.ts";

/// Suffix of the compiled metadata file that sits next to the declarations.
pub const METADATA_SUFFIX: &str = ".metadata.json";

/// Errors produced while loading a package descriptor.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed package descriptor `{}`", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only view of a `package.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    /// Relative path to the type declaration entry point. Kept untyped so
    /// that a non-string value rejects the package instead of failing the parse.
    #[serde(default)]
    typings: Option<serde_json::Value>,

    /// Remaining top-level fields
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
}

impl PackageManifest {
    /// Load and parse a descriptor from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse descriptor contents. `path` is only used for error reporting.
    ///
    /// Valid JSON that is not an object declares nothing.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ManifestError> {
        let malformed = |source| ManifestError::Malformed {
            path: path.to_path_buf(),
            source,
        };
        match serde_json::from_str(contents).map_err(malformed)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value).map_err(malformed),
            _ => Ok(Self::default()),
        }
    }

    /// The declared package name, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(serde_json::Value::as_str)
    }

    /// The declared typings entry.
    ///
    /// Anything other than a non-empty string counts as undeclared.
    pub fn typings(&self) -> Option<&str> {
        self.typings
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .filter(|t| !t.is_empty())
    }

    /// Path of the compiled metadata file for a package rooted at `package_dir`.
    ///
    /// Returns `None` when the manifest declares no typings.
    pub fn metadata_path(&self, package_dir: &Path) -> Option<PathBuf> {
        self.typings()
            .map(|typings| package_dir.join(metadata_file_for(typings)))
    }

    /// Whether a previous compile left its marker in the descriptor.
    pub fn is_marked_compiled(&self) -> bool {
        match self.fields.get(COMPILED_MARKER) {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
            Some(_) => true,
        }
    }
}

/// Swap a trailing `.d.ts` for `.metadata.json`.
///
/// A typings entry without the declaration suffix is returned unchanged.
pub fn metadata_file_for(typings: &str) -> String {
    match typings.strip_suffix(DECLARATION_SUFFIX) {
        Some(stem) => format!("{stem}{METADATA_SUFFIX}"),
        None => typings.to_string(),
    }
}
