//! Transformer seam.
//!
//! Compiling a package into a module format is delegated to a [`Transformer`].
//! The driver only schedules calls; it never looks at what a transformer does
//! to the package on disk.

mod command;

use std::path::Path;

use anyhow::Result;
use thiserror::Error;

use crate::core::ModuleFormat;

pub use command::CommandTransformer;

/// Compiles one package into one module format, in place.
///
/// Implementations must be callable from several threads at once when the
/// driver runs in parallel mode.
pub trait Transformer: Sync {
    /// Short name used in progress output.
    fn name(&self) -> &str;

    /// Transform the package at `package_path` into `format`.
    fn transform(&self, package_path: &Path, format: &ModuleFormat) -> Result<()>;
}

/// Errors raised by the built-in transformers.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("no transformer command configured")]
    EmptyCommand,

    #[error("transformer program `{program}` not found in PATH")]
    NotFound { program: String },

    #[error(
        "`{command}` failed for {} ({format}) with exit code {code:?}\n{stderr}",
        .package.display()
    )]
    Failed {
        command: String,
        package: std::path::PathBuf,
        format: ModuleFormat,
        code: Option<i32>,
        stderr: String,
    },
}

/// Transformer that does nothing. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransformer;

impl Transformer for NoopTransformer {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn transform(&self, package_path: &Path, format: &ModuleFormat) -> Result<()> {
        tracing::debug!("dry run: skipping {} ({})", package_path.display(), format);
        Ok(())
    }
}
