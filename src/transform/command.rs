//! Transformer backed by an external command.
//!
//! The command is run once per pair as `<program> <args...> <package> <format>`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{TransformError, Transformer};
use crate::core::ModuleFormat;
use crate::util::process::{find_executable, ProcessBuilder};

/// Runs an external program for every (package, format) pair.
#[derive(Debug, Clone)]
pub struct CommandTransformer {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl CommandTransformer {
    /// Create a transformer for `program` with leading `args`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        CommandTransformer {
            program: program.into(),
            args,
            cwd: None,
        }
    }

    /// Build from a full command line such as `["node", "transform.js"]`.
    pub fn from_command_line(parts: &[String]) -> Result<Self, TransformError> {
        let (program, args) = parts.split_first().ok_or(TransformError::EmptyCommand)?;
        if program.trim().is_empty() {
            return Err(TransformError::EmptyCommand);
        }
        Ok(CommandTransformer::new(program, args.to_vec()))
    }

    /// Run the command from `cwd` instead of the inherited working directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Resolve a bare program name through PATH.
    ///
    /// Programs given with a directory component are left untouched.
    pub fn resolve(mut self) -> Result<Self, TransformError> {
        if self.program.components().count() > 1 {
            return Ok(self);
        }
        let name = self.program.to_string_lossy().into_owned();
        self.program = find_executable(&name).ok_or(TransformError::NotFound { program: name })?;
        Ok(self)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn process(&self, package_path: &Path, format: &ModuleFormat) -> ProcessBuilder {
        let mut process = ProcessBuilder::new(&self.program)
            .args(&self.args)
            .arg(package_path)
            .arg(format.as_str());
        if let Some(cwd) = &self.cwd {
            process = process.cwd(cwd);
        }
        process
    }
}

impl Transformer for CommandTransformer {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("transformer")
    }

    fn transform(&self, package_path: &Path, format: &ModuleFormat) -> Result<()> {
        let process = self.process(package_path, format);
        tracing::debug!("running `{}`", process.display_command());

        let output = process.exec()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!("{}", stdout.trim_end());
        }

        if !output.status.success() {
            return Err(TransformError::Failed {
                command: process.display_command(),
                package: package_path.to_path_buf(),
                format: format.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        Ok(())
    }
}
