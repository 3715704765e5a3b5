//! Test utilities for unit tests.
//!
//! Provides on-disk package fixtures and a transformer that records the
//! calls it receives instead of compiling anything.

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::core::ModuleFormat;
use crate::transform::Transformer;

pub use fixtures::*;

/// Transformer that records every call, optionally failing on one pair.
#[derive(Debug, Default)]
pub struct RecordingTransformer {
    calls: Mutex<Vec<(PathBuf, String)>>,
    fail_on: Option<(PathBuf, String)>,
}

impl RecordingTransformer {
    /// Create a transformer that accepts every call.
    pub fn new() -> Self {
        RecordingTransformer::default()
    }

    /// Fail when called with this package and format.
    pub fn failing_on(package: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        RecordingTransformer {
            calls: Mutex::new(Vec::new()),
            fail_on: Some((package.into(), format.into())),
        }
    }

    /// The recorded (package, format) calls, in call order.
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transformer for RecordingTransformer {
    fn name(&self) -> &str {
        "recording"
    }

    fn transform(&self, package_path: &Path, format: &ModuleFormat) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((package_path.to_path_buf(), format.as_str().to_string()));

        if let Some((package, fmt)) = &self.fail_on {
            if package == package_path && fmt == format.as_str() {
                bail!("transform failed for {} ({})", package_path.display(), format);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_transformer() {
        let transformer = RecordingTransformer::failing_on("/nm/b", "esm5");

        transformer
            .transform(Path::new("/nm/a"), &ModuleFormat::new("esm5"))
            .unwrap();
        assert!(transformer
            .transform(Path::new("/nm/b"), &ModuleFormat::new("esm5"))
            .is_err());

        assert_eq!(
            transformer.calls(),
            vec![
                (PathBuf::from("/nm/a"), "esm5".to_string()),
                (PathBuf::from("/nm/b"), "esm5".to_string()),
            ]
        );
    }
}
