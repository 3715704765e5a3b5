//! Compile event types for JSON output.
//!
//! These events are emitted one per line when using `--message-format json`.
//!
//! # Event Types
//!
//! - `package-discovered`: discovery found a compilable package
//! - `compile-started`: the transformer is about to run for one pair
//! - `compile-finished`: the run ended (success or failure)
//! - `diagnostic`: a warning or error message

use std::path::PathBuf;

use serde::Serialize;

/// An event emitted while discovering and compiling packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason")]
pub enum CompileEvent {
    /// Discovery found a package that needs compiling.
    #[serde(rename = "package-discovered")]
    PackageDiscovered {
        /// Absolute package directory
        package: PathBuf,
    },

    /// A (package, format) pair is about to be transformed.
    #[serde(rename = "compile-started")]
    CompileStarted {
        /// Absolute package directory
        package: PathBuf,
        /// Module format identifier
        format: String,
    },

    /// The run completed.
    #[serde(rename = "compile-finished")]
    CompileFinished {
        /// Whether every pair was transformed
        success: bool,
        /// Number of transformer invocations that succeeded
        invocations: u64,
        /// Total duration in milliseconds
        duration_ms: u64,
    },

    /// A generic diagnostic message.
    #[serde(rename = "diagnostic")]
    Diagnostic {
        /// Severity level ("error", "warning", "note")
        level: String,
        /// Message text
        message: String,
    },
}

impl CompileEvent {
    /// Create a compile-started event.
    pub fn started(package: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        CompileEvent::CompileStarted {
            package: package.into(),
            format: format.into(),
        }
    }

    /// Create a diagnostic event.
    pub fn diagnostic(level: impl Into<String>, message: impl Into<String>) -> Self {
        CompileEvent::Diagnostic {
            level: level.into(),
            message: message.into(),
        }
    }

    /// Serialize to a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
