//! Module format identifiers.
//!
//! A format is opaque to the driver: it is parsed from the command line or
//! config and handed to the transformer unchanged. The four well-known
//! identifiers only matter for the default set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flattened ES2015 bundle.
pub const FESM2015: &str = "fesm2015";
/// Unflattened ES2015 modules.
pub const ESM2015: &str = "esm2015";
/// Flattened ES5 bundle.
pub const FESM5: &str = "fesm5";
/// Unflattened ES5 modules.
pub const ESM5: &str = "esm5";

/// Formats compiled when none are requested, in compile order.
pub const DEFAULT_FORMATS: [&str; 4] = [FESM2015, ESM2015, FESM5, ESM5];

/// Separator for format lists on the command line.
pub const FORMAT_LIST_SEPARATOR: char = ',';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("empty module format in list `{list}`")]
    Empty { list: String },
}

/// An opaque module format identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleFormat(String);

impl ModuleFormat {
    /// Wrap an identifier without validation.
    pub fn new(name: impl Into<String>) -> Self {
        ModuleFormat(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the four well-known formats.
    pub fn is_known(&self) -> bool {
        DEFAULT_FORMATS.contains(&self.0.as_str())
    }
}

impl fmt::Display for ModuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModuleFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(FormatError::Empty {
                list: s.to_string(),
            });
        }
        Ok(ModuleFormat::new(trimmed))
    }
}

/// The default format list, in order.
pub fn default_formats() -> Vec<ModuleFormat> {
    DEFAULT_FORMATS.iter().map(|f| ModuleFormat::new(*f)).collect()
}

/// Split a comma-delimited format list.
///
/// Entries are trimmed; an empty entry anywhere in the list is an error.
pub fn parse_format_list(list: &str) -> Result<Vec<ModuleFormat>, FormatError> {
    list.split(FORMAT_LIST_SEPARATOR)
        .map(|entry| {
            entry.parse::<ModuleFormat>().map_err(|_| FormatError::Empty {
                list: list.to_string(),
            })
        })
        .collect()
}
