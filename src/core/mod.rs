//! Core data structures.
//!
//! - Package descriptors (`package.json`) and the naming conventions around them
//! - Module format identifiers

pub mod format;
pub mod manifest;

pub use format::{default_formats, parse_format_list, FormatError, ModuleFormat, DEFAULT_FORMATS};
pub use manifest::{ManifestError, PackageManifest, NODE_MODULES, PACKAGE_JSON};
