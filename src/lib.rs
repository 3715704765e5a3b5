//! ngcc - post-install compiler driver for installed packages
//!
//! This crate finds the packages under a `node_modules` tree that ship
//! compiled metadata next to their type declarations, and runs a
//! transformer over each of them for every requested module format.

pub mod core;
pub mod ops;
pub mod transform;
pub mod util;

/// Test utilities for unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides on-disk package fixtures and a recording transformer.
#[cfg(test)]
pub mod test_support;

pub use core::{ModuleFormat, PackageManifest};
pub use ops::{compile, find_packages_to_compile, is_compilable, CompileOptions, ExecutionMode};
pub use transform::{CommandTransformer, NoopTransformer, Transformer};
pub use util::context::GlobalContext;
