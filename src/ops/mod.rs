//! High-level operations.
//!
//! Discovery of compilable packages and the compile run that drives the
//! transformer over them.

pub mod discover;
pub mod eligibility;
pub mod ngcc_compile;

pub use discover::{find_candidates, find_packages_to_compile, recursive_dir_test, DiscoveryError};
pub use eligibility::{check, is_compilable, Eligibility};
pub use ngcc_compile::{
    compile, execute_plan, plan, resolve_formats, resolve_packages, CompileOptions, CompilePlan,
    CompileSummary, ExecutionMode,
};
