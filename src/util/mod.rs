//! Shared utilities

pub mod config;
pub mod context;
pub mod events;
pub mod fs;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use events::CompileEvent;
pub use shell::Shell;
