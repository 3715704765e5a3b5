//! Command implementations

pub mod compile;
pub mod list;

use std::path::PathBuf;

use ngcc::util::{Config, GlobalContext};

use crate::cli::Cli;

/// Discovery root: `--root`, then config, then `<cwd>/node_modules`.
pub fn discovery_root(cli: &Cli, config: &Config, ctx: &GlobalContext) -> PathBuf {
    cli.root
        .as_ref()
        .or(config.compile.root.as_ref())
        .map(|root| ctx.resolve(root))
        .unwrap_or_else(|| ctx.default_root())
}
