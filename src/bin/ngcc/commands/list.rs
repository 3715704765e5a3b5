//! `ngcc --list`

use anyhow::{Context, Result};

use super::discovery_root;
use crate::cli::Cli;
use ngcc::ops::find_packages_to_compile;
use ngcc::util::{CompileEvent, GlobalContext, Shell};

pub fn execute(cli: &Cli, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();
    let root = discovery_root(cli, &config, &ctx);

    let packages = find_packages_to_compile(&root)
        .with_context(|| format!("failed to discover packages in {}", root.display()))?;

    for package in &packages {
        if shell.is_json() {
            shell.event(&CompileEvent::PackageDiscovered {
                package: package.clone(),
            });
        } else {
            println!("{}", package.display());
        }
    }

    if packages.is_empty() {
        shell.warn(format!("no packages to compile in {}", root.display()));
    }

    Ok(())
}
