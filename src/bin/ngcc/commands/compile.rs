//! `ngcc [FORMATS] [PACKAGE_PATH]`

use anyhow::{Context, Result};

use super::discovery_root;
use crate::cli::Cli;
use ngcc::core::parse_format_list;
use ngcc::ops::{compile, CompileOptions, ExecutionMode};
use ngcc::transform::{CommandTransformer, NoopTransformer, TransformError};
use ngcc::util::{Config, GlobalContext, Shell};

pub fn execute(cli: &Cli, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();

    // Formats: CLI > config > built-in default
    let formats = match cli.formats() {
        Some(list) => Some(parse_format_list(list)?),
        None => config
            .formats()
            .context("invalid `compile.formats` in config")?,
    };

    // Jobs: CLI > config > sequential
    let jobs = cli.jobs.or(config.compile.jobs);

    let mut opts = CompileOptions::new(discovery_root(cli, &config, &ctx))
        .with_mode(ExecutionMode::from_jobs(jobs));
    if let Some(formats) = formats {
        opts = opts.with_formats(formats);
    }
    if let Some(package_path) = cli.package_path() {
        opts = opts.with_package_path(ctx.resolve(package_path));
    }

    if cli.dry_run {
        compile(&opts, &NoopTransformer, shell)?;
    } else {
        let transformer = command_transformer(cli, &config, &ctx)?;
        compile(&opts, &transformer, shell)?;
    }

    Ok(())
}

/// The transformer command: `--transformer` / `NGCC_TRANSFORMER`, then config.
fn command_transformer(
    cli: &Cli,
    config: &Config,
    ctx: &GlobalContext,
) -> Result<CommandTransformer> {
    let command = cli
        .transformer_command()
        .or_else(|| config.transform.command.clone())
        .ok_or(TransformError::EmptyCommand)
        .context("pass --transformer <CMD>, set `transform.command` in .ngcc/config.toml, or use --dry-run")?;

    let transformer = CommandTransformer::from_command_line(&command)?
        .with_cwd(ctx.cwd())
        .resolve()?;
    tracing::debug!("using transformer {}", transformer.program().display());
    Ok(transformer)
}
