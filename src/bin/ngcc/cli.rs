//! CLI definitions using clap.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use ngcc::util::shell::ColorChoice;

/// ngcc - compile installed packages into their module formats
#[derive(Parser)]
#[command(name = "ngcc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Comma-separated module formats [default: fesm2015,esm2015,fesm5,esm5]
    pub formats: Option<String>,

    /// Compile only this package directory instead of discovering packages
    #[arg(value_name = "PACKAGE_PATH")]
    pub package_path: Option<OsString>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, value_enum, value_name = "FMT", default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Directory to discover packages in [default: node_modules]
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Number of packages to compile in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Transformer program and leading arguments, run as `<CMD>... <package> <format>`
    #[arg(long, value_name = "CMD", num_args = 1..)]
    pub transformer: Vec<String>,

    /// Transformer command line from the environment, split on whitespace
    #[arg(long = "transformer-env", hide = true, env = "NGCC_TRANSFORMER")]
    pub transformer_env: Option<String>,

    /// Report what would be compiled without running the transformer
    #[arg(long)]
    pub dry_run: bool,

    /// Print the packages that need compiling and exit
    #[arg(long, conflicts_with_all = ["dry_run", "formats", "package_path"])]
    pub list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    /// Human-readable status lines
    Human,
    /// One JSON object per line on stdout
    Json,
}

impl Cli {
    /// The requested format list. An empty argument means none was given.
    pub fn formats(&self) -> Option<&str> {
        self.formats.as_deref().filter(|list| !list.trim().is_empty())
    }

    /// The package to compile. An empty argument means none was given.
    pub fn package_path(&self) -> Option<&Path> {
        self.package_path
            .as_deref()
            .filter(|path| !path.to_string_lossy().trim().is_empty())
            .map(Path::new)
    }

    /// The transformer command line: `--transformer`, then `NGCC_TRANSFORMER`.
    pub fn transformer_command(&self) -> Option<Vec<String>> {
        if !self.transformer.is_empty() {
            return Some(self.transformer.clone());
        }
        self.transformer_env
            .as_ref()
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect())
            .filter(|parts: &Vec<String>| !parts.is_empty())
    }
}
