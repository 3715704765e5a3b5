//! Implementation of a compile run.
//!
//! Resolves which packages and formats to compile, then calls the
//! transformer once per (package, format) pair, package-major. The first
//! failure fails the run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::core::format::{default_formats, ModuleFormat};
use crate::core::manifest::{PackageManifest, COMPILED_MARKER, PACKAGE_JSON};
use crate::ops::discover::find_packages_to_compile;
use crate::transform::Transformer;
use crate::util::events::CompileEvent;
use crate::util::shell::{format_duration, Shell, Status};

/// How transformer calls are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One pair at a time, in plan order.
    #[default]
    Sequential,
    /// Packages on a thread pool; formats of one package stay in order.
    Parallel {
        /// Worker threads (None = one per CPU)
        jobs: Option<usize>,
    },
}

impl ExecutionMode {
    /// Pick a mode from a job count. Fewer than two jobs runs sequentially.
    pub fn from_jobs(jobs: Option<usize>) -> Self {
        match jobs {
            Some(n) if n > 1 => ExecutionMode::Parallel { jobs: Some(n) },
            _ => ExecutionMode::Sequential,
        }
    }
}

/// Options for a compile run.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Requested formats (None = the default four)
    pub formats: Option<Vec<ModuleFormat>>,

    /// A single absolute package to compile instead of discovering
    pub package_path: Option<PathBuf>,

    /// Discovery root, used when no package path is given
    pub root: PathBuf,

    /// Scheduling strategy for transformer calls
    pub mode: ExecutionMode,
}

impl CompileOptions {
    /// Options that discover under `root` and compile the default formats.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CompileOptions {
            formats: None,
            package_path: None,
            root: root.into(),
            mode: ExecutionMode::Sequential,
        }
    }

    pub fn with_formats(mut self, formats: Vec<ModuleFormat>) -> Self {
        self.formats = Some(formats);
        self
    }

    pub fn with_package_path(mut self, package_path: impl Into<PathBuf>) -> Self {
        self.package_path = Some(package_path.into());
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }
}

/// The resolved packages and formats of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilePlan {
    pub packages: Vec<PathBuf>,
    pub formats: Vec<ModuleFormat>,
}

impl CompilePlan {
    /// Every (package, format) pair, package-major.
    pub fn pairs(&self) -> impl Iterator<Item = (&Path, &ModuleFormat)> + '_ {
        self.packages.iter().flat_map(move |package| {
            self.formats
                .iter()
                .map(move |format| (package.as_path(), format))
        })
    }

    /// Number of transformer calls the plan needs.
    pub fn len(&self) -> usize {
        self.packages.len() * self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct CompileSummary {
    pub plan: CompilePlan,
    /// Transformer calls made
    pub invocations: usize,
    pub duration: Duration,
}

/// The requested formats, or the default list.
pub fn resolve_formats(requested: Option<&[ModuleFormat]>) -> Vec<ModuleFormat> {
    match requested {
        Some(formats) => formats.to_vec(),
        None => default_formats(),
    }
}

/// The explicit package, or every package discovered under the root.
pub fn resolve_packages(opts: &CompileOptions, shell: &Shell) -> Result<Vec<PathBuf>> {
    if let Some(package) = &opts.package_path {
        return Ok(vec![package.clone()]);
    }

    shell.status(Status::Discovering, opts.root.display());
    let packages = find_packages_to_compile(&opts.root)
        .with_context(|| format!("failed to discover packages in {}", opts.root.display()))?;

    for package in &packages {
        shell.note(format!("found {}", package.display()));
        shell.event(&CompileEvent::PackageDiscovered {
            package: package.clone(),
        });
    }
    tracing::debug!("{} package(s) need compiling", packages.len());

    Ok(packages)
}

/// Resolve packages and formats without compiling anything.
pub fn plan(opts: &CompileOptions, shell: &Shell) -> Result<CompilePlan> {
    let formats = resolve_formats(opts.formats.as_deref());
    for format in formats.iter().filter(|f| !f.is_known()) {
        tracing::debug!("passing unrecognised format `{}` to the transformer", format);
    }

    let packages = resolve_packages(opts, shell)?;
    if packages.is_empty() {
        shell.warn(format!(
            "no packages to compile in {}",
            opts.root.display()
        ));
    }

    tracing::info!(
        "compiling {} package(s) x {} format(s)",
        packages.len(),
        formats.len()
    );
    Ok(CompilePlan { packages, formats })
}

/// Run a full compile: plan, then transform every pair.
pub fn compile(
    opts: &CompileOptions,
    transformer: &dyn Transformer,
    shell: &Shell,
) -> Result<CompileSummary> {
    let start = Instant::now();
    let plan = plan(opts, shell)?;

    let completed = AtomicUsize::new(0);
    let result = execute_plan(&plan, opts.mode, transformer, shell, &completed);
    let invocations = completed.load(Ordering::SeqCst);
    let duration = start.elapsed();

    shell.event(&CompileEvent::CompileFinished {
        success: result.is_ok(),
        invocations: invocations as u64,
        duration_ms: duration.as_millis() as u64,
    });
    result?;

    shell.status(
        Status::Finished,
        format!(
            "{} compilation(s) with {} in {}",
            invocations,
            transformer.name(),
            format_duration(duration)
        ),
    );

    Ok(CompileSummary {
        plan,
        invocations,
        duration,
    })
}

/// Transform every pair of `plan` using the given strategy.
///
/// `completed` counts successful transformer calls, including those made
/// before a failure.
pub fn execute_plan(
    plan: &CompilePlan,
    mode: ExecutionMode,
    transformer: &dyn Transformer,
    shell: &Shell,
    completed: &AtomicUsize,
) -> Result<()> {
    match mode {
        ExecutionMode::Sequential => {
            for package in &plan.packages {
                compile_package(package, &plan.formats, transformer, shell, completed)?;
            }
            Ok(())
        }
        ExecutionMode::Parallel { jobs } => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs.unwrap_or(0))
                .build()
                .context("failed to start compile workers")?;

            let results: Vec<Result<()>> = pool.install(|| {
                plan.packages
                    .par_iter()
                    .map(|package| {
                        compile_package(package, &plan.formats, transformer, shell, completed)
                    })
                    .collect()
            });

            first_failure(&plan.packages, results, shell)
        }
    }
}

/// Report every failed package and return the first failure in plan order.
fn first_failure(packages: &[PathBuf], results: Vec<Result<()>>, shell: &Shell) -> Result<()> {
    let mut failures = packages
        .iter()
        .zip(results)
        .filter_map(|(package, result)| result.err().map(|e| (package, e)));

    let Some((_, first)) = failures.next() else {
        return Ok(());
    };

    for (package, err) in failures {
        tracing::debug!("{}: {:#}", package.display(), err);
        shell.error(format!("{:#}", err));
    }
    Err(first)
}

fn compile_package(
    package: &Path,
    formats: &[ModuleFormat],
    transformer: &dyn Transformer,
    shell: &Shell,
    completed: &AtomicUsize,
) -> Result<()> {
    note_previous_compile(package);

    for format in formats {
        shell.status(
            Status::Compiling,
            format!("{} : {}", package.display(), format),
        );
        shell.event(&CompileEvent::started(package, format.as_str()));

        transformer
            .transform(package, format)
            .with_context(|| format!("failed to compile {} ({})", package.display(), format))?;
        completed.fetch_add(1, Ordering::SeqCst);
    }
    Ok(())
}

// Packages carrying the marker are still recompiled.
fn note_previous_compile(package: &Path) {
    let manifest_path = package.join(PACKAGE_JSON);
    if !manifest_path.exists() {
        return;
    }
    if let Ok(manifest) = PackageManifest::load(&manifest_path) {
        if manifest.is_marked_compiled() {
            tracing::debug!(
                "{} already has `{}`; recompiling",
                package.display(),
                COMPILED_MARKER
            );
        }
    }
}
