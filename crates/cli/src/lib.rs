//! Directory-level compilation used by the `leger` binary.
//!
//! Pages are compiled independently; a page that fails to parse is reported
//! and, unless `fail_fast` is set, the remaining pages are still compiled.

use anyhow::{Context, Result};
use leger_core::{ComponentRegistry, LegerError, Parser, default_registry};
use leger_svelte::{
    PageOptions, PageTarget, compile_page, is_source_file, output_path, route_page_path,
};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Settings for [`compile_dir`].
#[derive(Debug, Clone)]
pub struct CompileSettings {
    /// Directory holding `.leg` pages.
    pub input: PathBuf,
    /// Directory receiving generated pages.
    pub output: PathBuf,
    /// Output flavour.
    pub target: PageTarget,
    /// Import prefix for Svelte component files.
    pub components_dir: String,
    /// Lay Svelte pages out as SvelteKit routes under `output`.
    pub routes: bool,
    /// Stop at the first page that fails.
    pub fail_fast: bool,
}

/// A page that failed to compile.
#[derive(Debug)]
pub struct Failure {
    /// Source page.
    pub source: PathBuf,
    /// Parse error.
    pub error: LegerError,
}

/// Outcome of processing a directory.
#[derive(Debug, Default)]
pub struct Report {
    /// Generated files (compile) or validated pages (check).
    pub succeeded: Vec<PathBuf>,
    /// Pages that failed.
    pub failures: Vec<Failure>,
}

impl Report {
    /// Check if every page succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads the registry at `path`, or the built-in one when `path` is `None`.
pub fn load_registry(path: Option<&Path>) -> Result<ComponentRegistry> {
    match path {
        Some(path) => ComponentRegistry::from_path(path)
            .with_context(|| format!("failed to load registry {}", path.display())),
        None => Ok(default_registry()),
    }
}

/// Lists the `.leg` pages directly inside `dir`, sorted by path.
pub fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            sources.push(entry.into_path());
        }
    }
    sources.sort();
    Ok(sources)
}

/// Compiles every page in `settings.input` into `settings.output`.
pub fn compile_dir(settings: &CompileSettings, registry: &ComponentRegistry) -> Result<Report> {
    let sources = collect_sources(&settings.input)?;
    fs::create_dir_all(&settings.output)
        .with_context(|| format!("failed to create {}", settings.output.display()))?;

    let mut report = Report::default();
    for source in sources {
        let raw = read_source(&source)?;
        let options = PageOptions {
            target: settings.target,
            components_dir: settings.components_dir.clone(),
            file: Some(source.display().to_string()),
        };

        match compile_page(&raw, registry, &options) {
            Ok(page) => {
                let out = destination(&source, settings);
                if let Some(parent) = out.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                fs::write(&out, page.code)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                info!("{} -> {}", source.display(), out.display());
                report.succeeded.push(out);
            }
            Err(error) => {
                report.failures.push(Failure { source, error });
                if settings.fail_fast {
                    break;
                }
            }
        }
    }

    debug!(
        "compiled {} pages, {} failed",
        report.succeeded.len(),
        report.failures.len()
    );
    Ok(report)
}

/// Parses every page in `input` without writing anything.
pub fn check_dir(input: &Path, registry: &ComponentRegistry, fail_fast: bool) -> Result<Report> {
    let mut report = Report::default();
    for source in collect_sources(input)? {
        let raw = read_source(&source)?;
        let parser = Parser::new(registry).with_file(source.display().to_string());
        match parser.parse(&raw) {
            Ok(_) => report.succeeded.push(source),
            Err(error) => {
                report.failures.push(Failure { source, error });
                if fail_fast {
                    break;
                }
            }
        }
    }
    Ok(report)
}

fn destination(source: &Path, settings: &CompileSettings) -> PathBuf {
    if settings.routes && settings.target == PageTarget::Svelte {
        let name = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        route_page_path(&name, &settings.output)
    } else {
        output_path(source, &settings.output, settings.target)
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
