//! `ddwrap generate` — render and write wrappers for every configured function.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use ddwrap_core::{config, parse_handler, HandlerDescriptor, RuntimeKind};
use ddwrap_renderer::Renderer;
use ddwrap_sync::{pipeline, MemoryFileSystem, OsFileSystem, ReconcileReport};

/// Arguments for `ddwrap generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Service configuration file. Its directory is the service root.
    #[arg(long, short = 'c', default_value = "serverless.yml")]
    pub config: PathBuf,

    /// Write the updated configuration (packaging + redirected handlers) here.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Use the TypeScript template for every Node function.
    #[arg(long)]
    pub typescript: bool,

    /// Directory with `handler.{py,js,ts}.tera` overrides.
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Show what would be written without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        let mut service = config::load_at(&self.config)
            .with_context(|| format!("cannot load '{}'", self.config.display()))?;
        let root = service_root(&self.config);
        let descriptors = service.descriptors(self.typescript);

        let renderer = match &self.templates {
            Some(dir) => Renderer::with_template_dir(dir),
            None => Renderer::new(),
        }
        .context("failed to load wrapper templates")?;

        let report = if self.dry_run {
            let fs = dry_run_fs(&root, &descriptors)?;
            pipeline::run(&fs, &root, &renderer, &descriptors, service.package_mut())
        } else {
            pipeline::run(&OsFileSystem, &root, &renderer, &descriptors, service.package_mut())
        }
        .context("wrapper generation failed")?;

        for wrapper in &report.written {
            service.redirect_handler(&wrapper.name, wrapper.handler.clone());
        }

        if let Some(output) = &self.output {
            if self.dry_run {
                println!("[dry-run] would save {}", output.display());
            } else {
                config::save_at(output, &service)
                    .with_context(|| format!("cannot save '{}'", output.display()))?;
            }
        }

        print_report(&report, self.dry_run);
        Ok(())
    }
}

/// Directory holding the config file; `.` for a bare file name.
fn service_root(config: &Path) -> PathBuf {
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// In-memory filesystem that answers the `.ts` probes the way the real disk would.
fn dry_run_fs(root: &Path, descriptors: &[HandlerDescriptor]) -> Result<MemoryFileSystem> {
    let fs = MemoryFileSystem::new();
    for descriptor in descriptors {
        if descriptor.runtime != RuntimeKind::Node {
            continue;
        }
        let Ok(reference) = parse_handler(&descriptor.handler) else {
            continue;
        };
        let probe = root.join(format!("{}.ts", reference.slashed_module()));
        let exists = probe
            .try_exists()
            .with_context(|| format!("cannot probe '{}'", probe.display()))?;
        if exists {
            fs.insert_file(&probe, "");
        }
    }
    Ok(fs)
}

fn print_report(report: &ReconcileReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!(
        "{prefix}✓ {} wrapper(s) generated, {} skipped",
        report.written.len(),
        report.skipped.len()
    );
    for wrapper in &report.written {
        println!(
            "  {}  {} → {}",
            "✎".green(),
            wrapper.include_path,
            wrapper.handler
        );
    }
    for skipped in &report.skipped {
        println!("  {}  {}: {}", "✗".yellow(), skipped.name, skipped.reason);
    }
}
