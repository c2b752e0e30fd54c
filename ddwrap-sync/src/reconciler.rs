//! Output-directory reconciliation.
//!
//! ## `reconcile` — one full pass
//!
//! 1. Create `<root>/datadog_handlers` if absent.
//! 2. Remove every entry inside it. Nothing is diffed; stale wrappers for
//!    removed functions must never survive.
//! 3. For each descriptor, in order: parse the handler (skip on failure),
//!    render, pick the extension, write `<name>.<ext>`, record the path.
//!
//! The wipe finishes before the first write, so a write can never race the
//! removal of its own stale copy.

use std::path::{Path, PathBuf};

use ddwrap_core::{
    parse_handler, HandlerDescriptor, HandlerName, InvalidHandler, ParsedReference, RuntimeKind,
    OUTPUT_DIR,
};
use ddwrap_renderer::Renderer;
use thiserror::Error;

use crate::error::{io_err, SyncError};
use crate::fs::FileSystem;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// A wrapper written during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenWrapper {
    pub name: HandlerName,
    pub runtime: RuntimeKind,
    /// Location on disk (`<root>/datadog_handlers/<name>.<ext>`).
    pub path: PathBuf,
    /// Forward-slash path relative to the service root, as packaged.
    pub include_path: String,
    /// Handler reference that invokes the wrapper instead of the original.
    pub handler: String,
}

/// Why a descriptor was left uninstrumented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Handler(#[from] InvalidHandler),

    #[error("name '{0}' cannot be used as a file name inside datadog_handlers/")]
    Name(HandlerName),
}

/// A descriptor left uninstrumented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedHandler {
    pub name: HandlerName,
    pub reason: SkipReason,
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Descriptor order.
    pub written: Vec<WrittenWrapper>,
    pub skipped: Vec<SkippedHandler>,
    /// Entries removed by the wipe.
    pub removed: usize,
}

impl ReconcileReport {
    /// Include paths of every written wrapper, in descriptor order.
    pub fn include_paths(&self) -> Vec<String> {
        self.written.iter().map(|w| w.include_path.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// `<root>/datadog_handlers`
pub fn output_dir(root: &Path) -> PathBuf {
    root.join(OUTPUT_DIR)
}

/// Ensure `dir` exists and is empty. Returns the number of entries removed.
pub fn wipe<F: FileSystem + ?Sized>(fs: &F, dir: &Path) -> Result<usize, SyncError> {
    fs.create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    let entries = fs.list_entries(dir).map_err(|e| io_err(dir, e))?;
    for entry in &entries {
        fs.remove_entry(entry).map_err(|e| io_err(entry, e))?;
        tracing::debug!("removed stale entry: {}", entry.display());
    }
    Ok(entries.len())
}

/// Pick the wrapper file extension.
///
/// Node handlers whose source module exists as `<root>/<module>.ts` are
/// TypeScript projects and get a `.ts` wrapper.
pub fn select_extension<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    kind: RuntimeKind,
    reference: &ParsedReference,
) -> Result<&'static str, SyncError> {
    match kind {
        RuntimeKind::Python | RuntimeKind::NodeTs => Ok(kind.default_extension()),
        RuntimeKind::Node => {
            let probe = root.join(format!("{}.ts", reference.slashed_module()));
            let typed = fs.exists(&probe).map_err(|e| io_err(&probe, e))?;
            if typed {
                tracing::debug!("found {}; using .ts wrapper", probe.display());
                Ok(RuntimeKind::NodeTs.default_extension())
            } else {
                Ok(kind.default_extension())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// reconcile
// ---------------------------------------------------------------------------

/// Regenerate the output directory under `root` for `descriptors`.
///
/// Malformed handlers are skipped and reported; any filesystem or render
/// failure aborts the pass.
pub fn reconcile<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    renderer: &Renderer,
    descriptors: &[HandlerDescriptor],
) -> Result<ReconcileReport, SyncError> {
    let dir = output_dir(root);
    let removed = wipe(fs, &dir)?;
    let mut report = ReconcileReport {
        removed,
        ..ReconcileReport::default()
    };

    for descriptor in descriptors {
        let parsed = if descriptor.name.is_file_stem() {
            parse_handler(&descriptor.handler).map_err(SkipReason::from)
        } else {
            Err(SkipReason::Name(descriptor.name.clone()))
        };
        let reference = match parsed {
            Ok(reference) => reference,
            Err(reason) => {
                tracing::warn!("skipping '{}': {reason}", descriptor.name);
                report.skipped.push(SkippedHandler {
                    name: descriptor.name.clone(),
                    reason,
                });
                continue;
            }
        };

        let rendered = renderer.render(descriptor.runtime, &reference)?;
        let ext = select_extension(fs, root, descriptor.runtime, &reference)?;
        let file_name = format!("{}.{ext}", descriptor.name);
        let path = dir.join(&file_name);
        fs.write_file(&path, &rendered.text)
            .map_err(|e| io_err(&path, e))?;
        tracing::info!("wrote: {}", path.display());

        report.written.push(WrittenWrapper {
            name: descriptor.name.clone(),
            runtime: descriptor.runtime,
            path,
            include_path: format!("{OUTPUT_DIR}/{file_name}"),
            handler: format!("{OUTPUT_DIR}/{}.{}", descriptor.name, rendered.entrypoint_method),
        });
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
