//! Shared pipeline entrypoints used by the CLI.

use std::path::Path;

use ddwrap_core::{HandlerDescriptor, PackagingManifest};
use ddwrap_renderer::Renderer;

use crate::error::{io_err, SyncError};
use crate::fs::FileSystem;
use crate::manifest::update_manifest;
use crate::reconciler::{output_dir, reconcile, ReconcileReport};

/// Regenerate every wrapper under `root` and register them with `packaging`.
///
/// `packaging` is only borrowed for the call. On error it is left untouched;
/// the output directory may hold a partial pass, which the next run wipes.
pub fn run<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    renderer: &Renderer,
    descriptors: &[HandlerDescriptor],
    packaging: &mut PackagingManifest,
) -> Result<ReconcileReport, SyncError> {
    let report = reconcile(fs, root, renderer, descriptors)?;
    update_manifest(packaging, &report.include_paths());
    tracing::info!(
        "{} wrapper(s) generated, {} skipped",
        report.written.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Remove the output directory under `root`. Returns `false` when there was
/// nothing to remove.
pub fn clean<F: FileSystem + ?Sized>(fs: &F, root: &Path) -> Result<bool, SyncError> {
    let dir = output_dir(root);
    if !fs.exists(&dir).map_err(|e| io_err(&dir, e))? {
        return Ok(false);
    }
    fs.remove_entry(&dir).map_err(|e| io_err(&dir, e))?;
    tracing::info!("removed: {}", dir.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ddwrap_core::RuntimeKind;

    use super::*;
    use crate::fs::MemoryFileSystem;

    #[test]
    fn run_with_no_handlers_still_registers_glob() {
        let fs = MemoryFileSystem::new();
        let mut packaging = PackagingManifest::default();
        let report = run(&fs, Path::new("/svc"), &Renderer::new().unwrap(), &[], &mut packaging)
            .expect("run");
        assert!(report.written.is_empty());
        assert_eq!(packaging.include_entries(), ["datadog_handlers/**"]);
    }

    #[test]
    fn failed_run_leaves_packaging_untouched() {
        let fs = MemoryFileSystem::new().with_file("/svc/datadog_handlers", "file, not dir");
        let mut packaging = PackagingManifest::with_include(["src/**"]);
        let descriptors = [HandlerDescriptor::new("f", RuntimeKind::Python, "a.b")];
        let result = run(
            &fs,
            Path::new("/svc"),
            &Renderer::new().unwrap(),
            &descriptors,
            &mut packaging,
        );
        assert!(result.is_err());
        assert_eq!(packaging.include_entries(), ["src/**"]);
    }

    #[test]
    fn clean_removes_directory_and_is_idempotent() {
        let fs = MemoryFileSystem::new().with_file("/svc/datadog_handlers/f.py", "x");
        assert!(clean(&fs, Path::new("/svc")).expect("clean"));
        assert!(fs.files().is_empty());
        assert!(!fs.exists(&PathBuf::from("/svc/datadog_handlers")).unwrap());
        assert!(!clean(&fs, Path::new("/svc")).expect("second clean"));
    }
}
