//! Packaging manifest updates.

use ddwrap_core::{PackagingManifest, OUTPUT_GLOB};

/// Register generated wrappers with the packaging manifest.
///
/// Pre-existing entries keep their order; `written` paths are appended as
/// given, without deduplication. The output-directory glob is then moved (or
/// added) to the end so it appears exactly once.
pub fn update_manifest(manifest: &mut PackagingManifest, written: &[String]) {
    let include = manifest.include.get_or_insert_with(Vec::new);
    include.retain(|entry| entry != OUTPUT_GLOB);
    include.extend(written.iter().cloned());
    include.push(OUTPUT_GLOB.to_owned());
}
