//! # ddwrap-sync
//!
//! Output-directory reconciliation and packaging manifest updates.
//!
//! Call [`pipeline::run`] to regenerate every wrapper for a service and
//! register them with its packaging manifest, or [`pipeline::clean`] to drop
//! the output directory after packaging.

pub mod error;
pub mod fs;
pub mod manifest;
pub mod pipeline;
pub mod reconciler;

pub use error::SyncError;
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use manifest::update_manifest;
pub use reconciler::{reconcile, ReconcileReport, SkipReason, SkippedHandler, WrittenWrapper};
