//! `ddwrap clean` — remove the generated wrapper directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ddwrap_core::OUTPUT_DIR;
use ddwrap_sync::{pipeline, OsFileSystem};

/// Arguments for `ddwrap clean`.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Service root containing the wrapper directory.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

impl CleanArgs {
    pub fn run(self) -> Result<()> {
        let removed = pipeline::clean(&OsFileSystem, &self.root)
            .with_context(|| format!("failed to clean '{}'", self.root.display()))?;
        if removed {
            println!("✓ removed {OUTPUT_DIR}/");
        } else {
            println!("✓ {OUTPUT_DIR}/ not present — nothing to do");
        }
        Ok(())
    }
}
