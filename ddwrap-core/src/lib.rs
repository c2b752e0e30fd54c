//! ddwrap core library — domain types, handler parsing, service configuration.
//!
//! Public API surface:
//! - [`types`] — newtypes, [`RuntimeKind`], descriptors and the packaging manifest
//! - [`handler`] — handler reference parsing
//! - [`config`] — service YAML load / save and descriptor extraction
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod handler;
pub mod types;

pub use error::ConfigError;
pub use handler::{parse_handler, InvalidHandler, ParsedReference};
pub use types::{
    HandlerDescriptor, HandlerName, PackagingManifest, RuntimeKind, OUTPUT_DIR, OUTPUT_GLOB,
};
