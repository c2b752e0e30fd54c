//! Domain types for wrapper generation.
//!
//! All types are serializable/deserializable via serde + serde_yaml.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known output directory, relative to the service root.
pub const OUTPUT_DIR: &str = "datadog_handlers";

/// Catch-all packaging glob for [`OUTPUT_DIR`].
pub const OUTPUT_GLOB: &str = "datadog_handlers/**";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed function name; doubles as the wrapper filename stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerName(pub String);

impl fmt::Display for HandlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl HandlerName {
    /// Whether the name can be used as a file name directly inside the
    /// output directory: non-empty, no path separators, not `.` or `..`.
    pub fn is_file_stem(&self) -> bool {
        let name = self.0.as_str();
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0'])
    }
}

impl From<String> for HandlerName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for HandlerName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Runtime a wrapper is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeKind {
    Python,
    Node,
    NodeTs,
}

impl RuntimeKind {
    /// All runtime variants in a stable order.
    pub fn all() -> &'static [RuntimeKind] {
        &[RuntimeKind::Python, RuntimeKind::Node, RuntimeKind::NodeTs]
    }

    /// Extension used when nothing on disk suggests otherwise.
    pub fn default_extension(&self) -> &'static str {
        match self {
            RuntimeKind::Python => "py",
            RuntimeKind::Node => "js",
            RuntimeKind::NodeTs => "ts",
        }
    }

    /// Map a platform runtime identifier (`python3.8`, `nodejs12.x`, …).
    ///
    /// Returns `None` for runtimes that have no wrapper template.
    pub fn from_platform_runtime(runtime: &str) -> Option<RuntimeKind> {
        if runtime.starts_with("python") {
            Some(RuntimeKind::Python)
        } else if runtime.starts_with("nodejs") {
            Some(RuntimeKind::Node)
        } else {
            None
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeKind::Python => write!(f, "python"),
            RuntimeKind::Node => write!(f, "node"),
            RuntimeKind::NodeTs => write!(f, "node_ts"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One configured function to instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDescriptor {
    pub name: HandlerName,
    pub runtime: RuntimeKind,
    /// Raw handler reference, e.g. `src/handler.main` or `pkg.module.main`.
    pub handler: String,
}

impl HandlerDescriptor {
    pub fn new(
        name: impl Into<HandlerName>,
        runtime: RuntimeKind,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            runtime,
            handler: handler.into(),
        }
    }
}

/// The `package` section of a service configuration.
///
/// Only `include` is interpreted; every other key is carried through as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PackagingManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl PackagingManifest {
    /// Manifest with a pre-populated include list.
    pub fn with_include<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: Some(entries.into_iter().map(Into::into).collect()),
            extra: serde_yaml::Mapping::new(),
        }
    }

    /// Include entries, empty when the list was never created.
    pub fn include_entries(&self) -> &[String] {
        self.include.as_deref().unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
