//! Template context — serializable rendering payload built from a
//! [`ParsedReference`].

use serde::{Deserialize, Serialize};

use ddwrap_core::{ParsedReference, RuntimeKind};

use crate::error::RenderError;

/// Values available to every wrapper template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapperContext {
    /// Module path in the target runtime's import syntax
    /// (`dir.file` for Python, `dir/file` for Node).
    pub module_path: String,
    /// Exported handler function.
    pub method: String,
}

impl WrapperContext {
    /// Build the context for `kind`, choosing the import syntax it needs.
    pub fn new(kind: RuntimeKind, reference: &ParsedReference) -> Self {
        let module_path = match kind {
            RuntimeKind::Python => reference.dotted_module(),
            RuntimeKind::Node | RuntimeKind::NodeTs => reference.slashed_module(),
        };
        Self {
            module_path,
            method: reference.method().to_owned(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
