//! Service configuration (`serverless.yml`-shaped YAML).
//!
//! Only the pieces wrapper generation needs are typed:
//!
//! ```yaml
//! provider:
//!   runtime: python3.8        # default for functions without their own
//! functions:
//!   my-lambda:
//!     handler: mydir/func.myhandler
//!     runtime: python3.8      # optional override
//! package:
//!   include: []
//! ```
//!
//! Every other key is preserved through load → save.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::{HandlerDescriptor, HandlerName, PackagingManifest, RuntimeKind};

/// `provider` section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// One entry under `functions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Absent for container-image functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// Root of a service configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Declaration order is the order wrappers are generated in.
    #[serde(default)]
    pub functions: IndexMap<String, FunctionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PackagingManifest>,
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl ServiceConfig {
    /// Build handler descriptors for every instrumentable function.
    ///
    /// Functions without a handler, or whose runtime has no wrapper template,
    /// are left out. With `typescript` set, Node functions get the
    /// TypeScript template.
    pub fn descriptors(&self, typescript: bool) -> Vec<HandlerDescriptor> {
        let mut out = Vec::with_capacity(self.functions.len());
        for (name, func) in &self.functions {
            let Some(handler) = func.handler.as_deref() else {
                tracing::debug!("function '{name}' has no handler; not instrumented");
                continue;
            };
            let Some(runtime) = func.runtime.as_deref().or(self.provider.runtime.as_deref())
            else {
                tracing::debug!("function '{name}' has no runtime; not instrumented");
                continue;
            };
            let Some(kind) = RuntimeKind::from_platform_runtime(runtime) else {
                tracing::debug!("function '{name}' uses unsupported runtime '{runtime}'");
                continue;
            };
            let kind = match kind {
                RuntimeKind::Node if typescript => RuntimeKind::NodeTs,
                other => other,
            };
            out.push(HandlerDescriptor::new(name.as_str(), kind, handler));
        }
        out
    }

    /// The `package` section, created empty when absent.
    pub fn package_mut(&mut self) -> &mut PackagingManifest {
        self.package.get_or_insert_with(PackagingManifest::default)
    }

    /// Point function `name` at a new handler reference.
    ///
    /// Returns `false` when no such function exists.
    pub fn redirect_handler(&mut self, name: &HandlerName, handler: impl Into<String>) -> bool {
        match self.functions.get_mut(&name.0) {
            Some(func) => {
                func.handler = Some(handler.into());
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load a service configuration from `path`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<ServiceConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Atomically save a service configuration to `path`.
///
/// Write flow: serialize → `<file>.tmp` sibling → `rename`.
pub fn save_at(path: &Path, config: &ServiceConfig) -> Result<(), ConfigError> {
    let yaml = serde_yaml::to_string(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: &str = r#"
service: orders
provider:
  name: aws
  runtime: python3.8
functions:
  create-order:
    handler: orders/create.handler
  list-orders:
    handler: orders.list.handler
    runtime: nodejs12.x
  resize:
    image: 123456789.dkr.ecr.us-east-1.amazonaws.com/resize:latest
  legacy:
    handler: Legacy::Handler::Run
    runtime: dotnetcore3.1
"#;

    fn service() -> ServiceConfig {
        serde_yaml::from_str(SERVICE).expect("parse service")
    }

    #[test]
    fn descriptors_follow_declaration_order_and_inherit_runtime() {
        let descriptors = service().descriptors(false);
        assert_eq!(
            descriptors,
            vec![
                HandlerDescriptor::new("create-order", RuntimeKind::Python, "orders/create.handler"),
                HandlerDescriptor::new("list-orders", RuntimeKind::Node, "orders.list.handler"),
            ]
        );
    }

    #[test]
    fn typescript_flag_promotes_node_only() {
        let descriptors = service().descriptors(true);
        assert_eq!(descriptors[0].runtime, RuntimeKind::Python);
        assert_eq!(descriptors[1].runtime, RuntimeKind::NodeTs);
    }

    #[test]
    fn function_without_any_runtime_is_skipped() {
        let cfg: ServiceConfig =
            serde_yaml::from_str("functions:\n  f:\n    handler: a.b\n").expect("parse");
        assert!(cfg.descriptors(false).is_empty());
    }

    #[test]
    fn package_mut_creates_section() {
        let mut cfg = service();
        assert!(cfg.package.is_none());
        cfg.package_mut().include = Some(vec!["x".into()]);
        assert_eq!(cfg.package.as_ref().map(|p| p.include_entries().len()), Some(1));
    }

    #[test]
    fn redirect_handler_updates_known_function_only() {
        let mut cfg = service();
        assert!(cfg.redirect_handler(
            &HandlerName::from("create-order"),
            "datadog_handlers/create-order.handler"
        ));
        assert!(!cfg.redirect_handler(&HandlerName::from("missing"), "x.y"));
        assert_eq!(
            cfg.functions["create-order"].handler.as_deref(),
            Some("datadog_handlers/create-order.handler")
        );
    }
}
