//! Tera rendering engine — per-runtime template selection and [`Renderer`].
//!
//! # Template mapping
//!
//! | Runtime  | Template           | Shape                                         |
//! |----------|--------------------|-----------------------------------------------|
//! | Python   | `handler.py.tera`  | import wrapper, aliased import, rebind        |
//! | Node     | `handler.js.tera`  | `require` wrapper + original, `module.exports`|
//! | NodeTs   | `handler.ts.tera`  | lint/type-check suppression, `import`/`export`|

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use ddwrap_core::{ParsedReference, RuntimeKind};

use crate::context::WrapperContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("handler.py.tera", include_str!("templates/handler.py.tera")),
    ("handler.js.tera", include_str!("templates/handler.js.tera")),
    ("handler.ts.tera", include_str!("templates/handler.ts.tera")),
];

/// Template name for a runtime.
pub fn template_name(kind: RuntimeKind) -> &'static str {
    match kind {
        RuntimeKind::Python => "handler.py.tera",
        RuntimeKind::Node => "handler.js.tera",
        RuntimeKind::NodeTs => "handler.ts.tera",
    }
}

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut templates = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if !meta.is_file() || path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let name = normalize_template_name(Path::new(&entry.file_name()));
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert((*name).to_string(), (*content).to_string());
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

/// LF line endings, exactly one trailing newline.
fn normalize_output(rendered: &str) -> String {
    let mut text = rendered.replace("\r\n", "\n").trim_end().to_string();
    text.push('\n');
    text
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering wrapper templates with optional user overrides.
///
/// `user_template_dir` may contain `handler.{py,js,ts}.tera` files that
/// replace the embedded defaults. Files with other names are loaded but never
/// selected.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render the wrapper template for `kind` with the supplied context.
    pub fn render(&self, ctx: &WrapperContext, kind: RuntimeKind) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let rendered = self.tera.render(template_name(kind), &tera_ctx)?;
        Ok(normalize_output(&rendered))
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Generated wrapper source plus the name it exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWrapper {
    pub text: String,
    /// Always the parsed method name, unchanged.
    pub entrypoint_method: String,
}

/// Wrapper renderer for all runtime kinds.
///
/// Create once with [`Renderer::new`] and reuse; rendering itself does no I/O.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(None)? })
    }

    /// Construct a [`Renderer`] whose templates may be overridden from `dir`.
    pub fn with_template_dir(dir: &Path) -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(Some(dir))? })
    }

    /// Render the wrapper module for one parsed handler reference.
    pub fn render(
        &self,
        kind: RuntimeKind,
        reference: &ParsedReference,
    ) -> Result<RenderedWrapper, RenderError> {
        let ctx = WrapperContext::new(kind, reference);
        let text = self.engine.render(&ctx, kind)?;
        Ok(RenderedWrapper {
            text,
            entrypoint_method: ctx.method,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
