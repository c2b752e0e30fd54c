//! # ddwrap-renderer
//!
//! Tera-based template engine that renders instrumentation wrapper modules
//! for serverless function handlers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ddwrap_core::{parse_handler, RuntimeKind};
//! use ddwrap_renderer::Renderer;
//!
//! fn render_one() {
//!     let Ok(renderer) = Renderer::new() else { return };
//!     let Ok(reference) = parse_handler("src/orders.create") else { return };
//!     if let Ok(wrapper) = renderer.render(RuntimeKind::Node, &reference) {
//!         println!("{} exports {}", wrapper.text, wrapper.entrypoint_method);
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::WrapperContext;
pub use engine::{RenderedWrapper, Renderer, TemplateEngine};
pub use error::RenderError;
