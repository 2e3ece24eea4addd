//! # capstan-renderer
//!
//! Strict Tera rendering for manifest templates, with reusable helper
//! fragments registered ahead of the primary template.
//!
//! ## Usage
//!
//! ```rust
//! use capstan_renderer::TemplateEngine;
//!
//! #[derive(serde::Serialize)]
//! struct Values {
//!     cluster: String,
//! }
//!
//! let values = Values { cluster: "edge-01".to_string() };
//! let context = TemplateEngine::context_from(&values).unwrap();
//! let mut engine = TemplateEngine::new(&[]).unwrap();
//! let out = engine
//!     .render("sa.yaml", "name: agent-{{ cluster }}\n", &context)
//!     .unwrap();
//! assert_eq!(out, "name: agent-edge-01\n");
//! ```

pub mod engine;
pub mod error;

pub use engine::{is_helper_asset, TemplateEngine, HELPER_SUFFIX};
pub use error::RenderError;
