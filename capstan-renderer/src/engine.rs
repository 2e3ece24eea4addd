//! Tera rendering engine with pre-registered helper fragments.
//!
//! Helper fragments are named templates collected before any primary
//! template is parsed. Registration is an explicit two-phase process:
//! build an engine from the helpers, then render primaries against that
//! registry. A primary template invokes a helper macro with
//!
//! ```text
//! {% import "cluster_helpers.tpl" as helpers %}
//! name: {{ helpers::fullname(prefix=prefix, cluster=cluster) }}
//! ```
//!
//! Rendering is strict: a reference to an undefined value fails the
//! render instead of producing empty output, so unrendered placeholders
//! never reach the decoder.

use serde::Serialize;
use tera::Tera;

use crate::error::RenderError;

/// Name-suffix convention for helper fragment assets.
pub const HELPER_SUFFIX: &str = "_helpers.tpl";

/// True when `name` follows the helper fragment convention.
pub fn is_helper_asset(name: &str) -> bool {
    name.ends_with(HELPER_SUFFIX)
}

/// Tera-based engine with strict missing-value semantics.
///
/// Build one engine per processing pass; registries are cheap and
/// per-pass engines keep rendering free of shared state between calls.
#[derive(Debug)]
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Build an engine with `helpers` pre-registered as named fragments.
    ///
    /// Helpers keep their full logical asset name, so templates in nested
    /// directories import them unambiguously.
    pub fn new(helpers: &[(String, String)]) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        for (name, content) in helpers {
            tera.add_raw_template(name, content)
                .map_err(|e| RenderError::syntax(name, e))?;
        }
        Ok(TemplateEngine { tera })
    }

    /// Build a render context from any serializable value set.
    ///
    /// The top level must serialize to a map; scalars and sequences fail
    /// with [`RenderError::Values`].
    pub fn context_from<V: Serialize>(values: &V) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(values).map_err(RenderError::Values)
    }

    /// Register `content` under `name` and render it against `context`.
    ///
    /// Fails with [`RenderError::Syntax`] if the template does not parse
    /// and [`RenderError::MissingValue`] — carrying the asset name and the
    /// unresolved path — if it references a value the context lacks.
    pub fn render(
        &mut self,
        name: &str,
        content: &str,
        context: &tera::Context,
    ) -> Result<String, RenderError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| RenderError::syntax(name, e))?;
        self.tera.render(name, context).map_err(|e| classify(name, e))
    }
}

/// Map a Tera render failure onto the error taxonomy.
///
/// Tera reports undefined variables as nested message errors with the
/// variable path quoted in backticks; everything else stays an engine
/// error.
fn classify(asset: &str, err: tera::Error) -> RenderError {
    match missing_variable(&err) {
        Some(path) => RenderError::MissingValue {
            asset: asset.to_string(),
            path,
        },
        None => RenderError::Engine {
            asset: asset.to_string(),
            source: err,
        },
    }
}

fn missing_variable(err: &tera::Error) -> Option<String> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        let message = e.to_string();
        if message.contains("not found in context") {
            if let Some(rest) = message.split('`').nth(1) {
                return Some(rest.to_string());
            }
        }
        current = e.source();
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
