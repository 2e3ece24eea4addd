//! Template processing pipeline.
//!
//! Data flow for one call:
//!
//! ```text
//! source.read_all → helper registry → render → split → decode → sort
//! ```
//!
//! Helper fragments (`*_helpers.tpl`) discovered in the selected path
//! feed the template registry and are never rendered as primary assets.
//! Every operation is independently invocable and reentrant; the only
//! state captured at construction is the source and the immutable
//! [`Options`].

use serde::Serialize;

use capstan_core::{default_kinds_order, sort_for_apply, Resource};
use capstan_renderer::{is_helper_asset, TemplateEngine};

use crate::error::ProcessError;
use crate::source::{Asset, AssetSource};
use crate::split::{split_documents, DEFAULT_DELIMITER};

/// Asset name reported in errors for explicit byte-blob calls.
const BLOB_ASSET: &str = "<blob>";

/// Configuration captured once at processor construction.
#[derive(Debug, Clone)]
pub struct Options {
    /// Kind-priority list used for apply ordering. Kinds absent from the
    /// list sort after all listed kinds, ties broken by name.
    pub kinds_order: Vec<String>,
    /// Document separator honored when splitting rendered assets.
    pub delimiter: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            kinds_order: default_kinds_order(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl Options {
    /// Default options with a custom kind-priority list.
    pub fn with_kinds_order(kinds_order: Vec<String>) -> Self {
        Options {
            kinds_order,
            ..Options::default()
        }
    }
}

/// Composes a source, the renderer, the splitter, the decoder, and the
/// orderer behind a small set of entry points.
pub struct TemplateProcessor {
    source: Box<dyn AssetSource>,
    options: Options,
}

impl TemplateProcessor {
    pub fn new(source: Box<dyn AssetSource>, options: Options) -> Self {
        TemplateProcessor { source, options }
    }

    /// The options this processor was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Logical asset names under `path`, without reading or rendering.
    pub fn asset_names(
        &self,
        path: &str,
        excluded: &[String],
        recursive: bool,
    ) -> Result<Vec<String>, ProcessError> {
        Ok(self.source.list(path, excluded, recursive)?)
    }

    /// Unrendered assets under `path`, for callers that template elsewhere.
    pub fn assets(
        &self,
        path: &str,
        excluded: &[String],
        recursive: bool,
    ) -> Result<Vec<Asset>, ProcessError> {
        Ok(self.source.read_all(path, excluded, recursive)?)
    }

    /// Rendered documents across every asset under `path`, flattened in
    /// source order. NOT sorted — for raw-YAML callers that do not need
    /// structured ordering.
    pub fn rendered_documents<V: Serialize>(
        &self,
        path: &str,
        excluded: &[String],
        recursive: bool,
        values: &V,
    ) -> Result<Vec<String>, ProcessError> {
        Ok(self
            .rendered_per_asset(path, excluded, recursive, values)?
            .into_iter()
            .flat_map(|(_, documents)| documents)
            .collect())
    }

    /// Decoded resources under `path` in apply order — the primary entry
    /// point for sequential application.
    pub fn structured_ordered<V: Serialize>(
        &self,
        path: &str,
        excluded: &[String],
        recursive: bool,
        values: &V,
    ) -> Result<Vec<Resource>, ProcessError> {
        let mut resources = Vec::new();
        for (asset, documents) in self.rendered_per_asset(path, excluded, recursive, values)? {
            decode_into(&mut resources, &asset, &documents)?;
        }
        sort_for_apply(&mut resources, &self.options.kinds_order);
        Ok(resources)
    }

    /// Render one named asset against `values`.
    ///
    /// Helper fragments from the asset's own directory are registered
    /// first, so single-asset rendering sees the same helpers a full
    /// directory pass would.
    pub fn render_asset<V: Serialize>(
        &self,
        name: &str,
        values: &V,
    ) -> Result<String, ProcessError> {
        let asset = self.source.read(name)?;
        let parent = name.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        let helpers = self.helper_fragments(parent)?;
        let mut engine = TemplateEngine::new(&helpers)?;
        let context = TemplateEngine::context_from(values)?;
        Ok(engine.render(&asset.name, &asset.content, &context)?)
    }

    /// The full pipeline over an explicit blob instead of discovered
    /// assets, with a per-call delimiter override. Returns resources in
    /// apply order.
    pub fn render_blob<V: Serialize>(
        &self,
        content: &str,
        values: &V,
        delimiter: &str,
    ) -> Result<Vec<Resource>, ProcessError> {
        let mut engine = TemplateEngine::new(&[])?;
        let context = TemplateEngine::context_from(values)?;
        let rendered = engine.render(BLOB_ASSET, content, &context)?;
        let mut resources = Vec::new();
        decode_into(&mut resources, BLOB_ASSET, &split_documents(&rendered, delimiter))?;
        sort_for_apply(&mut resources, &self.options.kinds_order);
        Ok(resources)
    }

    /// Render and split every primary asset under `path`, keeping the
    /// owning asset name for error context.
    fn rendered_per_asset<V: Serialize>(
        &self,
        path: &str,
        excluded: &[String],
        recursive: bool,
        values: &V,
    ) -> Result<Vec<(String, Vec<String>)>, ProcessError> {
        let assets = self.source.read_all(path, excluded, recursive)?;
        let (helpers, primaries): (Vec<Asset>, Vec<Asset>) =
            assets.into_iter().partition(|a| is_helper_asset(&a.name));
        let fragments: Vec<(String, String)> =
            helpers.into_iter().map(|a| (a.name, a.content)).collect();
        tracing::debug!(
            "rendering {} asset(s) with {} helper fragment(s) under `{path}`",
            primaries.len(),
            fragments.len()
        );

        let mut engine = TemplateEngine::new(&fragments)?;
        let context = TemplateEngine::context_from(values)?;
        let mut rendered = Vec::with_capacity(primaries.len());
        for asset in primaries {
            let output = engine.render(&asset.name, &asset.content, &context)?;
            let documents = split_documents(&output, &self.options.delimiter);
            tracing::debug!("asset `{}`: {} document(s)", asset.name, documents.len());
            rendered.push((asset.name, documents));
        }
        Ok(rendered)
    }

    /// Helper fragments in `dir` (non-recursive), by name convention.
    fn helper_fragments(&self, dir: &str) -> Result<Vec<(String, String)>, ProcessError> {
        Ok(self
            .source
            .read_all(dir, &[], false)?
            .into_iter()
            .filter(|a| is_helper_asset(&a.name))
            .map(|a| (a.name, a.content))
            .collect())
    }
}

/// Decode each document of one asset, aborting on the first failure.
fn decode_into(
    resources: &mut Vec<Resource>,
    asset: &str,
    documents: &[String],
) -> Result<(), ProcessError> {
    for (index, document) in documents.iter().enumerate() {
        let resource = Resource::from_yaml(document).map_err(|source| ProcessError::Decode {
            asset: asset.to_string(),
            index,
            source,
        })?;
        resources.push(resource);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
