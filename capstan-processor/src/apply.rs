//! Apply sink — the seam between processing and whatever applies.
//!
//! The pipeline ends at [`ResourceSink`]: ordered resources are handed
//! over one at a time and the first failure aborts the run, because a
//! partially-applied manifest set leaves the target in an unsafe state.
//! Cluster semantics live entirely behind the sink; this crate only
//! guarantees delivery order and fail-fast behavior.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use capstan_core::Resource;

use crate::error::ProcessError;
use crate::processor::TemplateProcessor;
use crate::split::DEFAULT_DELIMITER;

/// Receiver for resources in apply order.
pub trait ResourceSink {
    /// Deliver one resource. An error aborts the surrounding run.
    fn apply(&mut self, resource: &Resource) -> Result<(), SinkError>;
}

/// Failure reported by a sink for one resource.
#[derive(Debug, Error)]
#[error("sink rejected {kind}/{name}: {message}")]
pub struct SinkError {
    pub kind: String,
    pub name: String,
    pub message: String,
}

impl SinkError {
    pub fn new(resource: &Resource, message: impl Into<String>) -> Self {
        SinkError {
            kind: resource.kind().unwrap_or("<unknown>").to_string(),
            name: resource.name().unwrap_or("<unnamed>").to_string(),
            message: message.into(),
        }
    }
}

/// All errors that can arise from an apply run.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The processing pipeline failed before anything reached the sink.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The sink rejected a resource; earlier resources were delivered.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Identification record for one delivered resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedResource {
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
}

impl AppliedResource {
    fn from_resource(resource: &Resource) -> Self {
        AppliedResource {
            kind: resource.kind().unwrap_or("<unknown>").to_string(),
            name: resource.name().unwrap_or("<unnamed>").to_string(),
            namespace: resource.namespace().map(str::to_string),
        }
    }
}

/// Drives processor output into a sink in apply order.
pub struct Applier<'a, S: ResourceSink> {
    processor: &'a TemplateProcessor,
    sink: S,
}

impl<'a, S: ResourceSink> Applier<'a, S> {
    pub fn new(processor: &'a TemplateProcessor, sink: S) -> Self {
        Applier { processor, sink }
    }

    /// Render, order, and deliver everything under `path`.
    pub fn apply_path<V: Serialize>(
        &mut self,
        path: &str,
        excluded: &[String],
        recursive: bool,
        values: &V,
    ) -> Result<Vec<AppliedResource>, ApplyError> {
        let resources = self
            .processor
            .structured_ordered(path, excluded, recursive, values)?;
        self.deliver(&resources)
    }

    /// Render, order, and deliver an explicit blob.
    pub fn apply_blob<V: Serialize>(
        &mut self,
        content: &str,
        values: &V,
        delimiter: &str,
    ) -> Result<Vec<AppliedResource>, ApplyError> {
        let resources = self.processor.render_blob(content, values, delimiter)?;
        self.deliver(&resources)
    }

    /// The sink, back — for sinks that accumulate.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn deliver(&mut self, resources: &[Resource]) -> Result<Vec<AppliedResource>, ApplyError> {
        let mut applied = Vec::with_capacity(resources.len());
        for resource in resources {
            self.sink.apply(resource)?;
            let record = AppliedResource::from_resource(resource);
            tracing::info!("applied {}/{}", record.kind, record.name);
            applied.push(record);
        }
        Ok(applied)
    }
}

// ---------------------------------------------------------------------------
// YamlStreamSink
// ---------------------------------------------------------------------------

/// Writes resources as a delimited YAML stream.
///
/// The output is pipeable to external apply tooling; documents appear in
/// exactly the order they were delivered.
pub struct YamlStreamSink<W: Write> {
    writer: W,
    delimiter: String,
    first: bool,
}

impl<W: Write> YamlStreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_delimiter(writer, DEFAULT_DELIMITER)
    }

    pub fn with_delimiter(writer: W, delimiter: &str) -> Self {
        YamlStreamSink {
            writer,
            delimiter: delimiter.to_string(),
            first: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResourceSink for YamlStreamSink<W> {
    fn apply(&mut self, resource: &Resource) -> Result<(), SinkError> {
        let yaml = resource
            .to_yaml()
            .map_err(|e| SinkError::new(resource, e.to_string()))?;
        if !self.first {
            writeln!(self.writer, "{}", self.delimiter)
                .map_err(|e| SinkError::new(resource, e.to_string()))?;
        }
        self.writer
            .write_all(yaml.as_bytes())
            .map_err(|e| SinkError::new(resource, e.to_string()))?;
        self.first = false;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::Options;
    use crate::source::StringSource;

    const MANIFESTS: &str = "\
kind: ClusterRoleBinding
metadata: {name: agent}
---
kind: ServiceAccount
metadata: {name: agent, namespace: agents}
---
kind: ClusterRole
metadata: {name: agent}
";

    fn processor() -> TemplateProcessor {
        TemplateProcessor::new(
            Box::new(StringSource::new(MANIFESTS, DEFAULT_DELIMITER)),
            Options::default(),
        )
    }

    fn no_values() -> std::collections::BTreeMap<String, String> {
        Default::default()
    }

    /// Sink that records kinds and can be armed to fail on one of them.
    #[derive(Default)]
    struct RecordingSink {
        seen: Vec<String>,
        fail_on: Option<String>,
    }

    impl ResourceSink for RecordingSink {
        fn apply(&mut self, resource: &Resource) -> Result<(), SinkError> {
            let kind = resource.kind().unwrap_or("<unknown>").to_string();
            if self.fail_on.as_deref() == Some(kind.as_str()) {
                return Err(SinkError::new(resource, "armed failure"));
            }
            self.seen.push(kind);
            Ok(())
        }
    }

    #[test]
    fn delivers_in_apply_order() {
        let processor = processor();
        let mut applier = Applier::new(&processor, RecordingSink::default());
        let applied = applier.apply_path(".", &[], false, &no_values()).unwrap();
        let kinds: Vec<&str> = applied.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, ["ServiceAccount", "ClusterRole", "ClusterRoleBinding"]);
        assert_eq!(applied[0].namespace.as_deref(), Some("agents"));
        let sink = applier.into_sink();
        assert_eq!(sink.seen, ["ServiceAccount", "ClusterRole", "ClusterRoleBinding"]);
    }

    #[test]
    fn first_sink_failure_aborts_the_run() {
        let processor = processor();
        let sink = RecordingSink {
            seen: Vec::new(),
            fail_on: Some("ClusterRole".to_string()),
        };
        let mut applier = Applier::new(&processor, sink);
        let err = applier.apply_path(".", &[], false, &no_values()).unwrap_err();
        match err {
            ApplyError::Sink(sink_err) => {
                assert_eq!(sink_err.kind, "ClusterRole");
                assert_eq!(sink_err.name, "agent");
            }
            other => panic!("expected Sink, got {other:?}"),
        }
        let sink = applier.into_sink();
        assert_eq!(sink.seen, ["ServiceAccount"], "delivery must stop at the failure");
    }

    #[test]
    fn yaml_stream_sink_writes_a_delimited_stream() {
        let processor = processor();
        let mut applier = Applier::new(&processor, YamlStreamSink::new(Vec::new()));
        applier.apply_path(".", &[], false, &no_values()).unwrap();
        let out = String::from_utf8(applier.into_sink().into_inner()).unwrap();
        let positions: Vec<usize> = ["ServiceAccount", "ClusterRole", "ClusterRoleBinding"]
            .iter()
            .map(|kind| out.find(&format!("kind: {kind}")).expect("kind present"))
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2], "stream out of order:\n{out}");
        assert_eq!(out.matches("\n---\n").count(), 2, "two separators for three documents");
    }
}
