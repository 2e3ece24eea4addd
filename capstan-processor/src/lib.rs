//! # capstan-processor
//!
//! Renders parameterized manifest templates, splits multi-document
//! output, decodes it into generic resources, and orders them for
//! sequential application.
//!
//! ## Usage
//!
//! ```rust
//! use capstan_processor::{Options, StringSource, TemplateProcessor, DEFAULT_DELIMITER};
//!
//! #[derive(serde::Serialize)]
//! struct Values {
//!     cluster: String,
//! }
//!
//! let manifests = "\
//! kind: ServiceAccount
//! metadata:
//!   name: {{ cluster }}
//! ";
//! let processor = TemplateProcessor::new(
//!     Box::new(StringSource::new(manifests, DEFAULT_DELIMITER)),
//!     Options::default(),
//! );
//! let values = Values { cluster: "edge-01".to_string() };
//! let resources = processor.structured_ordered(".", &[], false, &values).unwrap();
//! assert_eq!(resources[0].name().unwrap(), "edge-01");
//! ```

pub mod apply;
pub mod error;
pub mod processor;
pub mod source;
pub mod split;

pub use apply::{Applier, AppliedResource, ApplyError, ResourceSink, SinkError, YamlStreamSink};
pub use error::{ProcessError, SourceError};
pub use processor::{Options, TemplateProcessor};
pub use source::{Asset, AssetSource, DirSource, MemorySource, StringSource};
pub use split::{split_documents, DEFAULT_DELIMITER};
