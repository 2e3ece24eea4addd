//! # capstan-core
//!
//! Generic manifest resources and apply ordering.
//!
//! [`Resource`] is one decoded YAML document behind typed accessors;
//! [`sort_for_apply`] arranges a collection of them into a deterministic
//! apply sequence driven by a kind-priority list.
//!
//! ## Usage
//!
//! ```rust
//! use capstan_core::{default_kinds_order, sort_for_apply, Resource};
//!
//! let doc = "apiVersion: v1\nkind: ServiceAccount\nmetadata:\n  name: agent\n";
//! let mut resources = vec![Resource::from_yaml(doc).unwrap()];
//! sort_for_apply(&mut resources, &default_kinds_order());
//! assert_eq!(resources[0].kind().unwrap(), "ServiceAccount");
//! ```

pub mod error;
pub mod order;
pub mod resource;

pub use error::ResourceError;
pub use order::{default_kinds_order, kind_rank, sort_for_apply, DEFAULT_KINDS_ORDER};
pub use resource::Resource;
