//! # schemata-compose — Schema Composition Engine
//!
//! Builds JSON Schema (draft-4 vocabulary) documents from per-type
//! declarations. Each declared type owns one [`SchemaEntry`] in a
//! [`Registry`]; property declarations write fragments into it, and a
//! root declaration promotes it to a standalone document.
//!
//! ## Entry Lifecycle
//!
//! ```text
//!   (absent) ──declare_*──▶ object entry ──declare_root──▶ root entry
//!       │                        ▲
//!       └──declare_leaf──▶ leaf ─┘ (upgraded on first property write)
//! ```
//!
//! ## Declaration Layer (`declare`, `builder`)
//!
//! One method per declaration kind: primitive properties, references,
//! arrays, enumerations, constants, maps (`additionalProperties`) and
//! unions. [`TypeBuilder`] chains them in call order, so the wrapping
//! order of modifiers is exactly the order they are written.
//!
//! ## Resolution (`resolver`, `combinator`)
//!
//! [`Registry::resolve`] returns a detached copy of a type's schema.
//! A type is resolvable when it is a root, a leaf, or carries at least
//! one property; anything else fails with
//! [`SchemaError::NotASchema`](schemata_core::SchemaError::NotASchema).
//!
//! ## Inheritance (`store`)
//!
//! A root declared with a parent copies the parent's properties and
//! required list, then layers its own on top: the child wins on
//! property-name conflicts and the parent's required names come first.
//!
//! ## Manifests (`manifest`)
//!
//! Declarations can also be replayed from a YAML document. This is what
//! the `schemata` CLI loads.
//!
//! ## Crate Policy
//!
//! - Depends only on `schemata-core` internally.
//! - Fallible declarations leave the registry untouched on error.
//! - Resolved fragments never alias stored ones.

pub mod builder;
pub mod combinator;
pub mod config;
pub mod declare;
pub mod descriptor;
pub mod entry;
pub mod manifest;
pub mod modifier;
pub mod resolver;
pub mod store;

pub use builder::TypeBuilder;
pub use combinator::UnionMember;
pub use config::{DateTimeMarker, RegistryConfig};
pub use descriptor::{NoDescriptors, StaticDescriptors, TypeDescriptor};
pub use entry::{ObjectBody, RootMeta, SchemaEntry};
pub use manifest::{
    ArrayManifest, Manifest, ManifestError, ManifestResult, PropertyManifest, TypeManifest,
};
pub use modifier::{ArrayOptions, FieldOptions, PropOptions, ValueOptions};
pub use resolver::TypeRef;
pub use store::{Registry, RootOptions, BUILTIN_EMPTY, BUILTIN_NULL};
