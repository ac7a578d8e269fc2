//! # schemata-core — Foundational Types for Schema Composition
//!
//! This crate is the leaf of the schemata workspace. It defines the
//! vocabulary every other crate speaks: the handle that names a declared
//! shape, the primitive kinds a property can carry, the leaf fragments
//! those kinds map to, and the error taxonomy of the composition engine.
//!
//! ## Key Design Principles
//!
//! 1. **Nominal type handles.** A [`TypeDef`] is a validated newtype over
//!    the declared name. Registries key their entries by it; nothing
//!    else identifies a shape.
//!
//! 2. **Explicit primitive kinds.** [`PrimitiveKind`] is a closed enum.
//!    Callers pass it at the declaration site instead of relying on
//!    runtime reflection.
//!
//! 3. **Fragments are values.** [`Fragment`] wraps a `serde_json::Value`
//!    and is cloned on every read, so a fragment embedded in one schema
//!    can never observe later mutation of another.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `schemata-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod fragment;
pub mod identity;
pub mod kind;

// Re-export primary types for ergonomic imports.
pub use error::{SchemaError, SchemaResult};
pub use fragment::{Combinator, Fragment};
pub use identity::TypeDef;
pub use kind::{map_primitive, PrimitiveKind, PrimitiveMapper};
