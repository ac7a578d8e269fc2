//! # Error Types — Composition Engine Failures
//!
//! Every failure the engine can produce is a hard failure at declaration
//! or materialization time. There is no retry: the engine is synchronous
//! and deterministic, so re-running the same input yields the same error.
//!
//! ## Design
//!
//! - Each variant carries the type name and property name it concerns.
//! - `UnsupportedKind` and `AmbiguousArrayType` are programmer errors.
//! - `NotASchema` is never recovered silently: returning an empty schema
//!   would corrupt downstream validation.

use thiserror::Error;

/// Convenience alias for results produced by the composition engine.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Top-level error type for schema composition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A reference or materialization target has no schema entry.
    #[error("{reference}: not a schema type")]
    NotASchema {
        /// Rendered form of the reference that failed to resolve.
        reference: String,
    },

    /// The reflected kind of a property was `array` but no element kind
    /// was supplied at the declaration site.
    #[error(
        "in {type_name}::{property} unable to recognize type array; \
         declare the property with an explicit element kind"
    )]
    AmbiguousArrayType {
        /// Declaring type.
        type_name: String,
        /// Property being declared.
        property: String,
    },

    /// An array modifier ran before any base fragment was written.
    #[error("array modifier on {type_name}::{property} must follow a property or reference declaration")]
    MissingBaseFragment {
        /// Declaring type.
        type_name: String,
        /// Property being wrapped.
        property: String,
    },

    /// The type descriptor provider could not answer for a property.
    #[error("unable to retrieve metadata for {type_name}::{property}: {reason}")]
    MetadataUnavailable {
        /// Declaring type.
        type_name: String,
        /// Property whose kind was requested.
        property: String,
        /// Provider-supplied reason.
        reason: String,
    },

    /// The primitive mapper was given a kind it cannot map to a leaf.
    #[error("unsupported primitive kind: {kind}")]
    UnsupportedKind {
        /// Name of the rejected kind.
        kind: String,
    },

    /// A type definition handle was constructed from an invalid name.
    #[error("invalid type name {name:?}: {reason}")]
    InvalidTypeName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },
}

impl SchemaError {
    /// Build a [`SchemaError::NotASchema`] for any displayable reference.
    pub fn not_a_schema(reference: impl std::fmt::Display) -> Self {
        Self::NotASchema {
            reference: reference.to_string(),
        }
    }
}
