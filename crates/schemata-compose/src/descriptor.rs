//! # Type Descriptor Providers
//!
//! The only seam through which the engine learns about a property it was
//! not told about explicitly. Given a type definition and a property
//! name, a provider reports the property's [`PrimitiveKind`].
//!
//! Declarations that pass an explicit kind never consult the provider.
//! Declarations that omit it ask the registry's provider and fail with
//! `MetadataUnavailable` when it cannot answer.

use std::collections::HashMap;

use schemata_core::{PrimitiveKind, TypeDef};

/// Reports the kind of a declared property.
pub trait TypeDescriptor: Send + Sync {
    /// Describe `property` on `type_def`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the kind is unknown. The
    /// registry attaches the type and property name before surfacing it.
    fn describe_property_kind(
        &self,
        type_def: &TypeDef,
        property: &str,
    ) -> Result<PrimitiveKind, String>;
}

impl<F> TypeDescriptor for F
where
    F: Fn(&TypeDef, &str) -> Result<PrimitiveKind, String> + Send + Sync,
{
    fn describe_property_kind(
        &self,
        type_def: &TypeDef,
        property: &str,
    ) -> Result<PrimitiveKind, String> {
        self(type_def, property)
    }
}

/// Provider that knows nothing. Every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDescriptors;

impl TypeDescriptor for NoDescriptors {
    fn describe_property_kind(
        &self,
        _type_def: &TypeDef,
        _property: &str,
    ) -> Result<PrimitiveKind, String> {
        Err("no type descriptor provider configured".to_string())
    }
}

/// Provider backed by a static table of `(type, property) -> kind`.
#[derive(Debug, Clone, Default)]
pub struct StaticDescriptors {
    kinds: HashMap<TypeDef, HashMap<String, PrimitiveKind>>,
}

impl StaticDescriptors {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the kind of `property` on `type_def`.
    pub fn insert(&mut self, type_def: &TypeDef, property: &str, kind: PrimitiveKind) {
        self.kinds
            .entry(type_def.clone())
            .or_default()
            .insert(property.to_string(), kind);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, type_def: &TypeDef, property: &str, kind: PrimitiveKind) -> Self {
        self.insert(type_def, property, kind);
        self
    }
}

impl TypeDescriptor for StaticDescriptors {
    fn describe_property_kind(
        &self,
        type_def: &TypeDef,
        property: &str,
    ) -> Result<PrimitiveKind, String> {
        self.kinds
            .get(type_def)
            .and_then(|props| props.get(property))
            .copied()
            .ok_or_else(|| format!("no descriptor recorded for property '{property}'"))
    }
}
