//! # Reference Resolver
//!
//! Turns a [`TypeRef`] into a detached fragment. Primitive markers go
//! straight through the primitive mapper; type definitions are looked up
//! in the registry and copied.
//!
//! ## Invariant
//!
//! Every successful resolution returns a value that shares nothing with
//! the registry. A fragment embedded into another schema can never be
//! changed by later declarations against the source type.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use schemata_core::{Fragment, PrimitiveKind, SchemaError, SchemaResult, TypeDef};

use crate::store::Registry;

/// Something a property can refer to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A declared type definition.
    Type(TypeDef),
    /// The primitive string marker.
    String,
    /// The primitive number marker.
    Number,
    /// The primitive boolean marker.
    Boolean,
    /// The null marker.
    Null,
}

impl TypeRef {
    /// The primitive kind behind a string, number or boolean marker.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::String => Some(PrimitiveKind::String),
            Self::Number => Some(PrimitiveKind::Number),
            Self::Boolean => Some(PrimitiveKind::Boolean),
            Self::Type(_) | Self::Null => None,
        }
    }

    /// Whether this is a primitive or null marker.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Type(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(t) => write!(f, "{t}"),
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = SchemaError;

    /// `string`, `number`, `boolean` and `null` parse to markers; anything
    /// else is a type name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "null" => Ok(Self::Null),
            name => TypeDef::new(name).map(Self::Type),
        }
    }
}

impl From<TypeDef> for TypeRef {
    fn from(t: TypeDef) -> Self {
        Self::Type(t)
    }
}

impl From<&TypeDef> for TypeRef {
    fn from(t: &TypeDef) -> Self {
        Self::Type(t.clone())
    }
}

impl From<&TypeRef> for TypeRef {
    fn from(r: &TypeRef) -> Self {
        r.clone()
    }
}

impl Registry {
    /// Resolve `target` to a detached fragment.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotASchema`] if `target` is a type definition
    /// without a resolvable entry.
    pub fn resolve(&self, target: &TypeRef) -> SchemaResult<Fragment> {
        let fragment = match target {
            TypeRef::Null => Fragment::null(),
            TypeRef::String => self.mapper().map(PrimitiveKind::String, None)?,
            TypeRef::Number => self.mapper().map(PrimitiveKind::Number, None)?,
            TypeRef::Boolean => self.mapper().map(PrimitiveKind::Boolean, None)?,
            TypeRef::Type(type_def) => match self.entry(type_def) {
                Some(entry) if entry.is_resolvable() => entry.to_fragment(),
                _ => return Err(SchemaError::not_a_schema(type_def)),
            },
        };
        tracing::trace!(reference = %target, "resolved reference");
        Ok(fragment)
    }

    /// Resolve `target` wrapped as `{type: "array", items: ..}`.
    pub fn resolve_as_array_items(&self, target: &TypeRef) -> SchemaResult<Fragment> {
        self.resolve(target).map(Fragment::array_of)
    }

    /// Materialize `target` as a standalone, JSON-serializable document.
    ///
    /// This is the read entry point of the engine. The returned value is
    /// independent of the registry and of every other call's result.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotASchema`] if `target` has no entry.
    pub fn materialize<R: Into<TypeRef>>(&self, target: R) -> SchemaResult<Value> {
        self.resolve(&target.into()).map(Fragment::into_value)
    }
}
