//! # Type Definition Handles
//!
//! A [`TypeDef`] names a declared shape. Two handles with the same name
//! refer to the same schema entry in a registry; handles carry no state
//! of their own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};

/// Nominal handle identifying a schema-bearing type definition.
///
/// The name doubles as the default `title` and `description` of the
/// type's root schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeDef(String);

impl TypeDef {
    /// Create a handle from a declared type name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidTypeName`] if the name is empty or
    /// contains whitespace.
    pub fn new(name: impl Into<String>) -> SchemaResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::InvalidTypeName {
                name,
                reason: "type name must not be empty".into(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(SchemaError::InvalidTypeName {
                name,
                reason: "type name must not contain whitespace".into(),
            });
        }
        Ok(Self(name))
    }

    /// Create a handle from a compile-time constant name.
    ///
    /// Reserved for names known to be valid (e.g., built-in schemas).
    pub fn from_static(name: &'static str) -> Self {
        debug_assert!(!name.is_empty() && !name.chars().any(char::is_whitespace));
        Self(name.to_string())
    }

    /// The declared type name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TypeDef {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TypeDef {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeDef> for String {
    fn from(value: TypeDef) -> Self {
        value.0
    }
}

impl AsRef<str> for TypeDef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
