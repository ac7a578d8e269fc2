//! # Primitive Kinds and the Primitive Mapper
//!
//! Maps a primitive kind tag plus optional constraint overrides to a leaf
//! schema fragment:
//!
//! | Kind      | Leaf fragment                                   |
//! |-----------|-------------------------------------------------|
//! | `Number`  | `{"type": "number"}`                            |
//! | `String`  | `{"type": "string"}`                            |
//! | `Boolean` | `{"type": "boolean"}`                           |
//! | `Date`    | `{"type": "string", "format": "date-time", ..}` |
//!
//! Overrides are shallow-merged on top of the leaf, so a caller may add
//! `minimum`, `pattern`, `format` and so on. For `Date` the date-time
//! format and marker are forced after the overrides are applied.
//!
//! `Object` and `Array` are kinds a type descriptor may report, but they
//! have no leaf form; mapping them is an `UnsupportedKind` error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaResult};
use crate::fragment::Fragment;

/// Kind tag of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// JSON number.
    Number,
    /// JSON string.
    String,
    /// JSON boolean.
    Boolean,
    /// ISO 8601 date-time, carried as a string.
    Date,
    /// Nested object. Reported by descriptors, never mapped to a leaf.
    Object,
    /// Array. Reported by descriptors, needs an explicit element kind.
    Array,
}

impl PrimitiveKind {
    /// Canonical name of the kind (e.g., `"Number"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::Object => "Object",
            Self::Array => "Array",
        }
    }

    /// Whether the kind maps to a leaf fragment.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Number | Self::String | Self::Boolean | Self::Date)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveKind {
    type Err = SchemaError;

    /// Parses a kind name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            "boolean" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            _ => Err(SchemaError::UnsupportedKind { kind: s.to_string() }),
        }
    }
}

/// Maps primitive kinds to leaf fragments.
///
/// The date-time format keyword and the extra date-time marker are
/// configurable; [`PrimitiveMapper::default`] produces
/// `{"format": "date-time", "datetime": "ISO8601"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveMapper {
    /// Value of the `format` keyword forced onto `Date` leaves.
    pub date_time_format: String,
    /// Extra `(key, value)` pair forced onto `Date` leaves, if any.
    pub date_time_marker: Option<(String, String)>,
}

impl Default for PrimitiveMapper {
    fn default() -> Self {
        Self {
            date_time_format: "date-time".to_string(),
            date_time_marker: Some(("datetime".to_string(), "ISO8601".to_string())),
        }
    }
}

impl PrimitiveMapper {
    /// Map a kind and optional overrides to a leaf fragment.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedKind`] for `Object` and `Array`.
    pub fn map(
        &self,
        kind: PrimitiveKind,
        overrides: Option<&Map<String, Value>>,
    ) -> SchemaResult<Fragment> {
        let type_name = match kind {
            PrimitiveKind::Number => "number",
            PrimitiveKind::String | PrimitiveKind::Date => "string",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Object | PrimitiveKind::Array => {
                return Err(SchemaError::UnsupportedKind {
                    kind: kind.to_string(),
                })
            }
        };

        let mut leaf = Fragment::leaf(type_name);
        if let Some(overrides) = overrides {
            leaf = leaf.with_overrides(overrides);
        }
        if kind == PrimitiveKind::Date {
            leaf.insert("format", Value::String(self.date_time_format.clone()));
            if let Some((key, value)) = &self.date_time_marker {
                leaf.insert(key, Value::String(value.clone()));
            }
        }
        Ok(leaf)
    }
}

/// Map a kind with the default [`PrimitiveMapper`].
pub fn map_primitive(
    kind: PrimitiveKind,
    overrides: Option<&Map<String, Value>>,
) -> SchemaResult<Fragment> {
    PrimitiveMapper::default().map(kind, overrides)
}
