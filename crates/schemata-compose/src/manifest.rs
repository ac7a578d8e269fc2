//! # Declaration Manifests
//!
//! A manifest is a YAML (or JSON) document listing type declarations in
//! the order they must run. Loading it replays each declaration through
//! the declaration layer, so every engine error surfaces unchanged.
//!
//! ```yaml
//! config:
//!   date_time_marker: null
//! types:
//!   - name: Address
//!     properties:
//!       - name: city
//!         kind: string
//!   - name: Person
//!     parent: Named
//!     schema:
//!       additionalProperties: false
//!     properties:
//!       - name: born
//!         kind: date
//!         required: false
//!       - name: home
//!         ref: Address
//!         nullable: true
//!       - name: tags
//!         kind: string
//!         array: { min_items: 1, unique_items: true }
//!       - name: pet
//!         one_of: [Cat, Dog]
//! ```
//!
//! Each property names exactly one base: `kind`, `ref`, `enum`, `const`,
//! `additional_properties`, `additional_properties_array`, `one_of`,
//! `any_of` or `all_of`. A property with no base at all is declared
//! through the registry's type descriptor. An `array` block wraps the
//! base after it is written; on its own it wraps the property as an
//! earlier entry declared it. `schema` extends `kind` and inferred
//! properties only, and `default` belongs to `enum` and `const`.
//!
//! Types are promoted to roots unless `root: false` is given.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use schemata_core::{Combinator, PrimitiveKind, SchemaError, TypeDef};

use crate::combinator::UnionMember;
use crate::config::RegistryConfig;
use crate::modifier::{ArrayOptions, FieldOptions, PropOptions, ValueOptions};
use crate::resolver::TypeRef;
use crate::store::{Registry, RootOptions};

/// Error loading or applying a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The document is not valid YAML/JSON or does not match the format.
    #[error("manifest parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A property declaration is malformed.
    #[error("invalid declaration for {type_name}::{property}: {reason}")]
    InvalidProperty {
        /// Declaring type.
        type_name: String,
        /// Offending property.
        property: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The manifest file could not be read.
    #[error("io error reading {path}: {source}")]
    Io {
        /// Manifest path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A declaration was rejected by the engine.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Array modifier parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayManifest {
    /// `minItems`.
    pub min_items: Option<u64>,
    /// `maxItems`.
    pub max_items: Option<u64>,
    /// `uniqueItems`.
    pub unique_items: Option<bool>,
    /// Accept `null` instead of an array.
    pub nullable: bool,
}

impl From<&ArrayManifest> for ArrayOptions {
    fn from(m: &ArrayManifest) -> Self {
        Self {
            min_items: m.min_items,
            max_items: m.max_items,
            unique_items: m.unique_items,
            nullable: m.nullable,
        }
    }
}

/// One property declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyManifest {
    /// Property name.
    pub name: String,
    /// Primitive kind (`number`, `string`, `boolean`, `date`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Referenced type name or primitive marker.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Enumerated values.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    /// Constant value.
    #[serde(default, rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<Value>,
    /// Map value type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<String>,
    /// Map value type, arrays for primitives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties_array: Option<String>,
    /// `oneOf` members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,
    /// `anyOf` members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<String>>,
    /// `allOf` members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<String>>,
    /// Presence (default `true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Accept `null`.
    #[serde(default)]
    pub nullable: bool,
    /// `default` keyword for enumerations and constants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Constraint keywords for primitive kinds.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub schema: Map<String, Value>,
    /// Array wrapping applied after the base declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array: Option<ArrayManifest>,
}

/// One type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeManifest {
    /// Type name.
    pub name: TypeDef,
    /// Parent type to inherit from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<TypeDef>,
    /// Root `title`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Root `description`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extra root keywords.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub schema: Map<String, Value>,
    /// Promote to a root after the properties (default `true`).
    #[serde(default = "default_true")]
    pub root: bool,
    /// Property declarations, in order.
    #[serde(default)]
    pub properties: Vec<PropertyManifest>,
}

fn default_true() -> bool {
    true
}

/// A complete declaration manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Registry configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<RegistryConfig>,
    /// Type declarations, in dependency order.
    #[serde(default)]
    pub types: Vec<TypeManifest>,
}

impl Manifest {
    /// Parse a manifest from YAML (JSON is accepted as a YAML subset).
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] on malformed input.
    pub fn from_yaml_str(source: &str) -> ManifestResult<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Read and parse a manifest file.
    pub fn from_path(path: impl AsRef<Path>) -> ManifestResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// A fresh registry configured by this manifest, with built-ins.
    pub fn registry(&self) -> Registry {
        Registry::with_config(self.config.clone().unwrap_or_default()).with_builtins()
    }

    /// Replay every declaration into `registry`.
    ///
    /// Returns the declared types in manifest order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing declaration.
    pub fn apply(&self, registry: &mut Registry) -> ManifestResult<Vec<TypeDef>> {
        let mut declared = Vec::with_capacity(self.types.len());
        for ty in &self.types {
            for prop in &ty.properties {
                apply_property(registry, &ty.name, prop)?;
            }
            if ty.root {
                registry.declare_root(
                    &ty.name,
                    RootOptions {
                        title: ty.title.clone(),
                        description: ty.description.clone(),
                        parent: ty.parent.clone(),
                        extra: ty.schema.clone(),
                    },
                );
            }
            tracing::debug!(
                type_name = %ty.name,
                properties = ty.properties.len(),
                "applied manifest type"
            );
            declared.push(ty.name.clone());
        }
        Ok(declared)
    }

    /// Parse, build a registry, and apply in one step.
    pub fn load(source: &str) -> ManifestResult<(Registry, Vec<TypeDef>)> {
        let manifest = Self::from_yaml_str(source)?;
        let mut registry = manifest.registry();
        let declared = manifest.apply(&mut registry)?;
        Ok((registry, declared))
    }
}

fn apply_property(registry: &mut Registry, type_def: &TypeDef, prop: &PropertyManifest) -> ManifestResult<()> {
    let invalid = |reason: String| ManifestError::InvalidProperty {
        type_name: type_def.to_string(),
        property: prop.name.clone(),
        reason,
    };

    let bases = [
        prop.kind.is_some(),
        prop.reference.is_some(),
        prop.values.is_some(),
        prop.constant.is_some(),
        prop.additional_properties.is_some(),
        prop.additional_properties_array.is_some(),
        prop.one_of.is_some(),
        prop.any_of.is_some(),
        prop.all_of.is_some(),
    ]
    .iter()
    .filter(|b| **b)
    .count();
    if bases > 1 {
        return Err(invalid(format!("{bases} base declarations given; expected at most one")));
    }
    if bases == 1 && prop.kind.is_none() && !prop.schema.is_empty() {
        return Err(invalid(
            "`schema` only applies to `kind` or descriptor-inferred properties".to_string(),
        ));
    }
    if prop.default.is_some() && prop.values.is_none() && prop.constant.is_none() {
        return Err(invalid("`default` only applies to `enum` or `const`".to_string()));
    }
    // With no base, a bare `array` block wraps the property as declared by
    // an earlier entry; anything else declares it from the type descriptor.
    let wraps_earlier = bases == 0
        && prop.array.is_some()
        && prop.schema.is_empty()
        && prop.required.is_none()
        && !prop.nullable;

    let required = prop.required.unwrap_or(true);
    let field = FieldOptions {
        required,
        nullable: prop.nullable,
    };
    let values = ValueOptions {
        field,
        default: prop.default.clone(),
    };
    let name = prop.name.as_str();

    if let Some(kind) = &prop.kind {
        let kind: PrimitiveKind = kind.parse()?;
        let options = PropOptions {
            required,
            nullable: prop.nullable,
            schema: prop.schema.clone(),
        };
        registry.declare_property(type_def, name, Some(kind), options)?;
    } else if let Some(target) = &prop.reference {
        registry.declare_reference(type_def, name, &target.parse()?, field)?;
    } else if let Some(enumerated) = &prop.values {
        registry.declare_enum(type_def, name, enumerated, values)?;
    } else if let Some(constant) = &prop.constant {
        registry.declare_const(type_def, name, constant, values)?;
    } else if let Some(target) = &prop.additional_properties {
        registry.declare_additional_properties(type_def, name, &target.parse()?, field)?;
    } else if let Some(target) = &prop.additional_properties_array {
        registry.declare_additional_properties_array(type_def, name, &target.parse()?, field)?;
    } else if let Some((kind, members)) = union_of(prop) {
        let members = members
            .iter()
            .map(|m| m.parse::<TypeRef>().map(UnionMember::Ref))
            .collect::<Result<Vec<_>, _>>()?;
        registry.declare_union(type_def, name, kind, &members, field)?;
    } else if !wraps_earlier {
        let options = PropOptions {
            required,
            nullable: prop.nullable,
            schema: prop.schema.clone(),
        };
        registry.declare_property(type_def, name, None, options)?;
    }

    if let Some(array) = &prop.array {
        registry.declare_array(type_def, name, array.into())?;
    }
    Ok(())
}

fn union_of(prop: &PropertyManifest) -> Option<(Combinator, &Vec<String>)> {
    prop.one_of
        .as_ref()
        .map(|m| (Combinator::OneOf, m))
        .or_else(|| prop.any_of.as_ref().map(|m| (Combinator::AnyOf, m)))
        .or_else(|| prop.all_of.as_ref().map(|m| (Combinator::AllOf, m)))
}
