//! # Type Builder
//!
//! A chained front end over the declaration layer. Calls run in the
//! order written, so the wrapping order of modifiers is the call order:
//!
//! ```
//! use schemata_compose::{ArrayOptions, PropOptions, Registry, RootOptions};
//! use schemata_core::{PrimitiveKind, TypeDef};
//!
//! # fn main() -> Result<(), schemata_core::SchemaError> {
//! let mut registry = Registry::new();
//! let basket = TypeDef::new("Basket")?;
//!
//! registry
//!     .define(&basket)
//!     .prop("owner", PrimitiveKind::String, PropOptions::default())?
//!     .prop("prices", PrimitiveKind::Number, PropOptions::optional())?
//!     .array("prices", ArrayOptions::default().min(1))?
//!     .root(RootOptions::default());
//!
//! let schema = registry.materialize(&basket)?;
//! assert_eq!(schema["required"], serde_json::json!(["owner"]));
//! assert_eq!(schema["properties"]["prices"]["minItems"], 1);
//! # Ok(())
//! # }
//! ```

use serde_json::Value;

use schemata_core::{Combinator, PrimitiveKind, SchemaResult, TypeDef};

use crate::combinator::UnionMember;
use crate::modifier::{ArrayOptions, FieldOptions, PropOptions, ValueOptions};
use crate::resolver::TypeRef;
use crate::store::{Registry, RootOptions};

/// Declares the properties of one type, then promotes it to a root.
#[derive(Debug)]
pub struct TypeBuilder<'r> {
    registry: &'r mut Registry,
    type_def: TypeDef,
}

impl Registry {
    /// Start declaring `type_def`.
    pub fn define(&mut self, type_def: &TypeDef) -> TypeBuilder<'_> {
        TypeBuilder {
            registry: self,
            type_def: type_def.clone(),
        }
    }
}

impl<'r> TypeBuilder<'r> {
    /// The type being declared.
    pub fn type_def(&self) -> &TypeDef {
        &self.type_def
    }

    /// Primitive property with an explicit kind.
    pub fn prop(self, name: &str, kind: PrimitiveKind, options: PropOptions) -> SchemaResult<Self> {
        self.registry
            .declare_property(&self.type_def, name, Some(kind), options)?;
        Ok(self)
    }

    /// Primitive property whose kind comes from the type descriptor.
    pub fn prop_inferred(self, name: &str, options: PropOptions) -> SchemaResult<Self> {
        self.registry
            .declare_property(&self.type_def, name, None, options)?;
        Ok(self)
    }

    /// Property embedding a copy of `target`.
    pub fn reference(
        self,
        name: &str,
        target: impl Into<TypeRef>,
        options: FieldOptions,
    ) -> SchemaResult<Self> {
        self.registry
            .declare_reference(&self.type_def, name, &target.into(), options)?;
        Ok(self)
    }

    /// Wrap an already declared property as an array.
    pub fn array(self, name: &str, options: ArrayOptions) -> SchemaResult<Self> {
        self.registry.declare_array(&self.type_def, name, options)?;
        Ok(self)
    }

    /// Enumerated property.
    pub fn enumeration(self, name: &str, values: &[Value], options: ValueOptions) -> SchemaResult<Self> {
        self.registry
            .declare_enum(&self.type_def, name, values, options)?;
        Ok(self)
    }

    /// Constant property.
    pub fn constant(self, name: &str, value: Value, options: ValueOptions) -> SchemaResult<Self> {
        self.registry
            .declare_const(&self.type_def, name, &value, options)?;
        Ok(self)
    }

    /// Map property with values of `target`.
    pub fn additional_properties(
        self,
        name: &str,
        target: impl Into<TypeRef>,
        options: FieldOptions,
    ) -> SchemaResult<Self> {
        self.registry
            .declare_additional_properties(&self.type_def, name, &target.into(), options)?;
        Ok(self)
    }

    /// Map property with array values for primitive targets.
    pub fn additional_properties_array(
        self,
        name: &str,
        target: impl Into<TypeRef>,
        options: FieldOptions,
    ) -> SchemaResult<Self> {
        self.registry.declare_additional_properties_array(
            &self.type_def,
            name,
            &target.into(),
            options,
        )?;
        Ok(self)
    }

    /// Union property.
    pub fn union(
        self,
        name: &str,
        kind: Combinator,
        members: &[UnionMember],
        options: FieldOptions,
    ) -> SchemaResult<Self> {
        self.registry
            .declare_union(&self.type_def, name, kind, members, options)?;
        Ok(self)
    }

    /// Promote the type to a root and return its handle.
    pub fn root(self, options: RootOptions) -> TypeDef {
        self.registry.declare_root(&self.type_def, options);
        self.type_def
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_failure_stops_chain() {
        let mut reg = Registry::new();
        let t = TypeDef::new("T").unwrap();
        let result = reg
            .define(&t)
            .prop("a", PrimitiveKind::String, PropOptions::default())
            .and_then(|b| b.array("missing", ArrayOptions::default()));
        assert!(result.is_err());
        // The successful declaration before the failure is kept.
        assert!(reg.entry(&t).unwrap().property("a").is_some());
        assert!(!reg.entry(&t).unwrap().is_root());
    }

    #[test]
    fn test_builder_union_and_const() {
        let mut reg = Registry::new();
        let t = TypeDef::new("Event").unwrap();
        reg.define(&t)
            .constant("version", json!("v2"), ValueOptions::default())
            .and_then(|b| {
                b.union(
                    "payload",
                    Combinator::AnyOf,
                    &[TypeRef::String.into(), TypeRef::Number.into()],
                    FieldOptions::optional(),
                )
            })
            .unwrap()
            .root(RootOptions::default());

        let schema = reg.materialize(&t).unwrap();
        assert_eq!(schema["required"], json!(["version"]));
        assert_eq!(
            schema["properties"]["payload"],
            json!({"anyOf": [{"type": "string"}, {"type": "number"}]})
        );
    }
}
