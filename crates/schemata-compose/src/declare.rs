//! # Declaration Layer
//!
//! The attachment API. Each `declare_*` call computes a fragment for one
//! property of one type and stores it in that type's entry:
//!
//! ```text
//! Undeclared ──declare_property / declare_reference──▶ base fragment
//!                                                           │
//!                          declare_array (0..n times) ◀─────┘
//!                                                           ▼
//!                                                  fragment in entry
//! ```
//!
//! Enumerations, constants, maps and unions write a fragment directly;
//! an array modifier may wrap any of them afterwards.
//!
//! ## Ordering
//!
//! Calls run in the order they are made. The array modifier wraps the
//! fragment written by an earlier call for the same property and fails
//! with `MissingBaseFragment` if there is none.
//!
//! ## Failure atomicity
//!
//! Every fallible step (descriptor lookup, mapping, resolution) runs
//! before the store is touched, so a failed declaration leaves no entry
//! behind.

use serde_json::Value;

use schemata_core::{Combinator, Fragment, PrimitiveKind, SchemaError, SchemaResult, TypeDef};

use crate::combinator::UnionMember;
use crate::modifier::{
    as_additional_properties, as_array, as_const, as_enum, as_union, nullable_if, ArrayOptions,
    FieldOptions, PropOptions, ValueOptions,
};
use crate::resolver::TypeRef;
use crate::store::Registry;

impl Registry {
    /// Declare a primitive-kinded property.
    ///
    /// With `kind = None` the registry's type descriptor is asked for the
    /// kind. A reported `Array` kind is rejected: array properties need an
    /// explicit element kind, wrapped afterwards with
    /// [`declare_array`](Self::declare_array).
    ///
    /// # Errors
    ///
    /// - [`SchemaError::MetadataUnavailable`] if the descriptor cannot answer.
    /// - [`SchemaError::AmbiguousArrayType`] if it answers `Array`.
    /// - [`SchemaError::UnsupportedKind`] for kinds without a leaf form.
    pub fn declare_property(
        &mut self,
        type_def: &TypeDef,
        name: &str,
        kind: Option<PrimitiveKind>,
        options: PropOptions,
    ) -> SchemaResult<()> {
        let kind = match kind {
            Some(kind) => kind,
            None => self.describe_property_kind(type_def, name)?,
        };
        let overrides = (!options.schema.is_empty()).then_some(&options.schema);
        let fragment = self.mapper().map(kind, overrides)?;
        let fragment = nullable_if(fragment, options.nullable);
        self.write_property(type_def, name, fragment, options.required);
        Ok(())
    }

    /// Ask the type descriptor for the kind of `name`.
    ///
    /// # Errors
    ///
    /// See [`declare_property`](Self::declare_property).
    pub fn describe_property_kind(&self, type_def: &TypeDef, name: &str) -> SchemaResult<PrimitiveKind> {
        let kind = self
            .descriptor()
            .describe_property_kind(type_def, name)
            .map_err(|reason| SchemaError::MetadataUnavailable {
                type_name: type_def.to_string(),
                property: name.to_string(),
                reason,
            })?;
        if kind == PrimitiveKind::Array {
            return Err(SchemaError::AmbiguousArrayType {
                type_name: type_def.to_string(),
                property: name.to_string(),
            });
        }
        Ok(kind)
    }

    /// Declare a property as an embedded copy of `target`.
    ///
    /// The target is resolved immediately; later changes to it are not
    /// reflected in this property.
    pub fn declare_reference(
        &mut self,
        type_def: &TypeDef,
        name: &str,
        target: &TypeRef,
        options: FieldOptions,
    ) -> SchemaResult<()> {
        let fragment = nullable_if(self.resolve(target)?, options.nullable);
        self.write_property(type_def, name, fragment, options.required);
        Ok(())
    }

    /// Wrap the property's current fragment as an array.
    ///
    /// Leaves the `required` set untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingBaseFragment`] if no earlier
    /// declaration wrote a fragment for `name`.
    pub fn declare_array(
        &mut self,
        type_def: &TypeDef,
        name: &str,
        options: ArrayOptions,
    ) -> SchemaResult<()> {
        let prev = self
            .entry(type_def)
            .and_then(|e| e.property(name))
            .cloned()
            .ok_or_else(|| SchemaError::MissingBaseFragment {
                type_name: type_def.to_string(),
                property: name.to_string(),
            })?;
        let fragment = as_array(prev, &options);
        self.get_or_create_entry(type_def)
            .object_body_mut()
            .set_property(name, fragment);
        tracing::debug!(type_name = %type_def, property = name, "wrapped property as array");
        Ok(())
    }

    /// Restrict a property to a fixed set of values.
    pub fn declare_enum(
        &mut self,
        type_def: &TypeDef,
        name: &str,
        values: &[Value],
        options: ValueOptions,
    ) -> SchemaResult<()> {
        let fragment = as_enum(values, &options, self.config().infer_value_type);
        self.write_property(type_def, name, fragment, options.field.required);
        Ok(())
    }

    /// Pin a property to a single value.
    pub fn declare_const(
        &mut self,
        type_def: &TypeDef,
        name: &str,
        value: &Value,
        options: ValueOptions,
    ) -> SchemaResult<()> {
        let fragment = as_const(value, &options, self.config().infer_value_type);
        self.write_property(type_def, name, fragment, options.field.required);
        Ok(())
    }

    /// Declare a property as a string-keyed map whose values are `target`.
    ///
    /// Primitive targets map to their leaf; type targets embed a copy of
    /// the type's schema (as an object).
    pub fn declare_additional_properties(
        &mut self,
        type_def: &TypeDef,
        name: &str,
        target: &TypeRef,
        options: FieldOptions,
    ) -> SchemaResult<()> {
        let value_schema = self.map_value_schema(target)?;
        let fragment = nullable_if(as_additional_properties(value_schema), options.nullable);
        self.write_property(type_def, name, fragment, options.required);
        Ok(())
    }

    /// Like [`declare_additional_properties`](Self::declare_additional_properties),
    /// but primitive targets become arrays of that primitive.
    pub fn declare_additional_properties_array(
        &mut self,
        type_def: &TypeDef,
        name: &str,
        target: &TypeRef,
        options: FieldOptions,
    ) -> SchemaResult<()> {
        let value_schema = if target.is_primitive() {
            Fragment::array_of(self.resolve(target)?)
        } else {
            self.map_value_schema(target)?
        };
        let fragment = nullable_if(as_additional_properties(value_schema), options.nullable);
        self.write_property(type_def, name, fragment, options.required);
        Ok(())
    }

    /// Declare a property as a `oneOf` / `anyOf` / `allOf` of `members`.
    pub fn declare_union(
        &mut self,
        type_def: &TypeDef,
        name: &str,
        kind: Combinator,
        members: &[UnionMember],
        options: FieldOptions,
    ) -> SchemaResult<()> {
        let resolved = self.resolve_members(members)?;
        let fragment = as_union(kind, resolved, options.nullable);
        self.write_property(type_def, name, fragment, options.required);
        Ok(())
    }

    /// Value schema of a map: primitive leaf, or `{type: "object", ..copy}`.
    fn map_value_schema(&self, target: &TypeRef) -> SchemaResult<Fragment> {
        let resolved = self.resolve(target)?;
        if target.is_primitive() {
            return Ok(resolved);
        }
        let mut object = Fragment::leaf("object");
        if let Some(map) = resolved.as_object() {
            object = object.with_overrides(map);
        }
        Ok(object)
    }

    fn write_property(&mut self, type_def: &TypeDef, name: &str, fragment: Fragment, required: bool) {
        let body = self.get_or_create_entry(type_def).object_body_mut();
        body.set_property(name, fragment);
        if required {
            body.require(name);
        }
        tracing::debug!(type_name = %type_def, property = name, required, "declared property");
    }
}
