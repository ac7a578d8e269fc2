//! # Modifier Pipeline
//!
//! Fragment-to-fragment transforms applied to a property. Each transform
//! builds a new fragment; the declaration layer stores it in place of the
//! property's previous fragment.
//!
//! | Modifier                     | Output                                                  |
//! |------------------------------|---------------------------------------------------------|
//! | [`as_array`]                 | `{type: "array", items: prev, minItems?, ..}`           |
//! | [`as_enum`]                  | `{enum: values, default?}`                              |
//! | [`as_const`]                 | `{type: "string", const: value, default?}`              |
//! | [`as_additional_properties`] | `{type: "object", additionalProperties: value_schema}`  |
//! | [`as_union`]                 | `{oneOf \| anyOf \| allOf: members}`                    |
//!
//! Nullable variants wrap the output as `{anyOf: [output, {type: "null"}]}`,
//! except an `anyOf` union, which appends `{type: "null"}` to its own
//! member list. The `type` written next to `enum` and `const` values is
//! `string` unless value-type inference is switched on.

use serde_json::{Map, Value};

use schemata_core::{Combinator, Fragment};

/// Options for a base property declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct PropOptions {
    /// Add the property to the owning entry's `required` set.
    pub required: bool,
    /// Accept `null` as well as the declared kind.
    pub nullable: bool,
    /// Constraint keywords merged on top of the leaf (`minimum`, `pattern`, ..).
    pub schema: Map<String, Value>,
}

impl Default for PropOptions {
    fn default() -> Self {
        Self {
            required: true,
            nullable: false,
            schema: Map::new(),
        }
    }
}

impl PropOptions {
    /// A property that is not required.
    pub fn optional() -> Self {
        Self {
            required: false,
            ..Self::default()
        }
    }

    /// Accept `null`.
    pub fn or_null(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Add a constraint keyword.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.schema.insert(key.into(), value);
        self
    }
}

/// `{required, nullable}` options shared by references, maps and unions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOptions {
    /// Add the property to the owning entry's `required` set.
    pub required: bool,
    /// Accept `null` as well.
    pub nullable: bool,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            required: true,
            nullable: false,
        }
    }
}

impl FieldOptions {
    /// A field that is not required.
    pub fn optional() -> Self {
        Self {
            required: false,
            nullable: false,
        }
    }

    /// Accept `null`.
    pub fn or_null(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Options for enumeration and constant modifiers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueOptions {
    /// Presence options.
    pub field: FieldOptions,
    /// `default` keyword.
    pub default: Option<Value>,
}

impl ValueOptions {
    /// A value that is not required.
    pub fn optional() -> Self {
        Self {
            field: FieldOptions::optional(),
            default: None,
        }
    }

    /// Accept `null`.
    pub fn or_null(mut self) -> Self {
        self.field.nullable = true;
        self
    }

    /// Set the `default` keyword.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Options for the array modifier.
///
/// The array modifier never changes the `required` set; presence is
/// decided by the base declaration it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayOptions {
    /// `minItems`.
    pub min_items: Option<u64>,
    /// `maxItems`.
    pub max_items: Option<u64>,
    /// `uniqueItems`.
    pub unique_items: Option<bool>,
    /// Accept `null` instead of an array.
    pub nullable: bool,
}

impl ArrayOptions {
    /// Require at least `n` items.
    pub fn min(mut self, n: u64) -> Self {
        self.min_items = Some(n);
        self
    }

    /// Allow at most `n` items.
    pub fn max(mut self, n: u64) -> Self {
        self.max_items = Some(n);
        self
    }

    /// Require unique items.
    pub fn unique(mut self) -> Self {
        self.unique_items = Some(true);
        self
    }

    /// Accept `null`.
    pub fn or_null(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Wrap `fragment` as nullable when `nullable` is set.
pub fn nullable_if(fragment: Fragment, nullable: bool) -> Fragment {
    if nullable {
        fragment.nullable()
    } else {
        fragment
    }
}

/// Wrap the previous fragment of a property as an array.
pub fn as_array(prev: Fragment, options: &ArrayOptions) -> Fragment {
    let mut array = Fragment::array_of(prev);
    if let Some(n) = options.min_items {
        array.insert("minItems", Value::from(n));
    }
    if let Some(n) = options.max_items {
        array.insert("maxItems", Value::from(n));
    }
    if let Some(unique) = options.unique_items {
        array.insert("uniqueItems", Value::Bool(unique));
    }
    nullable_if(array, options.nullable)
}

/// JSON type written next to `enum` and `const` values.
///
/// Always `string` unless `infer` asks for the values' shared JSON type,
/// which still falls back to `string` for mixed or non-scalar values.
fn value_type<'a>(mut values: impl Iterator<Item = &'a Value>, infer: bool) -> &'static str {
    if !infer {
        return "string";
    }
    let first = values.next();
    let kind = match first {
        Some(Value::Number(_)) => "number",
        Some(Value::Bool(_)) => "boolean",
        _ => return "string",
    };
    let same = values.all(|v| match kind {
        "number" => v.is_number(),
        _ => v.is_boolean(),
    });
    if same {
        kind
    } else {
        "string"
    }
}

/// Restrict a property to `values`.
///
/// The nullable form carries an explicit `type` so `null` is only
/// admitted by the second branch.
pub fn as_enum(values: &[Value], options: &ValueOptions, infer_type: bool) -> Fragment {
    let mut map = Map::new();
    if options.field.nullable {
        map.insert(
            "type".to_string(),
            Value::String(value_type(values.iter(), infer_type).to_string()),
        );
    }
    map.insert("enum".to_string(), Value::Array(values.to_vec()));
    if let Some(default) = &options.default {
        map.insert("default".to_string(), default.clone());
    }
    nullable_if(Fragment::from_value(Value::Object(map)), options.field.nullable)
}

/// Pin a property to a single `value`.
pub fn as_const(value: &Value, options: &ValueOptions, infer_type: bool) -> Fragment {
    let mut map = Map::new();
    map.insert(
        "type".to_string(),
        Value::String(value_type(std::iter::once(value), infer_type).to_string()),
    );
    map.insert("const".to_string(), value.clone());
    if let Some(default) = &options.default {
        map.insert("default".to_string(), default.clone());
    }
    nullable_if(Fragment::from_value(Value::Object(map)), options.field.nullable)
}

/// An object whose every value matches `value_schema`.
pub fn as_additional_properties(value_schema: Fragment) -> Fragment {
    let mut map = Map::new();
    map.insert("type".to_string(), Value::String("object".to_string()));
    map.insert("additionalProperties".to_string(), value_schema.into_value());
    Fragment::from_value(Value::Object(map))
}

/// Combine resolved `members` under `kind`.
pub fn as_union(kind: Combinator, mut members: Vec<Fragment>, nullable: bool) -> Fragment {
    match (kind, nullable) {
        (_, false) => Fragment::combinator(kind, members),
        (Combinator::AnyOf, true) => {
            members.push(Fragment::null());
            Fragment::combinator(Combinator::AnyOf, members)
        }
        (_, true) => Fragment::combinator(kind, members).nullable(),
    }
}
