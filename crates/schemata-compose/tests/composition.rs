//! # Composition Behaviour
//!
//! End-to-end checks of the registry through its public surface:
//! resolution isolation, required-set uniqueness, inheritance layering,
//! modifier output shapes, and the declaration failure modes. Rendered
//! documents are also compiled as draft-4 schemas to prove they are
//! usable standalone.

use proptest::prelude::*;
use schemata_compose::{
    ArrayOptions, FieldOptions, PropOptions, Registry, RegistryConfig, RootOptions,
    StaticDescriptors, TypeRef, UnionMember, ValueOptions, BUILTIN_EMPTY, BUILTIN_NULL,
};
use schemata_core::{Combinator, Fragment, PrimitiveKind, SchemaError, TypeDef};
use serde_json::{json, Value};

fn td(name: &str) -> TypeDef {
    TypeDef::new(name).unwrap()
}

fn untitled() -> Registry {
    Registry::with_config(RegistryConfig {
        default_title_from_name: false,
        ..RegistryConfig::default()
    })
}

fn assert_draft4(schema: &Value) {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft4);
    if let Err(e) = opts.build(schema) {
        panic!("materialized document is not a valid draft-4 schema: {e}\n{schema:#}");
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[test]
fn materialize_is_idempotent_and_isolated() {
    let mut reg = Registry::new();
    let order = reg
        .define(&td("Order"))
        .prop("id", PrimitiveKind::String, PropOptions::default())
        .unwrap()
        .root(RootOptions::default());

    let mut first = reg.materialize(&order).unwrap();
    let second = reg.materialize(&order).unwrap();
    assert_eq!(first, second);

    first["properties"]["id"]["type"] = json!("number");
    first["required"] = json!([]);
    let third = reg.materialize(&order).unwrap();
    assert_eq!(third, second);
    assert_draft4(&third);
}

#[test]
fn embedded_reference_is_a_snapshot() {
    let mut reg = Registry::new();
    let address = reg
        .define(&td("Address"))
        .prop("city", PrimitiveKind::String, PropOptions::default())
        .unwrap()
        .root(RootOptions::default());
    let person = reg
        .define(&td("Person"))
        .reference("home", &address, FieldOptions::default())
        .unwrap()
        .root(RootOptions::default());

    // A later write to Address does not reach the copy held by Person.
    reg.declare_property(&address, "zip", Some(PrimitiveKind::String), PropOptions::default())
        .unwrap();

    let schema = reg.materialize(&person).unwrap();
    assert_eq!(schema["properties"]["home"]["required"], json!(["city"]));
    assert!(schema["properties"]["home"]["properties"].get("zip").is_none());
    assert_eq!(
        reg.materialize(&address).unwrap()["required"],
        json!(["city", "zip"])
    );
}

#[test]
fn undeclared_type_is_not_a_schema() {
    let reg = Registry::new();
    match reg.materialize(&td("Undeclared")) {
        Err(SchemaError::NotASchema { reference }) => assert_eq!(reference, "Undeclared"),
        other => panic!("Expected NotASchema, got: {other:?}"),
    }
}

#[test]
fn primitive_markers_materialize_to_leaves() {
    let reg = Registry::new();
    assert_eq!(reg.materialize(TypeRef::String).unwrap(), json!({"type": "string"}));
    assert_eq!(reg.materialize(TypeRef::Number).unwrap(), json!({"type": "number"}));
    assert_eq!(reg.materialize(TypeRef::Boolean).unwrap(), json!({"type": "boolean"}));
    assert_eq!(reg.materialize(TypeRef::Null).unwrap(), json!({"type": "null"}));
}

// ---------------------------------------------------------------------------
// Required set
// ---------------------------------------------------------------------------

#[test]
fn required_set_has_no_duplicates() {
    let mut reg = untitled();
    let t = td("T");
    for _ in 0..3 {
        reg.declare_property(&t, "a", Some(PrimitiveKind::Number), PropOptions::default())
            .unwrap();
    }
    reg.declare_enum(&t, "a", &[json!(1), json!(2)], ValueOptions::default())
        .unwrap();
    reg.declare_array(&t, "a", ArrayOptions::default()).unwrap();
    let schema = reg.materialize(&t).unwrap();
    assert_eq!(schema["required"], json!(["a"]));
    assert_draft4(&schema);
}

#[test]
fn all_optional_root_omits_required() {
    let mut reg = untitled();
    let t = reg
        .define(&td("Sparse"))
        .prop("n", PrimitiveKind::Number, PropOptions::optional())
        .unwrap()
        .root(RootOptions::default());
    let schema = reg.materialize(&t).unwrap();
    assert_eq!(
        schema,
        json!({"type": "object", "properties": {"n": {"type": "number"}}})
    );
    assert_draft4(&schema);
}

#[test]
fn empty_root_is_valid_draft4() {
    let mut reg = Registry::new();
    let t = td("Marker");
    reg.declare_root(&t, RootOptions::default());
    let schema = reg.materialize(&t).unwrap();
    assert!(schema.get("required").is_none());
    assert_eq!(schema["properties"], json!({}));
    assert_draft4(&schema);
}

#[test]
fn optional_redeclaration_keeps_earlier_required() {
    let mut reg = untitled();
    let t = td("T");
    reg.declare_property(&t, "a", Some(PrimitiveKind::Number), PropOptions::default())
        .unwrap();
    reg.declare_property(&t, "a", Some(PrimitiveKind::Number), PropOptions::optional())
        .unwrap();
    assert_eq!(reg.materialize(&t).unwrap()["required"], json!(["a"]));
}

// ---------------------------------------------------------------------------
// Inheritance
// ---------------------------------------------------------------------------

#[test]
fn inheritance_layers_child_over_parent() {
    let mut reg = untitled();
    let p = reg
        .define(&td("P"))
        .prop("a", PrimitiveKind::Number, PropOptions::default())
        .unwrap()
        .root(RootOptions::default());
    let c = reg
        .define(&td("C"))
        .prop("b", PrimitiveKind::String, PropOptions::default())
        .unwrap()
        .root(RootOptions::default().parent(&p));

    assert_eq!(
        reg.materialize(&c).unwrap(),
        json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {"a": {"type": "number"}, "b": {"type": "string"}}
        })
    );
    assert_eq!(
        reg.materialize(&p).unwrap(),
        json!({
            "type": "object",
            "required": ["a"],
            "properties": {"a": {"type": "number"}}
        })
    );
}

#[test]
fn inheritance_child_wins_on_collision() {
    let mut reg = Registry::new();
    let p = reg
        .define(&td("Base"))
        .prop("v", PrimitiveKind::Number, PropOptions::default())
        .unwrap()
        .root(RootOptions::default().title("Base title"));
    let c = reg
        .define(&td("Derived"))
        .prop("v", PrimitiveKind::String, PropOptions::optional())
        .unwrap()
        .root(RootOptions::default().parent(&p));

    let schema = reg.materialize(&c).unwrap();
    assert_eq!(schema["properties"]["v"], json!({"type": "string"}));
    // Parent's required names survive.
    assert_eq!(schema["required"], json!(["v"]));
    // Title reflects the child.
    assert_eq!(schema["title"], json!("Derived"));
    assert_eq!(schema["description"], json!("Derived"));
}

#[test]
fn inheritance_chain_accumulates() {
    let mut reg = Registry::new();
    let a = reg
        .define(&td("A"))
        .prop("a", PrimitiveKind::Number, PropOptions::default())
        .unwrap()
        .root(RootOptions::default());
    let b = reg
        .define(&td("B"))
        .prop("b", PrimitiveKind::Boolean, PropOptions::default())
        .unwrap()
        .root(RootOptions::default().parent(&a));
    let c = reg
        .define(&td("C"))
        .prop("c", PrimitiveKind::Date, PropOptions::default())
        .unwrap()
        .root(RootOptions::default().parent(&b));

    let schema = reg.materialize(&c).unwrap();
    assert_eq!(schema["required"], json!(["a", "b", "c"]));
    assert_eq!(
        schema["properties"]["c"],
        json!({"type": "string", "format": "date-time", "datetime": "ISO8601"})
    );
    assert_eq!(schema["title"], json!("C"));
    assert_draft4(&schema);
}

#[test]
fn parent_without_root_is_not_merged() {
    let mut reg = untitled();
    let loose = td("Loose");
    reg.declare_property(&loose, "x", Some(PrimitiveKind::Number), PropOptions::default())
        .unwrap();
    let c = reg
        .define(&td("C"))
        .prop("y", PrimitiveKind::Number, PropOptions::default())
        .unwrap()
        .root(RootOptions::default().parent(&loose));
    assert_eq!(reg.materialize(&c).unwrap()["required"], json!(["y"]));
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

#[test]
fn array_without_base_fails() {
    let mut reg = Registry::new();
    let t = td("T");
    assert!(matches!(
        reg.declare_array(&t, "xs", ArrayOptions::default()),
        Err(SchemaError::MissingBaseFragment { .. })
    ));
    assert!(!reg.contains(&t));
}

#[test]
fn ambiguous_array_fails() {
    let t = td("T");
    let mut reg =
        Registry::new().with_descriptor(StaticDescriptors::new().with(&t, "xs", PrimitiveKind::Array));
    match reg.declare_property(&t, "xs", None, PropOptions::default()) {
        Err(SchemaError::AmbiguousArrayType { type_name, property }) => {
            assert_eq!(type_name, "T");
            assert_eq!(property, "xs");
        }
        other => panic!("Expected AmbiguousArrayType, got: {other:?}"),
    }
    // An explicit element kind plus the array modifier is the way out.
    reg.define(&t)
        .prop("xs", PrimitiveKind::Number, PropOptions::default())
        .and_then(|b| b.array("xs", ArrayOptions::default()))
        .unwrap();
    assert_eq!(
        reg.materialize(&t).unwrap()["properties"]["xs"],
        json!({"type": "array", "items": {"type": "number"}})
    );
}

#[test]
fn nullable_required_string() {
    let mut reg = untitled();
    let t = reg
        .define(&td("T"))
        .prop("s", PrimitiveKind::String, PropOptions::default().or_null())
        .unwrap()
        .root(RootOptions::default());
    let schema = reg.materialize(&t).unwrap();
    assert_eq!(
        schema["properties"]["s"],
        json!({"anyOf": [{"type": "string"}, {"type": "null"}]})
    );
    assert_eq!(schema["required"], json!(["s"]));
    assert_draft4(&schema);
}

#[test]
fn additional_properties_with_primitive_value() {
    let mut reg = Registry::new();
    let t = td("T");
    reg.declare_additional_properties(&t, "m", &TypeRef::Number, FieldOptions::default())
        .unwrap();
    let schema = reg.materialize(&t).unwrap();
    assert_eq!(
        schema["properties"]["m"],
        json!({"type": "object", "additionalProperties": {"type": "number"}})
    );
    assert_draft4(&schema);
}

#[test]
fn union_embeds_materialized_members() {
    let mut reg = Registry::new();
    let a = reg
        .define(&td("A"))
        .prop("x", PrimitiveKind::Number, PropOptions::default())
        .unwrap()
        .root(RootOptions::default());
    let b = reg
        .define(&td("B"))
        .prop("y", PrimitiveKind::String, PropOptions::default())
        .unwrap()
        .root(RootOptions::default());
    let t = td("T");
    reg.declare_union(
        &t,
        "ab",
        Combinator::OneOf,
        &[UnionMember::from(&a), UnionMember::from(&b)],
        FieldOptions::default(),
    )
    .unwrap();

    let schema = reg.materialize(&t).unwrap();
    assert_eq!(
        schema["properties"]["ab"],
        json!({"oneOf": [reg.materialize(&a).unwrap(), reg.materialize(&b).unwrap()]})
    );
    assert_draft4(&schema);
}

#[test]
fn nullable_one_of_nests_under_any_of() {
    let mut reg = Registry::new();
    let t = td("T");
    reg.declare_union(
        &t,
        "v",
        Combinator::OneOf,
        &[TypeRef::String.into(), TypeRef::Number.into()],
        FieldOptions::default().or_null(),
    )
    .unwrap();
    assert_eq!(
        reg.materialize(&t).unwrap()["properties"]["v"],
        json!({"anyOf": [
            {"oneOf": [{"type": "string"}, {"type": "number"}]},
            {"type": "null"}
        ]})
    );
}

#[test]
fn nullable_enum_and_const() {
    let mut reg = Registry::new();
    let t = reg
        .define(&td("Flags"))
        .enumeration(
            "level",
            &[json!("low"), json!("high")],
            ValueOptions::default().or_null(),
        )
        .and_then(|b| b.constant("version", json!(2), ValueOptions::optional()))
        .unwrap()
        .root(RootOptions::default());
    let schema = reg.materialize(&t).unwrap();
    assert_eq!(
        schema["properties"]["level"],
        json!({"anyOf": [{"type": "string", "enum": ["low", "high"]}, {"type": "null"}]})
    );
    assert_eq!(
        schema["properties"]["version"],
        json!({"type": "string", "const": 2})
    );
    assert_eq!(schema["required"], json!(["level"]));
    assert_draft4(&schema);
}

#[test]
fn inferred_value_types_are_opt_in() {
    let mut reg = Registry::with_config(RegistryConfig {
        infer_value_type: true,
        ..RegistryConfig::default()
    });
    let t = reg
        .define(&td("Levels"))
        .enumeration("rank", &[json!(1), json!(2)], ValueOptions::default().or_null())
        .and_then(|b| b.constant("enabled", json!(true), ValueOptions::default()))
        .unwrap()
        .root(RootOptions::default());
    let schema = reg.materialize(&t).unwrap();
    assert_eq!(
        schema["properties"]["rank"]["anyOf"][0],
        json!({"type": "number", "enum": [1, 2]})
    );
    assert_eq!(
        schema["properties"]["enabled"],
        json!({"type": "boolean", "const": true})
    );
    assert_draft4(&schema);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn nested_references_three_levels() {
    let mut reg = Registry::new();
    let address = reg
        .define(&td("Address"))
        .prop("city", PrimitiveKind::String, PropOptions::default())
        .unwrap()
        .root(RootOptions::default());
    let person = reg
        .define(&td("Person"))
        .prop("name", PrimitiveKind::String, PropOptions::default())
        .and_then(|b| b.reference("home", &address, FieldOptions::optional()))
        .unwrap()
        .root(RootOptions::default());
    let company = reg
        .define(&td("Company"))
        .reference("ceo", &person, FieldOptions::default())
        .unwrap()
        .root(RootOptions::default().description("A registered company"));

    let schema = reg.materialize(&company).unwrap();
    assert_eq!(schema["title"], json!("Company"));
    assert_eq!(schema["description"], json!("A registered company"));
    assert_eq!(schema["required"], json!(["ceo"]));
    let ceo = &schema["properties"]["ceo"];
    assert_eq!(ceo["title"], json!("Person"));
    assert_eq!(ceo["required"], json!(["name"]));
    assert_eq!(
        ceo["properties"]["home"]["properties"]["city"],
        json!({"type": "string"})
    );
    assert_draft4(&schema);
}

#[test]
fn array_of_references() {
    let mut reg = Registry::new();
    let line = reg
        .define(&td("Line"))
        .prop("sku", PrimitiveKind::String, PropOptions::default())
        .and_then(|b| b.prop("qty", PrimitiveKind::Number, PropOptions::default().with("minimum", json!(1))))
        .unwrap()
        .root(RootOptions::default());
    let invoice = reg
        .define(&td("Invoice"))
        .reference("lines", &line, FieldOptions::default())
        .and_then(|b| b.array("lines", ArrayOptions::default().min(1)))
        .unwrap()
        .root(RootOptions::default().keyword("additionalProperties", json!(false)));

    let schema = reg.materialize(&invoice).unwrap();
    assert_eq!(schema["additionalProperties"], json!(false));
    let lines = &schema["properties"]["lines"];
    assert_eq!(lines["type"], json!("array"));
    assert_eq!(lines["minItems"], json!(1));
    assert_eq!(lines["items"]["title"], json!("Line"));
    assert_eq!(
        lines["items"]["properties"]["qty"],
        json!({"type": "number", "minimum": 1})
    );
    assert_draft4(&schema);
}

#[test]
fn optional_array_of_primitives() {
    let mut reg = Registry::new();
    let post = reg
        .define(&td("Post"))
        .prop("body", PrimitiveKind::String, PropOptions::default())
        .and_then(|b| b.prop("tags", PrimitiveKind::String, PropOptions::optional()))
        .and_then(|b| b.array("tags", ArrayOptions::default().unique()))
        .unwrap()
        .root(RootOptions::default());
    let schema = reg.materialize(&post).unwrap();
    assert_eq!(schema["required"], json!(["body"]));
    assert_eq!(
        schema["properties"]["tags"],
        json!({"type": "array", "items": {"type": "string"}, "uniqueItems": true})
    );
    assert_draft4(&schema);
}

#[test]
fn builtins_and_leaf_roots() {
    let mut reg = Registry::new().with_builtins();
    assert_eq!(
        reg.materialize(&td(BUILTIN_NULL)).unwrap(),
        json!({"type": "null"})
    );
    assert_eq!(
        reg.materialize(&td(BUILTIN_EMPTY)).unwrap(),
        json!({"type": "object", "required": [], "properties": {}})
    );

    let money = td("Money");
    reg.declare_leaf(
        &money,
        Fragment::from_value(json!({"type": "number", "minimum": 0})),
    );
    let t = td("Price");
    reg.declare_reference(&t, "amount", &TypeRef::from(&money), FieldOptions::default())
        .unwrap();
    assert_eq!(
        reg.materialize(&t).unwrap()["properties"]["amount"],
        json!({"type": "number", "minimum": 0})
    );

    let names: Vec<&str> = reg.type_defs().into_iter().map(TypeDef::name).collect();
    assert_eq!(names, vec!["EmptySchema", "Money", "NullSchema", "Price"]);
}

#[test]
fn standalone_combinator_as_union_member() {
    let mut reg = Registry::new();
    let either = reg
        .any_of(&[TypeRef::String.into(), TypeRef::Boolean.into()])
        .unwrap();
    let not_null = reg.not(&TypeRef::Null.into()).unwrap();
    let t = td("T");
    reg.declare_union(
        &t,
        "v",
        Combinator::AllOf,
        &[either.into(), not_null.into()],
        FieldOptions::default(),
    )
    .unwrap();
    let schema = reg.materialize(&t).unwrap();
    assert_eq!(
        schema["properties"]["v"],
        json!({"allOf": [
            {"anyOf": [{"type": "string"}, {"type": "boolean"}]},
            {"not": {"type": "null"}}
        ]})
    );
    assert_draft4(&schema);
}

#[test]
fn failed_declaration_leaves_no_entry() {
    let mut reg = Registry::new();
    let t = td("T");
    assert!(reg
        .declare_union(
            &t,
            "v",
            Combinator::AnyOf,
            &[TypeRef::String.into(), td("Ghost").into()],
            FieldOptions::default(),
        )
        .is_err());
    assert!(!reg.contains(&t));
    assert!(matches!(
        reg.materialize(&t),
        Err(SchemaError::NotASchema { .. })
    ));
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

const NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];
const KINDS: [PrimitiveKind; 3] = [
    PrimitiveKind::Number,
    PrimitiveKind::String,
    PrimitiveKind::Boolean,
];

proptest! {
    #[test]
    fn required_matches_first_required_declarations(
        ops in prop::collection::vec((0usize..5, 0usize..3, any::<bool>()), 1..40)
    ) {
        let mut reg = Registry::new();
        let t = td("T");
        let mut expected: Vec<String> = Vec::new();
        for (name, kind, required) in &ops {
            let options = PropOptions { required: *required, ..PropOptions::default() };
            reg.declare_property(&t, NAMES[*name], Some(KINDS[*kind]), options).unwrap();
            if *required && !expected.iter().any(|n| n == NAMES[*name]) {
                expected.push(NAMES[*name].to_string());
            }
        }
        let schema = reg.materialize(&t).unwrap();
        let required = schema.get("required").cloned().unwrap_or_else(|| json!([]));
        prop_assert_eq!(required, json!(expected));
        if expected.is_empty() {
            prop_assert!(schema.get("required").is_none());
        }
    }

    #[test]
    fn mutation_of_output_never_reaches_registry(
        ops in prop::collection::vec((0usize..5, 0usize..3), 1..20),
        junk in "[a-z]{1,8}"
    ) {
        let mut reg = Registry::new();
        let t = td("T");
        for (name, kind) in &ops {
            reg.declare_property(&t, NAMES[*name], Some(KINDS[*kind]), PropOptions::default()).unwrap();
        }
        let before = reg.materialize(&t).unwrap();
        let mut copy = reg.materialize(&t).unwrap();
        copy["properties"][NAMES[ops[0].0]] = json!(junk);
        copy["required"] = json!([]);
        prop_assert_eq!(reg.materialize(&t).unwrap(), before);
    }
}
