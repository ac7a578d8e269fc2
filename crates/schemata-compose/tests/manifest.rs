//! # Manifest Loading
//!
//! Reads declaration manifests from disk and checks the materialized
//! output against hand-written expectations.

use std::io::Write;

use schemata_compose::{Manifest, ManifestError};
use schemata_core::{SchemaError, TypeDef};
use serde_json::json;

const SHOP: &str = r#"
types:
  - name: Named
    properties:
      - name: name
        kind: string
        schema: { minLength: 1 }
  - name: Address
    properties:
      - name: city
        kind: string
      - name: zip
        kind: string
        required: false
  - name: Customer
    parent: Named
    description: A paying customer
    schema:
      additionalProperties: false
    properties:
      - name: since
        kind: date
      - name: home
        ref: Address
        nullable: true
      - name: tags
        kind: string
        required: false
        array: { unique_items: true }
      - name: tier
        enum: [gold, silver]
        default: silver
      - name: scores
        additional_properties: number
        required: false
      - name: contact
        one_of: [Address, string]
"#;

fn write_manifest(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn manifest_from_file_materializes() {
    let file = write_manifest(SHOP);
    let manifest = Manifest::from_path(file.path()).unwrap();
    let mut reg = manifest.registry();
    let declared = manifest.apply(&mut reg).unwrap();
    assert_eq!(declared.len(), 3);

    let customer = reg.materialize(&TypeDef::new("Customer").unwrap()).unwrap();
    assert_eq!(customer["title"], json!("Customer"));
    assert_eq!(customer["description"], json!("A paying customer"));
    assert_eq!(customer["additionalProperties"], json!(false));
    assert_eq!(
        customer["required"],
        json!(["name", "since", "home", "tier", "contact"])
    );

    let props = &customer["properties"];
    assert_eq!(props["name"], json!({"type": "string", "minLength": 1}));
    assert_eq!(props["home"]["anyOf"][1], json!({"type": "null"}));
    assert_eq!(props["home"]["anyOf"][0]["required"], json!(["city"]));
    assert_eq!(
        props["tags"],
        json!({"type": "array", "items": {"type": "string"}, "uniqueItems": true})
    );
    assert_eq!(props["tier"], json!({"enum": ["gold", "silver"], "default": "silver"}));
    assert_eq!(
        props["scores"],
        json!({"type": "object", "additionalProperties": {"type": "number"}})
    );
    assert_eq!(props["contact"]["oneOf"][1], json!({"type": "string"}));

    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft4);
    assert!(opts.build(&customer).is_ok());
}

#[test]
fn manifest_json_is_accepted() {
    let file = write_manifest(
        r#"{"types": [{"name": "Flag", "properties": [{"name": "on", "kind": "boolean"}]}]}"#,
    );
    let manifest = Manifest::from_path(file.path()).unwrap();
    let mut reg = manifest.registry();
    manifest.apply(&mut reg).unwrap();
    assert_eq!(
        reg.materialize(&TypeDef::new("Flag").unwrap()).unwrap()["properties"]["on"],
        json!({"type": "boolean"})
    );
}

#[test]
fn manifest_forward_reference_fails() {
    let err = Manifest::load(
        r#"
types:
  - name: A
    properties:
      - name: b
        ref: B
  - name: B
    properties:
      - name: x
        kind: number
"#,
    )
    .unwrap_err();
    match err {
        ManifestError::Schema(SchemaError::NotASchema { reference }) => assert_eq!(reference, "B"),
        other => panic!("Expected NotASchema, got: {other:?}"),
    }
}

#[test]
fn manifest_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Manifest::from_path(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ManifestError::Io { .. }));
}

#[test]
fn manifest_non_root_type_stays_plain_object() {
    let (reg, _) = Manifest::load(
        r#"
types:
  - name: Fragmentary
    root: false
    properties:
      - name: x
        kind: number
"#,
    )
    .unwrap();
    assert_eq!(
        reg.materialize(&TypeDef::new("Fragmentary").unwrap()).unwrap(),
        json!({"required": ["x"], "properties": {"x": {"type": "number"}}})
    );
}
