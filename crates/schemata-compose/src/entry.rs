//! # Schema Entries
//!
//! A [`SchemaEntry`] is the mutable accumulator a registry keeps for one
//! type definition. It starts as an empty `{properties, required}` body,
//! gains properties as they are declared, and is promoted to a root
//! (`type: "object"`, `title`, `description`) by root declaration.
//!
//! An entry may also be a bare leaf fragment (e.g., the built-in
//! `NullSchema`). A leaf has no properties container; declaring a
//! property against it upgrades the body in place to an empty object.
//!
//! ## Invariants
//!
//! - A property name appears in `required` at most once.
//! - Writing a property twice keeps the last fragment.
//! - Layering over a parent never lets a parent fragment replace a
//!   child fragment of the same name.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use schemata_core::Fragment;

/// Root metadata installed by root declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RootMeta {
    /// `title` keyword.
    pub title: Option<String>,
    /// `description` keyword.
    pub description: Option<String>,
    /// Additional draft-4 keywords spread under the engine-owned keys.
    pub extra: Map<String, Value>,
}

/// The `{properties, required}` container of an object entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectBody {
    properties: BTreeMap<String, Fragment>,
    required: Vec<String>,
}

impl ObjectBody {
    /// Declared properties, keyed by name.
    pub fn properties(&self) -> &BTreeMap<String, Fragment> {
        &self.properties
    }

    /// Required property names, without duplicates.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Fragment currently stored for `name`.
    pub fn property(&self, name: &str) -> Option<&Fragment> {
        self.properties.get(name)
    }

    /// Store `fragment` under `name`, replacing any previous fragment.
    pub fn set_property(&mut self, name: &str, fragment: Fragment) {
        self.properties.insert(name.to_string(), fragment);
    }

    /// Add `name` to the required set. Returns `false` if already present.
    pub fn require(&mut self, name: &str) -> bool {
        if self.required.iter().any(|r| r == name) {
            return false;
        }
        self.required.push(name.to_string());
        true
    }

    /// Layer this body on top of `parent`.
    ///
    /// `required` becomes the parent's names followed by the child's own,
    /// deduplicated. `properties` become the parent's overlaid by the
    /// child's; the child wins on name collision.
    pub fn layer_over(&mut self, parent: &ObjectBody) {
        let mut required = Vec::with_capacity(parent.required.len() + self.required.len());
        for name in parent.required.iter().chain(self.required.iter()) {
            if !required.contains(name) {
                required.push(name.clone());
            }
        }
        self.required = required;

        let mut properties = parent.properties.clone();
        properties.extend(std::mem::take(&mut self.properties));
        self.properties = properties;
    }

    /// Draft-4 requires `required` to be non-empty, so an empty set is
    /// left out of the rendering.
    fn write_into(&self, map: &mut Map<String, Value>) {
        if !self.required.is_empty() {
            let required = self.required.iter().cloned().map(Value::String).collect();
            map.insert("required".to_string(), Value::Array(required));
        }
        let properties = self
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.as_value().clone()))
            .collect();
        map.insert("properties".to_string(), Value::Object(properties));
    }
}

/// Accumulated schema for one type definition.
///
/// Exactly one of the object body and the leaf fragment is present.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    root: Option<RootMeta>,
    object: Option<ObjectBody>,
    leaf: Option<Fragment>,
}

impl Default for SchemaEntry {
    fn default() -> Self {
        Self::empty()
    }
}

impl SchemaEntry {
    /// A fresh `{properties: {}, required: []}` entry.
    pub fn empty() -> Self {
        Self {
            root: None,
            object: Some(ObjectBody::default()),
            leaf: None,
        }
    }

    /// An entry that is a bare fragment with no properties container.
    pub fn leaf(fragment: Fragment) -> Self {
        Self {
            root: None,
            object: None,
            leaf: Some(fragment),
        }
    }

    /// Whether root declaration has run for this entry.
    pub fn is_root(&self) -> bool {
        self.root.is_some()
    }

    /// Root metadata, if promoted.
    pub fn root(&self) -> Option<&RootMeta> {
        self.root.as_ref()
    }

    pub(crate) fn set_root(&mut self, meta: RootMeta) {
        self.root = Some(meta);
    }

    /// The object body, or `None` for leaf entries.
    pub fn object_body(&self) -> Option<&ObjectBody> {
        self.object.as_ref()
    }

    /// The object body, upgrading a leaf entry to an empty object body.
    ///
    /// The leaf's keywords are discarded; root metadata is kept.
    pub fn object_body_mut(&mut self) -> &mut ObjectBody {
        if self.object.is_none() {
            tracing::debug!("upgrading leaf schema entry to object body");
            self.leaf = None;
        }
        self.object.get_or_insert_with(ObjectBody::default)
    }

    /// Fragment currently stored for property `name`.
    pub fn property(&self, name: &str) -> Option<&Fragment> {
        self.object_body().and_then(|b| b.property(name))
    }

    /// Required property names (empty for leaf entries).
    pub fn required(&self) -> &[String] {
        self.object_body().map(ObjectBody::required).unwrap_or(&[])
    }

    /// Whether the reference resolver may embed this entry.
    ///
    /// An entry is resolvable once it is a root, a leaf, or carries at
    /// least one property.
    pub fn is_resolvable(&self) -> bool {
        match &self.object {
            None => true,
            Some(body) => self.is_root() || !body.properties.is_empty(),
        }
    }

    /// Render the entry as a detached fragment.
    pub fn to_fragment(&self) -> Fragment {
        let mut map = Map::new();
        if let Some(root) = &self.root {
            for (k, v) in &root.extra {
                map.insert(k.clone(), v.clone());
            }
            map.insert("type".to_string(), Value::String("object".to_string()));
            if let Some(title) = &root.title {
                map.insert("title".to_string(), Value::String(title.clone()));
            }
            if let Some(description) = &root.description {
                map.insert("description".to_string(), Value::String(description.clone()));
            }
        }
        if let Some(body) = &self.object {
            body.write_into(&mut map);
        } else if let Some(fragment) = &self.leaf {
            match fragment.as_object() {
                Some(leaf) => {
                    for (k, v) in leaf {
                        map.insert(k.clone(), v.clone());
                    }
                }
                None if self.root.is_none() => return fragment.clone(),
                None => {}
            }
        }
        Fragment::from_value(Value::Object(map))
    }
}
