//! # Schema Fragments
//!
//! A [`Fragment`] is a JSON-Schema draft-4 node: a leaf
//! (`{"type": "string", ..}`), an object node, an array node
//! (`{"type": "array", "items": ..}`) or a combinator node
//! (`{"oneOf" | "anyOf" | "allOf": [..]}`).
//!
//! Fragments are plain values. Every constructor and transform here
//! returns a new fragment; nothing holds a reference into a registry.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A JSON-Schema draft-4 node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment(Value);

/// Schema combinator keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    /// Exactly one member must match.
    #[serde(rename = "oneOf")]
    OneOf,
    /// At least one member must match.
    #[serde(rename = "anyOf")]
    AnyOf,
    /// Every member must match.
    #[serde(rename = "allOf")]
    AllOf,
}

impl Combinator {
    /// The draft-4 keyword for this combinator.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
            Self::AllOf => "allOf",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Fragment {
    /// Wrap an arbitrary JSON value as a fragment.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Leaf fragment `{"type": type_name}`.
    pub fn leaf(type_name: &str) -> Self {
        Self(json!({ "type": type_name }))
    }

    /// The `{"type": "null"}` leaf.
    pub fn null() -> Self {
        Self::leaf("null")
    }

    /// Array node `{"type": "array", "items": items}`.
    pub fn array_of(items: Fragment) -> Self {
        Self(json!({ "type": "array", "items": items.0 }))
    }

    /// Combinator node `{keyword: members}`.
    pub fn combinator(kind: Combinator, members: Vec<Fragment>) -> Self {
        let members: Vec<Value> = members.into_iter().map(Fragment::into_value).collect();
        let mut map = Map::new();
        map.insert(kind.keyword().to_string(), Value::Array(members));
        Self(Value::Object(map))
    }

    /// `{"not": member}`.
    pub fn negation(member: Fragment) -> Self {
        Self(json!({ "not": member.0 }))
    }

    /// Nullable wrapping: `{"anyOf": [self, {"type": "null"}]}`.
    pub fn nullable(self) -> Self {
        Self::combinator(Combinator::AnyOf, vec![self, Self::null()])
    }

    /// Shallow-merge `overrides` on top of this fragment.
    ///
    /// Non-object fragments are replaced by an object built from the
    /// overrides alone.
    pub fn with_overrides(self, overrides: &Map<String, Value>) -> Self {
        let mut map = match self.0 {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (k, v) in overrides {
            map.insert(k.clone(), v.clone());
        }
        Self(Value::Object(map))
    }

    /// Set a keyword. Has no effect on non-object fragments.
    pub fn insert(&mut self, key: &str, value: Value) {
        if let Value::Object(map) = &mut self.0 {
            map.insert(key.to_string(), value);
        }
    }

    /// Look up a keyword.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The keyword map, if this fragment is a JSON object.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// Borrow the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the fragment, returning the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Fragment {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Fragment> for Value {
    fn from(fragment: Fragment) -> Self {
        fragment.0
    }
}
