//! # Schema Store
//!
//! The [`Registry`] owns one [`SchemaEntry`] per type definition. It is
//! an explicit object rather than process-wide state: independent
//! registries are independent schema universes, and dropping a registry
//! drops every entry it holds.
//!
//! ## Lifecycle of an entry
//!
//! ```text
//! (absent) ──first property write──▶ {properties, required}
//!     │                                      │
//!     │                              declare_root()
//!     │                                      ▼
//!     └──────declare_root()──────▶ root {type: "object", title, ..}
//!                                            │
//!                                  materialize() / resolve()  (read-only, copies)
//! ```
//!
//! Root declaration is where inheritance happens: when the caller names
//! a parent that already has a root entry, the child's body is layered
//! on top of the parent's (parent `required` first, child properties win).

use std::collections::HashMap;
use std::fmt;

use serde_json::{json, Map, Value};

use schemata_core::{Fragment, PrimitiveMapper, TypeDef};

use crate::config::RegistryConfig;
use crate::descriptor::{NoDescriptors, TypeDescriptor};
use crate::entry::{RootMeta, SchemaEntry};

/// Name of the built-in `{type: "null"}` schema.
pub const BUILTIN_NULL: &str = "NullSchema";

/// Name of the built-in empty object schema.
pub const BUILTIN_EMPTY: &str = "EmptySchema";

/// Options for root declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootOptions {
    /// Explicit `title`; defaults to the type name.
    pub title: Option<String>,
    /// Explicit `description`; defaults to the type name.
    pub description: Option<String>,
    /// Parent type whose root entry the child is layered over.
    pub parent: Option<TypeDef>,
    /// Extra draft-4 keywords (e.g., `additionalProperties`, `$id`).
    pub extra: Map<String, Value>,
}

impl RootOptions {
    /// Inherit from `parent`.
    pub fn parent(mut self, parent: &TypeDef) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Set the `title` keyword.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the `description` keyword.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an extra keyword to the root schema.
    pub fn keyword(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Per-type-definition schema store.
pub struct Registry {
    entries: HashMap<TypeDef, SchemaEntry>,
    config: RegistryConfig,
    mapper: PrimitiveMapper,
    descriptor: Box<dyn TypeDescriptor>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with `config`.
    pub fn with_config(config: RegistryConfig) -> Self {
        let mapper = config.mapper();
        Self {
            entries: HashMap::new(),
            config,
            mapper,
            descriptor: Box::new(NoDescriptors),
        }
    }

    /// Install the provider consulted by declarations without an
    /// explicit kind.
    pub fn with_descriptor(mut self, descriptor: impl TypeDescriptor + 'static) -> Self {
        self.descriptor = Box::new(descriptor);
        self
    }

    /// Register the built-in [`BUILTIN_NULL`] and [`BUILTIN_EMPTY`] schemas.
    pub fn with_builtins(mut self) -> Self {
        self.declare_leaf(&TypeDef::from_static(BUILTIN_NULL), Fragment::null());

        // A literal root: no title or description, and an explicit empty
        // `required` list.
        let mut empty = SchemaEntry::leaf(Fragment::from_value(json!({
            "type": "object",
            "required": [],
            "properties": {}
        })));
        empty.set_root(RootMeta::default());
        self.entries.insert(TypeDef::from_static(BUILTIN_EMPTY), empty);
        self
    }

    /// The registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The primitive mapper derived from the configuration.
    pub fn mapper(&self) -> &PrimitiveMapper {
        &self.mapper
    }

    pub(crate) fn descriptor(&self) -> &dyn TypeDescriptor {
        self.descriptor.as_ref()
    }

    /// Look up the entry for `type_def`.
    pub fn entry(&self, type_def: &TypeDef) -> Option<&SchemaEntry> {
        self.entries.get(type_def)
    }

    /// Return the entry for `type_def`, installing an empty one if absent.
    ///
    /// Existing entries (including promoted roots) are returned as-is.
    pub fn get_or_create_entry(&mut self, type_def: &TypeDef) -> &mut SchemaEntry {
        self.entries.entry(type_def.clone()).or_insert_with(|| {
            tracing::debug!(type_name = %type_def, "creating schema entry");
            SchemaEntry::empty()
        })
    }

    /// Whether `type_def` has an entry.
    pub fn contains(&self, type_def: &TypeDef) -> bool {
        self.entries.contains_key(type_def)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every type definition with an entry, sorted by name.
    pub fn type_defs(&self) -> Vec<&TypeDef> {
        let mut defs: Vec<&TypeDef> = self.entries.keys().collect();
        defs.sort();
        defs
    }

    /// Install `fragment` as a leaf entry for `type_def`.
    ///
    /// Replaces any existing entry. A later property declaration upgrades
    /// the leaf in place to an object body.
    pub fn declare_leaf(&mut self, type_def: &TypeDef, fragment: Fragment) {
        tracing::debug!(type_name = %type_def, "declaring leaf schema");
        self.entries.insert(type_def.clone(), SchemaEntry::leaf(fragment));
    }

    /// Promote `type_def` to a schema root.
    ///
    /// Sets `type: "object"`, `title` and `description` while keeping the
    /// properties already declared. If `options.parent` names a type with
    /// a root entry, the child is layered over the parent. Must run after
    /// all of the type's own property declarations.
    pub fn declare_root(&mut self, type_def: &TypeDef, options: RootOptions) {
        let RootOptions {
            title,
            description,
            parent,
            extra,
        } = options;

        let parent_body = match &parent {
            Some(parent) if parent == type_def => {
                tracing::warn!(type_name = %type_def, "type declared as its own parent; skipping merge");
                None
            }
            Some(parent) => match self.entries.get(parent) {
                Some(entry) if entry.is_root() => entry.object_body().cloned(),
                _ => {
                    tracing::warn!(
                        type_name = %type_def,
                        parent = %parent,
                        "parent has no root schema; skipping inheritance merge"
                    );
                    None
                }
            },
            None => None,
        };

        let default_name = self
            .config
            .default_title_from_name
            .then(|| type_def.name().to_string());
        let meta = RootMeta {
            title: title.or_else(|| default_name.clone()),
            description: description.or(default_name),
            extra,
        };

        let entry = self.get_or_create_entry(type_def);
        if entry.is_root() {
            tracing::warn!(type_name = %type_def, "re-declaring schema root");
        }
        entry.set_root(meta);
        if let Some(parent_body) = &parent_body {
            entry.object_body_mut().layer_over(parent_body);
        }

        tracing::debug!(
            type_name = %type_def,
            parent = parent.as_ref().map(|p| p.name()).unwrap_or(""),
            merged = parent_body.is_some(),
            properties = entry.object_body().map(|b| b.properties().len()).unwrap_or(0),
            "declared schema root"
        );
    }
}
