//! # schemata-cli — Schema Manifest Command-Line Interface
//!
//! Loads a YAML declaration manifest into a fresh registry and prints
//! what it produces.
//!
//! ## Subcommands
//!
//! - `materialize` — print materialized schemas as one JSON object keyed
//!   by type name
//! - `list` — print every registered type with its entry shape
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers return their output as a string so they can be tested
//!   without capturing stdout.
//! - Composition rules live in `schemata-compose`; nothing here decides
//!   the shape of a schema.

use std::path::Path;

use anyhow::{Context, Result};

use schemata_compose::{Manifest, Registry};
use schemata_core::TypeDef;

pub mod list;
pub mod materialize;

/// A manifest replayed into its own registry.
#[derive(Debug)]
pub struct LoadedManifest {
    /// The parsed manifest.
    pub manifest: Manifest,
    /// Registry holding the built-ins and every declared type.
    pub registry: Registry,
    /// Declared types, in manifest order.
    pub declared: Vec<TypeDef>,
}

impl LoadedManifest {
    /// Types the manifest promotes to roots, in manifest order.
    pub fn roots(&self) -> Vec<TypeDef> {
        self.manifest
            .types
            .iter()
            .filter(|t| t.root)
            .map(|t| t.name.clone())
            .collect()
    }
}

/// Read `path` and replay its declarations.
pub fn load_manifest(path: &Path) -> Result<LoadedManifest> {
    let manifest = Manifest::from_path(path)
        .with_context(|| format!("reading manifest: {}", path.display()))?;
    let mut registry = manifest.registry();
    let declared = manifest
        .apply(&mut registry)
        .with_context(|| format!("applying manifest: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        types = declared.len(),
        "loaded manifest"
    );
    Ok(LoadedManifest {
        manifest,
        registry,
        declared,
    })
}
