//! # Materialize Subcommand
//!
//! `schemata materialize <MANIFEST> [--type NAME]... [--compact]`
//!
//! Prints a JSON object mapping each requested type name to its
//! materialized schema. Without `--type`, every root the manifest
//! declares is printed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};

use schemata_core::TypeDef;

use crate::load_manifest;

/// Arguments for the `schemata materialize` subcommand.
#[derive(Args, Debug)]
pub struct MaterializeArgs {
    /// Path to the declaration manifest (YAML or JSON).
    pub manifest: PathBuf,

    /// Type to materialize. Repeat for several; defaults to every root.
    #[arg(long = "type", value_name = "NAME")]
    pub types: Vec<String>,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

/// Build the output document for `args`.
pub fn render_materialize(args: &MaterializeArgs) -> Result<String> {
    let loaded = load_manifest(&args.manifest)?;

    let targets = if args.types.is_empty() {
        loaded.roots()
    } else {
        args.types
            .iter()
            .map(|name| TypeDef::new(name.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .context("invalid --type argument")?
    };

    let mut documents = Map::new();
    for target in &targets {
        let schema = loaded
            .registry
            .materialize(target)
            .with_context(|| format!("materializing {target}"))?;
        documents.insert(target.to_string(), schema);
    }
    tracing::info!(count = documents.len(), "materialized schemas");

    let output = Value::Object(documents);
    let text = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    Ok(text)
}

/// Execute the materialize subcommand.
pub fn run_materialize(args: &MaterializeArgs) -> Result<u8> {
    println!("{}", render_materialize(args)?);
    Ok(0)
}
