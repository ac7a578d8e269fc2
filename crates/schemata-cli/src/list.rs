//! # List Subcommand
//!
//! `schemata list <MANIFEST>` prints one line per registered type, sorted
//! by name, with the shape of its entry (`root`, `object` or `leaf`).
//! Built-in schemas are included.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use schemata_compose::SchemaEntry;

use crate::load_manifest;

/// Arguments for the `schemata list` subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the declaration manifest (YAML or JSON).
    pub manifest: PathBuf,
}

fn shape(entry: &SchemaEntry) -> &'static str {
    if entry.is_root() {
        "root"
    } else if entry.object_body().is_some() {
        "object"
    } else {
        "leaf"
    }
}

/// Build the listing for `args`.
pub fn render_list(args: &ListArgs) -> Result<String> {
    let loaded = load_manifest(&args.manifest)?;
    let lines: Vec<String> = loaded
        .registry
        .type_defs()
        .into_iter()
        .filter_map(|t| loaded.registry.entry(t).map(|e| format!("{t}\t{}", shape(e))))
        .collect();
    Ok(lines.join("\n"))
}

/// Execute the list subcommand.
pub fn run_list(args: &ListArgs) -> Result<u8> {
    println!("{}", render_list(args)?);
    Ok(0)
}
