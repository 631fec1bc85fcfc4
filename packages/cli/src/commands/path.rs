use crate::loader::open_page;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PathArgs {
    /// Page document
    pub document: PathBuf,

    /// Node id to locate
    pub id: String,
}

pub fn path(args: PathArgs, cwd: &str) -> Result<()> {
    let page = open_page(cwd, Some(&args.document))?;
    let snapshot = page.editor.snapshot();

    let ids = page
        .editor
        .path(&args.id)
        .ok_or_else(|| anyhow!("Node not found: {}", args.id))?;

    let labels: Vec<String> = ids
        .iter()
        .filter_map(|id| snapshot.find(id))
        .map(|node| format!("{} {:?}", node.kind, node.name))
        .collect();

    println!("{}", ids.join(" → ").bright_white());
    println!("{}", labels.join(" → "));
    println!("depth {}", ids.len() - 1);

    Ok(())
}
