use crate::loader::open_page;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_editor::{ContainmentPolicy, Node};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Page document (defaults to the configured document)
    pub document: Option<PathBuf>,
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    // Structural problems (duplicate ids, nested roots, bad content) fail here
    let page = open_page(cwd, args.document.as_deref())?;
    let issues = nesting_issues(page.editor.snapshot().root(), page.editor.policy());

    if issues.is_empty() {
        println!(
            "  {} {} is valid ({} nodes)",
            "✓".green(),
            page.path.display(),
            page.editor.snapshot().len()
        );
        return Ok(());
    }

    for issue in &issues {
        eprintln!("  {} {}", "✗".red(), issue);
    }
    bail!("{} nesting issue(s) in {}", issues.len(), page.path.display())
}

/// Parent/child pairs in a loaded tree that the policy would refuse to create
pub fn nesting_issues(root: &Node, policy: &ContainmentPolicy) -> Vec<String> {
    policy
        .audit(root)
        .into_iter()
        .map(|violation| {
            format!(
                "#{} ({}) inside #{} ({}): {}",
                violation.child_id,
                violation.child_kind,
                violation.parent_id,
                violation.parent_kind,
                violation.description
            )
        })
        .collect()
}
