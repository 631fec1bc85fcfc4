use crate::loader::open_page;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_common::{write_document, RealFileSystem};
use pagesmith_document::to_json_pretty;
use pagesmith_editor::{Editor, Mutation};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Page document to edit
    pub document: PathBuf,

    /// JSON array of operations
    pub ops: PathBuf,

    /// Write the result here instead of overwriting the document
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print the resulting tree instead of writing it
    #[arg(long)]
    pub stdout: bool,
}

/// One entry of an ops file: a history command or a mutation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    History(HistoryStep),
    Mutation(Mutation),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum HistoryStep {
    Undo,
    Redo,
    BeginBatch {
        #[serde(default)]
        description: Option<String>,
    },
    EndBatch,
}

#[derive(Debug, Default, PartialEq)]
pub struct ApplySummary {
    pub steps: usize,
    pub committed: usize,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let mut page = open_page(cwd, Some(&args.document))?;

    let ops_path = PathBuf::from(cwd).join(&args.ops);
    let source = fs::read_to_string(&ops_path).with_context(|| format!("Failed to read {}", ops_path.display()))?;
    let steps: Vec<Step> =
        serde_json::from_str(&source).with_context(|| format!("{} is not a valid ops file", ops_path.display()))?;

    let summary = run_steps(&mut page.editor, steps)?;
    info!(steps = summary.steps, committed = summary.committed, "Applied ops");

    let root = page.editor.snapshot().root();
    if args.stdout {
        println!("{}", to_json_pretty(root)?);
        return Ok(());
    }

    let out_path = args.out.map(|out| PathBuf::from(cwd).join(out)).unwrap_or(page.path);
    write_document(&mut RealFileSystem, &out_path, root)?;

    println!(
        "  {} Applied {} steps ({} committed) → {}",
        "✓".green(),
        summary.steps,
        summary.committed,
        out_path.display()
    );

    Ok(())
}

/// Run every step in order, stopping at the first failure
pub fn run_steps(editor: &mut Editor, steps: Vec<Step>) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    for (i, step) in steps.into_iter().enumerate() {
        let label = match &step {
            Step::History(history) => format!("{:?}", history),
            Step::Mutation(mutation) => mutation.name().to_string(),
        };

        match step {
            Step::Mutation(mutation) => {
                let result = editor
                    .dispatch(mutation)
                    .with_context(|| format!("Step {} ({}) failed", i + 1, label))?;
                if result.committed {
                    summary.committed += 1;
                }
            }
            Step::History(HistoryStep::Undo) => {
                editor.undo().with_context(|| format!("Step {} (undo) failed", i + 1))?;
            }
            Step::History(HistoryStep::Redo) => {
                editor.redo().with_context(|| format!("Step {} (redo) failed", i + 1))?;
            }
            Step::History(HistoryStep::BeginBatch { description }) => editor.begin_batch(description),
            Step::History(HistoryStep::EndBatch) => editor.end_batch(),
        }

        summary.steps += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_editor::{EditorConfig, Node, NodeType};

    fn editor() -> Editor {
        Editor::from_nodes(vec![Node::new("c", NodeType::Container)], EditorConfig::default()).unwrap()
    }

    fn steps(json: &str) -> Vec<Step> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let parsed = steps(
            r#"[
                {"op":"undo"},
                {"op":"beginBatch","description":"Hero"},
                {"op":"deleteNode","id":"c"},
                {"op":"endBatch"}
            ]"#,
        );

        assert_eq!(parsed[0], Step::History(HistoryStep::Undo));
        assert_eq!(
            parsed[1],
            Step::History(HistoryStep::BeginBatch {
                description: Some("Hero".to_string())
            })
        );
        assert_eq!(parsed[2], Step::Mutation(Mutation::DeleteNode { id: "c".to_string() }));
        assert_eq!(parsed[3], Step::History(HistoryStep::EndBatch));
    }

    #[test]
    fn test_run_steps_with_undo() {
        let mut editor = editor();
        let summary = run_steps(
            &mut editor,
            steps(
                r#"[
                    {"op":"addChild","containerId":"c","node":{"id":"t","type":"text","content":{}}},
                    {"op":"moveNode","id":"t","containerId":"root","index":0},
                    {"op":"undo"},
                    {"op":"selectNode","id":"t"}
                ]"#,
            ),
        )
        .unwrap();

        assert_eq!(summary, ApplySummary { steps: 4, committed: 2 });
        assert_eq!(editor.snapshot().find_parent("t").unwrap().id, "c");
        assert_eq!(editor.selection(), Some("t"));
    }

    #[test]
    fn test_failed_step_is_reported() {
        let mut editor = editor();
        let err = run_steps(&mut editor, steps(r#"[{"op":"redo"}]"#)).unwrap_err();
        assert!(format!("{:#}", err).contains("Step 1 (redo) failed: Nothing to redo"));

        let err = run_steps(&mut editor, steps(r#"[{"op":"deleteNode","id":"nope"}]"#)).unwrap_err();
        assert!(format!("{:#}", err).contains("Node not found: nope"));
    }

    #[test]
    fn test_apply_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(dir.path().join("page.json"), r#"[{"id":"c","type":"container","content":[]}]"#).unwrap();
        fs::write(dir.path().join("ops.json"), r#"[{"op":"renameNode","id":"c","name":"Main"}]"#).unwrap();

        apply(
            ApplyArgs {
                document: PathBuf::from("page.json"),
                ops: PathBuf::from("ops.json"),
                out: Some(PathBuf::from("out/page.json")),
                stdout: false,
            },
            cwd,
        )
        .unwrap();

        let written = fs::read_to_string(dir.path().join("out/page.json")).unwrap();
        assert!(written.contains("\"name\": \"Main\""));
    }
}
