use crate::loader::open_page;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_common::{walk_node, Visitor};
use pagesmith_document::{OutlineSerializer, ViewportClass};
use pagesmith_editor::{origin_of, resolve_subtree, Node, Resolved};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Page document (defaults to the configured document)
    pub document: Option<PathBuf>,

    /// Viewport class to resolve styles for (desktop, tablet, mobile)
    #[arg(short, long, default_value = "desktop")]
    pub viewport: ViewportClass,

    /// Print resolved styles and content for every node
    #[arg(short, long)]
    pub styles: bool,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let page = open_page(cwd, args.document.as_deref())?;
    let root = page.editor.snapshot().root();

    println!(
        "{} {} ({} nodes)",
        "📄".bright_blue(),
        page.path.display().to_string().bright_white(),
        page.editor.snapshot().len()
    );
    println!();
    print!("{}", OutlineSerializer::new().serialize(root));

    if args.styles {
        println!();
        println!("{} {}", "Resolved for".bright_blue().bold(), args.viewport.to_string().bold());
        print!("{}", render_resolved(root, args.viewport));
    }

    Ok(())
}

/// One block per node in document order; values inherited from a wider
/// layer are marked with the layer they come from
fn render_resolved(root: &Node, viewport: ViewportClass) -> String {
    let mut report = ResolvedReport {
        resolved: resolve_subtree(root, viewport),
        viewport,
        output: String::new(),
    };
    report.visit_node(root);
    report.output
}

struct ResolvedReport {
    resolved: HashMap<String, Resolved>,
    viewport: ViewportClass,
    output: String,
}

impl Visitor for ResolvedReport {
    fn visit_node(&mut self, node: &Node) {
        if let Some(values) = self.resolved.get(&node.id) {
            if !values.styles.is_empty() || !values.content.is_empty() {
                self.output.push_str(&format!("  #{}\n", node.id));
                for (key, value) in &values.styles {
                    let origin = origin_of(&node.styles, key, self.viewport).unwrap_or(self.viewport);
                    self.output.push_str(&format!(
                        "    style   {}: {}{}\n",
                        key,
                        value,
                        origin_note(origin, self.viewport)
                    ));
                }
                if let Some(content) = node.leaf_content() {
                    for (key, value) in &values.content {
                        let origin = origin_of(content, key, self.viewport).unwrap_or(self.viewport);
                        self.output.push_str(&format!(
                            "    content {}: {:?}{}\n",
                            key,
                            value,
                            origin_note(origin, self.viewport)
                        ));
                    }
                }
            }
        }
        walk_node(self, node);
    }
}

fn origin_note(origin: ViewportClass, viewport: ViewportClass) -> String {
    if origin == viewport {
        String::new()
    } else {
        format!(" (from {})", origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_document::{NodeType, Overrides};

    #[test]
    fn test_render_resolved_marks_inherited_values() {
        let root = Node::root(vec![Node::new("t", NodeType::Text)
            .with_styles(Overrides {
                base: [("color".to_string(), "red".to_string())].into(),
                tablet: [("color".to_string(), "blue".to_string())].into(),
                ..Overrides::default()
            })
            .with_content(Overrides::with_base([("text", "Hi")]))]);

        let output = render_resolved(&root, ViewportClass::Mobile);
        assert!(output.contains("#t"));
        assert!(output.contains("style   color: blue (from tablet)"));
        assert!(output.contains("content text: \"Hi\" (from desktop)"));
        assert!(!output.contains("#root"));
    }

    #[test]
    fn test_render_resolved_follows_document_order() {
        let styled = |id: &str| Node::new(id, NodeType::Button).with_styles(Overrides::with_base([("color", "red")]));
        let root = Node::root(vec![
            Node::new("a", NodeType::Container).with_child(styled("a1")),
            styled("b"),
        ]);

        let output = render_resolved(&root, ViewportClass::Desktop);
        let a1 = output.find("#a1").unwrap();
        let b = output.find("#b").unwrap();
        assert!(a1 < b);
        assert!(!output.contains("#a\n"));
    }
}
