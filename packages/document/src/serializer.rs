use crate::error::{DocumentError, DocumentResult};
use crate::node::{Node, NodeContent, NodeType, Props};
use std::fmt::Write;

/// Serialize a tree to compact JSON (the persisted shape)
pub fn to_json(node: &Node) -> DocumentResult<String> {
    Ok(serde_json::to_string(node)?)
}

pub fn to_json_pretty(node: &Node) -> DocumentResult<String> {
    Ok(serde_json::to_string_pretty(node)?)
}

pub fn from_json(source: &str) -> DocumentResult<Node> {
    Ok(serde_json::from_str(source)?)
}

/// Parse a list of top-level nodes
pub fn forest_from_json(source: &str) -> DocumentResult<Vec<Node>> {
    Ok(serde_json::from_str(source)?)
}

/// Parse either a full tree (`{"type": "root", ...}`) or a bare forest and
/// return the top-level nodes to hand to `load`.
pub fn parse_document(source: &str) -> DocumentResult<Vec<Node>> {
    let value: serde_json::Value = serde_json::from_str(source)?;

    match value {
        serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
        serde_json::Value::Object(_) => {
            let node: Node = serde_json::from_value(value)?;
            if node.kind != NodeType::Root {
                return Err(DocumentError::unexpected_shape(format!(
                    "a top-level {} node",
                    node.kind
                )));
            }
            match node.content {
                NodeContent::Children(children) => Ok(children),
                NodeContent::Leaf(_) => Err(DocumentError::unexpected_shape("a root without children")),
            }
        }
        other => Err(DocumentError::unexpected_shape(json_kind(&other))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Renders a tree as an indented outline, one node per line:
///
/// ```text
/// root "Body" #root
///   container "Hero" #hero
///     text "Title" #title
/// ```
pub struct OutlineSerializer {
    indent_level: usize,
    indent_string: String,
    show_styles: bool,
}

impl OutlineSerializer {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_string: "  ".to_string(),
            show_styles: false,
        }
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent_string: indent.to_string(),
            ..Self::new()
        }
    }

    /// Also print each node's base style properties
    pub fn show_styles(mut self, show: bool) -> Self {
        self.show_styles = show;
        self
    }

    pub fn serialize(&mut self, node: &Node) -> String {
        let mut output = String::new();
        self.indent_level = 0;
        self.serialize_node(node, &mut output);
        output
    }

    fn serialize_node(&mut self, node: &Node, output: &mut String) {
        self.write_indent(output);
        let _ = write!(output, "{} {:?} #{}", node.kind, node.name, node.id);
        if let Some(layout) = node.layout {
            let _ = write!(output, " [{:?}]", layout);
        }
        output.push('\n');

        self.indent_level += 1;

        if self.show_styles && !node.styles.base.is_empty() {
            self.write_props("style", &node.styles.base, output);
        }

        match &node.content {
            NodeContent::Children(children) => {
                for child in children {
                    self.serialize_node(child, output);
                }
            }
            NodeContent::Leaf(content) => {
                if !content.base.is_empty() {
                    self.write_props("content", &content.base, output);
                }
            }
        }

        self.indent_level -= 1;
    }

    fn write_props(&self, label: &str, props: &Props, output: &mut String) {
        self.write_indent(output);
        output.push_str(label);
        output.push_str(" {");
        for (i, (key, value)) in props.iter().enumerate() {
            if i > 0 {
                output.push(',');
            }
            let _ = write!(output, " {}: {:?}", key, value);
        }
        output.push_str(" }\n");
    }

    fn write_indent(&self, output: &mut String) {
        for _ in 0..self.indent_level {
            output.push_str(&self.indent_string);
        }
    }
}

impl Default for OutlineSerializer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Layout, Overrides};
    use pretty_assertions::assert_eq;

    fn sample() -> Node {
        Node::root(vec![Node::new("hero", NodeType::Container)
            .with_name("Hero")
            .with_layout(Layout::Horizontal)
            .with_styles(Overrides::with_base([("padding", "16px")]))
            .with_child(
                Node::new("title", NodeType::Text)
                    .with_name("Title")
                    .with_content(Overrides::with_base([("text", "Hello")])),
            )])
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let json = to_json(&sample()).unwrap();
        let reparsed = from_json(&json).unwrap();

        assert_eq!(reparsed, sample());
        assert_eq!(to_json(&reparsed).unwrap(), json);
    }

    #[test]
    fn test_json_shape() {
        let json = to_json(&Node::new("t", NodeType::Text)).unwrap();
        assert_eq!(
            json,
            r#"{"id":"t","type":"text","name":"text","styles":{"base":{}},"content":{"base":{}}}"#
        );
    }

    #[test]
    fn test_flat_records_are_rejected() {
        let flat_styles = r#"{"id":"t","type":"text","name":"t","styles":{"color":"red"},"content":{}}"#;
        let flat_content = r#"{"id":"t","type":"text","name":"t","content":{"text":"Hi"}}"#;
        let stray_field = r#"{"id":"t","type":"text","content":{},"visible":true}"#;

        assert!(matches!(from_json(flat_styles), Err(DocumentError::Json(_))));
        assert!(matches!(from_json(flat_content), Err(DocumentError::Json(_))));
        assert!(matches!(from_json(stray_field), Err(DocumentError::Json(_))));
    }

    #[test]
    fn test_layered_records_survive_round_trip() {
        let json = r#"{"id":"t","type":"text","name":"t","styles":{"base":{"color":"red"},"mobile":{"color":"blue"}},"content":{"base":{"text":"Hi"}}}"#;
        let node = from_json(json).unwrap();

        assert_eq!(node.styles.mobile["color"], "blue");
        assert_eq!(to_json(&node).unwrap(), json);
    }

    #[test]
    fn test_parse_document_accepts_root_or_forest() {
        let root_json = to_json(&sample()).unwrap();
        let forest = parse_document(&root_json).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "hero");

        let forest_json = r#"[{"id":"a","type":"button","content":{}}]"#;
        let forest = parse_document(forest_json).unwrap();
        assert_eq!(forest[0].kind, NodeType::Button);
    }

    #[test]
    fn test_parse_document_rejects_other_shapes() {
        assert!(parse_document("42").is_err());
        assert!(parse_document(r#"{"id":"a","type":"text","content":{}}"#).is_err());
    }

    #[test]
    fn test_outline() {
        let outline = OutlineSerializer::new().show_styles(true).serialize(&sample());
        let expected = "root \"Body\" #root\n  container \"Hero\" #hero [Horizontal]\n    style { padding: \"16px\" }\n    text \"Title\" #title\n      content { text: \"Hello\" }\n";
        assert_eq!(outline, expected);
    }
}
