use pagesmith_document::{ContentOverrides, Node, NodeContent, StyleOverrides};

/// Visitor pattern for traversing a page tree immutably
///
/// Default implementations walk the entire tree depth-first. Override
/// specific visit_* methods to act on nodes; call [`walk_node`] from an
/// overridden `visit_node` to keep descending.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_styles(&mut self, _styles: &StyleOverrides) {
        // Leaf, no children to walk
    }

    fn visit_leaf_content(&mut self, _content: &ContentOverrides) {
        // Leaf, no children to walk
    }
}

/// Mutable visitor pattern for transforming a page tree
pub trait VisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_styles_mut(&mut self, _styles: &mut StyleOverrides) {}

    fn visit_leaf_content_mut(&mut self, _content: &mut ContentOverrides) {}
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    visitor.visit_styles(&node.styles);

    match &node.content {
        NodeContent::Children(children) => {
            for child in children {
                visitor.visit_node(child);
            }
        }
        NodeContent::Leaf(content) => {
            visitor.visit_leaf_content(content);
        }
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    visitor.visit_styles_mut(&mut node.styles);

    match &mut node.content {
        NodeContent::Children(children) => {
            for child in children {
                visitor.visit_node_mut(child);
            }
        }
        NodeContent::Leaf(content) => {
            visitor.visit_leaf_content_mut(content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_document::{NodeType, Overrides};

    fn sample() -> Node {
        Node::root(vec![
            Node::new("a", NodeType::Container).with_child(
                Node::new("b", NodeType::Text).with_content(Overrides::with_base([("text", "hi")])),
            ),
            Node::new("c", NodeType::Button),
        ])
    }

    #[test]
    fn test_walk_is_preorder() {
        #[derive(Default)]
        struct Ids(Vec<String>);
        impl Visitor for Ids {
            fn visit_node(&mut self, node: &Node) {
                self.0.push(node.id.clone());
                walk_node(self, node);
            }
        }

        let mut ids = Ids::default();
        ids.visit_node(&sample());
        assert_eq!(ids.0, vec!["root", "a", "b", "c"]);
    }

    #[test]
    fn test_visitor_sees_leaf_content() {
        struct TextCounter(usize);
        impl Visitor for TextCounter {
            fn visit_leaf_content(&mut self, content: &ContentOverrides) {
                if content.base.contains_key("text") {
                    self.0 += 1;
                }
            }
        }

        let mut counter = TextCounter(0);
        counter.visit_node(&sample());
        assert_eq!(counter.0, 1);
    }

    #[test]
    fn test_visitor_mut_rewrites_styles() {
        struct Stamp;
        impl VisitorMut for Stamp {
            fn visit_styles_mut(&mut self, styles: &mut StyleOverrides) {
                styles.base.insert("outline".into(), "none".into());
            }
        }

        let mut root = sample();
        Stamp.visit_node_mut(&mut root);

        assert_eq!(root.styles.base.get("outline").map(String::as_str), Some("none"));
        assert!(root.find("c").unwrap().styles.base.contains_key("outline"));
    }
}
