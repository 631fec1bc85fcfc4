//! # Style/Content Resolution
//!
//! Computes the effective style and content of a node for a viewport class.
//!
//! Cascade order is fixed: base → tablet → mobile. Each narrower layer only
//! shadows keys; it never removes a key set by a wider layer. Missing layers
//! are empty overlays. Everything here is pure and safe to call per render.

use pagesmith_document::{Node, Overrides, Props, ViewportClass};
use std::collections::HashMap;

pub type EffectiveStyle = Props;
pub type EffectiveContent = Props;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolved {
    pub styles: EffectiveStyle,
    pub content: EffectiveContent,
}

/// Layers that apply at `viewport`, widest first
fn layers(viewport: ViewportClass) -> &'static [ViewportClass] {
    match viewport {
        ViewportClass::Desktop => &[ViewportClass::Desktop],
        ViewportClass::Tablet => &[ViewportClass::Desktop, ViewportClass::Tablet],
        ViewportClass::Mobile => &[
            ViewportClass::Desktop,
            ViewportClass::Tablet,
            ViewportClass::Mobile,
        ],
    }
}

/// Flatten an override structure for one viewport
pub fn cascade(overrides: &Overrides, viewport: ViewportClass) -> Props {
    let mut effective = Props::new();
    for layer in layers(viewport) {
        for (key, value) in overrides.layer(*layer) {
            effective.insert(key.clone(), value.clone());
        }
    }
    effective
}

/// Which layer supplies the effective value of `key` at `viewport`
pub fn origin_of(overrides: &Overrides, key: &str, viewport: ViewportClass) -> Option<ViewportClass> {
    layers(viewport)
        .iter()
        .rev()
        .find(|layer| overrides.layer(**layer).contains_key(key))
        .copied()
}

pub fn resolve_style(node: &Node, viewport: ViewportClass) -> EffectiveStyle {
    cascade(&node.styles, viewport)
}

/// Leaf content for `viewport`; containers resolve to an empty record
pub fn resolve_content(node: &Node, viewport: ViewportClass) -> EffectiveContent {
    node.leaf_content()
        .map(|content| cascade(content, viewport))
        .unwrap_or_default()
}

pub fn resolve(node: &Node, viewport: ViewportClass) -> Resolved {
    Resolved {
        styles: resolve_style(node, viewport),
        content: resolve_content(node, viewport),
    }
}

/// Resolve every node of a subtree, keyed by id
pub fn resolve_subtree(root: &Node, viewport: ViewportClass) -> HashMap<String, Resolved> {
    let mut resolved = HashMap::new();
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        resolved.insert(node.id.clone(), resolve(node, viewport));
        pending.extend(node.children());
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_document::NodeType;

    fn props(pairs: &[(&str, &str)]) -> Props {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn styled(base: &[(&str, &str)], tablet: &[(&str, &str)], mobile: &[(&str, &str)]) -> Node {
        Node::new("n", NodeType::Container).with_styles(Overrides {
            base: props(base),
            tablet: props(tablet),
            mobile: props(mobile),
        })
    }

    #[test]
    fn test_mobile_falls_back_to_tablet() {
        let node = styled(&[("color", "red")], &[("color", "blue")], &[]);

        assert_eq!(resolve_style(&node, ViewportClass::Desktop)["color"], "red");
        assert_eq!(resolve_style(&node, ViewportClass::Tablet)["color"], "blue");
        assert_eq!(resolve_style(&node, ViewportClass::Mobile)["color"], "blue");
    }

    #[test]
    fn test_base_only_keys_visible_everywhere() {
        let node = styled(&[("margin", "0")], &[("color", "blue")], &[("color", "green")]);

        for viewport in ViewportClass::ALL {
            assert_eq!(resolve_style(&node, viewport)["margin"], "0");
        }
        assert!(!resolve_style(&node, ViewportClass::Desktop).contains_key("color"));
        assert_eq!(resolve_style(&node, ViewportClass::Mobile)["color"], "green");
    }

    #[test]
    fn test_mobile_override_does_not_leak_upwards() {
        let node = styled(&[("color", "red")], &[], &[("color", "green")]);

        assert_eq!(resolve_style(&node, ViewportClass::Tablet)["color"], "red");
        assert_eq!(resolve_style(&node, ViewportClass::Mobile)["color"], "green");
    }

    #[test]
    fn test_content_cascade_and_containers() {
        let text = Node::new("t", NodeType::Text).with_content(Overrides {
            base: props(&[("text", "Welcome to our store")]),
            tablet: Props::new(),
            mobile: props(&[("text", "Welcome")]),
        });

        assert_eq!(resolve_content(&text, ViewportClass::Tablet)["text"], "Welcome to our store");
        assert_eq!(resolve_content(&text, ViewportClass::Mobile)["text"], "Welcome");

        let container = Node::new("c", NodeType::Container);
        assert!(resolve_content(&container, ViewportClass::Mobile).is_empty());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let node = styled(&[("a", "1")], &[("b", "2")], &[("a", "3")]);
        let first = resolve(&node, ViewportClass::Mobile);
        let second = resolve(&node, ViewportClass::Mobile);
        assert_eq!(first, second);
    }

    #[test]
    fn test_origin_of() {
        let node = styled(&[("color", "red"), ("gap", "1px")], &[("color", "blue")], &[]);

        assert_eq!(origin_of(&node.styles, "color", ViewportClass::Mobile), Some(ViewportClass::Tablet));
        assert_eq!(origin_of(&node.styles, "color", ViewportClass::Desktop), Some(ViewportClass::Desktop));
        assert_eq!(origin_of(&node.styles, "gap", ViewportClass::Mobile), Some(ViewportClass::Desktop));
        assert_eq!(origin_of(&node.styles, "missing", ViewportClass::Mobile), None);
    }

    #[test]
    fn test_resolve_subtree() {
        let root = Node::root(vec![styled(&[("color", "red")], &[], &[])]);
        let resolved = resolve_subtree(&root, ViewportClass::Desktop);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["n"].styles["color"], "red");
    }
}
