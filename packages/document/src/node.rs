use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Id of the implicit root created when a forest is loaded
pub const ROOT_ID: &str = "root";

/// Property map used by every override layer (style or content)
pub type Props = BTreeMap<String, String>;

/// Viewport class used to pick an override layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl ViewportClass {
    pub const ALL: [ViewportClass; 3] = [Self::Desktop, Self::Tablet, Self::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewportClass::Desktop => "desktop",
            ViewportClass::Tablet => "tablet",
            ViewportClass::Mobile => "mobile",
        }
    }
}

impl fmt::Display for ViewportClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewportClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "tablet" => Ok(Self::Tablet),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!(
                "Invalid viewport: {}. Use: desktop, tablet, or mobile",
                other
            )),
        }
    }
}

/// Element type tag (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Root,
    Container,
    Grid,
    Column,
    Text,
    Heading,
    Link,
    Button,
    Media,
}

impl NodeType {
    /// Whether nodes of this type hold children instead of leaf content
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeType::Root | NodeType::Container | NodeType::Grid | NodeType::Column
        )
    }

    /// Orientation used when a node carries no explicit layout
    pub fn default_layout(&self) -> Layout {
        match self {
            NodeType::Grid => Layout::Horizontal,
            _ => Layout::Vertical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Container => "container",
            NodeType::Grid => "grid",
            NodeType::Column => "column",
            NodeType::Text => "text",
            NodeType::Heading => "heading",
            NodeType::Link => "link",
            NodeType::Button => "button",
            NodeType::Media => "media",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flow orientation for container children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Horizontal,
    Vertical,
}

/// Per-viewport override layers. `base` is the Desktop record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Overrides {
    #[serde(default)]
    pub base: Props,
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub tablet: Props,
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub mobile: Props,
}

pub type StyleOverrides = Overrides;
pub type ContentOverrides = Overrides;

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build overrides with only a base layer
    pub fn with_base<K, V>(props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            base: props
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// The layer written when editing at `viewport`
    pub fn layer(&self, viewport: ViewportClass) -> &Props {
        match viewport {
            ViewportClass::Desktop => &self.base,
            ViewportClass::Tablet => &self.tablet,
            ViewportClass::Mobile => &self.mobile,
        }
    }

    pub fn layer_mut(&mut self, viewport: ViewportClass) -> &mut Props {
        match viewport {
            ViewportClass::Desktop => &mut self.base,
            ViewportClass::Tablet => &mut self.tablet,
            ViewportClass::Mobile => &mut self.mobile,
        }
    }

    /// Merge a partial record into one layer (keys are replaced, never removed)
    pub fn merge(&mut self, viewport: ViewportClass, partial: &Props) {
        let layer = self.layer_mut(viewport);
        for (key, value) in partial {
            layer.insert(key.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.tablet.is_empty() && self.mobile.is_empty()
    }
}

/// Node content: ordered children for containers, leaf record otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeContent {
    Children(Vec<Node>),
    Leaf(ContentOverrides),
}

impl Default for NodeContent {
    fn default() -> Self {
        NodeContent::Children(Vec::new())
    }
}

/// Document tree element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub styles: StyleOverrides,
    pub content: NodeContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl Node {
    /// Create an empty node whose content shape follows `kind`
    pub fn new(id: impl Into<String>, kind: NodeType) -> Self {
        let content = if kind.is_container() {
            NodeContent::Children(Vec::new())
        } else {
            NodeContent::Leaf(ContentOverrides::default())
        };

        Self {
            id: id.into(),
            kind,
            name: kind.as_str().to_string(),
            styles: StyleOverrides::default(),
            content,
            layout: None,
        }
    }

    /// Create a root node holding `children`
    pub fn root(children: Vec<Node>) -> Self {
        Self {
            id: ROOT_ID.to_string(),
            kind: NodeType::Root,
            name: "Body".to_string(),
            styles: StyleOverrides::default(),
            content: NodeContent::Children(children),
            layout: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_styles(mut self, styles: StyleOverrides) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Replace leaf content. No effect on containers.
    pub fn with_content(mut self, content: ContentOverrides) -> Self {
        if let NodeContent::Leaf(existing) = &mut self.content {
            *existing = content;
        }
        self
    }

    /// Append a child. No effect on leaves.
    pub fn with_child(mut self, child: Node) -> Self {
        if let NodeContent::Children(children) = &mut self.content {
            children.push(child);
        }
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Whether the content shape agrees with the type
    pub fn content_matches_kind(&self) -> bool {
        matches!(
            (&self.content, self.kind.is_container()),
            (NodeContent::Children(_), true) | (NodeContent::Leaf(_), false)
        )
    }

    /// Effective orientation (explicit layout or the type default)
    pub fn orientation(&self) -> Layout {
        self.layout.unwrap_or_else(|| self.kind.default_layout())
    }

    /// Children of a container; leaves have none
    pub fn children(&self) -> &[Node] {
        match &self.content {
            NodeContent::Children(children) => children,
            NodeContent::Leaf(_) => &[],
        }
    }

    /// Mutable children (`None` for leaves)
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.content {
            NodeContent::Children(children) => Some(children),
            NodeContent::Leaf(_) => None,
        }
    }

    /// Leaf content record (`None` for containers)
    pub fn leaf_content(&self) -> Option<&ContentOverrides> {
        match &self.content {
            NodeContent::Leaf(content) => Some(content),
            NodeContent::Children(_) => None,
        }
    }

    pub fn leaf_content_mut(&mut self) -> Option<&mut ContentOverrides> {
        match &mut self.content {
            NodeContent::Leaf(content) => Some(content),
            NodeContent::Children(_) => None,
        }
    }

    /// Follow a route of child positions from this node
    pub fn node_at(&self, route: &[usize]) -> Option<&Node> {
        let mut current = self;
        for &position in route {
            current = current.children().get(position)?;
        }
        Some(current)
    }

    pub fn node_at_mut(&mut self, route: &[usize]) -> Option<&mut Node> {
        let mut current = self;
        for &position in route {
            current = current.children_mut()?.get_mut(position)?;
        }
        Some(current)
    }

    /// Number of nodes in this subtree (inclusive)
    pub fn subtree_size(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_size).sum::<usize>()
    }

    /// Ids in this subtree, depth-first pre-order
    pub fn subtree_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<String>) {
        ids.push(self.id.clone());
        for child in self.children() {
            child.collect_ids(ids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_content_follows_kind() {
        let container = Node::new("c", NodeType::Container);
        let text = Node::new("t", NodeType::Text);

        assert!(matches!(container.content, NodeContent::Children(_)));
        assert!(matches!(text.content, NodeContent::Leaf(_)));
        assert!(container.content_matches_kind());
        assert!(text.content_matches_kind());
    }

    #[test]
    fn test_mismatched_content_detected() {
        let mut text = Node::new("t", NodeType::Text);
        text.content = NodeContent::Children(vec![]);
        assert!(!text.content_matches_kind());
    }

    #[test]
    fn test_orientation_defaults() {
        assert_eq!(Node::new("g", NodeType::Grid).orientation(), Layout::Horizontal);
        assert_eq!(Node::new("c", NodeType::Container).orientation(), Layout::Vertical);
        assert_eq!(
            Node::new("c", NodeType::Container)
                .with_layout(Layout::Horizontal)
                .orientation(),
            Layout::Horizontal
        );
    }

    #[test]
    fn test_merge_keeps_other_keys() {
        let mut overrides = Overrides::with_base([("color", "red"), ("margin", "4px")]);
        let mut partial = Props::new();
        partial.insert("color".to_string(), "blue".to_string());

        overrides.merge(ViewportClass::Desktop, &partial);

        assert_eq!(overrides.base.get("color").map(String::as_str), Some("blue"));
        assert_eq!(overrides.base.get("margin").map(String::as_str), Some("4px"));
        assert!(overrides.tablet.is_empty());
    }

    #[test]
    fn test_node_at_route() {
        let root = Node::root(vec![
            Node::new("a", NodeType::Container).with_child(Node::new("b", NodeType::Text)),
        ]);

        assert_eq!(root.node_at(&[0, 0]).map(|n| n.id.as_str()), Some("b"));
        assert!(root.node_at(&[0, 1]).is_none());
        assert!(root.node_at(&[0, 0, 0]).is_none());
        assert_eq!(root.subtree_size(), 3);
    }

    #[test]
    fn test_viewport_from_str() {
        assert_eq!("Tablet".parse::<ViewportClass>(), Ok(ViewportClass::Tablet));
        assert!("watch".parse::<ViewportClass>().is_err());
    }
}
