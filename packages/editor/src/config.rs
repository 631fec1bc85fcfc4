//! Editor configuration.
//!
//! Policy knobs that the canvas hardcodes (edge band thickness, nesting
//! exclusions, undo depth) live here so hosts can tune them.

use pagesmith_document::NodeType;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;
pub const DEFAULT_EDGE_THRESHOLD: f64 = 10.0;

/// Where a direct-drop lands among the container's existing children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectDropPlacement {
    First,
    #[default]
    Last,
}

/// Extra `child` inside `parent` exclusion on top of the built-in rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestingRule {
    pub child: NodeType,
    pub parent: NodeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum undo steps kept (0 = unbounded)
    pub history_limit: usize,

    /// Thickness of the before/after bands at a container's edges, in pixels
    pub edge_threshold: f64,

    pub direct_drop: DirectDropPlacement,

    pub forbidden_nesting: Vec<NestingRule>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            direct_drop: DirectDropPlacement::default(),
            forbidden_nesting: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{
            "historyLimit": 20,
            "forbiddenNesting": [{ "child": "grid", "parent": "grid" }]
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.edge_threshold, DEFAULT_EDGE_THRESHOLD);
        assert_eq!(config.direct_drop, DirectDropPlacement::Last);
        assert_eq!(
            config.forbidden_nesting,
            vec![NestingRule {
                child: NodeType::Grid,
                parent: NodeType::Grid
            }]
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
