//! # Containment Policy
//!
//! Rules deciding which node types may be nested inside which containers.
//! Both the drop-target resolver and the mutation engine consult the same
//! policy, so a forbidden pair is rejected whether it arrives from a drag or
//! from a direct `add_child`/`move_node` call.

use crate::config::{EditorConfig, NestingRule};
use crate::errors::EditorError;
use pagesmith_common::{walk_node, Visitor};
use pagesmith_document::{Node, NodeType};

/// A single nesting rule
pub trait ContainmentRule: std::fmt::Debug + Send + Sync {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Whether a `child` node may live directly inside a `parent` container
    fn allows(&self, child: NodeType, parent: NodeType) -> bool;
}

/// Columns split a row; a column inside a column is never meaningful
#[derive(Debug)]
pub struct NoNestedColumns;

impl ContainmentRule for NoNestedColumns {
    fn name(&self) -> &'static str {
        "no-nested-columns"
    }

    fn description(&self) -> &'static str {
        "A column cannot be dropped into another column"
    }

    fn allows(&self, child: NodeType, parent: NodeType) -> bool {
        !(child == NodeType::Column && parent == NodeType::Column)
    }
}

#[derive(Debug)]
pub struct RootIsTopLevel;

impl ContainmentRule for RootIsTopLevel {
    fn name(&self) -> &'static str {
        "root-is-top-level"
    }

    fn description(&self) -> &'static str {
        "The page root cannot be nested"
    }

    fn allows(&self, child: NodeType, _parent: NodeType) -> bool {
        child != NodeType::Root
    }
}

/// Configured exclusion of one child/parent pair
#[derive(Debug)]
pub struct ForbiddenPair(pub NestingRule);

impl ContainmentRule for ForbiddenPair {
    fn name(&self) -> &'static str {
        "forbidden-nesting"
    }

    fn description(&self) -> &'static str {
        "Nesting pair excluded by configuration"
    }

    fn allows(&self, child: NodeType, parent: NodeType) -> bool {
        !(child == self.0.child && parent == self.0.parent)
    }
}

/// Registry of containment rules
#[derive(Debug)]
pub struct ContainmentPolicy {
    rules: Vec<Box<dyn ContainmentRule>>,
}

impl ContainmentPolicy {
    /// Create a policy with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(RootIsTopLevel), Box::new(NoNestedColumns)],
        }
    }

    /// Built-in rules plus the config's extra exclusions
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut policy = Self::new();
        for rule in &config.forbidden_nesting {
            policy.add_rule(Box::new(ForbiddenPair(*rule)));
        }
        policy
    }

    /// Create an empty policy
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: Box<dyn ContainmentRule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn ContainmentRule>] {
        &self.rules
    }

    /// First rule forbidding the pair, if any
    pub fn violation(&self, child: NodeType, parent: NodeType) -> Option<&dyn ContainmentRule> {
        self.rules
            .iter()
            .find(|rule| !rule.allows(child, parent))
            .map(|rule| rule.as_ref())
    }

    pub fn allows(&self, child: NodeType, parent: NodeType) -> bool {
        self.violation(child, parent).is_none()
    }

    pub fn check(&self, child: NodeType, parent: NodeType) -> Result<(), EditorError> {
        match self.violation(child, parent) {
            Some(rule) => Err(EditorError::IncompatibleContainment {
                child,
                parent,
                rule: rule.name(),
            }),
            None => Ok(()),
        }
    }

    /// Check a whole subtree about to be placed under `parent`: the subtree
    /// root against `parent`, then every parent/child pair inside it.
    pub fn check_subtree(&self, node: &Node, parent: NodeType) -> Result<(), EditorError> {
        self.check(node.kind, parent)?;
        match self.audit(node).into_iter().next() {
            Some(violation) => Err(violation.into_error()),
            None => Ok(()),
        }
    }

    /// Every parent/child pair below `root` that a rule forbids, in pre-order
    pub fn audit(&self, root: &Node) -> Vec<NestingViolation> {
        let mut audit = NestingAudit {
            policy: self,
            violations: Vec::new(),
        };
        audit.visit_node(root);
        audit.violations
    }
}

/// A forbidden pair found in an existing tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingViolation {
    pub child_id: String,
    pub child_kind: NodeType,
    pub parent_id: String,
    pub parent_kind: NodeType,
    pub rule: &'static str,
    pub description: &'static str,
}

impl NestingViolation {
    pub fn into_error(self) -> EditorError {
        EditorError::IncompatibleContainment {
            child: self.child_kind,
            parent: self.parent_kind,
            rule: self.rule,
        }
    }
}

struct NestingAudit<'a> {
    policy: &'a ContainmentPolicy,
    violations: Vec<NestingViolation>,
}

impl Visitor for NestingAudit<'_> {
    fn visit_node(&mut self, node: &Node) {
        for child in node.children() {
            if let Some(rule) = self.policy.violation(child.kind, node.kind) {
                self.violations.push(NestingViolation {
                    child_id: child.id.clone(),
                    child_kind: child.kind,
                    parent_id: node.id.clone(),
                    parent_kind: node.kind,
                    rule: rule.name(),
                    description: rule.description(),
                });
            }
        }
        walk_node(self, node);
    }
}

impl Default for ContainmentPolicy {
    fn default() -> Self {
        Self::new()
    }
}
