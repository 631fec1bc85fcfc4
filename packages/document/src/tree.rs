//! Recursive tree traversals.
//!
//! These walk the whole tree on every call. The editor answers the same
//! questions from its id index; these stay as the reference behaviour and are
//! what tests compare the index against.

use crate::node::Node;

impl Node {
    /// Find a node by id in this subtree
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Find the container directly holding `id`
    pub fn find_parent(&self, id: &str) -> Option<&Node> {
        if self.children().iter().any(|child| child.id == id) {
            return Some(self);
        }
        self.children()
            .iter()
            .find_map(|child| child.find_parent(id))
    }

    /// Ids from this node down to `id`, both inclusive
    pub fn path_to(&self, id: &str) -> Option<Vec<String>> {
        if self.id == id {
            return Some(vec![self.id.clone()]);
        }

        for child in self.children() {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, self.id.clone());
                return Some(path);
            }
        }

        None
    }

    /// Whether `candidate_id` lies strictly below `ancestor_id`
    pub fn is_descendant(&self, ancestor_id: &str, candidate_id: &str) -> bool {
        match self.find(ancestor_id) {
            Some(ancestor) => ancestor
                .children()
                .iter()
                .any(|child| child.find(candidate_id).is_some()),
            None => false,
        }
    }
}
