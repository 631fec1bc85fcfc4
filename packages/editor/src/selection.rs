//! Hierarchy queries around the current selection, used by the canvas to
//! draw selection, hover and ancestor outlines.
//!
//! The selected path is computed once per view, so every query is O(depth).
//! Unknown ids answer `false` / `None`.

use crate::index::NodeIndex;
use crate::state::EditorState;
use serde::Serialize;

/// How a node relates to the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Highlight {
    Selected,
    DirectParent,
    Ancestor,
    DirectChild,
    Descendant,
    Hovered,
}

#[derive(Debug, Clone)]
pub struct HierarchyView<'a> {
    index: &'a NodeIndex,
    selected: Option<&'a str>,
    hovered: Option<&'a str>,
    /// Root → selected, inclusive; empty when nothing valid is selected
    selected_path: Vec<String>,
}

impl<'a> HierarchyView<'a> {
    pub fn new(index: &'a NodeIndex, selected: Option<&'a str>, hovered: Option<&'a str>) -> Self {
        let selected_path = selected.and_then(|id| index.path_to(id)).unwrap_or_default();
        Self {
            index,
            selected,
            hovered,
            selected_path,
        }
    }

    pub fn from_state(state: &'a EditorState) -> Self {
        Self::new(state.snapshot().index(), state.selected(), state.hovered())
    }

    pub fn selected_path(&self) -> &[String] {
        &self.selected_path
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.index.depth_of(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected == Some(id) && self.index.contains(id)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered == Some(id) && self.index.contains(id)
    }

    pub fn is_ancestor_of_selected(&self, id: &str) -> bool {
        match self.selected_path.split_last() {
            Some((_, ancestors)) => ancestors.iter().any(|a| a == id),
            None => false,
        }
    }

    pub fn is_direct_parent_of_selected(&self, id: &str) -> bool {
        let len = self.selected_path.len();
        len >= 2 && self.selected_path[len - 2] == id
    }

    pub fn is_descendant_of_selected(&self, id: &str) -> bool {
        match self.selected_path.last() {
            Some(selected) => self.index.is_descendant(selected, id),
            None => false,
        }
    }

    pub fn is_direct_child_of_selected(&self, id: &str) -> bool {
        match (self.selected_path.last(), self.index.parent_of(id)) {
            (Some(selected), Some(parent)) => parent == selected,
            _ => false,
        }
    }

    /// Strongest relation of `id` to the selection, then hover
    pub fn highlight(&self, id: &str) -> Option<Highlight> {
        if self.is_selected(id) {
            Some(Highlight::Selected)
        } else if self.is_direct_parent_of_selected(id) {
            Some(Highlight::DirectParent)
        } else if self.is_ancestor_of_selected(id) {
            Some(Highlight::Ancestor)
        } else if self.is_direct_child_of_selected(id) {
            Some(Highlight::DirectChild)
        } else if self.is_descendant_of_selected(id) {
            Some(Highlight::Descendant)
        } else if self.is_hovered(id) {
            Some(Highlight::Hovered)
        } else {
            None
        }
    }
}
