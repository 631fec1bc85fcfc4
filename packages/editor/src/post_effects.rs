//! # Post-Effect System
//!
//! Keeps derived state consistent after the tree changes.
//!
//! ## Design
//!
//! A tree change (commit, undo, redo) can leave selection or hover pointing
//! at nodes that no longer exist. Each post-effect inspects the new state and
//! emits secondary mutations that repair it:
//! - Selected node gone → clear selection
//! - Hovered node gone → clear hover
//!
//! Post-effects are:
//! - **Deterministic**: the same state always yields the same repairs
//! - **Minimal**: only emit mutations when something is dangling
//! - **Non-structural**: repairs never touch the tree, so they never commit history

use crate::errors::EditorError;
use crate::mutations::Mutation;
use crate::policy::ContainmentPolicy;
use crate::state::EditorState;
use tracing::debug;

/// Post-effect run after every tree change
pub trait PostEffect: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Inspect the state and generate repair mutations if needed
    fn analyze(&self, state: &EditorState) -> Vec<Mutation>;
}

#[derive(Debug)]
pub struct ClearDanglingSelection;

impl PostEffect for ClearDanglingSelection {
    fn name(&self) -> &'static str {
        "clear-dangling-selection"
    }

    fn analyze(&self, state: &EditorState) -> Vec<Mutation> {
        match state.selected() {
            Some(id) if !state.snapshot().contains(id) => vec![Mutation::SelectNode { id: None }],
            _ => vec![],
        }
    }
}

#[derive(Debug)]
pub struct ClearDanglingHover;

impl PostEffect for ClearDanglingHover {
    fn name(&self) -> &'static str {
        "clear-dangling-hover"
    }

    fn analyze(&self, state: &EditorState) -> Vec<Mutation> {
        match state.hovered() {
            Some(id) if !state.snapshot().contains(id) => vec![Mutation::HoverNode { id: None }],
            _ => vec![],
        }
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(ClearDanglingSelection), Box::new(ClearDanglingHover)],
        }
    }

    pub fn add_effect(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Collect the repairs every effect asks for
    pub fn analyze(&self, state: &EditorState) -> Vec<Mutation> {
        let mut secondary_mutations = Vec::new();

        for effect in &self.effects {
            let mut effect_mutations = effect.analyze(state);
            if !effect_mutations.is_empty() {
                debug!(effect = effect.name(), count = effect_mutations.len(), "Post-effect triggered");
            }
            secondary_mutations.append(&mut effect_mutations);
        }

        secondary_mutations
    }

    /// Apply all repairs to `state`
    pub fn settle(&self, state: EditorState, policy: &ContainmentPolicy) -> Result<EditorState, EditorError> {
        let mut state = state;
        for secondary in self.analyze(&state) {
            state = secondary.apply(&state, policy)?;
        }
        Ok(state)
    }

    /// Apply a mutation with all its post-effects.
    ///
    /// Returns the settled state and every mutation applied, primary first.
    pub fn apply_with_effects(
        &self,
        mutation: &Mutation,
        state: &EditorState,
        policy: &ContainmentPolicy,
    ) -> Result<(EditorState, Vec<Mutation>), EditorError> {
        let mut applied_mutations = vec![mutation.clone()];
        let mut next = mutation.apply(state, policy)?;

        for secondary in self.analyze(&next) {
            next = secondary.apply(&next, policy)?;
            applied_mutations.push(secondary);
        }

        Ok((next, applied_mutations))
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
