use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use rand::Rng;

use crate::state::State;

/// Last observed outcome of taking an action in a state.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reward: f64,
    pub next_state: State,
    pub terminal: bool,
}

/// Deterministic one-step model learned from real transitions: every
/// `(state, action)` maps to the most recent outcome seen for it.
#[derive(Debug, Clone, Default)]
pub struct TransitionModel {
    transitions: IndexMap<(State, usize), Outcome, FxBuildHasher>,
}

impl TransitionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_info(&mut self, state: State, action: usize, outcome: Outcome) {
        self.transitions.insert((state, action), outcome);
    }

    pub fn get(&self, state: &State, action: usize) -> Option<&Outcome> {
        self.transitions.get(&(state.clone(), action))
    }

    /// A uniformly drawn previously observed `(state, action)` and its outcome.
    pub fn get_info<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&State, usize, &Outcome)> {
        if self.transitions.is_empty() {
            return None;
        }
        let pos: usize = rng.gen_range(0..self.transitions.len());
        self.transitions
            .get_index(pos)
            .map(|((state, action), outcome)| (state, *action, outcome))
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
