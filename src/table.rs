use fxhash::FxHashMap;

use crate::state::State;

/// Per-state rows of one value per action, with an implicit default for rows
/// that were never written.
#[derive(Debug, Clone)]
pub struct Table<V: Copy> {
    default: Vec<V>,
    values: FxHashMap<State, Vec<V>>,
}

/// Action-value estimates `Q(s, a)`, `0.0` until updated.
pub type ActionValues = Table<f64>;

/// Number of updates applied to each `(s, a)` pair, `0` until counted.
pub type VisitCounts = Table<u32>;

impl<V: Copy> Table<V> {
    pub fn new(n_actions: usize, default_value: V) -> Self {
        Self {
            default: vec![default_value; n_actions],
            values: FxHashMap::default(),
        }
    }

    /// Row of `state`, the default row if it was never written. Never inserts.
    pub fn row(&self, state: &State) -> &[V] {
        self.values.get(state).unwrap_or(&self.default)
    }

    pub fn get(&self, state: &State, action: usize) -> V {
        self.row(state)[action]
    }

    /// Mutable access to `(state, action)`, inserting the default row on first access.
    pub fn get_mut(&mut self, state: &State, action: usize) -> &mut V {
        let default = &self.default;
        &mut self
            .values
            .entry(state.clone())
            .or_insert_with(|| default.clone())[action]
    }

    pub fn set(&mut self, state: &State, action: usize, value: V) {
        *self.get_mut(state, action) = value;
    }

    pub fn contains(&self, state: &State) -> bool {
        self.values.contains_key(state)
    }

    /// Number of states with at least one written entry.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Table<f64> {
    pub fn max(&self, state: &State) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fingerprint;
    use ndarray::array;

    fn state(c: u8) -> State {
        fingerprint(&array![[c]]).unwrap()
    }

    #[test]
    fn lookups_default_without_inserting() {
        let table = ActionValues::new(4, 0.0);
        assert_eq!(table.get(&state(b'a'), 3), 0.0);
        assert_eq!(table.row(&state(b'a')), &[0.0; 4]);
        assert!(table.is_empty());
    }

    #[test]
    fn writes_insert_on_first_access() {
        let mut counts = VisitCounts::new(2, 0);
        *counts.get_mut(&state(b'a'), 1) += 1;
        *counts.get_mut(&state(b'a'), 1) += 1;
        assert_eq!(counts.get(&state(b'a'), 1), 2);
        assert_eq!(counts.get(&state(b'a'), 0), 0);
        assert!(counts.contains(&state(b'a')));
        assert!(!counts.contains(&state(b'b')));
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn max_over_actions() {
        let mut q = ActionValues::new(3, 0.0);
        q.set(&state(b'a'), 0, -2.0);
        q.set(&state(b'a'), 1, -1.0);
        q.set(&state(b'a'), 2, -3.0);
        assert_eq!(q.max(&state(b'a')), -1.0);
        assert_eq!(q.max(&state(b'b')), 0.0);
    }
}
