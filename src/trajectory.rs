use crate::error::AgentError;
use crate::state::State;

/// Append-only log of the current episode.
///
/// Rewards follow the action they answer: `rewards[t]` is what the environment
/// returned after `actions[t]` was taken in `states[t]`.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    pub states: Vec<State>,
    pub actions: Vec<usize>,
    pub rewards: Vec<f64>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.actions.clear();
        self.rewards.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.actions.is_empty() && self.rewards.is_empty()
    }

    /// Number of complete `(state, action, reward)` steps, or an error if the
    /// three buffers disagree.
    pub fn aligned_len(&self) -> Result<usize, AgentError> {
        let (states, actions, rewards) = (self.states.len(), self.actions.len(), self.rewards.len());
        if states == actions && actions == rewards {
            Ok(states)
        } else {
            Err(AgentError::TrajectoryMismatch {
                states,
                actions,
                rewards,
            })
        }
    }

    /// `(S[t], A[t], R[t])` once the reward of step `t` was recorded.
    pub fn step(&self, t: usize) -> Result<(&State, usize, f64), AgentError> {
        match (self.states.get(t), self.actions.get(t), self.rewards.get(t)) {
            (Some(state), Some(&action), Some(&reward)) => Ok((state, action, reward)),
            _ => Err(AgentError::MissingTransition(t)),
        }
    }

    /// Whether `(state, action)` was already taken at a step before `t`.
    pub fn occurred_before(&self, state: &State, action: usize, t: usize) -> bool {
        self.states[..t]
            .iter()
            .zip(&self.actions[..t])
            .any(|(s, &a)| s == state && a == action)
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
    fn mismatch_is_reported() {
        let mut trajectory = Trajectory::new();
        trajectory.states.push(state(b'a'));
        trajectory.actions.push(0);
        assert_eq!(
            trajectory.aligned_len(),
            Err(AgentError::TrajectoryMismatch {
                states: 1,
                actions: 1,
                rewards: 0
            })
        );
        assert_eq!(trajectory.step(0), Err(AgentError::MissingTransition(0)));
        trajectory.rewards.push(-1.0);
        assert_eq!(trajectory.aligned_len(), Ok(1));
        assert_eq!(trajectory.step(0), Ok((&state(b'a'), 0, -1.0)));
    }

    #[test]
    fn first_occurrence() {
        let mut trajectory = Trajectory::new();
        for (s, a) in [(b'a', 0), (b'b', 1), (b'a', 0), (b'a', 1)] {
            trajectory.states.push(state(s));
            trajectory.actions.push(a);
            trajectory.rewards.push(0.0);
        }
        assert!(!trajectory.occurred_before(&state(b'a'), 0, 0));
        assert!(trajectory.occurred_before(&state(b'a'), 0, 2));
        assert!(!trajectory.occurred_before(&state(b'a'), 1, 3));
    }

    #[test]
    fn clear_empties_every_buffer() {
        let mut trajectory = Trajectory::new();
        trajectory.states.push(state(b'a'));
        trajectory.actions.push(2);
        trajectory.rewards.push(1.0);
        trajectory.clear();
        assert!(trajectory.is_empty());
    }
}
