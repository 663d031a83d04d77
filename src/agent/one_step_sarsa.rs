use ndarray::Array2;

use super::{Agent, AgentCore};
use crate::config::AgentConfig;
use crate::env::{ActionSpace, Observation};
use crate::error::{AgentError, ConfigError};
use crate::state::{hashable, State};

/// On-policy one-step TD control.
///
/// The next action is chosen while updating and committed, so the action that
/// bootstraps the update is also the one taken from the next state.
#[derive(Debug, Clone)]
pub struct SarsaAgent {
    core: AgentCore,
}

impl SarsaAgent {
    pub fn new(config: &AgentConfig, action_space: ActionSpace) -> Result<Self, ConfigError> {
        Ok(Self {
            core: AgentCore::new(config, action_space)?,
        })
    }
}

impl Agent for SarsaAgent {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "SarsaAgent"
    }

    fn policy(&mut self, _chars: &Array2<u8>, state: &State) -> Result<usize, AgentError> {
        Ok(self.core.epsilon_greedy(state))
    }

    fn on_step_end(
        &mut self,
        t: usize,
        next: &Observation,
        terminated: bool,
    ) -> Result<(), AgentError> {
        let (state, action, reward) = self.core.transition(t)?;
        let target: f64 = if terminated {
            reward
        } else {
            let (_, next_state) = hashable(&next.chars)?;
            let next_action: usize = self.core.epsilon_greedy(&next_state);
            let next_value: f64 = self.core.q.get(&next_state, next_action);
            self.core.commit(next_state, next_action);
            reward + self.core.gamma * next_value
        };
        self.core.bootstrap_update(&state, action, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn agent(epsilon: f64) -> SarsaAgent {
        let config = AgentConfig {
            seed: Some(7),
            alpha: 0.5,
            gamma: 1.0,
            epsilon,
            ..AgentConfig::default()
        };
        SarsaAgent::new(&config, ActionSpace::compass()).unwrap()
    }

    #[test]
    fn single_update_moves_half_way() {
        let mut agent = agent(0.0);
        let s0 = Observation::new(array![[b'@', b'.', b'>']]);
        let s1 = Observation::new(array![[b'.', b'@', b'>']]);
        let a0 = agent.act(&s0).unwrap();
        agent.record_reward(-1.0);
        agent.on_step_end(0, &s1, false).unwrap();

        let state = hashable(&s0.chars).unwrap().1;
        assert_abs_diff_eq!(agent.core().q.get(&state, a0), -0.5);
    }

    #[test]
    fn next_action_is_the_committed_one() {
        let mut agent = agent(1.0);
        let s0 = Observation::new(array![[b'@', b'.', b'>']]);
        let s1 = Observation::new(array![[b'.', b'@', b'>']]);
        for _ in 0..20 {
            agent.act(&s0).unwrap();
            agent.record_reward(-1.0);
            agent.on_step_end(0, &s1, false).unwrap();
            let committed = agent.core().committed.clone();
            let a1 = agent.act(&s1).unwrap();
            assert_eq!(committed.map(|(_, a)| a), Some(a1));
            agent.reset();
        }
    }

    #[test]
    fn terminal_transition_does_not_bootstrap() {
        let mut agent = agent(0.0);
        let s0 = Observation::new(array![[b'.', b'@', b'>']]);
        let a0 = agent.act(&s0).unwrap();
        agent.record_reward(0.0);
        agent
            .on_step_end(0, &Observation::new(array![[b'.', b'.', b'@']]), true)
            .unwrap();
        let state = hashable(&s0.chars).unwrap().1;
        assert_abs_diff_eq!(agent.core().q.get(&state, a0), 0.0);
        assert!(agent.core().committed.is_none());
    }
}
