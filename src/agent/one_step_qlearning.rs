use ndarray::Array2;

use super::{Agent, AgentCore};
use crate::config::AgentConfig;
use crate::env::{ActionSpace, Observation};
use crate::error::{AgentError, ConfigError};
use crate::state::{hashable, State};

/// Off-policy one-step TD control, bootstrapping from `max_a Q(s', a)`.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    core: AgentCore,
}

impl QLearningAgent {
    pub fn new(config: &AgentConfig, action_space: ActionSpace) -> Result<Self, ConfigError> {
        Ok(Self {
            core: AgentCore::new(config, action_space)?,
        })
    }
}

/// Hashes the next observation unless the episode ended in it.
fn successor(next: &Observation, terminated: bool) -> Result<Option<State>, AgentError> {
    if terminated {
        Ok(None)
    } else {
        Ok(Some(hashable(&next.chars)?.1))
    }
}

/// One real Q-learning update for transition `t`, returning it for reuse.
pub(super) fn learn(
    core: &mut AgentCore,
    t: usize,
    next: &Observation,
    terminated: bool,
) -> Result<(State, usize, f64, Option<State>), AgentError> {
    let (state, action, reward) = core.transition(t)?;
    let next_state: Option<State> = successor(next, terminated)?;
    let target: f64 = match &next_state {
        Some(next_state) => core.q_learning_target(reward, next_state, false),
        None => reward,
    };
    core.bootstrap_update(&state, action, target);
    Ok((state, action, reward, next_state))
}

impl Agent for QLearningAgent {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "QLearningAgent"
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
        learn(&mut self.core, t, next, terminated)?;
        Ok(())
    }
}
