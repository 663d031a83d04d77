use ndarray::Array2;
use tracing::debug;

use super::{Agent, AgentCore};
use crate::config::AgentConfig;
use crate::env::ActionSpace;
use crate::error::{AgentError, ConfigError};
use crate::state::State;
use crate::table::VisitCounts;

/// First-visit Monte Carlo control. Nothing is learned until the episode ends;
/// then every first occurrence of `(s, a)` moves `Q(s, a)` to the running mean
/// of the returns that followed it.
#[derive(Debug, Clone)]
pub struct MonteCarloAgent {
    core: AgentCore,
    counts: VisitCounts,
}

impl MonteCarloAgent {
    pub fn new(config: &AgentConfig, action_space: ActionSpace) -> Result<Self, ConfigError> {
        let core: AgentCore = AgentCore::new(config, action_space)?;
        Ok(Self {
            counts: VisitCounts::new(core.action_space.size, 0),
            core,
        })
    }

    pub fn visits(&self, state: &State, action: usize) -> u32 {
        self.counts.get(state, action)
    }

    fn learn_from_episode(&mut self) -> Result<(), AgentError> {
        let trajectory = &self.core.trajectory;
        let steps: usize = trajectory.aligned_len()?;
        let gamma: f64 = self.core.gamma;
        let mut g: f64 = 0.0;
        for t in (0..steps).rev() {
            let (state, action, reward) = trajectory.step(t)?;
            g = gamma * g + reward;
            if trajectory.occurred_before(state, action, t) {
                continue;
            }
            let n: f64 = f64::from(self.counts.get(state, action));
            let q: &mut f64 = self.core.q.get_mut(state, action);
            *q = *q * n / (n + 1.0) + g / (n + 1.0);
            *self.counts.get_mut(state, action) += 1;
        }
        debug!(steps, episode_return = g, "monte carlo update");
        Ok(())
    }
}

impl Agent for MonteCarloAgent {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "MonteCarloAgent"
    }

    fn policy(&mut self, _chars: &Array2<u8>, state: &State) -> Result<usize, AgentError> {
        Ok(self.core.epsilon_greedy(state))
    }

    fn on_episode_end(&mut self, _k: usize) -> Result<(), AgentError> {
        let result = self.learn_from_episode();
        self.core.end_episode();
        result
    }
}
