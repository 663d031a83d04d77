use ndarray::Array2;
use tracing::trace;

use super::one_step_qlearning::learn;
use super::{Agent, AgentCore};
use crate::config::AgentConfig;
use crate::env::{ActionSpace, Observation};
use crate::error::{AgentError, ConfigError};
use crate::model::{Outcome, TransitionModel};
use crate::state::State;

/// Q-learning plus planning: every real transition is stored in a
/// deterministic model, then `planning_steps` simulated transitions drawn from
/// the model are replayed through the same update.
#[derive(Debug, Clone)]
pub struct DynaQAgent {
    core: AgentCore,
    model: TransitionModel,
    planning_steps: usize,
}

impl DynaQAgent {
    pub fn new(config: &AgentConfig, action_space: ActionSpace) -> Result<Self, ConfigError> {
        Ok(Self {
            core: AgentCore::new(config, action_space)?,
            model: TransitionModel::new(),
            planning_steps: config.num_planning_steps,
        })
    }

    pub fn model(&self) -> &TransitionModel {
        &self.model
    }

    fn plan(&mut self) {
        for _ in 0..self.planning_steps {
            let (state, action, outcome) = match self.model.get_info(&mut self.core.rng) {
                Some((state, action, outcome)) => (state.clone(), action, outcome.clone()),
                None => return,
            };
            let target: f64 =
                self.core
                    .q_learning_target(outcome.reward, &outcome.next_state, outcome.terminal);
            self.core.bootstrap_update(&state, action, target);
        }
        trace!(steps = self.planning_steps, model_size = self.model.len(), "planning");
    }
}

impl Agent for DynaQAgent {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "DynaQAgent"
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
        let (state, action, reward, next_state) = learn(&mut self.core, t, next, terminated)?;
        // a terminal outcome never reads its successor
        let outcome: Outcome = Outcome {
            reward,
            next_state: next_state.unwrap_or_else(|| state.clone()),
            terminal: terminated,
        };
        self.model.add_info(state, action, outcome);
        self.plan();
        Ok(())
    }
}
