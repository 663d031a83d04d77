use ndarray::Array2;

use super::{Agent, AgentCore};
use crate::config::AgentConfig;
use crate::env::ActionSpace;
use crate::error::{AgentError, ConfigError};
use crate::state::State;

/// Ignores the observation and samples uniformly from the action space. Never learns.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    core: AgentCore,
}

impl RandomAgent {
    pub fn new(config: &AgentConfig, action_space: ActionSpace) -> Result<Self, ConfigError> {
        Ok(Self {
            core: AgentCore::new(config, action_space)?,
        })
    }
}

impl Agent for RandomAgent {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "RandomAgent"
    }

    fn policy(&mut self, _chars: &Array2<u8>, _state: &State) -> Result<usize, AgentError> {
        let core: &mut AgentCore = &mut self.core;
        Ok(core.action_space.sample(&mut core.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Observation;
    use ndarray::array;

    #[test]
    fn samples_every_action() {
        let config = AgentConfig {
            seed: Some(11),
            ..AgentConfig::default()
        };
        let mut agent = RandomAgent::new(&config, ActionSpace::compass()).unwrap();
        let obs = Observation::new(array![[b'@', b'.']]);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[agent.act(&obs).unwrap()] = true;
            agent.record_reward(-1.0);
        }
        assert_eq!(seen, [true; 4]);
        agent.on_episode_end(0).unwrap();
        assert!(agent.core().trajectory.is_empty());
        assert!(agent.core().q.is_empty());
    }
}
