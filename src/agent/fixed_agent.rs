use ndarray::Array2;

use super::{Agent, AgentCore};
use crate::config::AgentConfig;
use crate::env::{grid_to_string, ActionSpace, CompassDirection, AGENT, FREE};
use crate::error::{AgentError, ConfigError};
use crate::state::State;

/// Hand-written baseline: go south while the cell below is free, east otherwise.
#[derive(Debug, Clone)]
pub struct FixedAgent {
    core: AgentCore,
}

impl FixedAgent {
    pub fn new(config: &AgentConfig, action_space: ActionSpace) -> Result<Self, ConfigError> {
        Ok(Self {
            core: AgentCore::new(config, action_space)?,
        })
    }
}

impl Agent for FixedAgent {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "FixedAgent"
    }

    fn policy(&mut self, chars: &Array2<u8>, _state: &State) -> Result<usize, AgentError> {
        let (row, col) = chars
            .indexed_iter()
            .find(|(_, c)| **c == AGENT)
            .map(|(pos, _)| pos)
            .ok_or_else(|| AgentError::AgentNotFound {
                grid: grid_to_string(chars),
            })?;
        let direction: CompassDirection =
            if row + 1 < chars.nrows() && chars[[row + 1, col]] == FREE {
                CompassDirection::South
            } else {
                CompassDirection::East
            };
        Ok(direction.into())
    }
}
