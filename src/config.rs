use crate::error::ConfigError;

/// Hyper-parameters shared by every agent variant.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub id: String,
    pub max_episode_steps: usize,
    /// learning rate
    pub alpha: f64,
    /// discount factor
    pub gamma: f64,
    /// initial exploration ratio
    pub epsilon: f64,
    /// multiplicative decay applied to epsilon at the end of every episode
    pub epsilon_decay: f64,
    pub final_epsilon: f64,
    /// Dyna-Q only
    pub num_planning_steps: usize,
    /// seed of the agent's private random source, drawn from entropy if unset
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            id: String::from("agent"),
            max_episode_steps: 50,
            alpha: 0.1,
            gamma: 1.0,
            epsilon: 0.05,
            epsilon_decay: 1.0,
            final_epsilon: 0.0,
            num_planning_steps: 10,
            seed: None,
        }
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be in the interval [0, 1]",
        })
    }
}

impl AgentConfig {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("alpha", self.alpha)?;
        unit_interval("gamma", self.gamma)?;
        unit_interval("epsilon", self.epsilon)?;
        unit_interval("epsilon_decay", self.epsilon_decay)?;
        unit_interval("final_epsilon", self.final_epsilon)?;
        Ok(())
    }
}

/// Options of the task driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskConfig {
    /// Show a progress bar while running episodes.
    pub show_progress: bool,
}
