use thiserror::Error;

use crate::env::EnvError;

/// Contract violations between an agent and the observations/buffers it is given.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("agent not found in the observation:\n{grid}")]
    AgentNotFound { grid: String },

    #[error("observation contains no visible cells")]
    EmptyObservation,

    #[error("observation of {nrow}x{ncol} cells is too large to fingerprint")]
    ObservationTooLarge { nrow: usize, ncol: usize },

    #[error(
        "the lengths of S ({states}), A ({actions}), and R ({rewards}) must be equal at the end of an episode"
    )]
    TrajectoryMismatch {
        states: usize,
        actions: usize,
        rewards: usize,
    },

    #[error("no recorded transition at step {0}")]
    MissingTransition(usize),
}

/// Invalid settings detected at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unsupported render mode: {0} (expected one of: human, ansi)")]
    UnsupportedRenderMode(String),

    #[error("invalid value for `{name}`: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("action space must contain at least one action")]
    EmptyActionSpace,

    #[error("unknown agent: {0} (expected one of: random, fixed, mc, sarsa, q, dyna-q)")]
    UnknownAgent(String),
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
