//! Tabular reinforcement learning agents acting on character-grid
//! environments, and the task driver that trains and replays them.

pub mod action_selection;
pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod model;
pub mod plot;
pub mod returns;
pub mod state;
pub mod table;
pub mod task;
pub mod trajectory;
pub mod utils;

pub use agent::{Agent, AgentKind, AgentVariant};
pub use task::RlTask;
