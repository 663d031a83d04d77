mod fixed_agent;
mod internal_model_agent;
mod monte_carlo_agent;
mod one_step_qlearning;
mod one_step_sarsa;
mod random_agent;

pub use fixed_agent::FixedAgent;
pub use internal_model_agent::DynaQAgent;
pub use monte_carlo_agent::MonteCarloAgent;
pub use one_step_qlearning::QLearningAgent;
pub use one_step_sarsa::SarsaAgent;
pub use random_agent::RandomAgent;

use std::fmt;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

use crate::action_selection::EpsilonGreedy;
use crate::config::AgentConfig;
use crate::env::{ActionSpace, Observation};
use crate::error::{AgentError, ConfigError};
use crate::state::{hashable, State};
use crate::table::ActionValues;
use crate::trajectory::Trajectory;

/// State shared by every agent variant.
#[derive(Debug, Clone)]
pub struct AgentCore {
    pub id: String,
    pub action_space: ActionSpace,
    pub max_episode_steps: usize,
    /// Cleared while the agent is only evaluated or visualized.
    pub learning: bool,
    pub alpha: f64,
    pub gamma: f64,
    pub action_selection: EpsilonGreedy,
    pub q: ActionValues,
    pub trajectory: Trajectory,
    pub rng: StdRng,
    committed: Option<(State, usize)>,
}

impl AgentCore {
    pub fn new(config: &AgentConfig, action_space: ActionSpace) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng: StdRng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            id: config.id.clone(),
            q: ActionValues::new(action_space.size, 0.0),
            action_space,
            max_episode_steps: config.max_episode_steps,
            learning: true,
            alpha: config.alpha,
            gamma: config.gamma,
            action_selection: EpsilonGreedy::new(
                config.epsilon,
                config.epsilon_decay,
                config.final_epsilon,
            ),
            trajectory: Trajectory::new(),
            rng,
            committed: None,
        })
    }

    /// Epsilon-greedy choice over the current estimates of `state`.
    pub fn epsilon_greedy(&mut self, state: &State) -> usize {
        self.action_selection
            .get_action(self.q.row(state), self.learning, &mut self.rng)
    }

    /// Fixes the action the next `act` on `state` will return.
    pub fn commit(&mut self, state: State, action: usize) {
        self.committed = Some((state, action));
    }

    fn take_committed(&mut self, state: &State) -> Option<usize> {
        match self.committed.take() {
            Some((committed, action)) if committed == *state => Some(action),
            _ => None,
        }
    }

    /// `r + gamma * max_a Q(s', a)`, or just `r` when `s'` is terminal.
    pub fn q_learning_target(&self, reward: f64, next_state: &State, terminal: bool) -> f64 {
        if terminal {
            reward
        } else {
            reward + self.gamma * self.q.max(next_state)
        }
    }

    /// Moves `Q(s, a)` a step of size `alpha` towards `target`, returning the
    /// temporal difference.
    pub fn bootstrap_update(&mut self, state: &State, action: usize, target: f64) -> f64 {
        let alpha: f64 = self.alpha;
        let value: &mut f64 = self.q.get_mut(state, action);
        let temporal_difference: f64 = target - *value;
        *value += alpha * temporal_difference;
        trace!(action, target, temporal_difference, "bootstrap update");
        temporal_difference
    }

    /// `(S[t], A[t], R[t])` detached from the trajectory buffers.
    pub fn transition(&self, t: usize) -> Result<(State, usize, f64), AgentError> {
        let (state, action, reward) = self.trajectory.step(t)?;
        Ok((state.clone(), action, reward))
    }

    pub fn reset(&mut self) {
        self.trajectory.clear();
        self.committed = None;
    }

    /// Runs the epsilon schedule and clears the episode buffers.
    pub fn end_episode(&mut self) {
        self.action_selection.decay_epsilon();
        self.reset();
    }
}

#[enum_dispatch]
pub trait Agent {
    fn core(&self) -> &AgentCore;

    fn core_mut(&mut self) -> &mut AgentCore;

    fn name(&self) -> &'static str;

    /// The decision function of the variant, given the cropped grid and its fingerprint.
    fn policy(&mut self, chars: &Array2<u8>, state: &State) -> Result<usize, AgentError>;

    /// Fingerprints the observation, records it with the chosen action and
    /// returns that action.
    fn act(&mut self, observation: &Observation) -> Result<usize, AgentError> {
        let (chars, state) = hashable(&observation.chars)?;
        let action: usize = match self.core_mut().take_committed(&state) {
            Some(action) => action,
            None => self.policy(&chars, &state)?,
        };
        let trajectory: &mut Trajectory = &mut self.core_mut().trajectory;
        trajectory.states.push(state);
        trajectory.actions.push(action);
        Ok(action)
    }

    fn record_reward(&mut self, reward: f64) {
        self.core_mut().trajectory.rewards.push(reward);
    }

    /// Called after transition `t` once `R[t]` is recorded. `terminated` marks
    /// `next` as a terminal state, which has no future value.
    fn on_step_end(
        &mut self,
        _t: usize,
        _next: &Observation,
        _terminated: bool,
    ) -> Result<(), AgentError> {
        Ok(())
    }

    /// Called once per finished episode `k`; always leaves the buffers empty.
    fn on_episode_end(&mut self, _k: usize) -> Result<(), AgentError> {
        self.core_mut().end_episode();
        Ok(())
    }

    fn reset(&mut self) {
        self.core_mut().reset();
    }

    fn learning(&self) -> bool {
        self.core().learning
    }

    fn set_learning(&mut self, learning: bool) {
        self.core_mut().learning = learning;
    }

    fn gamma(&self) -> f64 {
        self.core().gamma
    }

    fn max_episode_steps(&self) -> usize {
        self.core().max_episode_steps
    }

    fn rewards(&self) -> &[f64] {
        &self.core().trajectory.rewards
    }
}

#[enum_dispatch(Agent)]
#[derive(Debug, Clone)]
pub enum AgentKind {
    Random(RandomAgent),
    Fixed(FixedAgent),
    MonteCarlo(MonteCarloAgent),
    Sarsa(SarsaAgent),
    QLearning(QLearningAgent),
    DynaQ(DynaQAgent),
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentVariant {
    Random,
    Fixed,
    MonteCarlo,
    Sarsa,
    QLearning,
    DynaQ,
}

impl AgentVariant {
    pub const ALL: [AgentVariant; 6] = [
        Self::Random,
        Self::Fixed,
        Self::MonteCarlo,
        Self::Sarsa,
        Self::QLearning,
        Self::DynaQ,
    ];

    pub fn build(
        self,
        config: &AgentConfig,
        action_space: ActionSpace,
    ) -> Result<AgentKind, ConfigError> {
        Ok(match self {
            Self::Random => RandomAgent::new(config, action_space)?.into(),
            Self::Fixed => FixedAgent::new(config, action_space)?.into(),
            Self::MonteCarlo => MonteCarloAgent::new(config, action_space)?.into(),
            Self::Sarsa => SarsaAgent::new(config, action_space)?.into(),
            Self::QLearning => QLearningAgent::new(config, action_space)?.into(),
            Self::DynaQ => DynaQAgent::new(config, action_space)?.into(),
        })
    }
}

impl FromStr for AgentVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "fixed" => Ok(Self::Fixed),
            "mc" | "monte-carlo" => Ok(Self::MonteCarlo),
            "sarsa" => Ok(Self::Sarsa),
            "q" | "q-learning" => Ok(Self::QLearning),
            "dyna-q" | "dynaq" => Ok(Self::DynaQ),
            other => Err(ConfigError::UnknownAgent(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{AGENT, FREE};

    fn observation(rows: &[&str]) -> Observation {
        let ncol = rows[0].len();
        let chars: Vec<u8> = rows.iter().flat_map(|r| r.bytes()).collect();
        Observation::new(Array2::from_shape_vec((rows.len(), ncol), chars).unwrap())
    }

    fn core(seed: u64) -> AgentCore {
        let config = AgentConfig {
            seed: Some(seed),
            alpha: 0.5,
            ..AgentConfig::default()
        };
        AgentCore::new(&config, ActionSpace::compass()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AgentConfig {
            epsilon: -0.1,
            ..AgentConfig::default()
        };
        assert!(matches!(
            AgentCore::new(&config, ActionSpace::compass()),
            Err(ConfigError::InvalidParameter { name: "epsilon", .. })
        ));
    }

    #[test]
    fn bootstrap_update_moves_towards_target() {
        let mut core = core(0);
        let (_, state) = hashable(&observation(&["@."]).chars).unwrap();
        let td = core.bootstrap_update(&state, 1, -2.0);
        assert_eq!(td, -2.0);
        assert_eq!(core.q.get(&state, 1), -1.0);
    }

    #[test]
    fn terminal_target_ignores_future_values() {
        let mut core = core(0);
        let (_, state) = hashable(&observation(&["@."]).chars).unwrap();
        core.q.set(&state, 3, 10.0);
        assert_eq!(core.q_learning_target(-1.0, &state, true), -1.0);
        assert_eq!(core.q_learning_target(-1.0, &state, false), 9.0);
    }

    #[test]
    fn committed_action_only_matches_its_state() {
        let mut core = core(0);
        let (_, a) = hashable(&observation(&["@."]).chars).unwrap();
        let (_, b) = hashable(&observation(&[".@"]).chars).unwrap();
        core.commit(a.clone(), 2);
        assert_eq!(core.take_committed(&b), None);
        core.commit(a.clone(), 2);
        assert_eq!(core.take_committed(&a), Some(2));
        assert_eq!(core.take_committed(&a), None);
    }

    #[test]
    fn variants_from_str() {
        assert_eq!("dyna-q".parse::<AgentVariant>(), Ok(AgentVariant::DynaQ));
        assert_eq!("MC".parse::<AgentVariant>(), Ok(AgentVariant::MonteCarlo));
        assert_eq!(
            "ppo".parse::<AgentVariant>(),
            Err(ConfigError::UnknownAgent("ppo".to_string()))
        );
    }

    #[test]
    fn act_records_state_and_action() {
        let config = AgentConfig {
            seed: Some(1),
            ..AgentConfig::default()
        };
        let mut agent: AgentKind = AgentVariant::Fixed
            .build(&config, ActionSpace::compass())
            .unwrap();
        let obs = observation(&["  @.", "  .."]);
        assert_eq!(obs.chars[[0, 2]], AGENT);
        assert_eq!(obs.chars[[1, 2]], FREE);
        let action = agent.act(&obs).unwrap();
        assert_eq!(action, 2);
        assert_eq!(agent.core().trajectory.states.len(), 1);
        assert_eq!(agent.core().trajectory.actions, vec![2]);
        agent.reset();
        assert!(agent.core().trajectory.is_empty());
        assert_eq!(agent.to_string(), "FixedAgent");
    }
}
