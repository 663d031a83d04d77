use ndarray::Array2;

use crate::env::{
    grid_to_string, inc, ActionSpace, CompassDirection, EndStatus, Env, EnvError, Info,
    Observation, RenderMode, Step, AGENT, FREE, GOAL,
};
use crate::error::ConfigError;

/// Goal finding on an open `nrow x ncol` grid: the agent starts in the top-left
/// corner and the episode terminates once it reaches the bottom-right one.
#[derive(Debug, Clone)]
pub struct GridWorldEnv {
    ready: bool,
    nrow: usize,
    ncol: usize,
    initial_position: (usize, usize),
    goal_position: (usize, usize),
    agent_position: (usize, usize),
    render_mode: RenderMode,
    action_space: ActionSpace,
}

impl GridWorldEnv {
    pub const REWARD_PER_ACTION: f64 = -1.0;
    pub const GOAL_REWARD: f64 = 0.0;

    pub fn new(nrow: usize, ncol: usize, render_mode: &str) -> Result<Self, ConfigError> {
        let render_mode: RenderMode = render_mode.parse()?;
        if nrow == 0 || ncol == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "grid size",
                value: (nrow * ncol) as f64,
                reason: "the grid needs at least one row and one column",
            });
        }
        let mut env = Self {
            ready: false,
            nrow,
            ncol,
            initial_position: (0, 0),
            goal_position: (nrow - 1, ncol - 1),
            agent_position: (0, 0),
            render_mode,
            action_space: ActionSpace::compass(),
        };
        env.reset();
        Ok(env)
    }

    pub fn agent_position(&self) -> (usize, usize) {
        self.agent_position
    }

    fn chars(&self) -> Array2<u8> {
        let mut grid: Array2<u8> = Array2::from_elem((self.nrow, self.ncol), FREE);
        grid[[self.goal_position.0, self.goal_position.1]] = GOAL;
        grid[[self.agent_position.0, self.agent_position.1]] = AGENT;
        grid
    }

    fn at_goal(&self) -> bool {
        self.agent_position == self.goal_position
    }
}

impl Env for GridWorldEnv {
    fn reset(&mut self) -> (Observation, Info) {
        self.agent_position = self.initial_position;
        self.ready = true;
        (Observation::new(self.chars()), Info::default())
    }

    fn step(&mut self, action: usize) -> Result<Step, EnvError> {
        if !self.ready {
            return Err(EnvError::NotReady);
        }
        let direction = CompassDirection::from_index(action).ok_or(EnvError::InvalidAction {
            action,
            size: self.action_space.size,
        })?;
        let (row, col) = self.agent_position;
        self.agent_position = inc(self.nrow, self.ncol, row, col, direction);

        let terminated: bool = self.at_goal();
        if terminated {
            self.ready = false;
        }
        let (reward, end_status) = if terminated {
            (Self::GOAL_REWARD, EndStatus::TaskSuccessful)
        } else {
            (Self::REWARD_PER_ACTION, EndStatus::Running)
        };
        Ok(Step {
            observation: Observation::new(self.chars()),
            reward,
            terminated,
            truncated: false,
            info: Info::new(end_status),
        })
    }

    fn render(&self) -> String {
        let grid: String = grid_to_string(&self.chars());
        match self.render_mode {
            RenderMode::Human => grid + "\n",
            RenderMode::Ansi => grid,
        }
    }

    fn action_space(&self) -> ActionSpace {
        self.action_space.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: usize = 2;
    const E: usize = 1;

    #[test]
    fn unsupported_render_mode() {
        assert_eq!(
            GridWorldEnv::new(5, 5, "rgb_array").unwrap_err(),
            ConfigError::UnsupportedRenderMode("rgb_array".to_string())
        );
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(matches!(
            GridWorldEnv::new(0, 5, "human"),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn reaches_goal() {
        let mut env = GridWorldEnv::new(2, 2, "ansi").unwrap();
        let (obs, _) = env.reset();
        assert_eq!(obs.chars[[0, 0]], AGENT);
        assert_eq!(obs.chars[[1, 1]], GOAL);

        let step = env.step(S).unwrap();
        assert_eq!(step.reward, -1.0);
        assert!(!step.terminated);

        let step = env.step(E).unwrap();
        assert_eq!(step.reward, 0.0);
        assert!(step.terminated);
        assert_eq!(step.info.end_status, EndStatus::TaskSuccessful);
        assert_eq!(step.observation.chars[[1, 1]], AGENT);

        assert_eq!(env.step(E).unwrap_err(), EnvError::NotReady);
    }

    #[test]
    fn walls_of_the_grid_block_moves() {
        let mut env = GridWorldEnv::new(3, 3, "human").unwrap();
        let step = env.step(0).unwrap();
        assert_eq!(env.agent_position(), (0, 0));
        assert_eq!(step.reward, -1.0);
    }

    #[test]
    fn invalid_action() {
        let mut env = GridWorldEnv::new(3, 3, "human").unwrap();
        assert_eq!(
            env.step(4).unwrap_err(),
            EnvError::InvalidAction { action: 4, size: 4 }
        );
    }

    #[test]
    fn render_modes() {
        let human = GridWorldEnv::new(2, 3, "human").unwrap();
        assert_eq!(human.render(), "@..\n..>\n");
        let ansi = GridWorldEnv::new(2, 3, "ansi").unwrap();
        assert_eq!(ansi.render(), "@..\n..>");
    }
}
