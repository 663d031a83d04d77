use ndarray::Array2;

use crate::env::{
    grid_to_string, inc, ActionSpace, CompassDirection, EndStatus, Env, EnvError, Info,
    Observation, Step, AGENT, BLANK, GOAL, HORIZONTAL_WALL, LAVA, TREE, VERTICAL_WALL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Floor,
    Wall,
    Lava,
    Goal,
}

impl Cell {
    fn from_glyph(glyph: u8) -> Self {
        match glyph {
            VERTICAL_WALL | HORIZONTAL_WALL | TREE | BLANK => Self::Wall,
            LAVA => Self::Lava,
            GOAL => Self::Goal,
            _ => Self::Floor,
        }
    }
}

/// Fixed map of a walled room and the cell the agent starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub map: &'static [&'static str],
    pub start: (usize, usize),
}

impl Layout {
    /// Bottom row of lava between the start (bottom left) and the goal (bottom right).
    pub const CLIFF: Layout = Layout {
        map: &[
            "|----------------",
            "|...............|",
            "|...............|",
            "|...............|",
            "|...............|",
            "|.}}}}}}}}}}}}}>|",
            "|----------------",
        ],
        start: (5, 1),
    };

    /// Two chambers joined by a corridor, trees (`#`) around the start and two
    /// lava pools guarding the goal.
    pub const ROOM_WITH_LAVA: Layout = Layout {
        map: &[
            "|-----     ------",
            "|.....-- --.....|",
            "|.#.#...-.....}.|",
            "|...#..........>|",
            "|.#.#...-.....}.|",
            "|.....-----.....|",
            "|-----     ------",
        ],
        start: (3, 3),
    };

    fn nrow(&self) -> usize {
        self.map.len()
    }

    fn ncol(&self) -> usize {
        self.map.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    fn glyph(&self, row: usize, col: usize) -> u8 {
        self.map[row].as_bytes().get(col).copied().unwrap_or(BLANK)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LavaRoomConfig {
    pub max_episode_steps: usize,
    pub goal_reward: f64,
    pub step_reward: f64,
    pub death_reward: f64,
}

impl Default for LavaRoomConfig {
    fn default() -> Self {
        Self {
            max_episode_steps: 1000,
            goal_reward: 0.0,
            step_reward: -1.0,
            death_reward: -100.0,
        }
    }
}

/// Walled room with lava cells and a goal.
///
/// Falling into the lava costs `death_reward + step_reward` and sends the agent
/// back to the start without ending the episode. Running out of steps ends the
/// episode as both terminated and truncated.
#[derive(Debug, Clone)]
pub struct LavaRoomEnv {
    ready: bool,
    layout: Layout,
    ncol: usize,
    transitions: Vec<[(usize, Cell); 4]>,
    start_pos: usize,
    player_pos: usize,
    curr_step: usize,
    config: LavaRoomConfig,
    action_space: ActionSpace,
}

impl LavaRoomEnv {
    // blank border around the room, as in a full terminal screen
    const PADDING: (usize, usize) = (2, 3);

    pub fn new(layout: Layout, config: LavaRoomConfig) -> Self {
        let (nrow, ncol) = (layout.nrow(), layout.ncol());
        let mut transitions: Vec<[(usize, Cell); 4]> = vec![[(0, Cell::Wall); 4]; nrow * ncol];
        for row in 0..nrow {
            for col in 0..ncol {
                let pos: usize = row * ncol + col;
                for direction in CompassDirection::ALL {
                    let (newrow, newcol) = inc(nrow, ncol, row, col, direction);
                    let cell = Cell::from_glyph(layout.glyph(newrow, newcol));
                    transitions[pos][usize::from(direction)] = match cell {
                        Cell::Wall => (pos, Cell::Floor),
                        _ => (newrow * ncol + newcol, cell),
                    };
                }
            }
        }
        let start_pos: usize = layout.start.0 * ncol + layout.start.1;

        Self {
            ready: false,
            layout,
            ncol,
            transitions,
            start_pos,
            player_pos: start_pos,
            curr_step: 0,
            config,
            action_space: ActionSpace::compass(),
        }
    }

    pub fn cliff(config: LavaRoomConfig) -> Self {
        Self::new(Layout::CLIFF, config)
    }

    pub fn room_with_lava(config: LavaRoomConfig) -> Self {
        Self::new(Layout::ROOM_WITH_LAVA, config)
    }

    pub fn player_position(&self) -> (usize, usize) {
        (self.player_pos / self.ncol, self.player_pos % self.ncol)
    }

    fn chars(&self) -> Array2<u8> {
        let (pad_rows, pad_cols) = Self::PADDING;
        let mut grid: Array2<u8> = Array2::from_elem(
            (self.layout.nrow() + 2 * pad_rows, self.ncol + 2 * pad_cols),
            BLANK,
        );
        for (row, line) in self.layout.map.iter().enumerate() {
            for (col, glyph) in line.bytes().enumerate() {
                grid[[row + pad_rows, col + pad_cols]] = glyph;
            }
        }
        let (row, col) = self.player_position();
        grid[[row + pad_rows, col + pad_cols]] = AGENT;
        grid
    }
}

impl Env for LavaRoomEnv {
    fn reset(&mut self) -> (Observation, Info) {
        self.player_pos = self.start_pos;
        self.ready = true;
        self.curr_step = 0;
        (Observation::new(self.chars()), Info::default())
    }

    fn step(&mut self, action: usize) -> Result<Step, EnvError> {
        if !self.ready {
            return Err(EnvError::NotReady);
        }
        if !self.action_space.contains(action) {
            return Err(EnvError::InvalidAction {
                action,
                size: self.action_space.size,
            });
        }
        self.curr_step += 1;
        let (next_pos, cell) = self.transitions[self.player_pos][action];
        self.player_pos = next_pos;

        let (reward, terminated, truncated, end_status) =
            if self.curr_step >= self.config.max_episode_steps {
                (self.config.step_reward, true, true, EndStatus::Aborted)
            } else {
                match cell {
                    Cell::Lava => {
                        self.player_pos = self.start_pos;
                        (
                            self.config.death_reward + self.config.step_reward,
                            false,
                            false,
                            EndStatus::Death,
                        )
                    }
                    Cell::Goal => (
                        self.config.goal_reward,
                        true,
                        false,
                        EndStatus::TaskSuccessful,
                    ),
                    Cell::Floor | Cell::Wall => {
                        (self.config.step_reward, false, false, EndStatus::Running)
                    }
                }
            };
        if terminated {
            self.ready = false;
        }
        Ok(Step {
            observation: Observation::new(self.chars()),
            reward,
            terminated,
            truncated,
            info: Info::new(end_status),
        })
    }

    fn render(&self) -> String {
        grid_to_string(&self.chars())
    }

    fn action_space(&self) -> ActionSpace {
        self.action_space.clone()
    }
}
