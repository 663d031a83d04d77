mod action_space;
mod grid_world;
mod lava_room;

use std::str::FromStr;

use ndarray::Array2;
use thiserror::Error;

use crate::error::ConfigError;

pub use action_space::{ActionSpace, CompassDirection};
pub use grid_world::GridWorldEnv;
pub use lava_room::{LavaRoomConfig, LavaRoomEnv, Layout};

/// Glyphs of the character grid, as NetHack draws them.
pub const AGENT: u8 = b'@';
pub const FREE: u8 = b'.';
pub const GOAL: u8 = b'>';
pub const START: u8 = b'<';
pub const LAVA: u8 = b'}';
pub const TREE: u8 = b'#';
pub const BLANK: u8 = b' ';
pub const VERTICAL_WALL: u8 = b'|';
pub const HORIZONTAL_WALL: u8 = b'-';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("environment is not ready to receive actions, call reset first")]
    NotReady,

    #[error("invalid action {action}, the action space has {size} actions")]
    InvalidAction { action: usize, size: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Observation {
    pub chars: Array2<u8>,
}

impl Observation {
    pub fn new(chars: Array2<u8>) -> Self {
        Self { chars }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndStatus {
    #[default]
    Running,
    Death,
    TaskSuccessful,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Info {
    pub end_status: EndStatus,
}

impl Info {
    pub fn new(end_status: EndStatus) -> Self {
        Self { end_status }
    }
}

/// Outcome of a single environment transition.
#[derive(Debug, Clone)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
}

impl Step {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Human,
    Ansi,
}

impl FromStr for RenderMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(Self::Human),
            "ansi" => Ok(Self::Ansi),
            other => Err(ConfigError::UnsupportedRenderMode(other.to_string())),
        }
    }
}

pub trait Env {
    fn reset(&mut self) -> (Observation, Info);
    fn step(&mut self, action: usize) -> Result<Step, EnvError>;
    fn render(&self) -> String;
    fn action_space(&self) -> ActionSpace;
}

/// Joins the rows of a character grid into lines of text.
pub fn grid_to_string(chars: &Array2<u8>) -> String {
    chars
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|&c| c as char).collect::<String>())
        .collect::<Vec<String>>()
        .join("\n")
}

#[inline(always)]
pub(crate) fn inc(
    nrow: usize,
    ncol: usize,
    row: usize,
    col: usize,
    direction: CompassDirection,
) -> (usize, usize) {
    match direction {
        CompassDirection::North => (row.saturating_sub(1), col),
        CompassDirection::East => (row, (col + 1).min(ncol - 1)),
        CompassDirection::South => ((row + 1).min(nrow - 1), col),
        CompassDirection::West => (row, col.saturating_sub(1)),
    }
}
