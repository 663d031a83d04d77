use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::ConfigError;

/// Discrete set of `size` actions, indexed `0..size`.
#[derive(Debug, Clone)]
pub struct ActionSpace {
    pub size: usize,
    dist: Uniform<usize>,
}

impl ActionSpace {
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyActionSpace);
        }
        Ok(Self {
            size,
            dist: Uniform::from(0..size),
        })
    }

    pub fn compass() -> Self {
        Self {
            size: CompassDirection::ALL.len(),
            dist: Uniform::from(0..CompassDirection::ALL.len()),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.dist.sample(rng)
    }

    pub fn contains(&self, action: usize) -> bool {
        action < self.size
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CompassDirection {
    North,
    East,
    South,
    West,
}

impl CompassDirection {
    pub const ALL: [CompassDirection; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl From<CompassDirection> for usize {
    fn from(value: CompassDirection) -> Self {
        value as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn compass_order() {
        assert_eq!(usize::from(CompassDirection::North), 0);
        assert_eq!(usize::from(CompassDirection::East), 1);
        assert_eq!(usize::from(CompassDirection::South), 2);
        assert_eq!(usize::from(CompassDirection::West), 3);
        assert_eq!(CompassDirection::from_index(2), Some(CompassDirection::South));
        assert_eq!(CompassDirection::from_index(4), None);
    }

    #[test]
    fn empty_space_is_rejected() {
        assert_eq!(ActionSpace::new(0).unwrap_err(), ConfigError::EmptyActionSpace);
    }

    #[test]
    fn samples_stay_in_range() {
        let space = ActionSpace::new(3).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(space.contains(space.sample(&mut rng)));
        }
    }
}
