use rand::Rng;

use crate::utils::argmax;

/// Epsilon-greedy action selection: with probability `epsilon` the action is
/// drawn uniformly from all `n`, otherwise a maximizing action is taken (ties
/// broken at random). The greedy action therefore comes out with probability
/// `1 - epsilon + epsilon / n`, and each other action with `epsilon / n`.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedy {
    pub epsilon: f64,
    epsilon_decay: f64,
    final_epsilon: f64,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, epsilon_decay: f64, final_epsilon: f64) -> Self {
        Self {
            epsilon,
            epsilon_decay,
            final_epsilon,
        }
    }

    /// A uniform draw lands on a non-greedy action with probability `epsilon * (n - 1) / n`.
    fn should_explore<R: Rng + ?Sized>(&self, epsilon: f64, n: usize, rng: &mut R) -> bool {
        let threshold: f64 = epsilon * (n - 1) as f64 / n as f64;
        threshold != 0.0 && rng.gen::<f64>() < threshold
    }

    /// Picks an action from `values`; `learning == false` disables exploration.
    pub fn get_action<R: Rng + ?Sized>(&self, values: &[f64], learning: bool, rng: &mut R) -> usize {
        let greedy: usize = argmax(values, rng);
        let epsilon: f64 = if learning { self.epsilon } else { 0.0 };
        if values.len() > 1 && self.should_explore(epsilon, values.len(), rng) {
            let other: usize = rng.gen_range(0..values.len() - 1);
            if other >= greedy {
                other + 1
            } else {
                other
            }
        } else {
            greedy
        }
    }

    /// Applies one step of the decay schedule, never raising epsilon and never
    /// going below `final_epsilon`.
    pub fn decay_epsilon(&mut self) {
        let new_epsilon: f64 = (self.epsilon * self.epsilon_decay).max(self.final_epsilon);
        self.epsilon = new_epsilon.min(self.epsilon);
    }
}
