use approx::assert_relative_eq;
use proptest::prelude::*;

use tabular_rl::returns::{episodic_return, returns_from};

proptest! {
    #[test]
    fn one_value_per_reward(rewards in prop::collection::vec(-100.0f64..100.0, 0..64), gamma in 0.0f64..=1.0) {
        prop_assert_eq!(returns_from(&rewards, gamma).len(), rewards.len());
    }

    #[test]
    fn returns_follow_the_recurrence(rewards in prop::collection::vec(-100.0f64..100.0, 1..64), gamma in 0.0f64..=1.0) {
        let returns = returns_from(&rewards, gamma);
        let last = rewards.len() - 1;
        prop_assert_eq!(returns[last], rewards[last]);
        for i in 0..last {
            assert_relative_eq!(returns[i], rewards[i] + gamma * returns[i + 1], epsilon = 1e-9);
        }
    }

    #[test]
    fn episodic_return_is_the_first_element(rewards in prop::collection::vec(-100.0f64..100.0, 1..64), gamma in 0.0f64..=1.0) {
        prop_assert_eq!(episodic_return(&rewards, gamma), returns_from(&rewards, gamma)[0]);
    }

    #[test]
    fn undiscounted_return_is_the_sum(rewards in prop::collection::vec(-10i32..10, 0..64)) {
        let rewards: Vec<f64> = rewards.into_iter().map(f64::from).collect();
        prop_assert_eq!(episodic_return(&rewards, 1.0), rewards.iter().sum::<f64>());
    }

    #[test]
    fn myopic_returns_are_the_rewards(rewards in prop::collection::vec(-100.0f64..100.0, 0..64)) {
        prop_assert_eq!(returns_from(&rewards, 0.0), rewards);
    }
}
