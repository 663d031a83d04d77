/// Discounted return from every time step of an episode.
///
/// Element `i` is `sum(gamma^l * rewards[i + l])` for `l` in `0..T - i`, computed
/// with a single backward pass `G = gamma * G + r`.
pub fn returns_from(rewards: &[f64], gamma: f64) -> Vec<f64> {
    let mut returns: Vec<f64> = vec![0.0; rewards.len()];
    let mut g: f64 = 0.0;
    for (i, reward) in rewards.iter().enumerate().rev() {
        g = gamma * g + reward;
        returns[i] = g;
    }
    returns
}

/// Discounted return of the whole episode, `0.0` when no reward was received.
pub fn episodic_return(rewards: &[f64], gamma: f64) -> f64 {
    rewards
        .iter()
        .rev()
        .fold(0.0, |g: f64, reward| gamma * g + reward)
}
