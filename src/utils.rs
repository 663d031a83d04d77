use rand::seq::SliceRandom;
use rand::Rng;

/// Indices of every maximal element of `values`.
pub fn argmax_all(values: &[f64]) -> Vec<usize> {
    let max: f64 = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == max)
        .map(|(i, _)| i)
        .collect()
}

/// Index of a maximal element of `values`, ties broken uniformly at random.
pub fn argmax<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> usize {
    argmax_all(values).choose(rng).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn argmax_all_keeps_ties() {
        assert_eq!(argmax_all(&[1.0, 3.0, 2.0, 3.0]), vec![1, 3]);
        assert_eq!(argmax_all(&[0.0; 3]), vec![0, 1, 2]);
    }

    #[test]
    fn argmax_breaks_ties_randomly() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[argmax(&[0.0, 5.0, -1.0, 5.0], &mut rng)] = true;
        }
        assert_eq!(seen, [false, true, false, true]);
    }
}
