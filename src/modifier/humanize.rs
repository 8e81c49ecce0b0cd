//! Humanization: bounded uniform jitter drawn from an injected generator.

use rand::Rng;

/// A uniform draw in `-variance..=variance`.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, variance: u32) -> i64 {
    let v = variance as i64;
    rng.gen_range(-v..=v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn stays_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let j = jitter(&mut rng, 5);
            assert!((-5..=5).contains(&j));
        }
    }

    #[test]
    fn zero_variance_is_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(jitter(&mut rng, 0), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        let xs: Vec<i64> = (0..32).map(|_| jitter(&mut a, 8)).collect();
        let ys: Vec<i64> = (0..32).map(|_| jitter(&mut b, 8)).collect();
        assert_eq!(xs, ys);
    }
}
