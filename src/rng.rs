//! Deterministic random number generation
//!
//! A single seeded ChaCha stream feeds every stochastic decision in the
//! engine, so a run is fully reproducible from its seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform draw from [min, max).
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.rng.gen_range(min..max)
    }

    /// Uniform integer draw from [min, max), exclusive of the upper bound.
    pub fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        self.rng.gen_range(min..max)
    }

    /// True with probability `p`. Values of `p` at or above 1.0 always hit.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Normal draw via Box-Muller (avoids a rand_distr dependency).
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1: f64 = self.rng.gen::<f64>().max(f64::MIN_POSITIVE);
        let u2: f64 = self.rng.gen();
        let radius = (-2.0 * u1.ln()).sqrt();
        mean + std_dev * radius * (std::f64::consts::TAU * u2).cos()
    }

    /// Index drawn from a categorical distribution. Weights are assumed to
    /// sum to 1; the final index absorbs any floating-point remainder.
    pub fn pick_weighted(&mut self, weights: &[f64]) -> usize {
        let draw: f64 = self.rng.gen();
        let mut cumulative = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if draw < cumulative {
                return index;
            }
        }
        weights.len() - 1
    }

    pub fn shuffle<T>(&mut self, values: &mut [T]) {
        values.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RandomSource::new(42);
        let mut b = RandomSource::new(42);
        for _ in 0..100 {
            assert_eq!(a.uniform(0.0, 1.0), b.uniform(0.0, 1.0));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RandomSource::new(1);
        let mut b = RandomSource::new(2);
        let draws_a: Vec<f64> = (0..8).map(|_| a.uniform(0.0, 1.0)).collect();
        let draws_b: Vec<f64> = (0..8).map(|_| b.uniform(0.0, 1.0)).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn uniform_int_respects_bounds() {
        let mut rng = RandomSource::new(7);
        for _ in 0..1000 {
            let value = rng.uniform_int(20, 80);
            assert!((20..80).contains(&value));
        }
    }

    #[test]
    fn chance_extremes() {
        let mut rng = RandomSource::new(3);
        assert!(rng.chance(1.0));
        assert!(!rng.chance(0.0));
        // Probabilities above 1 (possible for lopsided attacks) always hit.
        assert!(rng.chance(3.5));
    }

    #[test]
    fn normal_is_finite_and_centered() {
        let mut rng = RandomSource::new(11);
        let mean: f64 = (0..2000).map(|_| rng.normal(0.0, 10.0)).sum::<f64>() / 2000.0;
        assert!(mean.abs() < 1.5, "sample mean {mean} strayed from 0");
    }

    #[test]
    fn pick_weighted_returns_valid_index() {
        let mut rng = RandomSource::new(5);
        let weights = [0.05, 0.20, 0.10, 0.40, 0.15, 0.10];
        for _ in 0..500 {
            assert!(rng.pick_weighted(&weights) < weights.len());
        }
    }

    #[test]
    fn pick_weighted_certain_outcome() {
        let mut rng = RandomSource::new(5);
        let weights = [0.0, 1.0, 0.0];
        for _ in 0..50 {
            assert_eq!(rng.pick_weighted(&weights), 1);
        }
    }

    #[test]
    fn shuffle_is_deterministic() {
        let mut a = RandomSource::new(9);
        let mut b = RandomSource::new(9);
        let mut left: Vec<u32> = (0..20).collect();
        let mut right: Vec<u32> = (0..20).collect();
        a.shuffle(&mut left);
        b.shuffle(&mut right);
        assert_eq!(left, right);
    }
}
