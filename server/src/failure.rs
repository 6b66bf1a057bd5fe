use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Coin-flip transient-failure source for the read endpoints.
///
/// The rate and seed are injected rather than sampled inline so tests can pin
/// the behavior: rate `0.0` never trips, `1.0` always trips, and a fixed seed
/// makes intermediate rates reproducible.
pub struct FailureInjector {
    rate: f64,
    rng: Mutex<ChaCha8Rng>,
}

impl FailureInjector {
    pub fn new(rate: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            rate,
            rng: Mutex::new(rng),
        }
    }

    pub fn trip(&self) -> bool {
        if self.rate <= 0.0 {
            return false;
        }
        if self.rate >= 1.0 {
            return true;
        }

        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f64>() < self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::FailureInjector;

    #[test]
    fn zero_rate_never_trips() {
        let injector = FailureInjector::new(0.0, Some(1));
        assert!((0..1000).all(|_| !injector.trip()));
    }

    #[test]
    fn full_rate_always_trips() {
        let injector = FailureInjector::new(1.0, Some(1));
        assert!((0..1000).all(|_| injector.trip()));
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let a = FailureInjector::new(0.5, Some(42));
        let b = FailureInjector::new(0.5, Some(42));

        let flips_a: Vec<bool> = (0..100).map(|_| a.trip()).collect();
        let flips_b: Vec<bool> = (0..100).map(|_| b.trip()).collect();

        assert_eq!(flips_a, flips_b);
    }
}
