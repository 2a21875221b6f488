use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded randomness shared by the bots of one process, so a seed replays a run.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distr::uniform::SampleUniform,
        R: rand::distr::uniform::SampleRange<T>,
    {
        self.rng.random_range(range)
    }

    /// Derives an independent generator, e.g. one per arena pairing.
    pub fn fork(&mut self) -> Self {
        Self::new(self.rng.random())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SessionRng::new(7);
        let mut b = SessionRng::new(7);
        let left: Vec<usize> = (0..16).map(|_| a.random_range(0..9)).collect();
        let right: Vec<usize> = (0..16).map(|_| b.random_range(0..9)).collect();
        assert_eq!(left, right);
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_forks_are_reproducible() {
        let mut a = SessionRng::new(11);
        let mut b = SessionRng::new(11);
        assert_eq!(a.fork().seed(), b.fork().seed());
    }
}
