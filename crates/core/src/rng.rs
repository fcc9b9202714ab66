use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `0..bound`. `bound` must be non-zero.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RngState::from_seed(7);
        let mut b = RngState::from_seed(7);
        let left: Vec<u32> = (0..32).map(|_| a.next_below(20)).collect();
        let right: Vec<u32> = (0..32).map(|_| b.next_below(20)).collect();
        assert_eq!(left, right);
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn next_below_stays_in_range() {
        let mut rng = RngState::from_seed(0xC0FFEE);
        for _ in 0..1000 {
            assert!(rng.next_below(20) < 20);
        }
    }
}
