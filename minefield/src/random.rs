//! Source of randomness for laying mines.

/// Supplies uniform random indexes. Mine placement draws from this rather than from any
/// process-wide generator so a board can be reproduced from a seed.
pub trait RandomSource {
    /// Return a value drawn uniformly from `[0, bound)`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

#[cfg(feature = "rng_gen")]
impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn next_index(&mut self, bound: usize) -> usize {
        self.gen_range(0, bound)
    }
}

#[cfg(all(test, feature = "rng_gen"))]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn rand_indexes_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for bound in 1..50 {
            assert!(rng.next_index(bound) < bound);
        }
    }
}
