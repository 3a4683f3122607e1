//! Deterministic seed mixing and random-stream helpers shared by algorithms and placement.
//!
//! Every draw goes through `next_u32`/`next_u64` with fixed-width arithmetic so a
//! seed produces the same stream on every platform.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Fresh random source for one level. Levels never share a stream.
pub fn level_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Per-level seed derived from a run seed, so consecutive levels of one run
/// are independent but reproducible.
pub fn derive_level_seed(run_seed: u64, level_index: u32) -> u64 {
    let mut mixed = run_seed ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= u64::from(level_index).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

pub(crate) fn random_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0);
    (rng.next_u64() % len as u64) as usize
}

pub(crate) fn random_bool<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.next_u32() & 1 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_index_stays_inside_requested_bounds() {
        let mut rng = level_rng(12_345);
        for len in 1..50 {
            assert!(random_index(&mut rng, len) < len);
        }
    }

    #[test]
    fn level_seed_changes_when_inputs_change() {
        let baseline = derive_level_seed(99, 2);
        assert_ne!(baseline, derive_level_seed(98, 2));
        assert_ne!(baseline, derive_level_seed(99, 3));
        assert_eq!(baseline, derive_level_seed(99, 2));
    }

    #[test]
    fn same_seed_yields_same_stream() {
        let mut left = level_rng(7);
        let mut right = level_rng(7);
        let left_draws: Vec<u64> = (0..16).map(|_| left.next_u64()).collect();
        let right_draws: Vec<u64> = (0..16).map(|_| right.next_u64()).collect();
        assert_eq!(left_draws, right_draws);
    }

    #[test]
    fn random_bool_produces_both_values() {
        let mut rng = level_rng(3);
        let draws: Vec<bool> = (0..64).map(|_| random_bool(&mut rng)).collect();
        assert!(draws.contains(&true));
        assert!(draws.contains(&false));
    }
}
