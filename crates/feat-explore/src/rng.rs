//! Seeded random sources for sampling.
//!
//! The global seed picks the ChaCha8 key and the parameter position picks
//! the stream under that key, so every (seed, position) pair draws from an
//! independent sequence.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// RNG for one parameter position under `global_seed`.
pub fn stage_rng(global_seed: u64, stage_id: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(global_seed);
    rng.set_stream(stage_id);
    rng
}

/// One RNG per parameter position.
pub fn param_rngs(global_seed: u64, params: usize) -> Vec<ChaCha8Rng> {
    (0..params as u64).map(|i| stage_rng(global_seed, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn draws(rng: &mut ChaCha8Rng) -> Vec<u64> {
        (0..8).map(|_| rng.gen()).collect()
    }

    #[test]
    fn test_same_seed_same_stream() {
        assert_eq!(draws(&mut stage_rng(42, 0)), draws(&mut stage_rng(42, 0)));
    }

    #[test]
    fn test_positions_draw_independently() {
        let mut rngs = param_rngs(42, 2);
        let first = draws(&mut rngs[0]);
        assert_ne!(first, draws(&mut rngs[1]));
        assert_eq!(first, draws(&mut stage_rng(42, 0)));
    }

    #[test]
    fn test_next_seed_is_not_a_shifted_position() {
        assert_ne!(draws(&mut stage_rng(42, 1)), draws(&mut stage_rng(43, 0)));
        assert_ne!(draws(&mut stage_rng(42, 0)), draws(&mut stage_rng(43, 0)));
    }
}
