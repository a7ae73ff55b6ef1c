//! Injectable randomness for dealing games.

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};

use crate::StoreError;

/// Source of uniformly distributed indices.
pub trait RandomSource: Send {
    /// Returns an index in `0..n`. `n` is never zero when called from this crate.
    fn next(&mut self, n: usize) -> usize;
}

/// Reproducible source for tests and replays.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a source that always yields the same sequence for `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed this source was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }
}

/// Production source backed by the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn next(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        OsRng.gen_range(0..n)
    }
}

/// Draws `n` items without replacement, in draw order.
pub fn pick<T: Clone>(set: &[T], n: usize, rng: &mut dyn RandomSource) -> Vec<T> {
    let mut remaining = set.to_vec();
    let mut drawn = Vec::with_capacity(n.min(remaining.len()));
    while drawn.len() < n && !remaining.is_empty() {
        let j = rng.next(remaining.len());
        drawn.push(remaining.remove(j));
    }
    drawn
}

/// Returns a random permutation of `set`.
pub fn shuffle<T: Clone>(set: &[T], rng: &mut dyn RandomSource) -> Vec<T> {
    pick(set, set.len(), rng)
}

/// Fresh opaque game id: 16 random bytes, hex encoded.
///
/// # Errors
///
/// [`StoreError`] if the operating system's random source fails.
pub fn new_game_id() -> Result<String, StoreError> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| StoreError::new(format!("Failed to generate game id: {}", e)))?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let items: Vec<u32> = (0..20).collect();
        let a = shuffle(&items, &mut SeededRandom::from_seed(7));
        let b = shuffle(&items, &mut SeededRandom::from_seed(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_is_remembered() {
        assert_eq!(SeededRandom::from_seed(99).seed(), 99);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let items: Vec<u32> = (0..40).collect();
        let mut shuffled = shuffle(&items, &mut OsRandom);
        shuffled.sort_unstable();
        assert_eq!(shuffled, items);
    }

    #[test]
    fn test_pick_stops_at_set_size() {
        let items = ["a", "b", "c"];
        let drawn = pick(&items, 5, &mut SeededRandom::from_seed(1));
        assert_eq!(drawn.len(), 3);
    }

    #[test]
    fn test_game_ids_are_distinct() {
        let a = new_game_id().expect("OS random source");
        let b = new_game_id().expect("OS random source");
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
