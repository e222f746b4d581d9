//! Utility routines.

use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generate the deterministic descending sequence `len, len - 1, .., 1`.
///
/// This is the reference initializer for the root's sequence: it is the
/// worst case for the local exchange sort and makes a correct result easy
/// to recognize.
pub fn descending_sequence(len: usize) -> Vec<i32> {
    (1..=len as i32).rev().collect()
}

/// Generate a random sequence for testing.
pub fn random_sequence<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<i32> {
    (0..len).map(|_| rng.gen_range(0..1000)).collect()
}

/// Check if a slice is sorted in non-decreasing order.
pub fn is_sorted<T: PartialOrd>(arr: &[T]) -> bool {
    arr.iter()
        .tuple_windows()
        .all(|(elem1, elem2)| elem1 <= elem2)
}

/// Get a seeded rng
pub fn seeded_rng(seed: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed as u64)
}
