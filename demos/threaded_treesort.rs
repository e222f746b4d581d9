//! Tree merge sort over an in-process channel mesh, one thread per worker.
//!
//! Runs without an MPI launcher. An optional positive integer argument
//! overrides the default sequence length.
use std::thread;

use tree_mergesort::constants::DEFAULT_SEQUENCE_LEN;
use tree_mergesort::tools::{descending_sequence, is_sorted};
use tree_mergesort::transport::channel_mesh;
use tree_mergesort::treesort::{treesort, SortConfig};

const NUM_WORKERS: usize = 7;

pub fn main() {
    let len = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .filter(|&len| len > 0)
        .unwrap_or(DEFAULT_SEQUENCE_LEN);

    let mut handles = Vec::new();

    for link in channel_mesh::<i32>(NUM_WORKERS) {
        handles.push(thread::spawn(move || {
            treesort(&link, &SortConfig::default(), || descending_sequence(len))
        }));
    }

    for handle in handles {
        // Workers the delegation never reaches observe the mesh tearing
        // down once the participating workers are done; that is fine here.
        if let Ok(Some(sorted)) = handle.join().unwrap() {
            assert!(is_sorted(&sorted));
            assert_eq!(sorted.len(), len);
            println!("Sorted sequence: {:?}", sorted);
        }
    }
}
