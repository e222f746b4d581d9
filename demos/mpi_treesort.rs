//! Distributed tree merge sort over MPI.
//!
//! Run with a saturating pool size (1, 3, 7, 15, ..) so every rank receives
//! work, e.g. `mpirun -n 7 mpi_treesort 1000`. An optional positive integer
//! argument overrides the default sequence length; anything else falls back
//! to the default.
use mpi::traits::Communicator;
use tree_mergesort::constants::DEFAULT_SEQUENCE_LEN;
use tree_mergesort::tools::{descending_sequence, is_sorted};
use tree_mergesort::transport::MpiTransport;
use tree_mergesort::treesort::{treesort, SortConfig};

pub fn main() {
    let universe = mpi::initialize().unwrap();
    let world = universe.world();

    let len = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .filter(|&len| len > 0)
        .unwrap_or(DEFAULT_SEQUENCE_LEN);

    let link = MpiTransport::new(&world);

    let result = treesort(&link, &SortConfig::default(), || descending_sequence(len)).unwrap();

    if world.rank() == 0 {
        let sorted = result.unwrap();
        assert!(is_sorted(&sorted));
        assert_eq!(sorted.len(), len);
        println!("Sorted sequence: {:?}", sorted);
    }
}
