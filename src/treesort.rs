//! Implementation of the distributed tree merge sort.
//!
//! Every worker in the pool runs [`treesort`] once, from program start. The
//! root synthesizes the full sequence; every other worker blocks until its
//! parent hands it a slice. A worker delegates the two halves of its slice to
//! its children when the slice is long enough and both children exist,
//! otherwise it sorts the slice locally. Sorted halves are merged on the way
//! back up, and the fully sorted sequence surfaces at the root.

use crate::constants::DEFAULT_THRESHOLD;
use crate::exchange::exchange_sort;
use crate::merge::merge_sorted;
use crate::topology::Topology;
use crate::transport::{TransferError, Transport};

/// Configuration of a single sort run.
#[derive(Copy, Clone, Debug)]
pub struct SortConfig {
    /// Slice length at or below which a worker sorts locally instead of
    /// delegating to its children.
    pub threshold: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Probe the length of the next transfer from `source`, then receive it
/// into a buffer of exactly that length.
fn receive_slice<T, H: Transport<T>>(link: &H, source: usize) -> Result<Vec<T>, TransferError> {
    let len = link.probe_len(source)?;
    link.receive(source, len)
}

/// Run one worker's share of the distributed sort.
///
/// Must be called exactly once on every worker of the pool behind `link`.
/// The `init` closure is the initialization collaborator; it is invoked on
/// the root only and must produce the sequence to sort. Non-root workers
/// receive their slice from their parent instead.
///
/// Returns `Ok(Some(sorted))` on the root and `Ok(None)` on every other
/// worker. The result is a sorted permutation of the initial sequence.
///
/// The protocol has no timeouts. A worker whose parent never delegates to it
/// blocks in the probe until the transport observes the peer going away; over
/// MPI this means blocking indefinitely, over a channel mesh it surfaces as
/// [`TransferError::Disconnected`].
pub fn treesort<T, H, F>(
    link: &H,
    config: &SortConfig,
    init: F,
) -> Result<Option<Vec<T>>, TransferError>
where
    T: Ord + Copy,
    H: Transport<T>,
    F: FnOnce() -> Vec<T>,
{
    let topo = Topology::new(link.rank(), link.size());

    let mut slice = match topo.parent() {
        None => init(),
        Some(parent) => receive_slice(link, parent)?,
    };

    let children = if slice.len() > config.threshold {
        topo.children()
    } else {
        None
    };

    match children {
        Some((left, right)) => {
            let mid = slice.len() / 2;
            let (lower, upper) = slice.split_at(mid);

            // Both sends go out before either receive, so the two children
            // accept their halves independently and no circular wait arises.
            link.send(left, lower)?;
            link.send(right, upper)?;

            let lower = receive_slice(link, left)?;
            let upper = receive_slice(link, right)?;

            slice = merge_sorted(&lower, &upper);
        }
        None => exchange_sort(&mut slice),
    }

    match topo.parent() {
        None => Ok(Some(slice)),
        Some(parent) => {
            link.send(parent, &slice)?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod test {
    use super::{treesort, SortConfig};
    use crate::tools::{is_sorted, random_sequence, seeded_rng};
    use crate::transport::{channel_mesh, TransferError};
    use itertools::Itertools;

    /// Run a full worker pool over a channel mesh, one thread per worker,
    /// and return each worker's outcome indexed by rank.
    fn run_pool(
        input: Vec<i32>,
        size: usize,
        threshold: usize,
    ) -> Vec<Result<Option<Vec<i32>>, TransferError>> {
        let config = SortConfig { threshold };
        let mut handles = Vec::new();

        for link in channel_mesh::<i32>(size) {
            let init = input.clone();
            handles.push(std::thread::spawn(move || {
                treesort(&link, &config, move || init)
            }));
        }

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    }

    fn root_result(
        input: Vec<i32>,
        size: usize,
        threshold: usize,
    ) -> Result<Option<Vec<i32>>, TransferError> {
        run_pool(input, size, threshold).remove(0)
    }

    #[test]
    fn test_single_worker() {
        let sorted = root_result(vec![4, 3, 2, 1], 1, 4).unwrap().unwrap();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_three_workers() {
        // The root delegates [8, 7, 6, 5] and [4, 3, 2, 1]; each child
        // sorts its half locally and the root merges.
        let results = run_pool(vec![8, 7, 6, 5, 4, 3, 2, 1], 3, 4);
        assert_eq!(
            results[0],
            Ok(Some(vec![1, 2, 3, 4, 5, 6, 7, 8]))
        );
        assert_eq!(results[1], Ok(None));
        assert_eq!(results[2], Ok(None));
    }

    #[test]
    fn test_empty_sequence() {
        let sorted = root_result(Vec::new(), 1, 4).unwrap().unwrap();
        assert!(sorted.is_empty());
    }

    #[test]
    fn test_permutation_preserved() {
        let mut rng = seeded_rng(0);

        for size in [3, 7] {
            let input = random_sequence(64, &mut rng);
            let sorted = root_result(input.clone(), size, 10).unwrap().unwrap();

            assert!(is_sorted(&sorted));
            assert_eq!(sorted.len(), input.len());

            let expected = input.into_iter().sorted().collect_vec();
            assert_eq!(sorted, expected);
        }
    }

    #[test]
    fn test_threshold_boundary_sorts_locally() {
        // A slice exactly at the threshold is sorted locally; the children
        // are left idle and observe the mesh tearing down.
        let results = run_pool(vec![4, 3, 2, 1], 3, 4);
        assert_eq!(results[0], Ok(Some(vec![1, 2, 3, 4])));
        assert_eq!(results[1], Err(TransferError::Disconnected { peer: 0 }));
        assert_eq!(results[2], Err(TransferError::Disconnected { peer: 0 }));
    }

    #[test]
    fn test_threshold_boundary_delegates() {
        // One element past the threshold both children participate.
        let results = run_pool(vec![5, 4, 3, 2, 1], 3, 4);
        assert_eq!(results[0], Ok(Some(vec![1, 2, 3, 4, 5])));
        assert_eq!(results[1], Ok(None));
        assert_eq!(results[2], Ok(None));
    }

    #[test]
    fn test_leaf_sorts_regardless_of_threshold() {
        // No children in the pool, so even threshold 0 sorts locally.
        let input = (1..=100).rev().collect_vec();
        let sorted = root_result(input, 1, 0).unwrap().unwrap();
        assert_eq!(sorted, (1..=100).collect_vec());
    }

    #[test]
    fn test_missing_right_child_folds_into_local_work() {
        // In a pool of 2 the root has a left child but no right child, so
        // it must not delegate at all.
        let results = run_pool(vec![3, 1, 2], 2, 0);
        assert_eq!(results[0], Ok(Some(vec![1, 2, 3])));
        assert_eq!(results[1], Err(TransferError::Disconnected { peer: 0 }));
    }

    #[test]
    fn test_zero_length_half() {
        // Threshold 0 with a single element delegates an empty lower half;
        // empty slices must transfer and merge cleanly.
        let results = run_pool(vec![9], 3, 0);
        assert_eq!(results[0], Ok(Some(vec![9])));
        assert_eq!(results[1], Ok(None));
        assert_eq!(results[2], Ok(None));
    }

    #[test]
    fn test_duplicates_survive() {
        let input = vec![2, 2, 1, 1, 3, 3, 2, 2];
        let sorted = root_result(input, 3, 4).unwrap().unwrap();
        assert_eq!(sorted, vec![1, 1, 2, 2, 2, 2, 3, 3]);
    }

    #[test]
    fn test_deep_tree() {
        let mut rng = seeded_rng(42);
        let input = random_sequence(200, &mut rng);

        // Seven workers and a small threshold force two levels of
        // delegation before the leaves sort locally.
        let results = run_pool(input.clone(), 7, 30);
        let sorted = results[0].clone().unwrap().unwrap();

        assert!(is_sorted(&sorted));
        let expected = input.into_iter().sorted().collect_vec();
        assert_eq!(sorted, expected);

        for result in &results[1..] {
            assert_eq!(*result, Ok(None));
        }
    }
}
