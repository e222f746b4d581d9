//! Worker placement in the implicit binary tree.
//!
//! Workers are identified by a linear rank in `[0, size)`. The tree is never
//! stored; all relations are derived from the rank. Rank 0 is the root,
//! rank `i` has parent `(i - 1) / 2` and children `2i + 1` and `2i + 2`.

/// Position of a single worker within the implicit binary tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    rank: usize,
    size: usize,
}

impl Topology {
    /// Resolve the position of worker `rank` in a pool of `size` workers.
    pub fn new(rank: usize, size: usize) -> Self {
        assert!(size >= 1);
        assert!(rank < size);
        Self { rank, size }
    }

    /// The rank of this worker.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The total number of workers in the pool.
    pub fn size(&self) -> usize {
        self.size
    }

    /// True if this worker is the root of the tree.
    pub fn is_root(&self) -> bool {
        self.rank == 0
    }

    /// The parent rank, or `None` for the root.
    pub fn parent(&self) -> Option<usize> {
        if self.is_root() {
            None
        } else {
            Some((self.rank - 1) / 2)
        }
    }

    /// The left child index. May lie outside the worker pool.
    pub fn left_child(&self) -> usize {
        2 * self.rank + 1
    }

    /// The right child index. May lie outside the worker pool even
    /// when the left child index does not.
    pub fn right_child(&self) -> usize {
        2 * self.rank + 2
    }

    /// True if the left child index lies within the worker pool.
    pub fn has_children(&self) -> bool {
        self.left_child() < self.size
    }

    /// The child ranks, if both lie within the worker pool.
    ///
    /// A worker whose right child index falls outside the pool cannot
    /// split its slice between two children and must sort locally.
    pub fn children(&self) -> Option<(usize, usize)> {
        if self.right_child() < self.size {
            Some((self.left_child(), self.right_child()))
        } else {
            None
        }
    }
}
