//! Tree Pseudo-LRU (PLRU) Replacement Policy.
//!
//! Tree-PLRU approximates Least Recently Used with one bit per internal node of a
//! complete binary tree whose leaves are the ways (N-1 bits for N ways).
//!
//! Nodes are numbered heap style: the root is node 1 and node `i` has children
//! `2i` (left) and `2i + 1` (right), so way `w` is leaf node `w + N`. A node bit of
//! 0 steers victim selection left and 1 steers it right.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(log W)
//!   - `get_victim()`: O(log W)
//! - **Space Complexity:** One `u64` per set (up to 64 ways)
//! - **Hardware Cost:** Low - one bit per tree node
//! - **Worst Case:** A fresh set is filled in bit-reversed order (0, 2, 1, 3 for four
//!   ways) rather than sequentially, and some patterns evict a line that true LRU
//!   would keep

use super::ReplacementPolicy;

/// Tree-PLRU state for every set.
#[derive(Clone, Debug)]
pub struct TreePlru {
    /// Node bits per set. Bit `i` holds node `i` (bit 0 is unused).
    trees: Vec<u64>,
    /// Number of leaves (ways) of every tree.
    ways: usize,
}

impl TreePlru {
    /// Raw node bits of a set, for inspection.
    pub fn tree_bits(&self, set: usize) -> u64 {
        self.trees[set]
    }
}

impl ReplacementPolicy for TreePlru {
    /// Creates all-zero trees, so the first victim of every set is way 0.
    ///
    /// # Panics
    ///
    /// Panics if `ways` is not a power of two between 1 and 64.
    fn new(sets: usize, ways: usize) -> Self {
        assert!(
            ways.is_power_of_two() && ways <= 64,
            "tree PLRU needs a power-of-two way count up to 64, got {ways}"
        );
        Self {
            trees: vec![0; sets],
            ways,
        }
    }

    /// Walks from the touched leaf to the root, pointing every ancestor away
    /// from the subtree that holds the touched way.
    fn update(&mut self, set: usize, way: usize) {
        debug_assert!(way < self.ways, "way {way} out of range");
        let tree = &mut self.trees[set];
        let mut node = way + self.ways;
        while node > 1 {
            let parent = node / 2;
            if node % 2 == 0 {
                // Left child: steer the next victim right.
                *tree |= 1 << parent;
            } else {
                *tree &= !(1 << parent);
            }
            node = parent;
        }
    }

    /// Follows the node bits from the root down to a leaf.
    fn get_victim(&mut self, set: usize) -> usize {
        let tree = self.trees[set];
        let mut node = 1;
        while node < self.ways {
            let bit = ((tree >> node) & 1) as usize;
            node = 2 * node + bit;
        }
        node - self.ways
    }
}
