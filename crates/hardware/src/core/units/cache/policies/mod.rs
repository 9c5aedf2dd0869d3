//! Replacement Policies.
//!
//! Selects victim ways in set-associative structures. Both the caches and the
//! branch target buffer are generic over this trait.
//!
//! # Policies
//!
//! - `TreePlru`: Pseudo-LRU over a binary tree of direction bits.

/// Tree pseudo-LRU replacement policy.
pub mod plru;

pub use plru::TreePlru;

/// Trait for replacement policies.
///
/// Defines the interface for recording accesses and selecting victim ways.
/// Replacement state is independent of the entries it protects: a policy only
/// ever sees set and way indices.
pub trait ReplacementPolicy {
    /// Creates the state for a structure of `sets` sets with `ways` ways each.
    fn new(sets: usize, ways: usize) -> Self
    where
        Self: Sized;

    /// Records an access ("touch") to a way.
    ///
    /// # Arguments
    ///
    /// * `set` - The set index.
    /// * `way` - The way within the set that was accessed.
    fn update(&mut self, set: usize, way: usize);

    /// Selects the way to evict from a set.
    ///
    /// Selecting a victim does not change the policy state; the caller records
    /// the refill with [`ReplacementPolicy::update`].
    ///
    /// # Arguments
    ///
    /// * `set` - The set index.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn get_victim(&mut self, set: usize) -> usize;
}
