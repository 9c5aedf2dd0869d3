//! Branch History Table (BHT).
//!
//! A table of 2-bit saturating counters indexed by the low bits of the word
//! address of a branch. Counters 0 and 1 predict not-taken, 2 and 3 predict taken.

/// Counter value every entry starts at (weakly not-taken).
pub const WEAKLY_NOT_TAKEN: u8 = 1;

const COUNTER_MAX: u8 = 3;
const TAKEN_THRESHOLD: u8 = 2;

/// Direction predictor built from 2-bit saturating counters.
#[derive(Clone, Debug)]
pub struct Bht {
    counters: Vec<u8>,
}

impl Bht {
    /// Creates a table of `size` counters, all weakly not-taken.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not a power of two.
    pub fn new(size: usize) -> Self {
        assert!(size.is_power_of_two(), "BHT size must be a power of two, got {size}");
        Self {
            counters: vec![WEAKLY_NOT_TAKEN; size],
        }
    }

    fn index(&self, pc: u64) -> usize {
        ((pc >> 2) as usize) & (self.counters.len() - 1)
    }

    /// Predicts taken when the counter for `pc` is 2 or 3.
    pub fn predict(&self, pc: u64) -> bool {
        self.counters[self.index(pc)] >= TAKEN_THRESHOLD
    }

    /// Moves the counter for `pc` one step toward the actual outcome.
    pub fn update(&mut self, pc: u64, taken: bool) {
        let index = self.index(pc);
        let counter = &mut self.counters[index];
        *counter = if taken {
            (*counter + 1).min(COUNTER_MAX)
        } else {
            counter.saturating_sub(1)
        };
    }

    /// Raw counter value for `pc`.
    pub fn counter(&self, pc: u64) -> u8 {
        self.counters[self.index(pc)]
    }

    /// Number of counters.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Always `false`; a table has at least one counter.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
