//! Branch Target Buffer (BTB).
//!
//! The BTB is a set-associative cache of branch targets. It lets fetch redirect
//! to a taken branch's target before the branch executes.
//!
//! Entries store a compressed tag to save space. Compression is lossy, so two
//! branches mapping to the same set may alias; an alias simply yields a wrong
//! target, which the predictor treats as an ordinary misprediction.

use crate::core::units::cache::policies::{ReplacementPolicy, TreePlru};

/// Folds the high-order PC bits into a 16-bit tag.
pub type TagCompressor = fn(u64) -> u16;

/// Default tag compression: the low byte, with every higher byte XOR-folded
/// into the high byte.
pub const fn fold_tag(bits: u64) -> u16 {
    let mut folded = 0u8;
    let mut rest = bits >> 8;
    while rest != 0 {
        folded ^= rest as u8;
        rest >>= 8;
    }
    (bits as u8) as u16 | ((folded as u16) << 8)
}

/// An entry in the Branch Target Buffer.
#[derive(Clone, Copy, Debug, Default)]
struct BtbEntry {
    /// Compressed tag of the branch this entry belongs to.
    tag: u16,
    /// The predicted target address.
    target: u64,
    /// Indicates if this entry contains valid data.
    valid: bool,
}

/// Set-associative Branch Target Buffer.
#[derive(Clone, Debug)]
pub struct Btb<R = TreePlru> {
    /// Entries, `ways` consecutive entries per set.
    table: Vec<BtbEntry>,
    num_sets: usize,
    ways: usize,
    index_bits: u32,
    compress: TagCompressor,
    policy: R,
}

impl<R: ReplacementPolicy> Btb<R> {
    /// Creates an empty BTB using [`fold_tag`] compression.
    ///
    /// # Arguments
    ///
    /// * `num_sets` - The number of sets. Must be a power of 2.
    /// * `ways` - Entries per set. Must be a power of 2.
    pub fn new(num_sets: usize, ways: usize) -> Self {
        Self::with_compressor(num_sets, ways, fold_tag)
    }

    /// Creates an empty BTB with a custom tag compression function.
    pub fn with_compressor(num_sets: usize, ways: usize, compress: TagCompressor) -> Self {
        assert!(
            num_sets.is_power_of_two() && ways.is_power_of_two(),
            "BTB geometry must be powers of two, got {num_sets} sets x {ways} ways"
        );
        Self {
            table: vec![BtbEntry::default(); num_sets * ways],
            num_sets,
            ways,
            index_bits: num_sets.trailing_zeros(),
            compress,
            policy: R::new(num_sets, ways),
        }
    }

    /// Calculates the set for a given program counter.
    ///
    /// Shifts the PC right by 2 bits (ignoring instruction alignment) and masks
    /// it against the number of sets.
    fn index(&self, pc: u64) -> usize {
        ((pc >> 2) as usize) & (self.num_sets - 1)
    }

    fn tag(&self, pc: u64) -> u16 {
        (self.compress)(pc >> (2 + self.index_bits))
    }

    fn find(&self, set: usize, tag: u16) -> Option<usize> {
        let base = set * self.ways;
        self.table[base..base + self.ways]
            .iter()
            .position(|entry| entry.valid && entry.tag == tag)
    }

    /// Looks up the predicted target for `pc`.
    ///
    /// A hit counts as a use of the entry for replacement.
    ///
    /// # Returns
    ///
    /// The cached target, or `None` on a miss.
    pub fn lookup(&mut self, pc: u64) -> Option<u64> {
        let set = self.index(pc);
        let way = self.find(set, self.tag(pc))?;
        self.policy.update(set, way);
        Some(self.table[set * self.ways + way].target)
    }

    /// Records `target` for `pc`.
    ///
    /// Overwrites the entry already holding `pc`'s tag, or evicts the set's
    /// victim if there is none.
    pub fn update(&mut self, pc: u64, target: u64) {
        let set = self.index(pc);
        let tag = self.tag(pc);
        let way = self
            .find(set, tag)
            .unwrap_or_else(|| self.policy.get_victim(set));
        self.table[set * self.ways + way] = BtbEntry {
            tag,
            target,
            valid: true,
        };
        self.policy.update(set, way);
    }
}
