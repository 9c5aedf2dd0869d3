//! Instruction pool.
//!
//! In-flight instructions live in a fixed circular arena and are named by
//! [`Ticket`]s. Instructions retire in program order, so the arena is a ring
//! buffer: `allocate` hands out the slot at the write cursor and `free` returns
//! the slot at the read cursor. The bubble has a reserved ticket of its own and
//! never occupies a slot.

use std::fmt;

use tracing::debug;

use crate::isa::Instruction;

/// Handle to an instruction in an [`InstructionPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u32);

impl Ticket {
    /// The pipeline bubble.
    pub const BUBBLE: Self = Self(u32::MAX);

    /// Returns `true` for [`Ticket::BUBBLE`].
    pub const fn is_bubble(self) -> bool {
        self.0 == Self::BUBBLE.0
    }

    /// Pool slot index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bubble() {
            f.write_str("bubble")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Fixed-capacity circular allocator of instruction records.
#[derive(Debug)]
pub struct InstructionPool {
    slots: Vec<Instruction>,
    bubble: Instruction,
    read: usize,
    write: usize,
    live: usize,
}

impl InstructionPool {
    /// Creates a pool of `capacity` free slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or does not fit below the bubble ticket.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0 && capacity < Ticket::BUBBLE.index(),
            "invalid instruction pool capacity {capacity}"
        );
        Self {
            slots: vec![Instruction::default(); capacity],
            bubble: Instruction::bubble(),
            read: 0,
            write: 0,
            live: 0,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently in flight.
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Allocates the next slot and resets its fields.
    ///
    /// # Panics
    ///
    /// Panics if the slot at the write cursor is still in flight, which means
    /// the pool is smaller than the number of instructions the driver keeps alive.
    pub fn allocate(&mut self) -> Ticket {
        let index = self.write;
        let slot = &mut self.slots[index];
        assert!(
            !slot.is_used(),
            "instruction pool exhausted: slot {index} is still in flight"
        );
        slot.allocate();
        self.write = (index + 1) % self.slots.len();
        self.live += 1;
        debug!(slot = index, live = self.live, "instruction allocated");
        Ticket(index as u32)
    }

    /// Retires `ticket`, which must be the oldest instruction in flight.
    ///
    /// # Panics
    ///
    /// Panics if `ticket` is the bubble, is not the oldest allocation, or is
    /// not in flight.
    pub fn free(&mut self, ticket: Ticket) {
        assert!(!ticket.is_bubble(), "the bubble is never retired");
        let index = self.read;
        assert_eq!(
            ticket.index(),
            index,
            "instruction {} retired out of order (oldest in flight is {index})",
            ticket.index()
        );
        let slot = &mut self.slots[index];
        assert!(slot.is_used(), "slot {index} freed twice");
        slot.release();
        self.read = (index + 1) % self.slots.len();
        self.live -= 1;
        debug!(slot = index, live = self.live, "instruction retired");
    }

    /// The bubble ticket.
    pub const fn bubble(&self) -> Ticket {
        Ticket::BUBBLE
    }

    /// The instruction behind `ticket`.
    ///
    /// # Panics
    ///
    /// Panics if the slot has already been freed.
    pub fn get(&self, ticket: Ticket) -> &Instruction {
        if ticket.is_bubble() {
            return &self.bubble;
        }
        let inst = &self.slots[ticket.index()];
        assert!(inst.is_used(), "instruction {} read after retirement", ticket.index());
        inst
    }

    /// Mutable access to the instruction behind `ticket`.
    ///
    /// # Panics
    ///
    /// Panics for the bubble, which is shared and immutable, or a freed slot.
    pub fn get_mut(&mut self, ticket: Ticket) -> &mut Instruction {
        assert!(!ticket.is_bubble(), "the bubble is immutable");
        let inst = &mut self.slots[ticket.index()];
        assert!(inst.is_used(), "instruction {} written after retirement", ticket.index());
        inst
    }
}
