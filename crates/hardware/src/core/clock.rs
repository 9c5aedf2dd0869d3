//! Central synchronous clock.
//!
//! The clock owns every actively clocked element and advances them in two ordered
//! phases per tick:
//! 1. **Transmit:** `clock_start` on every unit, in registration order.
//! 2. **Accept:** `clock_end` on every unit, in registration order.
//!
//! Every transmit finishes before the first accept begins, so stall and flush
//! requests raised while a stage processes its instruction are visible to all
//! accepts of the same cycle.
//!
//! # Skipped cycles
//!
//! Stalls whose length is known when they start (cache misses, multi-cycle
//! execution units, misprediction flushes) are charged through
//! [`CycleCounter::skip`] instead of being simulated tick by tick. This is exact
//! only while no clocked element has a state transition that depends on observing
//! the skipped cycles one at a time. A new stage or register that counts cycles,
//! times out, or samples shared state per cycle breaks that assumption and must be
//! ticked explicitly instead of skipped over.

use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

use crate::common::Cycles;

/// A unit advanced by the [`Clock`].
///
/// `Ctx` is the state shared by all units of one clock domain.
pub trait Clocked<Ctx: ?Sized> {
    /// Transmit phase.
    fn clock_start(&mut self, ctx: &mut Ctx);

    /// Accept phase.
    fn clock_end(&mut self, ctx: &mut Ctx);
}

/// Shared handle to a clock's cycle counter.
///
/// Stall and flush policies keep a clone so they can charge skipped cycles to the
/// clock that owns the counter.
#[derive(Clone, Debug, Default)]
pub struct CycleCounter(Rc<Cell<Cycles>>);

impl CycleCounter {
    /// Current cycle count.
    pub fn get(&self) -> Cycles {
        self.0.get()
    }

    /// Adds `cycles` without ticking any unit.
    pub fn skip(&self, cycles: Cycles) {
        self.0.set(self.0.get() + cycles);
    }
}

/// Two-phase clock over a list of units.
#[derive(Debug)]
pub struct Clock<U> {
    units: Vec<U>,
    counter: CycleCounter,
    ticks: u64,
}

impl<U> Default for Clock<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> Clock<U> {
    /// Creates a clock with no units at cycle zero.
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            counter: CycleCounter::default(),
            ticks: 0,
        }
    }

    /// Appends a unit. Units are clocked in registration order.
    ///
    /// # Returns
    ///
    /// The unit's position, usable with [`Clock::unit`].
    pub fn register(&mut self, unit: U) -> usize {
        self.units.push(unit);
        self.units.len() - 1
    }

    /// The unit registered at `index`.
    pub fn unit(&self, index: usize) -> &U {
        &self.units[index]
    }

    /// Mutable access to the unit registered at `index`.
    pub fn unit_mut(&mut self, index: usize) -> &mut U {
        &mut self.units[index]
    }

    /// All units in registration order.
    pub fn units(&self) -> &[U] {
        &self.units
    }

    /// A handle to this clock's cycle counter.
    pub fn counter(&self) -> CycleCounter {
        self.counter.clone()
    }

    /// Cycles elapsed, including skipped ones.
    pub fn cycle_count(&self) -> Cycles {
        self.counter.get()
    }

    /// Number of ticks executed. Unlike [`Clock::cycle_count`] this never
    /// includes skipped cycles, so it identifies the current tick.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Adds `cycles` to the counter without clocking any unit.
    pub fn skip_cycle(&self, cycles: Cycles) {
        self.counter.skip(cycles);
    }

    /// Runs one full cycle: every transmit, then every accept, then advances the counter.
    pub fn tick<Ctx: ?Sized>(&mut self, ctx: &mut Ctx)
    where
        U: Clocked<Ctx>,
    {
        trace!(tick = self.ticks, cycle = self.counter.get(), "clock tick");
        for unit in &mut self.units {
            unit.clock_start(ctx);
        }
        for unit in &mut self.units {
            unit.clock_end(ctx);
        }
        self.counter.skip(1);
        self.ticks += 1;
    }
}
