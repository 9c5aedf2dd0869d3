//! Iterative divider latency.
//!
//! A restoring divider retires one quotient bit per step, and only needs as many
//! steps as the quotient has significant bits. The latency is therefore the base
//! latency plus the difference between the bit lengths of dividend and divisor,
//! taken from the floating-point logarithms; the sum is truncated and never
//! negative, so a divisor larger than the dividend finishes early.
//!
//! Signed operations pay for sign handling on top: one cycle if either operand
//! is negative (`(a | b) < 0`) and another if the signs differ (`(a ^ b) < 0`).
//!
//! The datapath is 32 bits wide: every operation, word form or not, sees only the
//! low half of its operands.

use super::LatencyModel;
use crate::common::Cycles;
use crate::isa::Instruction;

/// Operand-dependent divider latency model.
#[derive(Clone, Copy, Debug)]
pub struct Divider {
    base_latency: Cycles,
}

impl Divider {
    /// Creates a divider whose latency starts from `base_latency` cycles.
    pub const fn new(base_latency: Cycles) -> Self {
        Self { base_latency }
    }

    /// Latency of dividing `dividend` by `divisor`.
    ///
    /// # Arguments
    ///
    /// * `dividend` - Raw `rs1` value; only the low 32 bits are used.
    /// * `divisor` - Raw `rs2` value; only the low 32 bits are used.
    /// * `signed` - Whether the operands are two's-complement signed.
    pub fn latency_of(&self, dividend: u64, divisor: u64, signed: bool) -> Cycles {
        if !signed {
            return self.quotient_latency(u64::from(dividend as u32), u64::from(divisor as u32));
        }

        let (a, b) = (dividend as i32, divisor as i32);
        let mut cycles =
            self.quotient_latency(u64::from(a.unsigned_abs()), u64::from(b.unsigned_abs()));
        if (a | b) < 0 {
            cycles += 1;
        }
        if (a ^ b) < 0 {
            cycles += 1;
        }
        cycles
    }

    /// Base latency adjusted by the bit-length difference of magnitudes `a / b`.
    fn quotient_latency(&self, a: u64, b: u64) -> Cycles {
        if a == 0 || b == 0 {
            return self.base_latency;
        }
        let latency = self.base_latency as f64 + (a as f64).log2() - (b as f64).log2();
        latency.max(0.0) as Cycles
    }
}

impl LatencyModel for Divider {
    fn latency(&self, inst: &Instruction) -> Cycles {
        self.latency_of(
            inst.rs1_val,
            inst.rs2_val,
            inst.opcode.is_signed_division(),
        )
    }
}
