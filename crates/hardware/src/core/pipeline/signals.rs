//! Control signals between the hazard logic and the pipeline registers.
//!
//! Stages run inside a register's transmit phase and cannot reach the other
//! registers directly. Stall and flush requests are posted here instead and
//! each register collects its own at the start of its accept phase.

use super::latches::RegisterId;

/// Requests pending for one register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Skip the next accept.
    pub stall: bool,
    /// Replace the held instruction with the bubble after the next accept.
    pub flush: bool,
}

/// Mailbox of stall and flush requests, one slot per register.
#[derive(Clone, Debug, Default)]
pub struct ControlSignals {
    requests: [RegisterRequest; RegisterId::COUNT],
}

impl ControlSignals {
    /// Requests a one-cycle stall of `register`.
    pub fn request_stall(&mut self, register: RegisterId) {
        self.requests[register.index()].stall = true;
    }

    /// Requests that `register` be flushed to the bubble.
    pub fn request_flush(&mut self, register: RegisterId) {
        self.requests[register.index()].flush = true;
    }

    /// Requests pending for `register`, without consuming them.
    pub fn pending(&self, register: RegisterId) -> RegisterRequest {
        self.requests[register.index()]
    }

    /// Removes and returns the requests pending for `register`.
    pub fn take(&mut self, register: RegisterId) -> RegisterRequest {
        std::mem::take(&mut self.requests[register.index()])
    }
}
