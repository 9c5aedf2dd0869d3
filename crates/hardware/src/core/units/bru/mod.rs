//! Branch prediction unit (BRU).
//!
//! This module contains the two-level predictor used by the pipeline: a branch
//! history table of saturating counters for direction and a set-associative
//! branch target buffer for targets.

pub use self::branch_predictor::{BranchPredictor, BranchStats, Outcome, Prediction};

/// Branch History Table of 2-bit saturating counters.
pub mod bht;

/// Predictor combining the BHT and BTB, with outcome classification.
pub mod branch_predictor;

/// Branch Target Buffer for storing predicted branch targets.
pub mod btb;
