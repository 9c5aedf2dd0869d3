//! Functional units driven by the pipeline stages.
//!
//! This module contains the branch prediction unit used by fetch and execute,
//! the cache hierarchy used by fetch and the memory stage, and the execution
//! units dispatched from execute.

/// Branch prediction unit: BHT, BTB and outcome classification.
pub mod bru;

/// Set-associative caches, replacement policies and the memory hierarchy.
pub mod cache;

/// Integer ALU, multiplier and divider latency models.
pub mod exec;
