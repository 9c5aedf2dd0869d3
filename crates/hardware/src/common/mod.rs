//! Common types shared by every part of the timing model.
//!
//! This module provides the building blocks used across the pipeline, the memory
//! hierarchy and the simulation driver. It includes:
//! 1. **Constants:** Pipeline shape, register sentinels and capacity limits.
//! 2. **Error Handling:** Recoverable errors for configuration and trace input.

/// Pipeline shape constants and register sentinels.
pub mod constants;

/// Error types for configuration and trace input.
pub mod error;

pub use constants::{Cycles, REGISTER_NOT_USED, RegNum};
pub use error::{ConfigError, TraceError};
