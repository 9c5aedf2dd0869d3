//! Recoverable error types.
//!
//! The timing model separates two classes of failure:
//! 1. **Input Errors:** A malformed configuration or trace file. These are reported
//!    through the `ConfigError` and `TraceError` enums below.
//! 2. **Contract Violations:** Misuse of the model itself (double allocation, out of
//!    order retirement, flushing an empty register). These indicate a bug in the
//!    model or its driver and panic immediately.

use thiserror::Error;

/// Reasons a configuration can be rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON or has the wrong shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A size that is used for bit-mask indexing is not a power of two.
    #[error("{field} must be a non-zero power of two, got {value}")]
    NotPowerOfTwo {
        /// Dotted path of the offending field.
        field: String,
        /// Value found in the configuration.
        value: usize,
    },

    /// A field is outside its supported range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Dotted path of the offending field.
        field: String,
        /// Value found in the configuration.
        value: u64,
        /// Smallest accepted value.
        min: u64,
        /// Largest accepted value.
        max: u64,
    },
}

/// Reasons an instruction trace cannot be replayed.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Reading the trace source failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A trace line is not a valid record.
    #[error("invalid trace record on line {line}: {source}")]
    Record {
        /// One-based line number in the trace.
        line: usize,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A register field is outside `x0`..`x31`.
    #[error("register x{register} on line {line} is out of range")]
    Register {
        /// One-based line number in the trace.
        line: usize,
        /// Register number found in the record.
        register: u32,
    },
}
