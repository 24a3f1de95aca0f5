//! Error types for the hybrid cache engine.
//!
//! Running out of probe budget is deliberately absent: it is the ordinary
//! hand-off to chaining, never a failure. Every variant here is fatal to the
//! run that produced it, and no partial report is returned alongside it.

extern crate alloc;

use alloc::string::String;

/// Errors surfaced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// The trace contained no keys.
    #[error("trace is empty")]
    EmptyTrace,

    /// A supplied key is not a non-negative integer.
    #[error("invalid key at position {index}: {value}")]
    InvalidKey {
        /// Zero-based position in the trace.
        index: usize,
        /// The rejected value, as text.
        value: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An internal table invariant does not hold.
    #[error("table invariant violated: {0}")]
    Invariant(String),
}
