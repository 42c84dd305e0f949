//! Error types for the simulation.

use thiserror::Error;

/// Fatal simulation errors. Any of these aborts the current tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// An entity was created with an id that is still live.
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
