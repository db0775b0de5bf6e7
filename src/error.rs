//! Error types
//!
//! Only collaborator misuse surfaces as an error. Events that arrive in the
//! wrong phase are not errors and never reach this module.

use thiserror::Error;

use crate::sim::{EntityId, EntityKind};

/// Errors raised by the rules engine when the host engine hands it bad input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Every slot of this kind's pool is live
    #[error("{kind:?} pool is full (capacity {capacity})")]
    PoolFull { kind: EntityKind, capacity: usize },

    /// Id was never handed out by the registry
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// Id refers to an entity of another kind than the caller expected
    #[error("entity {id:?} is a {actual:?}, expected {expected:?}")]
    KindMismatch {
        id: EntityId,
        expected: EntityKind,
        actual: EntityKind,
    },
}

/// Settings load/validation errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
