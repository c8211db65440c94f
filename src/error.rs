//! Errors surfaced by the world's registry operations.

use thiserror::Error;

use crate::body::BodyId;

/// Failure of a registry operation on a [`World`](crate::world::World).
///
/// Stepping the simulation never fails; only registration, removal and
/// lookups by id can.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PhysicsError {
    /// The arena already holds its compile-time maximum of bodies.
    #[error("body capacity of {capacity} exceeded")]
    CapacityExceeded { capacity: usize },
    /// A body was registered with a radius that is not positive and finite.
    #[error("invalid body radius {radius}")]
    InvalidRadius { radius: f32 },
    /// No body is registered under this id (never added, or removed).
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),
}
