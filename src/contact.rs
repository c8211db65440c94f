//! Transient contact records produced and consumed within one frame.

use nalgebra::Vector3;

use crate::body::BodyId;

/// One overlap reported by a [`TerrainOracle`](crate::terrain::TerrainOracle).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainHit {
    /// Unit normal pointing out of the terrain, towards the sphere.
    pub normal: Vector3<f32>,
    /// Contact point on the terrain surface.
    pub position: Vector3<f32>,
    /// Penetration depth (non-negative).
    pub penetration: f32,
}

/// A body touching the terrain this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticContact {
    pub body: BodyId,
    pub normal: Vector3<f32>,
    pub position: Vector3<f32>,
    pub penetration: f32,
}

impl StaticContact {
    pub fn new(body: BodyId, hit: TerrainHit) -> Self {
        Self {
            body,
            normal: hit.normal,
            position: hit.position,
            penetration: hit.penetration,
        }
    }
}

/// Two bodies overlapping this frame.
///
/// Order matters: correction pushes `body_a` back along the normal and
/// `body_b` forward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynamicContact {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Unit normal pointing from A toward B.
    pub normal: Vector3<f32>,
    /// Penetration depth (non-negative).
    pub penetration: f32,
}
