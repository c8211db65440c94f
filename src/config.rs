//! Tuning constants for a [`World`](crate::world::World).
//!
//! Every value here was tuned by hand against jitter and residual overlap.

use nalgebra::Vector3;

use crate::response::ImpulseModel;

/// Restitution used by [`Body::resolve_collision`](crate::body::Body::resolve_collision).
pub const RESTITUTION: f32 = 0.6;

/// Force applied to every active body each frame.
pub const GRAVITY: f32 = -9.81;

/// Bodies whose `y` drops below this are deactivated.
pub const FLOOR_Y: f32 = -10.0;

/// Positional correction parameters: `max(penetration - slop, 0) * percent`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Correction {
    /// Fraction of the remaining penetration resolved per frame.
    pub percent: f32,
    /// Dead zone below which penetration is left alone.
    pub slop: f32,
}

impl Correction {
    /// Correction applied against terrain contacts.
    pub const STATIC: Self = Self {
        percent: 0.2,
        slop: 0.01,
    };

    /// Correction applied between two dynamic bodies.
    pub const DYNAMIC: Self = Self {
        percent: 0.0015,
        slop: 0.001,
    };

    /// Magnitude of the push for a given penetration depth.
    #[inline]
    pub fn magnitude(&self, penetration: f32) -> f32 {
        (penetration - self.slop).max(0.0) * self.percent
    }
}

/// Per-world simulation settings.
///
/// # Example
/// ```
/// use sphere_terrain_physics::config::WorldConfig;
/// use nalgebra::Vector3;
///
/// let config = WorldConfig::default()
///     .with_gravity(Vector3::new(0.0, -20.0, 0.0))
///     .with_floor_y(-50.0);
/// assert_eq!(config.floor_y, -50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Force (not acceleration) applied to every active body before integration.
    pub gravity: Vector3<f32>,
    /// Vertical threshold below which bodies are deactivated.
    pub floor_y: f32,
    /// Restitution for terrain contacts.
    pub static_restitution: f32,
    /// Restitution for body/body contacts.
    pub dynamic_restitution: f32,
    pub static_correction: Correction,
    pub dynamic_correction: Correction,
    /// How a body/body contact turns into velocity changes.
    pub impulse_model: ImpulseModel,
    /// Visit each overlapping pair once per frame instead of once per order.
    pub dedup_pairs: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, GRAVITY, 0.0),
            floor_y: FLOOR_Y,
            static_restitution: RESTITUTION,
            dynamic_restitution: RESTITUTION,
            static_correction: Correction::STATIC,
            dynamic_correction: Correction::DYNAMIC,
            impulse_model: ImpulseModel::PerBody,
            dedup_pairs: false,
        }
    }
}

impl WorldConfig {
    /// Builder: set the per-frame gravity force.
    pub fn with_gravity(mut self, gravity: Vector3<f32>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: set the deactivation floor.
    pub fn with_floor_y(mut self, floor_y: f32) -> Self {
        self.floor_y = floor_y;
        self
    }

    /// Builder: set restitution for both terrain and body contacts.
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.static_restitution = restitution;
        self.dynamic_restitution = restitution;
        self
    }

    /// Builder: choose the body/body velocity response.
    pub fn with_impulse_model(mut self, model: ImpulseModel) -> Self {
        self.impulse_model = model;
        self
    }

    /// Builder: report each overlapping pair at most once per frame.
    pub fn with_dedup_pairs(mut self, dedup: bool) -> Self {
        self.dedup_pairs = dedup;
        self
    }
}
