//! Sphere bodies: kinematic and dynamic state plus single-body response.

use nalgebra::Vector3;

use crate::aabb::Aabb;
use crate::config::{Correction, RESTITUTION};

/// Stable handle to a body registered in a [`World`](crate::world::World).
///
/// Ids are handed out in registration order and never reused, even after
/// the body is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    /// Arena slot backing this id.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// Rebuild an id from an arena slot, for driving a standalone
    /// [`SortAndSweep`](crate::broadphase::SortAndSweep). World calls with a
    /// slot that was never handed out fail with `UnknownBody`.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// A dynamic sphere.
///
/// Position, velocity, radius and the active flag are plain fields with no
/// validation; the world trusts its host to keep them sensible. Mass is kept
/// behind accessors so the inverse stays in sync.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub radius: f32,
    /// Inactive bodies are skipped by collision and integration.
    pub active: bool,
    mass: f32,
    inv_mass: f32,
    /// Accumulated forces applied this frame. Cleared by [`Body::integrate_position`].
    force: Vector3<f32>,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Body {
    /// Create an active body at the origin.
    ///
    /// A mass of `0.0` yields an immovable body (`inv_mass == 0`).
    pub fn new(mass: f32, radius: f32) -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            radius,
            active: true,
            mass,
            inv_mass: inverse_mass(mass),
            force: Vector3::zeros(),
        }
    }

    /// Builder: set initial position.
    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    /// Builder: set initial velocity.
    pub fn with_velocity(mut self, velocity: Vector3<f32>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: set initial acceleration, stored as the equivalent pending force.
    pub fn with_acceleration(mut self, acceleration: Vector3<f32>) -> Self {
        self.force = acceleration * self.mass;
        self
    }

    /// Builder: set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Put the body back into play with a fresh position/velocity/acceleration triple.
    ///
    /// Any accumulated force is replaced by `acceleration * mass`.
    pub fn reset(
        &mut self,
        position: Vector3<f32>,
        velocity: Vector3<f32>,
        acceleration: Vector3<f32>,
    ) {
        self.position = position;
        self.velocity = velocity;
        self.force = acceleration * self.mass;
        self.active = true;
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Change the mass; `0.0` makes the body immovable.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inv_mass = inverse_mass(mass);
    }

    /// Force accumulated since the last integration.
    #[inline]
    pub fn force(&self) -> Vector3<f32> {
        self.force
    }

    /// Accumulate a force. Takes effect on the next [`Body::integrate_position`].
    #[inline]
    pub fn apply_force(&mut self, force: Vector3<f32>) {
        self.force += force;
    }

    /// Apply an instantaneous impulse: `velocity += impulse / mass`.
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vector3<f32>) {
        self.velocity += impulse * self.inv_mass;
    }

    /// Integrate this body forward by `dt` seconds using semi-implicit Euler.
    ///
    /// Velocity is updated before position, so a force applied this frame
    /// already moves the body this frame. Consumes and clears the force
    /// accumulator; call at most once per frame.
    pub fn integrate_position(&mut self, dt: f32) {
        self.velocity += self.force * self.inv_mass * dt;
        self.position += self.velocity * dt;
        self.force = Vector3::zeros();
    }

    /// Impulse response against a surface with the default restitution.
    ///
    /// See [`Body::resolve_collision_with`].
    #[inline]
    pub fn resolve_collision(&mut self, normal: &Vector3<f32>) {
        self.resolve_collision_with(normal, RESTITUTION);
    }

    /// Impulse response against a surface with unit `normal`.
    ///
    /// The negated velocity is taken as the approach velocity. When its
    /// projection on `normal` is negative the call does nothing; otherwise
    /// `velocity -= -(1 + e) * (approach . normal) * normal`.
    pub fn resolve_collision_with(&mut self, normal: &Vector3<f32>, restitution: f32) {
        let approach = -self.velocity;
        let vel_along_normal = approach.dot(normal);
        if vel_along_normal < 0.0 {
            return;
        }

        let j = -(1.0 + restitution) * vel_along_normal;
        self.velocity -= normal * j;
    }

    /// Push the body out of a terrain contact with the default static correction.
    #[inline]
    pub fn positional_correction_vs_static(&mut self, penetration: f32, normal: &Vector3<f32>) {
        self.positional_correction_vs_static_with(penetration, normal, Correction::STATIC);
    }

    /// Push the body out of a terrain contact along `normal`.
    pub fn positional_correction_vs_static_with(
        &mut self,
        penetration: f32,
        normal: &Vector3<f32>,
        correction: Correction,
    ) {
        self.position += normal * correction.magnitude(penetration);
    }

    /// Bounding box of the sphere at its current position.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_sphere(&self.position, self.radius)
    }

    /// Returns the current speed (magnitude of velocity).
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    /// Returns the kinetic energy of this body: `0.5 * m * v^2`.
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.norm_squared()
    }
}

fn inverse_mass(mass: f32) -> f32 {
    if mass == 0.0 {
        0.0
    } else {
        1.0 / mass
    }
}
