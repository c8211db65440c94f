//! The simulation world: body registry and per-frame orchestration.
//!
//! One [`World::update`] call runs, in order:
//! 1. static stage: query the terrain for every active body, resolve all
//!    velocities, then apply all positional corrections;
//! 2. dynamic stage: sort-and-sweep, sphere/sphere narrow phase, resolve all
//!    velocities, then apply all positional corrections;
//! 3. gravity and semi-implicit Euler integration of every active body;
//! 4. deactivation of bodies that fell below the floor.
//!
//! Contact lists are cleared at the end of every `update` call. They grow to
//! hold every contact of the busiest frame and keep that allocation.

use alloc::vec::Vec;
use nalgebra::Vector3;

use crate::aabb::Axis;
use crate::body::{Body, BodyId};
use crate::broadphase::SortAndSweep;
use crate::config::WorldConfig;
use crate::contact::{DynamicContact, StaticContact};
use crate::error::PhysicsError;
use crate::narrowphase;
use crate::response::{correct_pair, pair_mut};
use crate::terrain::{NoTerrain, TerrainOracle};

/// Counters from one [`World::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Terrain contacts recorded.
    pub static_contacts: usize,
    /// Pairs the broadphase handed to the narrow phase.
    pub candidate_pairs: usize,
    /// Body/body contacts recorded.
    pub dynamic_contacts: usize,
    /// Bodies that received gravity and were integrated.
    pub integrated: usize,
    /// Bodies deactivated for falling below the floor.
    pub deactivated: usize,
    /// Sweep axis chosen for the next frame.
    pub next_sweep_axis: Axis,
}

/// The physics simulation world.
///
/// # Type Parameters
/// * `T` - Terrain oracle queried by the static stage.
/// * `N` - Maximum number of bodies ever registered (compile-time capacity).
///
/// # Example
/// ```
/// use sphere_terrain_physics::{Body, World};
/// use sphere_terrain_physics::terrain::FlatGround;
/// use nalgebra::Vector3;
///
/// let mut world = World::<_, 16>::new(FlatGround::new(0.0));
/// let ball = Body::new(1.0, 0.5).with_position(Vector3::new(0.0, 5.0, 0.0));
/// let id = world.add_body(ball).unwrap();
///
/// let stats = world.update(1.0 / 60.0);
/// assert_eq!(stats.integrated, 1);
/// assert!(world.body(id).unwrap().position.y < 5.0);
/// ```
pub struct World<T, const N: usize> {
    bodies: heapless::Vec<Option<Body>, N>,
    broadphase: SortAndSweep<N>,
    static_contacts: Vec<StaticContact>,
    dynamic_contacts: Vec<DynamicContact>,
    terrain: T,
    config: WorldConfig,
}

impl<const N: usize> Default for World<NoTerrain, N> {
    fn default() -> Self {
        Self::new(NoTerrain)
    }
}

impl<T: TerrainOracle, const N: usize> World<T, N> {
    /// Create an empty world over `terrain` with default settings.
    pub fn new(terrain: T) -> Self {
        Self::with_config(terrain, WorldConfig::default())
    }

    pub fn with_config(terrain: T, config: WorldConfig) -> Self {
        Self {
            bodies: heapless::Vec::new(),
            broadphase: SortAndSweep::new(),
            static_contacts: Vec::new(),
            dynamic_contacts: Vec::new(),
            terrain,
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut WorldConfig {
        &mut self.config
    }

    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut T {
        &mut self.terrain
    }

    /// Axis the broadphase will sort along next frame.
    pub fn sweep_axis(&self) -> Axis {
        self.broadphase.axis()
    }

    // -- Registry --

    /// Register a body and its bounding volume.
    ///
    /// Ids are handed out in order and never reused, so every call consumes
    /// one of the `N` slots even if bodies were removed since.
    pub fn add_body(&mut self, body: Body) -> Result<BodyId, PhysicsError> {
        if !(body.radius > 0.0) || !body.radius.is_finite() {
            return Err(PhysicsError::InvalidRadius {
                radius: body.radius,
            });
        }
        if self.bodies.is_full() {
            return Err(PhysicsError::CapacityExceeded { capacity: N });
        }

        let id = BodyId(self.bodies.len());
        self.broadphase.insert(id, body.aabb())?;
        self.bodies
            .push(Some(body))
            .map_err(|_| PhysicsError::CapacityExceeded { capacity: N })?;
        log::debug!("registered body {} ({} of {})", id.index(), self.bodies.len(), N);
        Ok(id)
    }

    /// Unregister a body and hand its record back.
    pub fn remove_body(&mut self, id: BodyId) -> Result<Body, PhysicsError> {
        let body = self
            .bodies
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(PhysicsError::UnknownBody(id))?;
        self.broadphase.remove(id);
        log::debug!("removed body {}", id.index());
        Ok(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())?.as_ref()
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())?.as_mut()
    }

    /// Iterate over registered bodies.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|b| (BodyId(i), b)))
    }

    /// Iterate over registered bodies mutably.
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut Body)> {
        self.bodies
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|b| (BodyId(i), b)))
    }

    /// Number of registered (not removed) bodies, active or not.
    pub fn body_count(&self) -> usize {
        self.bodies.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn active_body_count(&self) -> usize {
        self.bodies().filter(|(_, b)| b.active).count()
    }

    /// Compile-time body capacity.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Whether every id slot has been handed out.
    pub fn is_full(&self) -> bool {
        self.bodies.is_full()
    }

    /// Accumulate a force on a body for the next integration.
    pub fn apply_force(&mut self, id: BodyId, force: Vector3<f32>) -> Result<(), PhysicsError> {
        self.body_mut(id)
            .ok_or(PhysicsError::UnknownBody(id))?
            .apply_force(force);
        Ok(())
    }

    /// Kick a body's velocity immediately.
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vector3<f32>) -> Result<(), PhysicsError> {
        self.body_mut(id)
            .ok_or(PhysicsError::UnknownBody(id))?
            .apply_impulse(impulse);
        Ok(())
    }

    /// Set whether a body takes part in the simulation.
    pub fn set_active(&mut self, id: BodyId, active: bool) -> Result<(), PhysicsError> {
        self.body_mut(id).ok_or(PhysicsError::UnknownBody(id))?.active = active;
        Ok(())
    }

    /// Bring a body back into play at `position` with `velocity` and no pending force.
    pub fn reactivate(
        &mut self,
        id: BodyId,
        position: Vector3<f32>,
        velocity: Vector3<f32>,
    ) -> Result<(), PhysicsError> {
        self.body_mut(id)
            .ok_or(PhysicsError::UnknownBody(id))?
            .reset(position, velocity, Vector3::zeros());
        Ok(())
    }

    // -- Simulation --

    /// Advance the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> FrameStats {
        let mut stats = FrameStats::default();

        self.detect_static(&mut stats);
        self.resolve_static();

        self.detect_dynamic(&mut stats);
        self.resolve_dynamic();

        self.integrate(dt, &mut stats);

        self.static_contacts.clear();
        self.dynamic_contacts.clear();

        log::trace!("frame: {:?}", stats);
        stats
    }

    fn detect_static(&mut self, stats: &mut FrameStats) {
        self.terrain.begin_frame();

        let contacts = &mut self.static_contacts;
        for (index, slot) in self.bodies.iter().enumerate() {
            let Some(body) = slot.as_ref().filter(|b| b.active) else {
                continue;
            };
            let id = BodyId(index);
            self.terrain
                .query_static_collisions(&body.position, body.radius, &mut |hit| {
                    contacts.push(StaticContact::new(id, hit));
                });
        }

        for contact in self.static_contacts.iter() {
            self.terrain.notify_contact(contact);
        }
        self.terrain.end_frame();

        stats.static_contacts = self.static_contacts.len();
    }

    /// Velocities first for every contact, then positions.
    fn resolve_static(&mut self) {
        let restitution = self.config.static_restitution;
        for contact in self.static_contacts.iter() {
            if let Some(body) = self.bodies.get_mut(contact.body.index()).and_then(Option::as_mut) {
                body.resolve_collision_with(&contact.normal, restitution);
            }
        }

        let correction = self.config.static_correction;
        for contact in self.static_contacts.iter() {
            if let Some(body) = self.bodies.get_mut(contact.body.index()).and_then(Option::as_mut) {
                body.positional_correction_vs_static_with(
                    contact.penetration,
                    &contact.normal,
                    correction,
                );
            }
        }
    }

    fn detect_dynamic(&mut self, stats: &mut FrameStats) {
        self.broadphase.set_canonical(self.config.dedup_pairs);

        let bodies = &self.bodies;
        let contacts = &mut self.dynamic_contacts;
        let report = self.broadphase.sweep(bodies, |a, b| {
            let (Some(body_a), Some(body_b)) = (&bodies[a.index()], &bodies[b.index()]) else {
                return;
            };
            if let Some(contact) = narrowphase::collide_bodies(a, body_a, b, body_b) {
                contacts.push(contact);
            }
        });

        stats.candidate_pairs = report.candidates;
        stats.next_sweep_axis = report.next_axis;
        stats.dynamic_contacts = self.dynamic_contacts.len();
    }

    /// Velocities first for every contact, then positions.
    fn resolve_dynamic(&mut self) {
        let model = self.config.impulse_model;
        let restitution = self.config.dynamic_restitution;
        for contact in self.dynamic_contacts.iter() {
            if let Some((Some(a), Some(b))) =
                pair_mut(&mut self.bodies, contact.body_a.index(), contact.body_b.index())
            {
                model.resolve(a, b, &contact.normal, restitution);
            }
        }

        let correction = self.config.dynamic_correction;
        for contact in self.dynamic_contacts.iter() {
            if let Some((Some(a), Some(b))) =
                pair_mut(&mut self.bodies, contact.body_a.index(), contact.body_b.index())
            {
                correct_pair(a, b, contact, correction);
            }
        }
    }

    fn integrate(&mut self, dt: f32, stats: &mut FrameStats) {
        let gravity = self.config.gravity;
        let floor_y = self.config.floor_y;
        for (index, slot) in self.bodies.iter_mut().enumerate() {
            let Some(body) = slot.as_mut().filter(|b| b.active) else {
                continue;
            };
            body.apply_force(gravity);
            body.integrate_position(dt);
            stats.integrated += 1;

            if body.position.y < floor_y {
                body.active = false;
                stats.deactivated += 1;
                log::debug!(
                    "body {} fell below floor ({} < {}), deactivated",
                    index,
                    body.position.y,
                    floor_y
                );
            }
        }
    }
}
