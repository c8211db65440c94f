//! Glue between physics bodies and whatever the host draws them with.
//!
//! Bodies carry no rendering state. The host keeps its own meshes in its own
//! storage, records which mesh belongs to which body in [`MeshBindings`], and
//! calls [`MeshBindings::sync`] after each [`World::update`].

use heapless::Vec;

use crate::body::{Body, BodyId};
use crate::error::PhysicsError;
use crate::terrain::TerrainOracle;
use crate::world::World;

/// A drawable that can be moved and hidden.
pub trait Placeable {
    fn set_position(&mut self, x: f32, y: f32, z: f32);

    /// Meshes that cannot be hidden may ignore this.
    fn set_visible(&mut self, _visible: bool) {}
}

/// Copy a body's position onto a mesh.
pub fn sync_body_to_mesh<M: Placeable + ?Sized>(body: &Body, mesh: &mut M) {
    mesh.set_position(body.position.x, body.position.y, body.position.z);
}

/// Body to mesh-index table for at most `N` bindings.
///
/// # Example
/// ```
/// use sphere_terrain_physics::{Body, MeshBindings, Placeable, World};
/// use sphere_terrain_physics::terrain::NoTerrain;
/// use nalgebra::Vector3;
///
/// #[derive(Default)]
/// struct Marker { at: [f32; 3], shown: bool }
///
/// impl Placeable for Marker {
///     fn set_position(&mut self, x: f32, y: f32, z: f32) { self.at = [x, y, z]; }
///     fn set_visible(&mut self, visible: bool) { self.shown = visible; }
/// }
///
/// let mut world = World::<NoTerrain, 4>::default();
/// let id = world.add_body(Body::default().with_position(Vector3::new(1.0, 2.0, 3.0))).unwrap();
///
/// let mut bindings = MeshBindings::<4>::new();
/// bindings.bind(id, 0).unwrap();
///
/// let mut meshes = [Marker::default()];
/// bindings.sync(&world, &mut meshes);
/// assert_eq!(meshes[0].at, [1.0, 2.0, 3.0]);
/// assert!(meshes[0].shown);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshBindings<const N: usize> {
    bindings: Vec<(BodyId, usize), N>,
}

impl<const N: usize> MeshBindings<N> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Bind `body` to the mesh at `mesh` in host storage, replacing any
    /// previous binding of that body.
    pub fn bind(&mut self, body: BodyId, mesh: usize) -> Result<(), PhysicsError> {
        if let Some(entry) = self.bindings.iter_mut().find(|(b, _)| *b == body) {
            entry.1 = mesh;
            return Ok(());
        }
        self.bindings
            .push((body, mesh))
            .map_err(|_| PhysicsError::CapacityExceeded { capacity: N })
    }

    /// Drop the binding of `body`, returning its mesh index.
    pub fn unbind(&mut self, body: BodyId) -> Option<usize> {
        let index = self.bindings.iter().position(|(b, _)| *b == body)?;
        Some(self.bindings.swap_remove(index).1)
    }

    pub fn mesh_of(&self, body: BodyId) -> Option<usize> {
        self.bindings
            .iter()
            .find(|(b, _)| *b == body)
            .map(|&(_, mesh)| mesh)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Move every bound mesh to its body and show it; hide meshes whose body
    /// is inactive or gone. Bindings pointing past `meshes` are skipped.
    ///
    /// Returns the number of meshes left visible.
    pub fn sync<T, M, const W: usize>(
        &self,
        world: &World<T, W>,
        meshes: &mut [M],
    ) -> usize
    where
        T: TerrainOracle,
        M: Placeable,
    {
        let mut visible = 0;
        for &(body, mesh) in self.bindings.iter() {
            let Some(mesh) = meshes.get_mut(mesh) else {
                continue;
            };
            match world.body(body) {
                Some(b) if b.active => {
                    sync_body_to_mesh(b, mesh);
                    mesh.set_visible(true);
                    visible += 1;
                }
                _ => mesh.set_visible(false),
            }
        }
        visible
    }
}
