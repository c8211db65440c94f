#![no_std]
//! Real-time rigid-body physics for spheres over static terrain.
//!
//! A [`World`] owns a fixed-capacity set of [`Body`] spheres and advances
//! them one frame per [`World::update`]: terrain contacts first, then a
//! sort-and-sweep broadphase with exact sphere/sphere tests, then gravity
//! and semi-implicit Euler integration. Terrain is anything implementing
//! [`TerrainOracle`]; [`terrain::HeightField`] covers displacement-mapped
//! grids.
//!
//! ```
//! use sphere_terrain_physics::{Body, World};
//! use sphere_terrain_physics::terrain::FlatGround;
//! use nalgebra::Vector3;
//!
//! let mut world = World::<_, 8>::new(FlatGround::new(0.0));
//! let id = world
//!     .add_body(Body::new(1.0, 0.5).with_position(Vector3::new(0.0, 3.0, 0.0)))
//!     .unwrap();
//!
//! for _ in 0..600 {
//!     world.update(1.0 / 60.0);
//! }
//! let ball = world.body(id).unwrap();
//! assert!(ball.active);
//! assert!(ball.position.y > 0.0);
//! ```

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod aabb;
pub mod body;
pub mod broadphase;
pub mod config;
pub mod contact;
pub mod error;
pub mod narrowphase;
pub mod render;
pub mod response;
pub mod terrain;
pub mod world;

pub use aabb::{Aabb, Axis};
pub use body::{Body, BodyId};
pub use broadphase::SortAndSweep;
pub use config::{Correction, WorldConfig};
pub use contact::{DynamicContact, StaticContact, TerrainHit};
pub use error::PhysicsError;
pub use render::{MeshBindings, Placeable};
pub use response::ImpulseModel;
pub use terrain::TerrainOracle;
pub use world::{FrameStats, World};
