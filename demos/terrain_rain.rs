//! Terrain Rain Demo
//!
//! Drops a shower of spheres onto a wavy height field with a pit cut into
//! its lowest part. Spheres that fall through the pit drop below the floor,
//! get deactivated, and are respawned at a random spot above the terrain.
//!
//! Run with `RUST_LOG=debug` to see registration and deactivation events.

use nalgebra::Vector3;
use rand::Rng;
use sphere_terrain_physics::terrain::HeightField;
use sphere_terrain_physics::{Body, BodyId, MeshBindings, Placeable, World};

const GRID: usize = 17;
const MAX_OBJECTS: usize = 32;
const BALL_RADIUS: f32 = 0.5;
const FRAMES: usize = 1200;
const DT: f32 = 1.0 / 60.0;

/// Stand-in for a drawable: remembers where it was last placed.
#[derive(Debug, Default, Clone, Copy)]
struct ConsoleMesh {
    position: [f32; 3],
    visible: bool,
}

impl Placeable for ConsoleMesh {
    fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = [x, y, z];
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

fn random_position(rng: &mut impl Rng) -> Vector3<f32> {
    let x = rng.gen_range(-7..7) as f32 - 0.5;
    let z = rng.gen_range(-7..7) as f32 - 0.5;
    Vector3::new(x, 20.0, z)
}

fn make_heights() -> Vec<f32> {
    let mut heights = Vec::with_capacity(GRID * GRID);
    for row in 0..GRID {
        for column in 0..GRID {
            let x = column as f32 / (GRID - 1) as f32 * std::f32::consts::TAU;
            let z = row as f32 / (GRID - 1) as f32 * std::f32::consts::TAU;
            heights.push(x.sin() * z.cos());
        }
    }
    heights
}

fn main() {
    env_logger::init();

    let heights = make_heights();
    let half = (GRID - 1) as f32 * 0.5;
    let field = HeightField::new(&heights, GRID, 1.0)
        .expect("grid is at least 2x2")
        .with_origin(Vector3::new(-half, 0.0, -half))
        .with_height_scale(2.0)
        .with_hole_below(-1.5);

    let mut world = World::<_, MAX_OBJECTS>::new(field);
    let mut bindings = MeshBindings::<MAX_OBJECTS>::new();
    let mut meshes = [ConsoleMesh::default(); MAX_OBJECTS];
    let mut ids: Vec<BodyId> = Vec::new();
    let mut rng = rand::thread_rng();

    println!("Terrain Rain Demo");
    println!("{} spheres over a {}x{} height field", MAX_OBJECTS, GRID, GRID);

    let mut respawned = 0;
    for frame in 0..FRAMES {
        // one new sphere every 10 frames until the world is full
        if frame % 10 == 0 && !world.is_full() {
            let body = Body::new(1.0, BALL_RADIUS).with_position(random_position(&mut rng));
            match world.add_body(body) {
                Ok(id) => {
                    bindings
                        .bind(id, ids.len())
                        .expect("one binding per body slot");
                    ids.push(id);
                }
                Err(err) => eprintln!("could not add sphere: {}", err),
            }
        }

        let stats = world.update(DT);

        for &id in &ids {
            let fallen = world.body(id).map_or(false, |b| !b.active);
            if fallen {
                let position = random_position(&mut rng);
                world
                    .reactivate(id, position, Vector3::zeros())
                    .expect("id came from add_body");
                respawned += 1;
            }
        }

        let visible = bindings.sync(&world, &mut meshes);

        if frame % 60 == 0 {
            println!(
                "t={:5.2}s bodies={:2} visible={:2} static={:3} pairs={:3} dynamic={:3} axis={:?}",
                frame as f32 * DT,
                world.body_count(),
                visible,
                stats.static_contacts,
                stats.candidate_pairs,
                stats.dynamic_contacts,
                stats.next_sweep_axis,
            );
        }
    }

    println!("respawned {} spheres", respawned);
    for (i, mesh) in meshes.iter().take(ids.len()).enumerate() {
        println!(
            "sphere {:2}: ({:6.2}, {:6.2}, {:6.2}) {}",
            i,
            mesh.position[0],
            mesh.position[1],
            mesh.position[2],
            if mesh.visible { "" } else { "(hidden)" }
        );
    }
}
