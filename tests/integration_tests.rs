//! Integration tests for sphere-terrain-physics
//! These tests drive whole frames through the public world API

use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::Vector3;
use sphere_terrain_physics::terrain::{FlatGround, HeightField, NoTerrain};
use sphere_terrain_physics::{Body, ImpulseModel, MeshBindings, Placeable, World, WorldConfig};

const DT: f32 = 1.0 / 60.0;

fn no_gravity() -> WorldConfig {
    WorldConfig::default().with_gravity(Vector3::zeros())
}

#[test]
fn test_integration_law() {
    let force = Vector3::new(3.0, -6.0, 1.5);
    let dt = 0.05;
    let mut body = Body::new(2.0, 1.0);
    body.apply_force(force);
    body.integrate_position(dt);

    let expected_v = force * body.inv_mass() * dt;
    assert_eq!(body.velocity, expected_v);
    assert_eq!(body.position, expected_v * dt);
    assert_eq!(body.force(), Vector3::zeros());
}

#[test]
fn test_restitution_against_flat_ground() {
    let mut world = World::<_, 4>::new(FlatGround::new(0.0));
    let v = 4.0;
    let id = world
        .add_body(
            Body::new(1.0, 1.0)
                .with_position(Vector3::new(0.0, 0.95, 0.0))
                .with_velocity(Vector3::new(0.0, -v, 0.0)),
        )
        .unwrap();

    // zero timestep isolates the contact response from gravity
    world.update(0.0);
    assert_relative_eq!(world.body(id).unwrap().velocity.y, 0.6 * v, epsilon = 1e-5);
}

#[test]
fn test_ball_settles_on_ground() {
    let mut world = World::<_, 4>::new(FlatGround::new(0.0));
    let id = world
        .add_body(Body::new(1.0, 0.5).with_position(Vector3::new(0.0, 4.0, 0.0)))
        .unwrap();

    for _ in 0..600 {
        world.update(DT);
    }
    let ball = world.body(id).unwrap();
    assert!(ball.active);
    assert!(ball.position.y > 0.3, "sank to {}", ball.position.y);
    assert!(ball.position.y < 0.6, "floating at {}", ball.position.y);
    assert!(ball.velocity.y.abs() < 0.5);
}

#[test]
fn test_free_fall_deactivates_and_freezes() {
    let mut world = World::<NoTerrain, 4>::default();
    let id = world.add_body(Body::default()).unwrap();

    let mut frames = 0;
    while world.body(id).unwrap().active {
        world.update(0.1);
        frames += 1;
        assert!(frames < 50, "never deactivated");
    }
    // y = -0.0981 * k(k+1)/2 first drops below -10 at k = 14
    assert_eq!(frames, 14);

    let frozen = world.body(id).unwrap().clone();
    for _ in 0..10 {
        world.update(0.1);
    }
    assert_eq!(world.body(id).unwrap(), &frozen);

    world
        .reactivate(id, Vector3::new(0.0, 5.0, 0.0), Vector3::zeros())
        .unwrap();
    world.update(0.1);
    assert!(world.body(id).unwrap().position.y < 5.0);
}

#[test]
fn test_hole_in_height_field() {
    const COLUMNS: usize = 6;
    let mut heights = [0.0f32; COLUMNS * COLUMNS];
    for row in 2..=3 {
        for column in 2..=3 {
            heights[row * COLUMNS + column] = -5.0;
        }
    }
    let field = HeightField::new(&heights, COLUMNS, 1.0)
        .unwrap()
        .with_hole_below(-1.0);

    let mut world = World::<_, 4>::new(field);
    let over_pit = world
        .add_body(Body::new(1.0, 0.25).with_position(Vector3::new(2.5, 2.0, 2.5)))
        .unwrap();
    let over_flat = world
        .add_body(Body::new(1.0, 0.25).with_position(Vector3::new(0.5, 2.0, 0.5)))
        .unwrap();

    let mut deactivated = 0;
    for _ in 0..300 {
        deactivated += world.update(DT).deactivated;
    }

    assert_eq!(deactivated, 1);
    assert!(!world.body(over_pit).unwrap().active);
    let flat = world.body(over_flat).unwrap();
    assert!(flat.active);
    assert!(flat.position.y > 0.0);
}

#[test]
fn test_per_body_head_on_response() {
    let mut world = World::<NoTerrain, 4>::with_config(NoTerrain, no_gravity());
    let a = world
        .add_body(Body::new(1.0, 1.0).with_velocity(Vector3::new(1.0, 0.0, 0.0)))
        .unwrap();
    let b = world
        .add_body(
            Body::new(1.0, 1.0)
                .with_position(Vector3::new(1.5, 0.0, 0.0))
                .with_velocity(Vector3::new(-1.0, 0.0, 0.0)),
        )
        .unwrap();

    let stats = world.update(0.0);
    assert_eq!(stats.dynamic_contacts, 2);

    // (a, b) then (b, a), each body reflecting off the shared normal on its own
    assert_relative_eq!(world.body(a).unwrap().velocity.x, -0.6, epsilon = 1e-5);
    assert_relative_eq!(world.body(b).unwrap().velocity.x, -0.36, epsilon = 1e-5);
}

#[test]
fn test_reduced_mass_head_on_separates() {
    let config = no_gravity()
        .with_impulse_model(ImpulseModel::ReducedMass)
        .with_dedup_pairs(true);
    let mut world = World::<NoTerrain, 4>::with_config(NoTerrain, config);
    let a = world
        .add_body(Body::new(1.0, 1.0).with_velocity(Vector3::new(1.0, 0.0, 0.0)))
        .unwrap();
    let b = world
        .add_body(
            Body::new(1.0, 1.0)
                .with_position(Vector3::new(1.5, 0.0, 0.0))
                .with_velocity(Vector3::new(-1.0, 0.0, 0.0)),
        )
        .unwrap();

    world.update(DT);
    assert_relative_eq!(world.body(a).unwrap().velocity.x, -0.6, epsilon = 1e-5);
    assert_relative_eq!(world.body(b).unwrap().velocity.x, 0.6, epsilon = 1e-5);

    for _ in 0..120 {
        world.update(DT);
    }
    let gap = world.body(b).unwrap().position.x - world.body(a).unwrap().position.x;
    assert!(gap > 2.0, "still overlapping: {}", gap);
}

#[test]
fn test_removed_body_leaves_others_running() {
    let mut world = World::<_, 4>::new(FlatGround::new(0.0));
    let a = world
        .add_body(Body::new(1.0, 0.5).with_position(Vector3::new(0.0, 2.0, 0.0)))
        .unwrap();
    let b = world
        .add_body(Body::new(1.0, 0.5).with_position(Vector3::new(0.3, 2.5, 0.0)))
        .unwrap();
    world.update(DT);
    world.remove_body(a).unwrap();

    let stats = world.update(DT);
    assert_eq!(stats.integrated, 1);
    assert_eq!(stats.dynamic_contacts, 0);
    assert!(world.body(a).is_none());
    assert!(world.body(b).is_some());
    assert_eq!(world.bodies().count(), 1);
}

#[test]
fn test_rain_over_height_field_stays_finite() {
    const COLUMNS: usize = 8;
    let mut heights = [0.0f32; COLUMNS * COLUMNS];
    for (i, h) in heights.iter_mut().enumerate() {
        let (row, column) = (i / COLUMNS, i % COLUMNS);
        *h = ((row * 7 + column * 3) % 5) as f32 * 0.2;
    }
    let field = HeightField::new(&heights, COLUMNS, 1.0).unwrap();
    let mut world = World::<_, 16>::new(field);

    for i in 0..12 {
        let x = 1.0 + (i % 4) as f32 * 1.5;
        let z = 1.0 + (i / 4) as f32 * 1.5;
        world
            .add_body(Body::new(1.0, 0.4).with_position(Vector3::new(x, 3.0 + i as f32 * 0.3, z)))
            .unwrap();
    }

    for _ in 0..300 {
        world.update(DT);
    }
    for (_, body) in world.bodies() {
        assert!(body.position.iter().all(|c| c.is_finite()));
        assert!(body.velocity.iter().all(|c| c.is_finite()));
    }
}

#[test]
fn test_mesh_sync_after_update() {
    #[derive(Default)]
    struct Marker {
        at: Vector3<f32>,
        shown: bool,
    }

    impl Placeable for Marker {
        fn set_position(&mut self, x: f32, y: f32, z: f32) {
            self.at = Vector3::new(x, y, z);
        }

        fn set_visible(&mut self, visible: bool) {
            self.shown = visible;
        }
    }

    let mut world = World::<NoTerrain, 4>::default();
    let falling = world
        .add_body(Body::default().with_position(Vector3::new(0.0, 20.0, 0.0)))
        .unwrap();
    let sunk = world
        .add_body(Body::default().with_position(Vector3::new(5.0, -20.0, 0.0)))
        .unwrap();

    let mut bindings = MeshBindings::<4>::new();
    bindings.bind(falling, 1).unwrap();
    bindings.bind(sunk, 0).unwrap();
    let mut meshes = [Marker::default(), Marker::default()];

    world.update(DT);
    let visible = bindings.sync(&world, &mut meshes);

    assert_eq!(visible, 1);
    assert!(meshes[1].shown);
    assert_abs_diff_eq!(meshes[1].at, world.body(falling).unwrap().position);
    assert!(!meshes[0].shown);
}
