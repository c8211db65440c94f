//! Exact sphere-vs-sphere overlap.

use nalgebra::Vector3;

use crate::body::{Body, BodyId};
use crate::contact::DynamicContact;

/// Normal reported when two centers coincide exactly.
pub const COINCIDENT_NORMAL: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);

/// Sphere vs sphere intersection test.
///
/// Returns `(normal_a_to_b, penetration_depth)` or `None`. Touching spheres
/// count as overlapping. When the centers coincide the normal falls back to
/// [`COINCIDENT_NORMAL`] and the penetration to `radius_a`.
pub fn sphere_vs_sphere(
    pos_a: &Vector3<f32>,
    radius_a: f32,
    pos_b: &Vector3<f32>,
    radius_b: f32,
) -> Option<(Vector3<f32>, f32)> {
    let diff = pos_b - pos_a;
    let sum_r = radius_a + radius_b;

    if diff.norm_squared() > sum_r * sum_r {
        return None;
    }

    let dist = diff.norm();
    if dist != 0.0 {
        Some((diff / dist, sum_r - dist))
    } else {
        Some((COINCIDENT_NORMAL, radius_a))
    }
}

/// Run [`sphere_vs_sphere`] on two registered bodies and build the contact record.
pub fn collide_bodies(
    id_a: BodyId,
    body_a: &Body,
    id_b: BodyId,
    body_b: &Body,
) -> Option<DynamicContact> {
    let (normal, penetration) =
        sphere_vs_sphere(&body_a.position, body_a.radius, &body_b.position, body_b.radius)?;
    Some(DynamicContact {
        body_a: id_a,
        body_b: id_b,
        normal,
        penetration,
    })
}
