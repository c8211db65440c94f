//! Velocity response and positional correction for body/body contacts.

use nalgebra::Vector3;

use crate::body::Body;
use crate::config::Correction;
use crate::contact::DynamicContact;

/// How a body/body contact is turned into velocity changes.
///
/// The broadphase and narrow phase never look at this; swapping the model
/// only changes what happens to velocities once a contact exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpulseModel {
    /// Each body independently runs the single-body surface response
    /// ([`Body::resolve_collision_with`]) against the shared normal.
    /// Does not conserve momentum.
    #[default]
    PerBody,
    /// Equal and opposite impulse along the normal, scaled by the reduced
    /// mass of the pair.
    ReducedMass,
}

impl ImpulseModel {
    /// Resolve the velocities of `a` and `b` for one contact.
    pub fn resolve(&self, a: &mut Body, b: &mut Body, normal: &Vector3<f32>, restitution: f32) {
        match self {
            ImpulseModel::PerBody => {
                a.resolve_collision_with(normal, restitution);
                b.resolve_collision_with(normal, restitution);
            }
            ImpulseModel::ReducedMass => resolve_reduced_mass(a, b, normal, restitution),
        }
    }
}

fn resolve_reduced_mass(a: &mut Body, b: &mut Body, normal: &Vector3<f32>, restitution: f32) {
    let relative_vel = b.velocity - a.velocity;
    let vel_along_normal = relative_vel.dot(normal);

    // Only resolve if bodies are moving toward each other
    if vel_along_normal >= 0.0 {
        return;
    }

    let inv_mass_sum = a.inv_mass() + b.inv_mass();
    if inv_mass_sum <= 0.0 {
        return;
    }

    let j = -(1.0 + restitution) * vel_along_normal / inv_mass_sum;
    let impulse = normal * j;
    a.velocity -= impulse * a.inv_mass();
    b.velocity += impulse * b.inv_mass();
}

/// Separate an overlapping pair along the contact normal.
///
/// `A` moves by `-c`, `B` by `+c`, where
/// `c = max(penetration - slop, 0) * percent * normal`. Mass plays no part.
pub fn correct_pair(a: &mut Body, b: &mut Body, contact: &DynamicContact, correction: Correction) {
    let c = contact.normal * correction.magnitude(contact.penetration);
    a.position -= c;
    b.position += c;
}

/// Borrow two distinct slots of a slice mutably.
///
/// Returns `None` when `i == j` or either index is out of bounds.
pub(crate) fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> Option<(&mut T, &mut T)> {
    if i == j || i >= items.len() || j >= items.len() {
        return None;
    }
    if i < j {
        let (lo, hi) = items.split_at_mut(j);
        Some((&mut lo[i], &mut hi[0]))
    } else {
        let (lo, hi) = items.split_at_mut(i);
        Some((&mut hi[0], &mut lo[j]))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::body::BodyId;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn head_on(speed: f32) -> (Body, Body) {
        let a = Body::new(1.0, 1.0).with_velocity(Vector3::new(speed, 0.0, 0.0));
        let b = Body::new(1.0, 1.0)
            .with_position(Vector3::new(1.5, 0.0, 0.0))
            .with_velocity(Vector3::new(-speed, 0.0, 0.0));
        (a, b)
    }

    #[test]
    fn test_per_body_runs_single_body_routine_on_both() {
        let (mut a, mut b) = head_on(2.0);
        let mut expected_a = a.clone();
        let mut expected_b = b.clone();
        let n = Vector3::x();
        expected_a.resolve_collision_with(&n, 0.6);
        expected_b.resolve_collision_with(&n, 0.6);

        ImpulseModel::PerBody.resolve(&mut a, &mut b, &n, 0.6);
        assert_eq!(a.velocity, expected_a.velocity);
        assert_eq!(b.velocity, expected_b.velocity);
    }

    #[test]
    fn test_per_body_is_not_momentum_conserving() {
        let (mut a, mut b) = head_on(2.0);
        let before = a.velocity * a.mass() + b.velocity * b.mass();
        ImpulseModel::PerBody.resolve(&mut a, &mut b, &Vector3::x(), 0.6);
        let after = a.velocity * a.mass() + b.velocity * b.mass();
        assert!((after - before).norm() > 1e-3);
    }

    #[test]
    fn test_reduced_mass_conserves_momentum() {
        let (mut a, mut b) = head_on(2.0);
        let before = a.velocity * a.mass() + b.velocity * b.mass();
        ImpulseModel::ReducedMass.resolve(&mut a, &mut b, &Vector3::x(), 0.6);
        let after = a.velocity * a.mass() + b.velocity * b.mass();
        assert!((after - before).norm() < EPSILON);
        // equal masses with e = 0.6: each rebounds at 0.6 * 2
        assert!(approx_eq(a.velocity.x, -1.2));
        assert!(approx_eq(b.velocity.x, 1.2));
    }

    #[test]
    fn test_reduced_mass_skips_separating_pair() {
        let (mut a, mut b) = head_on(-1.0);
        ImpulseModel::ReducedMass.resolve(&mut a, &mut b, &Vector3::x(), 0.6);
        assert!(approx_eq(a.velocity.x, -1.0));
        assert!(approx_eq(b.velocity.x, 1.0));
    }

    #[test]
    fn test_correct_pair_pushes_apart() {
        let (mut a, mut b) = head_on(0.0);
        let contact = DynamicContact {
            body_a: BodyId(0),
            body_b: BodyId(1),
            normal: Vector3::x(),
            penetration: 0.501,
        };
        correct_pair(&mut a, &mut b, &contact, Correction::DYNAMIC);
        let c = (0.501 - 0.001) * 0.0015;
        assert!(approx_eq(a.position.x, -c));
        assert!(approx_eq(b.position.x, 1.5 + c));
    }

    #[test]
    fn test_pair_mut() {
        let mut items = [1, 2, 3];
        {
            let (x, y) = pair_mut(&mut items, 2, 0).unwrap();
            core::mem::swap(x, y);
        }
        assert_eq!(items, [3, 2, 1]);
        assert!(pair_mut(&mut items, 1, 1).is_none());
        assert!(pair_mut(&mut items, 0, 3).is_none());
    }
}
