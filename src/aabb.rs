//! Axis-aligned bounding volumes used by the broadphase.

use nalgebra::Vector3;

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a `Vector3`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Axis-aligned box enclosing a sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vector3::zeros(),
            max: Vector3::zeros(),
        }
    }
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Box spanning `center ± radius` on every axis.
    #[inline]
    pub fn from_sphere(center: &Vector3<f32>, radius: f32) -> Self {
        let half = Vector3::repeat(radius);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Refit in place around a sphere.
    #[inline]
    pub fn fit_sphere(&mut self, center: &Vector3<f32>, radius: f32) {
        *self = Self::from_sphere(center, radius);
    }

    /// Closed-interval overlap on all three axes (touching boxes overlap).
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    #[inline]
    pub fn min_on(&self, axis: Axis) -> f32 {
        self.min[axis.index()]
    }

    #[inline]
    pub fn max_on(&self, axis: Axis) -> f32 {
        self.max[axis.index()]
    }

    #[inline]
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn test_from_sphere() {
        let aabb = Aabb::from_sphere(&Vector3::new(1.0, -2.0, 3.0), 2.0);
        assert_eq!(aabb.min, Vector3::new(-1.0, -4.0, 1.0));
        assert_eq!(aabb.max, Vector3::new(3.0, 0.0, 5.0));
        assert_eq!(aabb.center(), Vector3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn test_new_keeps_corners() {
        let aabb = Aabb::new(Vector3::new(-1.0, 0.0, 2.0), Vector3::new(3.0, 4.0, 6.0));
        assert_eq!(aabb.min_on(Axis::X), -1.0);
        assert_eq!(aabb.max_on(Axis::Z), 6.0);
        assert_eq!(aabb.center(), Vector3::new(1.0, 2.0, 4.0));
        assert!(aabb.overlaps(&Aabb::from_sphere(&Vector3::new(3.5, 2.0, 4.0), 0.5)));
    }

    #[test]
    fn test_fit_sphere_updates_in_place() {
        let mut aabb = Aabb::default();
        aabb.fit_sphere(&Vector3::new(0.0, 5.0, 0.0), 1.0);
        assert_eq!(aabb.min_on(Axis::Y), 4.0);
        assert_eq!(aabb.max_on(Axis::Y), 6.0);
    }

    #[test]
    fn test_overlap_requires_all_axes() {
        let a = Aabb::from_sphere(&Vector3::zeros(), 1.0);
        let b = Aabb::from_sphere(&Vector3::new(1.5, 0.0, 0.0), 1.0);
        let c = Aabb::from_sphere(&Vector3::new(1.5, 0.0, 5.0), 1.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_touching_boxes_overlap() {
        let a = Aabb::from_sphere(&Vector3::zeros(), 1.0);
        let b = Aabb::from_sphere(&Vector3::new(2.0, 0.0, 0.0), 1.0);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_axis_index() {
        let v = Vector3::new(7.0, 8.0, 9.0);
        let picked: std::vec::Vec<f32> = Axis::ALL.iter().map(|a| v[a.index()]).collect();
        assert_eq!(picked, std::vec![7.0, 8.0, 9.0]);
    }
}
