//! Static terrain collision queries.
//!
//! The world never looks inside the terrain. It asks a [`TerrainOracle`] for
//! the overlaps of each active sphere and turns every reported
//! [`TerrainHit`] into a [`StaticContact`].
//!
//! Three oracles ship with the crate:
//! - [`NoTerrain`]: reports nothing; the static stage becomes a no-op.
//! - [`FlatGround`]: an infinite horizontal plane.
//! - [`HeightField`]: a displacement grid over the XZ plane, two triangles per cell.

use nalgebra::Vector3;

// ComplexField provides sqrt() and floor() for f32 in no_std via libm
#[allow(unused_imports)]
use nalgebra::ComplexField;

use crate::contact::{StaticContact, TerrainHit};

/// Collision queries against static geometry.
///
/// `query_static_collisions` must be a pure function of the terrain state
/// and the query sphere. The frame hooks exist for debug feedback (e.g.
/// tinting touched triangles) and default to no-ops.
pub trait TerrainOracle {
    /// Report every terrain primitive overlapping the sphere.
    fn query_static_collisions(
        &self,
        center: &Vector3<f32>,
        radius: f32,
        emit: &mut dyn FnMut(TerrainHit),
    );

    /// Called once per frame before any query.
    fn begin_frame(&mut self) {}

    /// Called once for every static contact recorded this frame.
    fn notify_contact(&mut self, _contact: &StaticContact) {}

    /// Called once per frame after the static stage.
    fn end_frame(&mut self) {}
}

impl<T: TerrainOracle + ?Sized> TerrainOracle for &mut T {
    fn query_static_collisions(
        &self,
        center: &Vector3<f32>,
        radius: f32,
        emit: &mut dyn FnMut(TerrainHit),
    ) {
        (**self).query_static_collisions(center, radius, emit);
    }

    fn begin_frame(&mut self) {
        (**self).begin_frame();
    }

    fn notify_contact(&mut self, contact: &StaticContact) {
        (**self).notify_contact(contact);
    }

    fn end_frame(&mut self) {
        (**self).end_frame();
    }
}

/// No static geometry at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoTerrain;

impl TerrainOracle for NoTerrain {
    fn query_static_collisions(&self, _: &Vector3<f32>, _: f32, _: &mut dyn FnMut(TerrainHit)) {}
}

/// Infinite horizontal plane at `height`, solid below.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl TerrainOracle for FlatGround {
    fn query_static_collisions(
        &self,
        center: &Vector3<f32>,
        radius: f32,
        emit: &mut dyn FnMut(TerrainHit),
    ) {
        let bottom = center.y - radius;
        if bottom < self.height {
            emit(TerrainHit {
                normal: Vector3::y(),
                position: Vector3::new(center.x, self.height, center.z),
                penetration: self.height - bottom,
            });
        }
    }
}

/// Height samples on a regular grid over the XZ plane.
///
/// `heights` is row-major with `columns` samples per row; row `k`, column
/// `i` sits at `origin + (i * cell_size, h * height_scale, k * cell_size)`.
/// Each cell is split into two triangles and every triangle overlapping the
/// query sphere produces its own hit.
///
/// # Example
/// ```
/// use sphere_terrain_physics::terrain::{HeightField, TerrainOracle};
/// use nalgebra::Vector3;
///
/// let heights = [0.0; 16];
/// let field = HeightField::new(&heights, 4, 1.0).unwrap();
///
/// let mut hits = 0;
/// field.query_static_collisions(&Vector3::new(1.5, 0.5, 1.5), 1.0, &mut |_| hits += 1);
/// assert!(hits > 0);
/// ```
#[derive(Debug, Clone)]
pub struct HeightField<'a> {
    heights: &'a [f32],
    columns: usize,
    rows: usize,
    cell_size: f32,
    height_scale: f32,
    origin: Vector3<f32>,
    /// Triangles lying entirely below this level are ignored.
    hole_below: Option<f32>,
    touched: usize,
}

impl<'a> HeightField<'a> {
    /// Wrap a grid of samples.
    ///
    /// Returns `None` unless the grid has at least 2×2 samples, the sample
    /// count is a multiple of `columns`, and `cell_size` is positive.
    pub fn new(heights: &'a [f32], columns: usize, cell_size: f32) -> Option<Self> {
        if columns < 2 || heights.len() % columns != 0 || !(cell_size > 0.0) {
            return None;
        }
        let rows = heights.len() / columns;
        if rows < 2 {
            return None;
        }
        Some(Self {
            heights,
            columns,
            rows,
            cell_size,
            height_scale: 1.0,
            origin: Vector3::zeros(),
            hole_below: None,
            touched: 0,
        })
    }

    /// Builder: world position of sample `(0, 0)` at height zero.
    pub fn with_origin(mut self, origin: Vector3<f32>) -> Self {
        self.origin = origin;
        self
    }

    /// Builder: multiply every sample by `scale`.
    pub fn with_height_scale(mut self, scale: f32) -> Self {
        self.height_scale = scale;
        self
    }

    /// Builder: open a hole wherever the terrain lies below `level`.
    pub fn with_hole_below(mut self, level: f32) -> Self {
        self.hole_below = Some(level);
        self
    }

    /// Open a hole wherever the terrain lies below `level`.
    pub fn set_hole_below(&mut self, level: f32) {
        self.hole_below = Some(level);
    }

    /// Close any hole.
    pub fn clear_hole(&mut self) {
        self.hole_below = None;
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of contacts reported against this field in the current frame.
    pub fn touched_this_frame(&self) -> usize {
        self.touched
    }

    /// World position of sample `(column, row)`.
    pub fn vertex(&self, column: usize, row: usize) -> Vector3<f32> {
        let h = self.heights[row * self.columns + column];
        self.origin
            + Vector3::new(
                column as f32 * self.cell_size,
                h * self.height_scale,
                row as f32 * self.cell_size,
            )
    }

    /// Inclusive range of cell indices along one grid axis touched by `[lo, hi]`.
    fn cell_span(&self, lo: f32, hi: f32, cells: usize) -> Option<(usize, usize)> {
        let first = ComplexField::floor(lo / self.cell_size);
        let last = ComplexField::floor(hi / self.cell_size);
        if last < 0.0 || first >= cells as f32 {
            return None;
        }
        let first = first.max(0.0) as usize;
        let last = (last as usize).min(cells - 1);
        Some((first, last))
    }

    fn in_hole(&self, tri: &[Vector3<f32>; 3]) -> bool {
        match self.hole_below {
            Some(level) => tri.iter().all(|v| v.y < level),
            None => false,
        }
    }
}

impl TerrainOracle for HeightField<'_> {
    fn query_static_collisions(
        &self,
        center: &Vector3<f32>,
        radius: f32,
        emit: &mut dyn FnMut(TerrainHit),
    ) {
        let local = center - self.origin;
        let Some((i0, i1)) = self.cell_span(local.x - radius, local.x + radius, self.columns - 1)
        else {
            return;
        };
        let Some((k0, k1)) = self.cell_span(local.z - radius, local.z + radius, self.rows - 1)
        else {
            return;
        };

        for k in k0..=k1 {
            for i in i0..=i1 {
                let v00 = self.vertex(i, k);
                let v10 = self.vertex(i + 1, k);
                let v01 = self.vertex(i, k + 1);
                let v11 = self.vertex(i + 1, k + 1);

                for tri in [[v00, v11, v10], [v00, v01, v11]] {
                    if self.in_hole(&tri) {
                        continue;
                    }
                    if let Some(hit) = sphere_vs_triangle(center, radius, &tri) {
                        emit(hit);
                    }
                }
            }
        }
    }

    fn begin_frame(&mut self) {
        self.touched = 0;
    }

    fn notify_contact(&mut self, _contact: &StaticContact) {
        self.touched += 1;
    }
}

/// Sphere vs triangle test.
///
/// The normal points from the closest point on the triangle to the sphere
/// center. When the center lies on the triangle the upward face normal is
/// used instead.
pub fn sphere_vs_triangle(
    center: &Vector3<f32>,
    radius: f32,
    tri: &[Vector3<f32>; 3],
) -> Option<TerrainHit> {
    let closest = closest_point_on_triangle(center, &tri[0], &tri[1], &tri[2]);
    let diff = center - closest;
    let dist_sq = diff.norm_squared();
    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-6 {
        diff / dist
    } else {
        let face = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
        let face = face.try_normalize(1e-12)?;
        if face.y < 0.0 {
            -face
        } else {
            face
        }
    };

    Some(TerrainHit {
        normal,
        position: closest,
        penetration: radius - dist,
    })
}

/// Closest point on triangle `abc` to `p`, by Voronoi region.
fn closest_point_on_triangle(
    p: &Vector3<f32>,
    a: &Vector3<f32>,
    b: &Vector3<f32>,
    c: &Vector3<f32>,
) -> Vector3<f32> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}
