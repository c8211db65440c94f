//! Sort-and-sweep broadphase.
//!
//! Keeps one bounding volume per registered body, sorts them along a sweep
//! axis, and only hands pairs whose intervals overlap on that axis (and
//! whose boxes overlap on all three) to the narrow phase. While sweeping it
//! measures the spread of body centers and picks the axis of greatest
//! variance for the next frame, so the sort follows the dominant direction
//! of the current cluster.
//!
//! The inner scan only looks forward of `i` in the sorted array and stops at
//! the first volume starting past `i`'s end. By default every overlapping
//! pair is then reported once in each order; canonical mode reports it once.

use heapless::Vec;

use crate::aabb::{Aabb, Axis};
use crate::body::{Body, BodyId};
use crate::error::PhysicsError;

/// Bounding volume of one registered body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    pub body: BodyId,
    pub aabb: Aabb,
}

/// Outcome of one [`SortAndSweep::sweep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Pairs that passed the 3-axis box test and were handed to the visitor.
    pub candidates: usize,
    /// Axis the volumes were sorted along this frame.
    pub axis: Axis,
    /// Axis of greatest center variance, used next frame.
    pub next_axis: Axis,
    /// Inner-loop entries examined, including the one that ended each scan.
    pub scanned: usize,
}

/// Sort-and-sweep over at most `N` bodies.
#[derive(Debug, Clone)]
pub struct SortAndSweep<const N: usize> {
    volumes: Vec<Volume, N>,
    axis: Axis,
    canonical: bool,
}

impl<const N: usize> Default for SortAndSweep<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SortAndSweep<N> {
    /// Empty broadphase sweeping along X.
    pub fn new() -> Self {
        Self {
            volumes: Vec::new(),
            axis: Axis::X,
            canonical: false,
        }
    }

    /// Report each overlapping pair once (`true`) or once per order (`false`).
    pub fn set_canonical(&mut self, canonical: bool) {
        self.canonical = canonical;
    }

    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// Axis the next sweep will sort along.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Override the sweep axis. The next sweep still picks its successor by variance.
    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Volumes in their current (last sorted) order.
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    /// Track a new body.
    pub fn insert(&mut self, body: BodyId, aabb: Aabb) -> Result<(), PhysicsError> {
        self.volumes
            .push(Volume { body, aabb })
            .map_err(|_| PhysicsError::CapacityExceeded { capacity: N })
    }

    /// Stop tracking a body. Returns `false` if it had no volume.
    pub fn remove(&mut self, body: BodyId) -> bool {
        match self.volumes.iter().position(|v| v.body == body) {
            Some(index) => {
                // order is rebuilt by the next sort
                self.volumes.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Refit the volumes of active bodies in place. Inactive volumes go stale.
    pub fn refit(&mut self, bodies: &[Option<Body>]) {
        for volume in self.volumes.iter_mut() {
            if let Some(body) = active_body(bodies, volume.body) {
                volume.aabb.fit_sphere(&body.position, body.radius);
            }
        }
    }

    /// Refit, sort, and sweep.
    ///
    /// `visit(a, b)` is called for every pair of distinct active bodies whose
    /// boxes overlap. Every truly overlapping pair of spheres is visited at
    /// least once. Outside canonical mode each hit is visited as `(a, b)`
    /// and then `(b, a)`.
    pub fn sweep<F>(&mut self, bodies: &[Option<Body>], mut visit: F) -> SweepReport
    where
        F: FnMut(BodyId, BodyId),
    {
        self.refit(bodies);

        let axis = self.axis;
        self.volumes.sort_unstable_by(|a, b| {
            a.aabb
                .min_on(axis)
                .total_cmp(&b.aabb.min_on(axis))
                .then(a.body.cmp(&b.body))
        });

        let mut sum = [0.0f32; 3];
        let mut sum_sq = [0.0f32; 3];
        let mut count = 0usize;
        let mut candidates = 0usize;
        let mut scanned = 0usize;
        let len = self.volumes.len();

        for i in 0..len {
            let vi = self.volumes[i];
            if active_body(bodies, vi.body).is_none() {
                continue;
            }

            let center = vi.aabb.center();
            for a in Axis::ALL {
                let c = center[a.index()];
                sum[a.index()] += c;
                sum_sq[a.index()] += c * c;
            }
            count += 1;

            for j in (i + 1)..len {
                scanned += 1;
                let vj = self.volumes[j];
                if vj.aabb.min_on(axis) > vi.aabb.max_on(axis) {
                    break;
                }
                if vj.body == vi.body || active_body(bodies, vj.body).is_none() {
                    continue;
                }
                if !vi.aabb.overlaps(&vj.aabb) {
                    continue;
                }
                candidates += 1;
                visit(vi.body, vj.body);
                if !self.canonical {
                    candidates += 1;
                    visit(vj.body, vi.body);
                }
            }
        }

        if count > 0 {
            self.axis = axis_of_greatest_variance(&sum, &sum_sq, count);
        }

        SweepReport {
            candidates,
            axis,
            next_axis: self.axis,
            scanned,
        }
    }
}

fn active_body(bodies: &[Option<Body>], id: BodyId) -> Option<&Body> {
    bodies
        .get(id.index())
        .and_then(Option::as_ref)
        .filter(|body| body.active)
}

/// Pick the axis whose center coordinates spread the most. Ties keep the
/// lower axis.
fn axis_of_greatest_variance(sum: &[f32; 3], sum_sq: &[f32; 3], count: usize) -> Axis {
    let n = count as f32;
    let mut best = Axis::X;
    let mut best_variance = f32::NEG_INFINITY;
    for axis in Axis::ALL {
        let mean = sum[axis.index()] / n;
        let variance = sum_sq[axis.index()] / n - mean * mean;
        if variance > best_variance {
            best = axis;
            best_variance = variance;
        }
    }
    best
}
