//! Separating-axis collision detection for convex polygons
//!
//! Two convex shapes are disjoint iff some axis exists onto which their
//! projections do not overlap; for polygons only the edge perpendiculars
//! need checking. When every axis overlaps, the axis with the smallest
//! overlap is the minimum-translation direction.

use glam::Vec2;

use super::body::Body;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub collided: bool,
    /// Unit axis of least penetration (if collided)
    pub axis: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            collided: false,
            axis: Vec2::ZERO,
        }
    }
}

/// Projects every vertex onto `axis`, returning the `(min, max)` interval.
fn project(shape: &[Vec2], axis: Vec2) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for v in shape {
        let length = axis.dot(*v);
        min = min.min(length);
        max = max.max(length);
    }
    (min, max)
}

/// Tests every axis derived from `shape`'s edge set against both shapes.
///
/// Returns `None` as soon as a separating axis is found; otherwise the axis
/// with the smallest projection overlap together with that overlap.
fn min_overlap_axis(shape: &[Vec2], other: &[Vec2]) -> Option<(Vec2, f32)> {
    let mut best_axis = Vec2::ZERO;
    let mut best_overlap = f32::MAX;

    for (i, v) in shape.iter().enumerate() {
        let w = shape[(i + 1) % shape.len()];
        // perpendicular of the edge, normalized; degenerate edges are a
        // caller contract violation (shapes must be well-formed polygons)
        let axis = (w - *v).perp().normalize();

        let (min_a, max_a) = project(shape, axis);
        let (min_b, max_b) = project(other, axis);

        if min_a > max_b || min_b > max_a {
            return None;
        }

        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap < best_overlap {
            best_axis = axis;
            best_overlap = overlap;
        }
    }

    Some((best_axis, best_overlap))
}

/// SAT test over two vertex sets.
///
/// Both shapes' edge sets are tried independently; either finding a
/// separating axis proves the shapes disjoint. Otherwise the reported axis
/// is the smaller-overlap winner of the two passes.
pub fn shapes_collide(shape_a: &[Vec2], shape_b: &[Vec2]) -> CollisionResult {
    let Some((axis_a, overlap_a)) = min_overlap_axis(shape_a, shape_b) else {
        return CollisionResult::miss();
    };
    let Some((axis_b, overlap_b)) = min_overlap_axis(shape_b, shape_a) else {
        return CollisionResult::miss();
    };

    let axis = if overlap_a < overlap_b { axis_a } else { axis_b };
    CollisionResult {
        collided: true,
        axis,
    }
}

/// Collision test between two bodies' current shapes.
pub fn find_collision(body_a: &Body, body_b: &Body) -> CollisionResult {
    shapes_collide(body_a.shape(), body_b.shape())
}
