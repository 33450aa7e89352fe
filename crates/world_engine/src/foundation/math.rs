//! Math utilities and types
//!
//! Provides the 2D math types used by hitboxes, tile grids and the camera.
//! All world geometry is expressed in tile units.

use std::f32::consts::FRAC_1_SQRT_2;

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Integer grid coordinate (tile column, tile row)
pub type GridPos = Vector2<i32>;

/// Tolerance used when deciding whether a length or area is zero
pub const GEOMETRY_EPSILON: f32 = 1e-6;

/// Refinement steps for [`closest_point_on_ellipse`]
const ELLIPSE_ITERATIONS: usize = 8;

/// 2D cross product (z component of the 3D cross product)
pub fn cross(a: &Vec2, b: &Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Vector rotated a quarter turn counter-clockwise
pub fn perpendicular(v: &Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Arithmetic mean of a set of points, `None` when the set is empty
pub fn mean(points: &[Vec2]) -> Option<Vec2> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vec2::zeros(), |acc, p| acc + p);
    Some(sum / points.len() as f32)
}

/// Convex hull of a point set in counter-clockwise order (Andrew's monotone chain).
///
/// Collinear points on the hull boundary are dropped. Fewer than three points,
/// or a set whose points all lie on one line, yields fewer than three hull points.
pub fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    let mut sorted: Vec<Vec2> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
    });
    sorted.dedup_by(|a, b| (*a - *b).norm_squared() <= GEOMETRY_EPSILON * GEOMETRY_EPSILON);

    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<Vec2> = Vec::with_capacity(sorted.len() * 2);

    // Lower hull
    for p in &sorted {
        while hull.len() >= 2 && turn(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= GEOMETRY_EPSILON {
            hull.pop();
        }
        hull.push(*p);
    }

    // Upper hull
    let lower_len = hull.len() + 1;
    for p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && turn(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= GEOMETRY_EPSILON {
            hull.pop();
        }
        hull.push(*p);
    }

    hull.pop();
    hull
}

fn turn(o: &Vec2, a: &Vec2, b: &Vec2) -> f32 {
    cross(&(a - o), &(b - o))
}

/// Point on an origin-centred, axis-aligned ellipse boundary closest to `point`.
///
/// Works in the first quadrant and mirrors the result back. Each step replaces
/// the ellipse by its circle of curvature at the current estimate, which
/// converges in a few iterations for points inside or outside the ellipse.
pub fn closest_point_on_ellipse(radii: &Vec2, point: &Vec2) -> Vec2 {
    let (a, b) = (radii.x, radii.y);
    let (px, py) = (point.x.abs(), point.y.abs());
    let mut t = Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2);

    for _ in 0..ELLIPSE_ITERATIONS {
        // Center of curvature at the current estimate
        let ex = (a * a - b * b) * t.x.powi(3) / a;
        let ey = (b * b - a * a) * t.y.powi(3) / b;
        let r = (a * t.x - ex).hypot(b * t.y - ey);
        let (qx, qy) = (px - ex, py - ey);
        let q = qx.hypot(qy);
        if q <= GEOMETRY_EPSILON {
            break;
        }
        let next = Vec2::new(
            ((qx * r / q + ex) / a).clamp(0.0, 1.0),
            ((qy * r / q + ey) / b).clamp(0.0, 1.0),
        );
        let length = next.norm();
        if length <= GEOMETRY_EPSILON {
            break;
        }
        t = next / length;
    }

    Vec2::new((a * t.x).copysign(point.x), (b * t.y).copysign(point.y))
}
