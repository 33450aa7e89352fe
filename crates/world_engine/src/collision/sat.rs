//! Separating-axis collision test
//!
//! Narrow-phase overlap test between two hitboxes. Polygons contribute the
//! outward normals of their convex hull as candidate axes; ellipses contribute
//! their boundary normal where the other shape comes closest plus their own
//! principal axes. If every axis shows overlapping projections the shapes
//! collide, and the axis with the least overlap gives the minimum translation
//! vector.
//!
//! The hull is rebuilt on every test, so callers may hand over vertices in any
//! order or winding as long as they describe a convex region.

use super::hitbox::{Hitbox, InvalidHitboxError};
use super::intersection::Contact;
use crate::foundation::math::{closest_point_on_ellipse, convex_hull, Vec2, GEOMETRY_EPSILON};

/// Hitbox prepared for axis projection
enum Prepared {
    Polygon { center: Vec2, hull: Vec<Vec2> },
    Ellipse { center: Vec2, radii: Vec2 },
}

impl Prepared {
    fn new(hitbox: &Hitbox) -> Result<Self, InvalidHitboxError> {
        hitbox.validate()?;
        Ok(match hitbox {
            Hitbox::Polygon { center, vertices } => Self::Polygon {
                center: *center,
                hull: convex_hull(vertices),
            },
            Hitbox::Ellipse { center, radii } => Self::Ellipse {
                center: *center,
                radii: *radii,
            },
        })
    }

    fn center(&self) -> Vec2 {
        match self {
            Self::Polygon { center, .. } | Self::Ellipse { center, .. } => *center,
        }
    }

    /// Projection interval onto a unit axis
    fn project(&self, axis: &Vec2) -> (f32, f32) {
        match self {
            Self::Polygon { hull, .. } => hull.iter().fold(
                (f32::INFINITY, f32::NEG_INFINITY),
                |(lo, hi), vertex| {
                    let d = vertex.dot(axis);
                    (lo.min(d), hi.max(d))
                },
            ),
            Self::Ellipse { center, radii } => {
                // Support function of an axis-aligned ellipse
                let reach = ((radii.x * axis.x).powi(2) + (radii.y * axis.y).powi(2)).sqrt();
                let c = center.dot(axis);
                (c - reach, c + reach)
            }
        }
    }

    fn push_edge_normals(&self, axes: &mut Vec<Vec2>) {
        if let Self::Polygon { hull, .. } = self {
            for (i, start) in hull.iter().enumerate() {
                let end = hull[(i + 1) % hull.len()];
                let edge = end - start;
                // Hull is counter-clockwise, so the right-hand normal points outward
                let normal = Vec2::new(edge.y, -edge.x);
                push_unit(axes, normal);
            }
        }
    }

    /// Axes an ellipse adds against `other`: the boundary normal where the
    /// pair is closest, then its principal axes.
    ///
    /// Both shapes are measured in the space where this ellipse is a unit
    /// circle. There the circle test is exact with the nearest polygon vertex
    /// or the nearest point of the other ellipse, and the normal found maps
    /// back through `(p - c) / r²`.
    fn push_ellipse_axes(&self, other: &Prepared, axes: &mut Vec<Vec2>) {
        let Self::Ellipse { center, radii } = self else {
            return;
        };
        match other {
            Self::Polygon { hull, .. } => {
                let scaled_distance = |vertex: &Vec2| (vertex - center).component_div(radii).norm_squared();
                let nearest = hull
                    .iter()
                    .min_by(|a, b| scaled_distance(*a).total_cmp(&scaled_distance(*b)));
                if let Some(vertex) = nearest {
                    push_unit(axes, ellipse_normal(center, radii, vertex));
                }
            }
            Self::Ellipse {
                center: other_center,
                radii: other_radii,
            } => {
                let scaled_offset = (center - other_center).component_div(radii);
                let scaled_radii = other_radii.component_div(radii);
                let nearest = closest_point_on_ellipse(&scaled_radii, &scaled_offset);
                let contact = other_center + nearest.component_mul(radii);
                push_unit(axes, ellipse_normal(other_center, other_radii, &contact));
            }
        }
        axes.push(Vec2::new(1.0, 0.0));
        axes.push(Vec2::new(0.0, 1.0));
    }
}

/// Outward normal, not normalized, of an axis-aligned ellipse at `point`
fn ellipse_normal(center: &Vec2, radii: &Vec2, point: &Vec2) -> Vec2 {
    (point - center).component_div(&radii.component_mul(radii))
}

fn push_unit(axes: &mut Vec<Vec2>, v: Vec2) {
    let length = v.norm();
    if length > GEOMETRY_EPSILON {
        axes.push(v / length);
    }
}

/// Test two hitboxes for overlap.
///
/// Returns `Ok(None)` when a separating axis exists. On overlap the returned
/// [`Contact`] carries the penetration depth and an MTV pointing from `a`
/// toward `b`; moving `a` by `-mtv` separates the pair (leaving them touching).
/// Intervals that merely touch count as a collision of depth zero.
///
/// When several axes share the minimal overlap the first one wins, in the order
/// `a`'s hull edges, `b`'s hull edges, `a`'s ellipse axes, `b`'s ellipse axes.
pub fn test(a: &Hitbox, b: &Hitbox) -> Result<Option<Contact>, InvalidHitboxError> {
    let shape_a = Prepared::new(a)?;
    let shape_b = Prepared::new(b)?;

    let mut axes = Vec::new();
    shape_a.push_edge_normals(&mut axes);
    shape_b.push_edge_normals(&mut axes);
    shape_a.push_ellipse_axes(&shape_b, &mut axes);
    shape_b.push_ellipse_axes(&shape_a, &mut axes);

    let between_centers = shape_b.center() - shape_a.center();
    let mut best: Option<(f32, Vec2)> = None;

    for axis in &axes {
        let (min_a, max_a) = shape_a.project(axis);
        let (min_b, max_b) = shape_b.project(axis);

        if max_a < min_b || max_b < min_a {
            return Ok(None);
        }

        // Distance `a` must travel against / along the axis to clear `b`
        let backward = max_a - min_b;
        let forward = max_b - min_a;

        let (depth, direction) = if backward < forward {
            (backward, *axis)
        } else if forward < backward {
            (forward, -axis)
        } else if between_centers.dot(axis) >= 0.0 {
            (backward, *axis)
        } else {
            (forward, -axis)
        };

        if best.map_or(true, |(best_depth, _)| depth < best_depth) {
            best = Some((depth, direction));
        }
    }

    Ok(best.map(|(depth, direction)| Contact {
        penetration_depth: depth,
        mtv: direction * depth,
    }))
}

/// Convenience wrapper reporting only whether the shapes overlap
pub fn overlaps(a: &Hitbox, b: &Hitbox) -> Result<bool, InvalidHitboxError> {
    Ok(test(a, b)?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::cross;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    const EPSILON: f32 = 1e-4;

    fn unit_square(x: f32, y: f32) -> Hitbox {
        Hitbox::square(Vec2::new(x, y), 1.0)
    }

    #[test]
    fn test_overlapping_unit_squares() {
        let contact = test(&unit_square(0.0, 0.0), &unit_square(0.5, 0.0))
            .unwrap()
            .expect("squares overlap");
        assert_relative_eq!(contact.penetration_depth, 0.5, epsilon = EPSILON);
        assert_relative_eq!(contact.mtv, Vec2::new(0.5, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_separated_unit_squares() {
        assert!(test(&unit_square(0.0, 0.0), &unit_square(2.0, 0.0)).unwrap().is_none());
    }

    #[test]
    fn test_touching_squares_have_zero_depth() {
        let contact = test(&unit_square(0.0, 0.0), &unit_square(1.0, 0.0))
            .unwrap()
            .expect("touching counts as contact");
        assert_relative_eq!(contact.penetration_depth, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_reversed_pair_negates_mtv() {
        let a = unit_square(0.0, 0.0);
        let b = unit_square(0.5, 0.2);
        let ab = test(&a, &b).unwrap().unwrap();
        let ba = test(&b, &a).unwrap().unwrap();
        assert_relative_eq!(ab.penetration_depth, ba.penetration_depth, epsilon = EPSILON);
        assert_relative_eq!(ab.mtv, -ba.mtv, epsilon = EPSILON);
    }

    #[test]
    fn test_vertex_order_does_not_matter() {
        // Rectangle in map-object corner order (not a ring)
        let bowtie_order = Hitbox::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
        ]);
        // Above the rectangle; only the horizontal edge normal separates them
        let above = Hitbox::square(Vec2::new(1.0, 1.6), 1.0);
        assert!(test(&bowtie_order, &above).unwrap().is_none());

        let clockwise = Hitbox::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(2.0, 0.0),
        ]);
        let inside = Hitbox::square(Vec2::new(1.0, 1.2), 1.0);
        let contact = test(&clockwise, &inside).unwrap().unwrap();
        assert_relative_eq!(contact.penetration_depth, 0.3, epsilon = EPSILON);
        assert_relative_eq!(contact.mtv, Vec2::new(0.0, 0.3), epsilon = EPSILON);
    }

    #[test]
    fn test_identical_squares_use_first_axis() {
        let contact = test(&unit_square(0.0, 0.0), &unit_square(0.0, 0.0)).unwrap().unwrap();
        assert_relative_eq!(contact.penetration_depth, 1.0, epsilon = EPSILON);
        // First hull edge runs along the bottom, its outward normal is -y
        assert_relative_eq!(contact.mtv, Vec2::new(0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_circles() {
        let a = Hitbox::circle(Vec2::new(0.0, 0.0), 1.0);
        let b = Hitbox::circle(Vec2::new(1.5, 0.0), 1.0);
        let contact = test(&a, &b).unwrap().unwrap();
        assert_relative_eq!(contact.penetration_depth, 0.5, epsilon = EPSILON);
        assert_relative_eq!(contact.mtv, Vec2::new(0.5, 0.0), epsilon = EPSILON);

        let far = Hitbox::circle(Vec2::new(3.0, 0.0), 1.0);
        assert!(test(&a, &far).unwrap().is_none());
    }

    #[test]
    fn test_ellipse_projection_uses_both_semi_axes() {
        let ellipse = Hitbox::ellipse(Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0));

        let above = Hitbox::circle(Vec2::new(0.0, 1.4), 0.5);
        let contact = test(&ellipse, &above).unwrap().unwrap();
        assert_relative_eq!(contact.penetration_depth, 0.1, epsilon = EPSILON);
        assert_relative_eq!(contact.mtv, Vec2::new(0.0, 0.1), epsilon = EPSILON);

        let right = Hitbox::circle(Vec2::new(2.3, 0.0), 0.5);
        let contact = test(&ellipse, &right).unwrap().unwrap();
        assert_relative_eq!(contact.penetration_depth, 0.2, epsilon = EPSILON);

        let clear = Hitbox::circle(Vec2::new(0.0, 1.6), 0.5);
        assert!(test(&ellipse, &clear).unwrap().is_none());
    }

    #[test]
    fn test_circle_against_square_corner() {
        let square = unit_square(0.0, 0.0);

        // Corner (0.5, 0.5) is 0.4243 from the circle center
        let overlapping = Hitbox::circle(Vec2::new(0.8, 0.8), 0.5);
        let contact = test(&square, &overlapping).unwrap().unwrap();
        let expected = 0.5 - 0.3_f32.hypot(0.3);
        assert_relative_eq!(contact.penetration_depth, expected, epsilon = EPSILON);
        assert_relative_eq!(contact.mtv.x, contact.mtv.y, epsilon = EPSILON);
        assert!(contact.mtv.x > 0.0);

        // Box projections overlap but the corner axis separates
        let clear = Hitbox::circle(Vec2::new(0.9, 0.9), 0.5);
        assert!(test(&square, &clear).unwrap().is_none());
    }

    #[test]
    fn test_circle_against_square_edge() {
        let square = unit_square(0.0, 0.0);
        let circle = Hitbox::circle(Vec2::new(0.9, 0.0), 0.5);
        let contact = test(&square, &circle).unwrap().unwrap();
        assert_relative_eq!(contact.penetration_depth, 0.1, epsilon = EPSILON);
        assert_relative_eq!(contact.mtv, Vec2::new(0.1, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_flat_ellipse_clears_square_beyond_its_rim() {
        // Both bounding boxes overlap and the nearest corner lies closer to
        // the center than the semi-major axis, yet it is outside the ellipse
        let ellipse = Hitbox::ellipse(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.5));
        let square = unit_square(-2.2, -0.8);
        assert!(test(&ellipse, &square).unwrap().is_none());
        assert!(test(&square, &ellipse).unwrap().is_none());

        let closer = unit_square(-2.0, -0.6);
        assert!(test(&ellipse, &closer).unwrap().is_some());
    }

    #[test]
    fn test_flat_ellipses_side_by_side() {
        let a = Hitbox::ellipse(Vec2::new(0.0, 0.0), Vec2::new(1.1, 0.4));
        let b = Hitbox::ellipse(Vec2::new(2.0, 0.5), Vec2::new(1.3, 0.2));
        assert!(test(&a, &b).unwrap().is_none());
        assert!(test(&b, &a).unwrap().is_none());

        let nudged = b.translated(Vec2::new(-0.6, -0.3));
        let contact = test(&a, &nudged).unwrap().unwrap();
        let resolved = a.translated(-contact.mtv);
        if let Some(after) = test(&resolved, &nudged).unwrap() {
            assert!(after.penetration_depth < 1e-3);
        }
    }

    #[test]
    fn test_degenerate_hitboxes_are_errors() {
        let segment = Hitbox::polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
        let square = unit_square(0.0, 0.0);
        assert_eq!(
            test(&segment, &square),
            Err(InvalidHitboxError::TooFewVertices { count: 2 })
        );

        let dot = Hitbox::circle(Vec2::new(0.0, 0.0), 0.0);
        assert!(matches!(
            test(&square, &dot),
            Err(InvalidHitboxError::NonPositiveRadius { .. })
        ));
        assert!(overlaps(&square, &dot).is_err());
    }

    // Randomized checks against an independent convex-overlap reference

    fn random_convex_polygon(rng: &mut StdRng) -> Hitbox {
        let center = Vec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
        let radius = rng.gen_range(0.5..2.0);
        let count = rng.gen_range(3..8);
        // Jittered even spacing keeps neighbouring vertices apart
        let step = std::f32::consts::TAU / count as f32;
        let mut vertices: Vec<Vec2> = (0..count)
            .map(|i| (i as f32 + rng.gen_range(0.0..0.8)) * step)
            .map(|a| center + Vec2::new(a.cos(), a.sin()) * radius)
            .collect();
        match rng.gen_range(0..3) {
            0 => vertices.reverse(),
            1 => vertices.shuffle(rng),
            _ => {}
        }
        Hitbox::polygon(vertices)
    }

    fn contains(hull: &[Vec2], p: &Vec2) -> bool {
        (0..hull.len()).all(|i| {
            let edge = hull[(i + 1) % hull.len()] - hull[i];
            cross(&edge, &(p - hull[i])) >= 0.0
        })
    }

    fn segments_cross(p1: &Vec2, p2: &Vec2, q1: &Vec2, q2: &Vec2) -> bool {
        let d1 = cross(&(p2 - p1), &(q1 - p1));
        let d2 = cross(&(p2 - p1), &(q2 - p1));
        let d3 = cross(&(q2 - q1), &(p1 - q1));
        let d4 = cross(&(q2 - q1), &(p2 - q1));
        d1 * d2 < 0.0 && d3 * d4 < 0.0
    }

    fn reference_overlap(a: &Hitbox, b: &Hitbox) -> bool {
        let ha = convex_hull(a.vertices());
        let hb = convex_hull(b.vertices());
        if ha.iter().any(|p| contains(&hb, p)) || hb.iter().any(|p| contains(&ha, p)) {
            return true;
        }
        (0..ha.len()).any(|i| {
            (0..hb.len()).any(|j| {
                segments_cross(
                    &ha[i],
                    &ha[(i + 1) % ha.len()],
                    &hb[j],
                    &hb[(j + 1) % hb.len()],
                )
            })
        })
    }

    /// Largest signed gap between projections over all hull normals
    fn separation(a: &Hitbox, b: &Hitbox) -> f32 {
        let pa = Prepared::new(a).unwrap();
        let pb = Prepared::new(b).unwrap();
        let mut axes = Vec::new();
        pa.push_edge_normals(&mut axes);
        pb.push_edge_normals(&mut axes);
        axes.iter()
            .map(|axis| {
                let (min_a, max_a) = pa.project(axis);
                let (min_b, max_b) = pb.project(axis);
                (min_b - max_a).max(min_a - max_b)
            })
            .fold(f32::NEG_INFINITY, f32::max)
    }

    #[test]
    fn test_random_polygons_agree_with_reference() {
        let mut rng = StdRng::seed_from_u64(0x5a7);
        let mut collisions = 0;
        for _ in 0..500 {
            let a = random_convex_polygon(&mut rng);
            let b = random_convex_polygon(&mut rng);
            if separation(&a, &b).abs() < 1e-3 {
                continue; // too close to contact for a float comparison
            }
            let result = test(&a, &b).unwrap();
            assert_eq!(result.is_some(), reference_overlap(&a, &b), "a={a:?} b={b:?}");
            if result.is_some() {
                collisions += 1;
            }
        }
        assert!(collisions > 50, "sample should contain collisions, got {collisions}");
    }

    #[test]
    fn test_random_polygons_mtv_separates() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let a = random_convex_polygon(&mut rng);
            let b = random_convex_polygon(&mut rng);
            let Some(contact) = test(&a, &b).unwrap() else { continue };

            assert!(contact.penetration_depth >= 0.0);
            assert_relative_eq!(contact.mtv.norm(), contact.penetration_depth, epsilon = EPSILON);

            let resolved = a.translated(-contact.mtv);
            if let Some(after) = test(&resolved, &b).unwrap() {
                assert!(after.penetration_depth < 1e-3, "still overlapping by {}", after.penetration_depth);
            }
        }
    }

    fn random_ellipse(rng: &mut StdRng) -> Hitbox {
        let center = Vec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
        Hitbox::ellipse(center, Vec2::new(rng.gen_range(0.2..2.0), rng.gen_range(0.2..2.0)))
    }

    #[test]
    fn test_random_ellipse_pairs_mtv_separates() {
        let mut rng = StdRng::seed_from_u64(0xe111);
        let mut collisions = 0;
        for _ in 0..4000 {
            let ellipse = random_ellipse(&mut rng);
            let other = if rng.gen_bool(0.5) {
                random_ellipse(&mut rng)
            } else {
                random_convex_polygon(&mut rng)
            };
            let (a, b) = if rng.gen_bool(0.5) { (ellipse, other) } else { (other, ellipse) };
            let Some(contact) = test(&a, &b).unwrap() else { continue };
            collisions += 1;

            let resolved = a.translated(-contact.mtv);
            if let Some(after) = test(&resolved, &b).unwrap() {
                assert!(
                    after.penetration_depth < 2e-3,
                    "still overlapping by {} a={a:?} b={b:?}",
                    after.penetration_depth
                );
            }
        }
        assert!(collisions > 500, "sample should contain collisions, got {collisions}");
    }

    #[test]
    fn test_random_pairs_have_symmetric_depth() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let a = random_convex_polygon(&mut rng);
            let b = if rng.gen_bool(0.3) {
                let center = Vec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
                Hitbox::ellipse(center, Vec2::new(rng.gen_range(0.3..2.0), rng.gen_range(0.3..2.0)))
            } else {
                random_convex_polygon(&mut rng)
            };
            let ab = test(&a, &b).unwrap();
            let ba = test(&b, &a).unwrap();
            assert_eq!(ab.is_some(), ba.is_some());
            if let (Some(ab), Some(ba)) = (ab, ba) {
                assert_relative_eq!(ab.penetration_depth, ba.penetration_depth, epsilon = EPSILON);
            }
        }
    }
}
