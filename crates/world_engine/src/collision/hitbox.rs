//! Hitbox shapes
//!
//! A hitbox is either a convex polygon given by absolute vertex positions or an
//! axis-aligned ellipse. Both are anchored at a center point in tile units.

use crate::foundation::math::{convex_hull, mean, Vec2};

/// Reasons a hitbox cannot take part in a collision test
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidHitboxError {
    /// Polygon with fewer than three vertices
    #[error("polygon hitbox needs at least 3 vertices, got {count}")]
    TooFewVertices {
        /// Number of vertices supplied
        count: usize,
    },

    /// Polygon whose vertices enclose no area
    #[error("polygon hitbox vertices are collinear or coincident")]
    Collinear,

    /// NaN or infinite coordinate
    #[error("hitbox contains a non-finite coordinate")]
    NonFinite,

    /// Ellipse with a zero or negative semi-axis
    #[error("ellipse hitbox radii must be positive, got ({rx}, {ry})")]
    NonPositiveRadius {
        /// Horizontal semi-axis
        rx: f32,
        /// Vertical semi-axis
        ry: f32,
    },
}

/// Geometric shape used for overlap testing
#[derive(Debug, Clone, PartialEq)]
pub enum Hitbox {
    /// Convex polygon. Vertices are absolute positions; winding is not assumed.
    Polygon {
        /// Anchor point of the shape
        center: Vec2,
        /// Vertex ring in absolute coordinates
        vertices: Vec<Vec2>,
    },
    /// Axis-aligned ellipse
    Ellipse {
        /// Center of the ellipse
        center: Vec2,
        /// Semi-axis lengths along x and y
        radii: Vec2,
    },
}

impl Hitbox {
    /// Polygon anchored at the mean of its vertices
    pub fn polygon(vertices: Vec<Vec2>) -> Self {
        let center = mean(&vertices).unwrap_or_else(Vec2::zeros);
        Self::Polygon { center, vertices }
    }

    /// Polygon with an explicit anchor point
    pub fn polygon_with_center(center: Vec2, vertices: Vec<Vec2>) -> Self {
        Self::Polygon { center, vertices }
    }

    /// Axis-aligned rectangle from its minimum corner and size, as a counter-clockwise ring
    pub fn rectangle(min: Vec2, size: Vec2) -> Self {
        Self::Polygon {
            center: min + size / 2.0,
            vertices: vec![
                min,
                Vec2::new(min.x + size.x, min.y),
                min + size,
                Vec2::new(min.x, min.y + size.y),
            ],
        }
    }

    /// Axis-aligned square centered on `center`
    pub fn square(center: Vec2, side: f32) -> Self {
        let half = Vec2::new(side / 2.0, side / 2.0);
        Self::rectangle(center - half, Vec2::new(side, side))
    }

    /// Axis-aligned ellipse
    pub fn ellipse(center: Vec2, radii: Vec2) -> Self {
        Self::Ellipse { center, radii }
    }

    /// Circle, an ellipse with equal radii
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::Ellipse {
            center,
            radii: Vec2::new(radius, radius),
        }
    }

    /// Anchor point of the shape
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Polygon { center, .. } | Self::Ellipse { center, .. } => *center,
        }
    }

    /// Whether this is the ellipse variant
    pub fn is_ellipse(&self) -> bool {
        matches!(self, Self::Ellipse { .. })
    }

    /// Polygon vertices; empty for ellipses
    pub fn vertices(&self) -> &[Vec2] {
        match self {
            Self::Polygon { vertices, .. } => vertices,
            Self::Ellipse { .. } => &[],
        }
    }

    /// Move the shape in place
    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Self::Polygon { center, vertices } => {
                *center += offset;
                for vertex in vertices.iter_mut() {
                    *vertex += offset;
                }
            }
            Self::Ellipse { center, .. } => *center += offset,
        }
    }

    /// Copy of the shape moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        let mut moved = self.clone();
        moved.translate(offset);
        moved
    }

    /// Check that the shape describes a non-degenerate region
    pub fn validate(&self) -> Result<(), InvalidHitboxError> {
        match self {
            Self::Polygon { center, vertices } => {
                if vertices.len() < 3 {
                    return Err(InvalidHitboxError::TooFewVertices { count: vertices.len() });
                }
                if !is_finite(center) || !vertices.iter().all(is_finite) {
                    return Err(InvalidHitboxError::NonFinite);
                }
                if convex_hull(vertices).len() < 3 {
                    return Err(InvalidHitboxError::Collinear);
                }
                Ok(())
            }
            Self::Ellipse { center, radii } => {
                if !is_finite(center) || !is_finite(radii) {
                    return Err(InvalidHitboxError::NonFinite);
                }
                if radii.x <= 0.0 || radii.y <= 0.0 {
                    return Err(InvalidHitboxError::NonPositiveRadius { rx: radii.x, ry: radii.y });
                }
                Ok(())
            }
        }
    }
}

fn is_finite(v: &Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
