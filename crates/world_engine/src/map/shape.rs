//! Shape builder
//!
//! Turns map objects (map pixels) into hitboxes (tile units).

use super::description::{ObjectDescription, ShapeDescription};
use super::error::MapDataError;
use crate::collision::Hitbox;
use crate::config::ObjectOptions;
use crate::foundation::math::Vec2;

/// Conversion from map pixels to tile units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileScale {
    /// Pixels per tile horizontally
    pub tile_width: f32,
    /// Pixels per tile vertically
    pub tile_height: f32,
}

impl TileScale {
    /// Create a scale from the map's tile size
    pub fn new(tile_width: f32, tile_height: f32) -> Self {
        Self { tile_width, tile_height }
    }

    /// Convert a pixel position or extent to tile units
    pub fn to_tiles(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x / self.tile_width, y / self.tile_height)
    }
}

/// Build the hitbox for a map object.
///
/// Rectangles yield the corners `(x,y)`, `(x,y+h)`, `(x+w,y)`, `(x+w,y+h)` in
/// that order. Polygon points are offsets from the anchor and keep their
/// order. Points, and ellipses unless `options.solid_ellipses` is set, are
/// markers and yield `Ok(None)`.
pub fn build_hitbox(
    object: &ObjectDescription,
    scale: TileScale,
    options: ObjectOptions,
) -> Result<Option<Hitbox>, MapDataError> {
    let anchor = scale.to_tiles(object.x, object.y);
    let size = scale.to_tiles(object.width, object.height);

    let hitbox = match &object.shape {
        None => Hitbox::polygon(vec![
            anchor,
            Vec2::new(anchor.x, anchor.y + size.y),
            Vec2::new(anchor.x + size.x, anchor.y),
            anchor + size,
        ]),
        Some(ShapeDescription::Polygon { points }) => {
            let vertices = parse_points(points)?
                .into_iter()
                .map(|(x, y)| scale.to_tiles(x, y) + anchor)
                .collect();
            Hitbox::polygon(vertices)
        }
        Some(ShapeDescription::Ellipse) if options.solid_ellipses => {
            Hitbox::ellipse(anchor + size / 2.0, size / 2.0)
        }
        Some(ShapeDescription::Ellipse | ShapeDescription::Point) => return Ok(None),
    };

    hitbox.validate()?;
    Ok(Some(hitbox))
}

/// Parse `"x,y x,y ..."` into coordinate pairs
pub fn parse_points(text: &str) -> Result<Vec<(f32, f32)>, MapDataError> {
    text.split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',').ok_or_else(|| MapDataError::UnpairedCoordinate {
                text: pair.to_string(),
            })?;
            Ok((parse_number(x)?, parse_number(y)?))
        })
        .collect()
}

fn parse_number(text: &str) -> Result<f32, MapDataError> {
    text.trim()
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| MapDataError::InvalidNumber { text: text.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::InvalidHitboxError;
    use approx::assert_relative_eq;

    fn object(x: f32, y: f32, width: f32, height: f32, shape: Option<ShapeDescription>) -> ObjectDescription {
        ObjectDescription {
            name: None,
            kind: None,
            x,
            y,
            width,
            height,
            shape,
            properties: Vec::new(),
        }
    }

    fn polygon(points: &str) -> Option<ShapeDescription> {
        Some(ShapeDescription::Polygon { points: points.to_string() })
    }

    const UNIT: TileScale = TileScale { tile_width: 1.0, tile_height: 1.0 };

    #[test]
    fn test_rectangle_corners_in_tile_units() {
        let hitbox = build_hitbox(&object(0.0, 0.0, 2.0, 1.0, None), UNIT, ObjectOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            hitbox.vertices(),
            &[
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(2.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_rectangle_is_scaled_by_tile_size() {
        let scale = TileScale::new(16.0, 8.0);
        let hitbox = build_hitbox(&object(32.0, 8.0, 16.0, 16.0, None), scale, ObjectOptions::default())
            .unwrap()
            .unwrap();
        assert_relative_eq!(hitbox.vertices()[0], Vec2::new(2.0, 1.0));
        assert_relative_eq!(hitbox.vertices()[3], Vec2::new(3.0, 3.0));
        assert_relative_eq!(hitbox.center(), Vec2::new(2.5, 2.0));
    }

    #[test]
    fn test_polygon_points_are_offset_from_anchor() {
        let scale = TileScale::new(16.0, 16.0);
        let hitbox = build_hitbox(
            &object(16.0, 32.0, 0.0, 0.0, polygon("0,0 32,0 16,-16")),
            scale,
            ObjectOptions::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            hitbox.vertices(),
            &[Vec2::new(1.0, 2.0), Vec2::new(3.0, 2.0), Vec2::new(2.0, 1.0)]
        );
    }

    #[test]
    fn test_malformed_polygon_points() {
        let options = ObjectOptions::default();
        assert_eq!(
            build_hitbox(&object(0.0, 0.0, 0.0, 0.0, polygon("0,0 1,x 1,1")), UNIT, options),
            Err(MapDataError::InvalidNumber { text: "x".to_string() })
        );
        assert_eq!(
            build_hitbox(&object(0.0, 0.0, 0.0, 0.0, polygon("0,0 5 1,1")), UNIT, options),
            Err(MapDataError::UnpairedCoordinate { text: "5".to_string() })
        );
    }

    #[test]
    fn test_degenerate_geometry_is_a_data_error() {
        let result = build_hitbox(&object(0.0, 0.0, 0.0, 4.0, None), UNIT, ObjectOptions::default());
        assert_eq!(result, Err(MapDataError::DegenerateShape(InvalidHitboxError::Collinear)));
    }

    #[test]
    fn test_ellipse_and_point_are_markers_by_default() {
        // Ellipse and point objects carry no collidable geometry unless configured
        let options = ObjectOptions::default();
        let ellipse = object(0.0, 0.0, 2.0, 2.0, Some(ShapeDescription::Ellipse));
        let point = object(1.0, 1.0, 0.0, 0.0, Some(ShapeDescription::Point));
        assert_eq!(build_hitbox(&ellipse, UNIT, options), Ok(None));
        assert_eq!(build_hitbox(&point, UNIT, options), Ok(None));
    }

    #[test]
    fn test_solid_ellipse_option() {
        let options = ObjectOptions { solid_ellipses: true };
        let ellipse = object(0.0, 0.0, 4.0, 2.0, Some(ShapeDescription::Ellipse));
        let hitbox = build_hitbox(&ellipse, UNIT, options).unwrap().unwrap();
        assert_eq!(hitbox, Hitbox::ellipse(Vec2::new(2.0, 1.0), Vec2::new(2.0, 1.0)));

        let point = object(1.0, 1.0, 0.0, 0.0, Some(ShapeDescription::Point));
        assert_eq!(build_hitbox(&point, UNIT, options), Ok(None));
    }
}
