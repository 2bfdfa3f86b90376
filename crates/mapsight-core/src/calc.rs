//! Map geometry between two screen points.
//!
//! Screen coordinates are converted to map squares, then to meters; the
//! azimuth is compass-normalized (0° = north, clockwise).

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

/// Screen-to-world scale for the current map.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MapScale {
    pub pixels_per_square: f32,
    pub meters_per_square: f32,
}

impl Default for MapScale {
    fn default() -> Self {
        // Seven grid squares across a 600px map, 170m each.
        Self {
            pixels_per_square: 600.0 / 7.0,
            meters_per_square: 170.0,
        }
    }
}

impl MapScale {
    fn square_delta(&self, from: Point2<f32>, to: Point2<f32>) -> (f32, f32) {
        (
            (from.x - to.x) / self.pixels_per_square,
            (from.y - to.y) / self.pixels_per_square,
        )
    }

    /// Distance between two screen points, rounded to whole meters.
    pub fn distance_meters(&self, from: Point2<f32>, to: Point2<f32>) -> f32 {
        let (dx, dy) = self.square_delta(from, to);
        ((dx * dx + dy * dy).sqrt() * self.meters_per_square).round()
    }

    /// Compass azimuth from `from` towards `to`, degrees in [0, 360),
    /// rounded to two decimals.
    pub fn azimuth_degrees(&self, from: Point2<f32>, to: Point2<f32>) -> f32 {
        let (dx, dy) = self.square_delta(from, to);
        let angle = RAD_TO_DEG * dx.atan2(dy);
        (normalize_angle(angle) * 100.0).round() / 100.0
    }
}

/// Map a trigonometric angle onto the clockwise compass circle [0, 360).
pub fn normalize_angle(angle: f32) -> f32 {
    (360.0 - angle).rem_euclid(360.0)
}

/// Snap an azimuth to a cardinal letter when within `epsilon` degrees.
pub fn angle_to_cardinal(angle: f32, epsilon: f32) -> Option<char> {
    const CARDINALS: [(f32, char); 5] = [
        (0.0, 'N'),
        (90.0, 'E'),
        (180.0, 'S'),
        (270.0, 'W'),
        (360.0, 'N'),
    ];
    CARDINALS
        .iter()
        .find(|(reference, _)| (angle - reference).abs() < epsilon)
        .map(|&(_, cardinal)| cardinal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f32, y: f32) -> Point2<f32> {
        Point2::new(x, y)
    }

    #[test]
    fn cardinal_azimuths() {
        let scale = MapScale::default();
        let origin = p(300.0, 300.0);
        // Screen y grows downward, so north is up.
        assert_relative_eq!(scale.azimuth_degrees(origin, p(300.0, 200.0)), 0.0);
        assert_relative_eq!(scale.azimuth_degrees(origin, p(400.0, 300.0)), 90.0);
        assert_relative_eq!(scale.azimuth_degrees(origin, p(300.0, 400.0)), 180.0);
        assert_relative_eq!(scale.azimuth_degrees(origin, p(200.0, 300.0)), 270.0);
    }

    #[test]
    fn distance_uses_the_map_scale() {
        let scale = MapScale {
            pixels_per_square: 100.0,
            meters_per_square: 170.0,
        };
        // One square due east.
        assert_relative_eq!(scale.distance_meters(p(0.0, 0.0), p(100.0, 0.0)), 170.0);
        // 3-4-5 triangle in squares.
        assert_relative_eq!(
            scale.distance_meters(p(0.0, 0.0), p(300.0, 400.0)),
            5.0 * 170.0
        );
    }

    #[test]
    fn distance_is_symmetric() {
        let scale = MapScale::default();
        let a = p(12.0, 400.0);
        let b = p(510.0, 33.0);
        assert_relative_eq!(scale.distance_meters(a, b), scale.distance_meters(b, a));
    }

    #[test]
    fn normalization_stays_in_the_compass_circle() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        assert_relative_eq!(normalize_angle(-90.0), 90.0);
        assert_relative_eq!(normalize_angle(90.0), 270.0);
        assert_relative_eq!(normalize_angle(360.0), 0.0);
    }

    #[test]
    fn cardinal_snap_uses_the_epsilon() {
        assert_eq!(angle_to_cardinal(0.4, 1.0), Some('N'));
        assert_eq!(angle_to_cardinal(359.7, 1.0), Some('N'));
        assert_eq!(angle_to_cardinal(90.0, 1.0), Some('E'));
        assert_eq!(angle_to_cardinal(45.0, 1.0), None);
    }
}
