// SPDX-License-Identifier: MIT OR Apache-2.0
//! Symbolic location and orientation codes.
//!
//! Every lookup here is total: unknown or missing codes resolve to a neutral
//! value (angle 0, grid origin) so malformed notation degrades to a fixed pose
//! instead of failing.

use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI};

/// Angle of a hand location relative to the layout center.
///
/// `e` is 0 and angles grow clockwise on screen (y points down), so `s` is
/// `+π/2` and `n` is `-π/2`.
pub fn location_angle(loc: Option<&str>) -> f32 {
    let Some(loc) = loc else {
        return 0.0;
    };
    match loc.to_ascii_lowercase().as_str() {
        "e" => 0.0,
        "s" => FRAC_PI_2,
        "w" => PI,
        "n" => -FRAC_PI_2,
        "se" => FRAC_PI_4,
        "sw" => 3.0 * FRAC_PI_4,
        "nw" => -3.0 * FRAC_PI_4,
        "ne" => -FRAC_PI_4,
        _ => 0.0,
    }
}

/// Absolute angle of a prop orientation code.
///
/// `in` points toward the center side (π), `out` away from it (0); the
/// cardinal codes reuse the location angles.
pub fn orientation_angle(ori: Option<&str>) -> f32 {
    let Some(ori) = ori else {
        return 0.0;
    };
    match ori.to_ascii_lowercase().as_str() {
        "in" | "w" => PI,
        "out" | "e" => 0.0,
        "n" => -FRAC_PI_2,
        "s" => FRAC_PI_2,
        _ => 0.0,
    }
}

/// Position of a hand location on the unit grid.
///
/// Cardinal points sit at distance 1 from the center; the box-grid diagonals
/// sit at distance 1 on the 45° rays.
pub fn grid_coordinates(loc: Option<&str>) -> [f32; 2] {
    let Some(loc) = loc else {
        return [0.0, 0.0];
    };
    match loc.to_ascii_lowercase().as_str() {
        "e" => [1.0, 0.0],
        "s" => [0.0, 1.0],
        "w" => [-1.0, 0.0],
        "n" => [0.0, -1.0],
        "se" => [FRAC_1_SQRT_2, FRAC_1_SQRT_2],
        "sw" => [-FRAC_1_SQRT_2, FRAC_1_SQRT_2],
        "nw" => [-FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
        "ne" => [FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
        _ => [0.0, 0.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::{assert_angle_eq, vector_angle};

    #[test]
    fn test_location_angles() {
        assert_eq!(location_angle(Some("e")), 0.0);
        assert_angle_eq(location_angle(Some("s")), FRAC_PI_2);
        assert_angle_eq(location_angle(Some("w")), PI);
        assert_angle_eq(location_angle(Some("n")), -FRAC_PI_2);
        assert_angle_eq(location_angle(Some("N")), -FRAC_PI_2);
        assert_eq!(location_angle(Some("X")), 0.0);
        assert_eq!(location_angle(None), 0.0);
    }

    #[test]
    fn test_orientation_angles() {
        assert_angle_eq(orientation_angle(Some("in")), PI);
        assert_angle_eq(orientation_angle(Some("out")), 0.0);
        assert_angle_eq(orientation_angle(Some("n")), -FRAC_PI_2);
        assert_angle_eq(orientation_angle(Some("e")), 0.0);
        assert_angle_eq(orientation_angle(Some("s")), FRAC_PI_2);
        assert_angle_eq(orientation_angle(Some("w")), PI);
        assert_eq!(orientation_angle(Some("clock")), 0.0);
        assert_eq!(orientation_angle(None), 0.0);
    }

    #[test]
    fn test_grid_matches_location_angles() {
        for loc in ["e", "s", "w", "n", "ne", "se", "sw", "nw"] {
            let point = grid_coordinates(Some(loc));
            assert_angle_eq(vector_angle(point), location_angle(Some(loc)));
            let len = (point[0] * point[0] + point[1] * point[1]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
        assert_eq!(grid_coordinates(Some("center")), [0.0, 0.0]);
        assert_eq!(grid_coordinates(None), [0.0, 0.0]);
    }
}
