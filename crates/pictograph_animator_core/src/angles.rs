// SPDX-License-Identifier: MIT OR Apache-2.0
//! Angle arithmetic.
//!
//! All angles are radians. Two canonical ranges are used throughout the crate:
//! - positive: `[0, 2π)`, the range every computed pose angle is returned in
//! - signed: `(-π, π]`, used for deltas between two angles

use std::f32::consts::{PI, TAU};

/// Map any angle into `[0, 2π)`.
pub fn normalize_positive(angle: f32) -> f32 {
    // `rem_euclid` may round up to exactly TAU for tiny negative inputs;
    // the second `%` folds that case back onto 0.
    ((angle % TAU) + TAU) % TAU
}

/// Map any angle into `(-π, π]`.
///
/// `-π` maps to `+π`.
pub fn normalize_signed(angle: f32) -> f32 {
    let positive = normalize_positive(angle);
    if positive > PI {
        positive - TAU
    } else {
        positive
    }
}

/// Linear interpolation between two scalars
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate from `a` to `b` along the shortest arc.
///
/// When both arcs are equally long (a half turn apart) the positive-going arc
/// is taken, since `normalize_signed` resolves `-π` to `+π`.
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    let delta = normalize_signed(b - a);
    normalize_positive(a + delta * t)
}

/// Interpolate a 2D point
pub fn lerp_coordinates(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t)]
}

/// Angle of the vector from the origin to `point`, in `[0, 2π)`.
///
/// The origin itself has no direction and maps to 0.
pub fn vector_angle(point: [f32; 2]) -> f32 {
    if point[0] == 0.0 && point[1] == 0.0 {
        return 0.0;
    }
    normalize_positive(point[1].atan2(point[0]))
}

#[cfg(test)]
pub(crate) fn assert_angle_eq(actual: f32, expected: f32) {
    let diff = normalize_signed(actual - expected).abs();
    assert!(
        diff < 1e-4,
        "angle {actual} differs from {expected} by {diff}"
    );
}
