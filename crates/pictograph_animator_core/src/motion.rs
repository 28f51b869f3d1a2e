// SPDX-License-Identifier: MIT OR Apache-2.0
//! Staff rotation formulas, one per motion regime.
//!
//! Each formula takes the beat's local progress `t` in `[0, 1]` and returns the
//! prop's own rotation angle in `[0, 2π)`. `turns` counts extra full
//! revolutions and is never negative; its sign comes from `prop_rot_dir`.
//!
//! `anti`, `static` and `dash` express their result relative to the path: the
//! current center path angle is subtracted so the prop's orientation reads
//! against the grid rather than against the moving hand.

use crate::angles::{lerp_angle, normalize_positive, normalize_signed};
use crate::mapping::orientation_angle;
use crate::sequence::{MotionType, PropAttributes, PropRotDir};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Inputs shared by the rotation formulas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationInput<'a> {
    /// Start orientation code
    pub start_ori: Option<&'a str>,
    /// End orientation code
    pub end_ori: Option<&'a str>,
    /// Direction of extra rotation
    pub prop_rot_dir: Option<PropRotDir>,
    /// Extra full revolutions
    pub turns: f32,
}

impl<'a> RotationInput<'a> {
    /// Borrow the rotation inputs of a prop's attributes
    pub fn from_attributes(attrs: &'a PropAttributes) -> Self {
        Self {
            start_ori: attrs.start_ori.as_deref(),
            end_ori: attrs.end_ori.as_deref(),
            prop_rot_dir: attrs.prop_rot_dir,
            turns: attrs.turn_count(),
        }
    }

    /// Orientation change plus signed extra turns, reduced to `(-π, π]`
    fn reduced_delta(&self) -> f32 {
        let start = orientation_angle(self.start_ori);
        let end = orientation_angle(self.end_ori);
        // Whole turns vanish under the reduction
        let extra = self.turns.rem_euclid(1.0) * TAU * PropRotDir::sign(self.prop_rot_dir);
        normalize_signed(end - start + extra)
    }
}

/// Staff angle for a `pro` motion.
///
/// With zero turns the prop floats: it sweeps a quarter turn in the
/// `prop_rot_dir` direction regardless of the orientation codes.
pub fn pro_rotation(input: &RotationInput<'_>, t: f32) -> f32 {
    let start = orientation_angle(input.start_ori);

    if input.turns == 0.0 {
        let sweep = FRAC_PI_2 * PropRotDir::sign(input.prop_rot_dir);
        return normalize_positive(start + sweep * t);
    }

    normalize_positive(start + input.reduced_delta() * t)
}

/// Staff angle for an `anti` motion, relative to the path
pub fn anti_rotation(input: &RotationInput<'_>, center_path_angle: f32, t: f32) -> f32 {
    let start = orientation_angle(input.start_ori);
    let staff = start + input.reduced_delta() * t;
    normalize_positive(staff - center_path_angle)
}

/// Staff angle for a `static` motion: the start orientation held against the grid
pub fn static_rotation(start_ori: Option<&str>, center_path_angle: f32) -> f32 {
    normalize_positive(orientation_angle(start_ori) - center_path_angle)
}

/// Staff angle for a `dash` motion: shortest path between the orientations, relative to the path
pub fn dash_rotation(
    start_ori: Option<&str>,
    end_ori: Option<&str>,
    center_path_angle: f32,
    t: f32,
) -> f32 {
    let staff = lerp_angle(orientation_angle(start_ori), orientation_angle(end_ori), t);
    normalize_positive(staff - center_path_angle)
}

/// Dispatch on the motion type of `attrs`
pub fn staff_rotation(attrs: &PropAttributes, center_path_angle: f32, t: f32) -> f32 {
    let input = RotationInput::from_attributes(attrs);
    match attrs.motion_type {
        MotionType::Pro => pro_rotation(&input, t),
        MotionType::Anti => anti_rotation(&input, center_path_angle, t),
        MotionType::Static => static_rotation(input.start_ori, center_path_angle),
        MotionType::Dash => dash_rotation(input.start_ori, input.end_ori, center_path_angle, t),
        MotionType::None => 0.0,
    }
}
