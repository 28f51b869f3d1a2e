// SPDX-License-Identifier: MIT OR Apache-2.0
//! Motion interpretation and interpolation for pictograph sequences.
//!
//! Given a timeline of beats, each describing how two props ("blue" and "red")
//! move, this crate computes a continuous pose for any fractional beat:
//! - Angle arithmetic with wrap-correct interpolation
//! - Symbolic location/orientation lookups
//! - One rotation formula per motion type
//! - A timeline engine stitching the beats into one query function
//!
//! ## Architecture
//!
//! Data flows one way: a parsed [`SequenceData`] is loaded into an
//! [`AnimationEngine`], which answers [`AnimationEngine::query`] with a pair
//! of [`PropState`] snapshots. The crate performs no I/O.

pub mod angles;
pub mod engine;
pub mod mapping;
pub mod motion;
pub mod playback;
pub mod sequence;

pub use engine::{
    AnimationEngine, BeatPosition, EngineConfig, LoadError, PositionStrategy, PropState,
    PropStates, SequenceSummary, DEFAULT_GRID_SCALE, DEFAULT_PATH_RADIUS,
};
pub use playback::{BeatClock, PlaybackState};
pub use sequence::{
    MotionType, Prop, PropAttributes, PropRotDir, SequenceData, SequenceMeta, SequenceStep,
};
