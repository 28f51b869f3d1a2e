// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline engine.
//!
//! Resolves a real-valued beat to a pose for each prop. Step `k` of the
//! timeline owns the beat interval `[k, k + 1]`: at local progress `t` the hand
//! travels from the step's start location toward the next step's start
//! location (the step's own end location for the last step) and the staff
//! rotates by the step's motion formula. Beats are clamped to
//! `[0, total_beats]`, so anything at or past the end holds the final pose.

use crate::angles::{lerp_angle, lerp_coordinates, vector_angle};
use crate::mapping::{grid_coordinates, location_angle};
use crate::motion::staff_rotation;
use crate::sequence::{Prop, SequenceData, SequenceMeta, SequenceStep};
use serde::{Deserialize, Serialize};

/// Radius of the hand path circle in layout units
pub const DEFAULT_PATH_RADIUS: f32 = 200.0;

/// Distance from the center to a grid point in layout units
pub const DEFAULT_GRID_SCALE: f32 = 150.0;

/// How a hand location becomes a 2D position.
///
/// Chosen once per engine; every step of every sequence uses the same strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PositionStrategy {
    /// Positions lie on a circle; the path angle is interpolated and drives `x, y`
    Circle {
        /// Circle radius
        radius: f32,
    },
    /// Positions come from the grid table; `x, y` are interpolated and drive the path angle
    Grid {
        /// Grid point distance from the center
        scale: f32,
    },
}

impl Default for PositionStrategy {
    fn default() -> Self {
        Self::Circle {
            radius: DEFAULT_PATH_RADIUS,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Position strategy
    pub position: PositionStrategy,
}

/// Pose of one prop at a query instant
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PropState {
    /// Angle of the hand relative to the layout center
    pub center_path_angle: f32,
    /// The prop's own rotation angle
    pub staff_rotation_angle: f32,
    /// Horizontal position
    pub x: f32,
    /// Vertical position (down is positive)
    pub y: f32,
}

/// Poses of both props
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PropStates {
    /// Blue prop
    pub blue: PropState,
    /// Red prop
    pub red: PropState,
}

/// Where a beat falls on the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatPosition {
    /// Index of the step being played
    pub current: usize,
    /// Index of the step the hand travels toward; equals `current` on the last step
    pub next: usize,
    /// Progress through the current step, in `[0, 1]`
    pub t: f32,
}

/// Header fields most callers display
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSummary {
    /// Length of the timeline in beats
    pub total_beats: f32,
    /// Word, empty if absent
    pub word: String,
    /// Author, empty if absent
    pub author: String,
}

/// Reasons a sequence cannot be loaded
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Input was not a sequence array
    #[error("Invalid sequence JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Header present but no steps follow it
    #[error("Sequence has no steps")]
    NoSteps,

    /// Beats are not strictly increasing
    #[error("Step {index} has beat {beat}, not after previous beat {previous}")]
    BeatOrder {
        /// Step index
        index: usize,
        /// Beat of the preceding step
        previous: f32,
        /// Offending beat
        beat: f32,
    },

    /// Beat is NaN or infinite
    #[error("Step {index} has a non-finite beat")]
    InvalidBeat {
        /// Step index
        index: usize,
    },

    /// Turn count is negative or not finite
    #[error("Step {index} has invalid turn count {turns}")]
    InvalidTurns {
        /// Step index
        index: usize,
        /// Offending count
        turns: f32,
    },
}

/// Interpolation engine for one animation session
#[derive(Debug, Clone, Default)]
pub struct AnimationEngine {
    config: EngineConfig,
    sequence: Option<SequenceData>,
    total_beats: f32,
    blue: PropState,
    red: PropState,
}

impl AnimationEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load a sequence, replacing any previous one.
    ///
    /// On success both poses are reset to zero. On failure the engine is left
    /// unloaded and queries become no-ops until a later load succeeds.
    pub fn load(&mut self, data: SequenceData) -> Result<(), LoadError> {
        if let Err(err) = validate(data.steps()) {
            tracing::warn!("Rejected sequence: {err}");
            self.sequence = None;
            self.total_beats = 0.0;
            return Err(err);
        }

        self.total_beats = data.steps().len() as f32;
        tracing::debug!(
            word = data.meta().word.as_deref().unwrap_or(""),
            steps = data.steps().len(),
            total_beats = self.total_beats,
            "Loaded sequence"
        );
        self.sequence = Some(data);
        self.reset();
        Ok(())
    }

    /// Parse the JSON array form and load it
    pub fn load_json(&mut self, json: &str) -> Result<(), LoadError> {
        let data = SequenceData::from_json_str(json).inspect_err(|_| {
            self.sequence = None;
            self.total_beats = 0.0;
        })?;
        self.load(data)
    }

    /// Return both poses to zero, keeping the loaded timeline
    pub fn reset(&mut self) {
        self.blue = PropState::default();
        self.red = PropState::default();
    }

    /// Whether a usable timeline is loaded
    pub fn is_loaded(&self) -> bool {
        self.sequence.is_some()
    }

    /// Resolve a beat to its step indices and local progress
    pub fn locate(&self, beat: f32) -> Option<BeatPosition> {
        let steps = self.loaded_steps()?;
        let last = steps.len() - 1;

        let beat = if beat.is_nan() {
            0.0
        } else {
            beat.clamp(0.0, self.total_beats)
        };
        let current = (beat.floor() as usize).min(last);
        let t = beat - current as f32;

        Some(BeatPosition {
            current,
            next: (current + 1).min(last),
            t,
        })
    }

    /// Compute both poses at `beat`.
    ///
    /// Returns `None` and leaves the previous poses untouched when nothing is
    /// loaded.
    pub fn query(&mut self, beat: f32) -> Option<PropStates> {
        let position = self.locate(beat)?;
        let steps = self.loaded_steps()?;
        let current = &steps[position.current];
        let next = &steps[position.next];
        let last_step = position.current == position.next;

        let blue = prop_state(&self.config, current, next, last_step, Prop::Blue, position.t);
        let red = prop_state(&self.config, current, next, last_step, Prop::Red, position.t);

        self.blue = blue;
        self.red = red;
        Some(self.prop_states())
    }

    /// Last computed blue pose
    pub fn blue(&self) -> PropState {
        self.blue
    }

    /// Last computed red pose
    pub fn red(&self) -> PropState {
        self.red
    }

    /// Last computed poses of both props
    pub fn prop_states(&self) -> PropStates {
        PropStates {
            blue: self.blue,
            red: self.red,
        }
    }

    /// Length of the timeline in beats
    pub fn total_beats(&self) -> f32 {
        self.total_beats
    }

    /// Header of the loaded sequence
    pub fn metadata(&self) -> Option<&SequenceMeta> {
        self.sequence.as_ref().map(SequenceData::meta)
    }

    /// Total beats with the displayed header fields
    pub fn summary(&self) -> SequenceSummary {
        let meta = self.metadata();
        SequenceSummary {
            total_beats: self.total_beats,
            word: meta.and_then(|m| m.word.clone()).unwrap_or_default(),
            author: meta.and_then(|m| m.author.clone()).unwrap_or_default(),
        }
    }

    /// Steps of the loaded timeline
    pub fn steps(&self) -> &[SequenceStep] {
        self.sequence.as_ref().map(SequenceData::steps).unwrap_or_default()
    }

    /// Whether playback can wrap around
    pub fn can_loop(&self) -> bool {
        self.total_beats > 0.0
    }

    fn loaded_steps(&self) -> Option<&[SequenceStep]> {
        self.sequence
            .as_ref()
            .map(SequenceData::steps)
            .filter(|steps| !steps.is_empty())
    }
}

fn validate(steps: &[SequenceStep]) -> Result<(), LoadError> {
    if steps.is_empty() {
        return Err(LoadError::NoSteps);
    }

    let mut previous: Option<f32> = None;
    for (index, step) in steps.iter().enumerate() {
        if !step.beat.is_finite() {
            return Err(LoadError::InvalidBeat { index });
        }
        if let Some(previous) = previous {
            if step.beat <= previous {
                return Err(LoadError::BeatOrder {
                    index,
                    previous,
                    beat: step.beat,
                });
            }
        }
        previous = Some(step.beat);

        for attrs in [&step.blue_attributes, &step.red_attributes] {
            let turns = attrs.turn_count();
            if !turns.is_finite() || turns < 0.0 {
                return Err(LoadError::InvalidTurns { index, turns });
            }
        }
    }
    Ok(())
}

fn prop_state(
    config: &EngineConfig,
    current: &SequenceStep,
    next: &SequenceStep,
    last_step: bool,
    prop: Prop,
    t: f32,
) -> PropState {
    let attrs = current.attributes(prop);
    let from = attrs.start_loc.as_deref();
    let to = if last_step {
        attrs.end_loc.as_deref()
    } else {
        next.attributes(prop).start_loc.as_deref()
    };

    let (center_path_angle, x, y) = match config.position {
        PositionStrategy::Circle { radius } => {
            let angle = lerp_angle(location_angle(from), location_angle(to), t);
            (angle, angle.cos() * radius, angle.sin() * radius)
        }
        PositionStrategy::Grid { scale } => {
            let point = lerp_coordinates(grid_coordinates(from), grid_coordinates(to), t);
            (vector_angle(point), point[0] * scale, point[1] * scale)
        }
    };

    PropState {
        center_path_angle,
        staff_rotation_angle: staff_rotation(attrs, center_path_angle, t),
        x,
        y,
    }
}
