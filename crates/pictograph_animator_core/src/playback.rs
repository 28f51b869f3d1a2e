// SPDX-License-Identifier: MIT OR Apache-2.0
//! Beat clock driving a frame loop around [`AnimationEngine::query`].
//!
//! [`AnimationEngine::query`]: crate::engine::AnimationEngine::query

use serde::{Deserialize, Serialize};

/// Slowest playback speed in beats per second
pub const MIN_SPEED: f32 = 0.1;
/// Fastest playback speed in beats per second
pub const MAX_SPEED: f32 = 3.0;
/// Increment used by [`BeatClock::speed_up`] and [`BeatClock::speed_down`]
pub const SPEED_STEP: f32 = 0.1;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Stopped
    #[default]
    Stopped,
    /// Playing forward
    Playing,
    /// Paused
    Paused,
}

/// Current beat and how it advances
#[derive(Debug, Clone, PartialEq)]
pub struct BeatClock {
    /// Current beat
    pub beat: f32,
    /// Playback state
    pub state: PlaybackState,
    /// Wrap to the start instead of stopping at the end
    pub looping: bool,
    speed: f32,
}

impl BeatClock {
    /// Create a stopped clock at beat 0
    pub fn new() -> Self {
        Self {
            beat: 0.0,
            state: PlaybackState::Stopped,
            looping: true,
            speed: 1.0,
        }
    }

    /// Builder-style speed setter
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.set_speed(speed);
        self
    }

    /// Builder-style looping setter
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Speed in beats per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the speed, clamped to `[MIN_SPEED, MAX_SPEED]`
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_nan() {
            1.0
        } else {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        };
    }

    /// Increase speed by one step
    pub fn speed_up(&mut self) {
        self.set_speed(self.speed + SPEED_STEP);
    }

    /// Decrease speed by one step
    pub fn speed_down(&mut self) {
        self.set_speed(self.speed - SPEED_STEP);
    }

    /// Advance by `delta_seconds` of wall time
    pub fn update(&mut self, delta_seconds: f32, total_beats: f32, can_loop: bool) {
        if self.state != PlaybackState::Playing {
            return;
        }

        self.beat += delta_seconds * self.speed;

        if self.beat >= total_beats {
            if self.looping && can_loop {
                self.beat %= total_beats;
            } else {
                self.beat = total_beats.max(0.0);
                self.state = PlaybackState::Stopped;
            }
        }
    }

    /// Play from the current beat
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and rewind to the first beat
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.beat = 0.0;
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused | PlaybackState::Stopped => self.play(),
        }
    }

    /// Jump to a beat
    pub fn seek(&mut self, beat: f32) {
        self.beat = beat.max(0.0);
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

impl Default for BeatClock {
    fn default() -> Self {
        Self::new()
    }
}
