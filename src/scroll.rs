//! Scroll-to-progress mapping.
//!
//! Two continuous values drive the whole scene:
//! - `target`: the raw page scroll fraction, written by the scroll listener.
//! - `progress`: an exponentially smoothed copy of `target`, advanced once
//!   per animation frame.
//!
//! The glyph arrival is driven by `smoothstep(progress, lower, upper)`, the
//! continuous spin by `progress` itself.

use crate::config::ScrollConfig;

/// Cubic ease with zero slope at both ends. Returns 0 at or below `min`,
/// 1 at or above `max`.
#[inline]
pub fn smoothstep(x: f32, min: f32, max: f32) -> f32 {
    if x <= min {
        return 0.0;
    }
    if x >= max {
        return 1.0;
    }
    let t = (x - min) / (max - min);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Page scroll fraction: `scroll_y / (scroll_height - viewport_height)`,
/// clamped to `[0, 1]`. A page that cannot scroll reports 0.
pub fn scroll_fraction(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f32 {
    let range = scroll_height - viewport_height;
    if range.is_nan() || range <= 0.0 {
        return 0.0;
    }
    (scroll_y / range).clamp(0.0, 1.0) as f32
}

/// Progress values for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameProgress {
    /// Smoothed raw scroll progress, drives rotation.
    pub scroll: f32,
    /// Remapped arrival progress, drives position.
    pub animation: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollState {
    config: ScrollConfig,
    target: f32,
    progress: f32,
}

impl ScrollState {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            target: 0.0,
            progress: 0.0,
        }
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn set_target(&mut self, fraction: f32) {
        if fraction.is_finite() {
            self.target = fraction.clamp(0.0, 1.0);
        }
    }

    /// Current values without advancing the filter.
    pub fn current(&self) -> FrameProgress {
        FrameProgress {
            scroll: self.progress,
            animation: smoothstep(
                self.progress,
                self.config.lower_threshold,
                self.config.upper_threshold,
            ),
        }
    }

    /// Advance the smoothing by one frame and return the new values.
    pub fn advance(&mut self) -> FrameProgress {
        self.progress += (self.target - self.progress) * self.config.smoothing;
        self.current()
    }
}
