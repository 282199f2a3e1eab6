//! Head-driven paddle control.
//!
//! Maps a smoothed normalized vertical head position onto a paddle target and
//! eases the paddle toward it with a first-order low-pass step:
//!
//! `paddle_y += (ȳ * field_height - paddle_y) * sensitivity * gain`
//!
//! The step is applied once per processed frame, not scaled by wall-clock
//! time, so the perceived responsiveness depends on the tick rate. No travel
//! clamping is applied; the paddle may leave the field.

use crate::{
    constants::{DEFAULT_CONTROL_GAIN, DEFAULT_CONTROL_SENSITIVITY, SMOOTHING_WINDOW},
    filters::MovingAverage,
};
use log::trace;

/// One eased step of `current` toward `target`
#[must_use]
pub fn ease_toward(current: f64, target: f64, sensitivity: f64, gain: f64) -> f64 {
    current + (target - current) * sensitivity * gain
}

/// Smooths a normalized control signal and drives one paddle with it
#[derive(Debug, Clone)]
pub struct PaddleController {
    smoothing: MovingAverage<f64>,
    sensitivity: f64,
    gain: f64,
    field_height: f64,
}

impl PaddleController {
    /// Controller with the default sensitivity, gain and smoothing window
    #[must_use]
    pub fn new(field_height: f64) -> Self {
        Self::with_tuning(field_height, DEFAULT_CONTROL_SENSITIVITY, DEFAULT_CONTROL_GAIN)
    }

    /// Controller with explicit tuning
    #[must_use]
    pub fn with_tuning(field_height: f64, sensitivity: f64, gain: f64) -> Self {
        Self {
            smoothing: MovingAverage::new(SMOOTHING_WINDOW),
            sensitivity,
            gain,
            field_height,
        }
    }

    /// Advance `paddle_y` by one tick.
    ///
    /// `normalized_y` is the raw control sample for this tick (nose-tip y in
    /// [0, 1]); `None` means no face this tick and leaves the paddle and the
    /// smoothing window untouched.
    pub fn update(&mut self, paddle_y: f64, normalized_y: Option<f64>) -> f64 {
        let Some(sample) = normalized_y else {
            return paddle_y;
        };
        let smoothed = self.smoothing.apply(sample);
        let target = smoothed * self.field_height;
        let next = ease_toward(paddle_y, target, self.sensitivity, self.gain);
        trace!("Paddle {paddle_y:.1} -> {next:.1} (target {target:.1})");
        next
    }

    /// Smoothed control signal, `None` before the first sample
    pub fn smoothed(&self) -> Option<f64> {
        self.smoothing.mean()
    }

    /// Forget buffered control samples
    pub fn reset(&mut self) {
        self.smoothing.reset();
    }
}
