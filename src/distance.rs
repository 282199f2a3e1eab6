//! Monocular camera-to-subject distance from apparent head size.
//!
//! Calibration is a single shot: the first valid head radius observed is
//! assumed to be a head of `real_head_width` at `known_distance`, which fixes
//! the focal length for the rest of the session. This is deliberately crude;
//! a subject that is not at the reference distance on the first frame skews
//! every later estimate by the same factor.

use crate::{
    constants::{KNOWN_CALIBRATION_DISTANCE, REAL_HEAD_WIDTH},
    Error, Result,
};
use log::info;

/// One-shot focal length calibration and distance computation
#[derive(Debug, Clone)]
pub struct DistanceEstimator {
    known_distance: f64,
    real_head_width: f64,
    focal_length: Option<f64>,
}

impl Default for DistanceEstimator {
    fn default() -> Self {
        Self {
            known_distance: KNOWN_CALIBRATION_DISTANCE,
            real_head_width: REAL_HEAD_WIDTH,
            focal_length: None,
        }
    }
}

impl DistanceEstimator {
    /// Create an estimator for the given reference distance and head width
    ///
    /// # Errors
    ///
    /// Returns an error if either constant is not a positive finite number
    pub fn new(known_distance: f64, real_head_width: f64) -> Result<Self> {
        if !(known_distance.is_finite() && known_distance > 0.0) {
            return Err(Error::InvalidInput(format!(
                "Calibration distance must be positive, got {known_distance}"
            )));
        }
        if !(real_head_width.is_finite() && real_head_width > 0.0) {
            return Err(Error::InvalidInput(format!(
                "Real head width must be positive, got {real_head_width}"
            )));
        }
        Ok(Self {
            known_distance,
            real_head_width,
            focal_length: None,
        })
    }

    /// Frozen focal length, `None` until the first valid observation
    pub const fn focal_length(&self) -> Option<f64> {
        self.focal_length
    }

    /// Whether calibration has happened
    pub const fn is_calibrated(&self) -> bool {
        self.focal_length.is_some()
    }

    /// Feed one head radius: calibrates on the first valid radius, then
    /// returns the estimated distance
    ///
    /// Invalid radii (zero, negative, non-finite) yield `None` and never
    /// calibrate.
    pub fn observe(&mut self, radius: f64) -> Option<f64> {
        if !Self::is_valid_radius(radius) {
            return None;
        }
        if self.focal_length.is_none() {
            let focal = (2.0 * radius * self.known_distance) / self.real_head_width;
            info!("Distance calibration frozen: focal length {focal:.2} from radius {radius:.1}px");
            self.focal_length = Some(focal);
        }
        self.distance(radius)
    }

    /// Distance for `radius` without calibrating; `None` before calibration
    pub fn distance(&self, radius: f64) -> Option<f64> {
        if !Self::is_valid_radius(radius) {
            return None;
        }
        let focal = self.focal_length?;
        Some((focal * self.real_head_width) / (2.0 * radius))
    }

    fn is_valid_radius(radius: f64) -> bool {
        radius.is_finite() && radius > 0.0
    }
}
