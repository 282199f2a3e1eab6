//! Per-session tick context.
//!
//! [`TrackingSession`] owns everything that persists across frames on the
//! tick thread: tracker slots, distance calibration, frame counter and the
//! FPS meter. It is created at session start and dropped at session end.

use crate::{
    config::Config,
    distance::DistanceEstimator,
    geometry::{self, HeadGeometry},
    landmarks::FaceLandmarks,
    tracker::{Measurement, SmoothedTarget, TargetTracker},
    Result,
};
use log::debug;
use nalgebra::Point2;
use std::time::Instant;

/// Instantaneous frame rate from the wall-clock delta between ticks
#[derive(Debug, Clone, Default)]
pub struct FpsMeter {
    last: Option<Instant>,
    fps: f64,
}

impl FpsMeter {
    /// Record a tick at `now` and return the updated rate
    pub fn tick(&mut self, now: Instant) -> f64 {
        if let Some(last) = self.last {
            let elapsed = now.saturating_duration_since(last).as_secs_f64();
            if elapsed > 0.0 {
                self.fps = 1.0 / elapsed;
            }
        }
        self.last = Some(now);
        self.fps
    }

    /// Most recent rate, zero before two ticks
    pub const fn fps(&self) -> f64 {
        self.fps
    }
}

/// Output of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Zero-based tick index
    pub frame: u64,
    /// Faces reported by the provider
    pub faces: usize,
    /// Faces whose geometry could not be extracted
    pub skipped: usize,
    /// Smoothed output of every slot fed this tick
    pub targets: Vec<SmoothedTarget>,
    /// Normalized nose tips in provider order
    pub noses: Vec<Point2<f64>>,
    /// Current frame rate
    pub fps: f64,
}

/// Owned tracking context for one session
pub struct TrackingSession {
    tracker: TargetTracker,
    distance: DistanceEstimator,
    fps: FpsMeter,
    frames: u64,
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new(TargetTracker::default(), DistanceEstimator::default())
    }
}

impl TrackingSession {
    /// Create a session from its parts
    #[must_use]
    pub fn new(tracker: TargetTracker, distance: DistanceEstimator) -> Self {
        Self {
            tracker,
            distance,
            fps: FpsMeter::default(),
            frames: 0,
        }
    }

    /// Create a session from the tracking and calibration sections
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown assignment policy, a zero smoothing
    /// window, or invalid calibration constants
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.tracking.smoothing_window == 0 {
            return Err(crate::Error::ConfigError(
                "Smoothing window size must be greater than 0".to_string(),
            ));
        }
        let tracker = TargetTracker::new(config.tracking.smoothing_window, config.create_policy()?);
        let distance =
            DistanceEstimator::new(config.calibration.known_distance, config.calibration.real_head_width)?;
        Ok(Self::new(tracker, distance))
    }

    /// Process one frame's faces, timing the tick with the wall clock
    pub fn tick(&mut self, faces: &[FaceLandmarks], width: u32, height: u32) -> FrameReport {
        self.tick_at(faces, width, height, Instant::now())
    }

    /// Process one frame's faces, timing the tick at `now`
    pub fn tick_at(&mut self, faces: &[FaceLandmarks], width: u32, height: u32, now: Instant) -> FrameReport {
        let geometries: Vec<Option<HeadGeometry>> =
            faces.iter().map(|face| geometry::extract(face, width, height)).collect();
        let skipped = geometries.iter().filter(|g| g.is_none()).count();
        if skipped > 0 {
            debug!("Frame {}: skipped {skipped} malformed face(s)", self.frames);
        }

        let measurements: Vec<Option<Measurement>> = geometries
            .into_iter()
            .map(|geometry| {
                geometry.map(|geometry| Measurement {
                    geometry,
                    distance: self.distance.observe(geometry.radius),
                })
            })
            .collect();

        let targets = self.tracker.update(&measurements);
        let noses = faces.iter().filter_map(geometry::control_point).collect();
        let fps = self.fps.tick(now);

        let report = FrameReport {
            frame: self.frames,
            faces: faces.len(),
            skipped,
            targets,
            noses,
            fps,
        };
        self.frames += 1;
        report
    }

    /// Ticks processed so far
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Tracker state
    pub const fn tracker(&self) -> &TargetTracker {
        &self.tracker
    }

    /// Distance calibration state
    pub const fn distance(&self) -> &DistanceEstimator {
        &self.distance
    }
}
