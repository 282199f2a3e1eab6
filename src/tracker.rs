//! Multi-target tracking across frames.
//!
//! Each tracked target lives in a *slot* that owns its own smoothing buffers.
//! Slots are created lazily when more faces are detected than slots exist and
//! are never removed: a slot whose face disappears keeps its last smoothed
//! values until a detection is routed to it again.
//!
//! Which detection feeds which slot is decided by an [`AssignmentPolicy`].
//! [`Positional`] routes by provider order, which is stable only as long as
//! the provider keeps faces in the same order; a face that drops out, or two
//! faces that swap order, will feed another person's buffers.
//! [`NearestCentroid`] matches detections to the closest previous smoothed
//! center instead.

use crate::{
    constants::SMOOTHING_WINDOW,
    filters::MovingAverage,
    geometry::HeadGeometry,
    Error, Result,
};
use log::debug;
use nalgebra::{Point2, Point3, Vector2};

/// Strategy mapping this frame's detections onto tracker slots
pub trait AssignmentPolicy: Send + Sync {
    /// Slot index for every detection, in detection order.
    ///
    /// `previous` holds the smoothed center of each existing slot (`None` for
    /// a slot that never received data); `detections` holds each detection's
    /// center (`None` for a face whose geometry could not be extracted).
    /// Returned indices are distinct; indices `>= previous.len()` request new
    /// slots and must be contiguous from `previous.len()`.
    fn assign(&self, previous: &[Option<Point2<f64>>], detections: &[Option<Point2<f64>>]) -> Vec<usize>;

    /// Policy name
    fn name(&self) -> &str;
}

/// Detection `i` feeds slot `i`
#[derive(Debug, Clone, Copy, Default)]
pub struct Positional;

impl AssignmentPolicy for Positional {
    fn assign(&self, _previous: &[Option<Point2<f64>>], detections: &[Option<Point2<f64>>]) -> Vec<usize> {
        (0..detections.len()).collect()
    }

    fn name(&self) -> &str {
        "positional"
    }
}

/// Greedy minimum-distance matching against the previous smoothed centers
///
/// Detections left over after matching take the lowest unclaimed slot, or a
/// new slot when every existing one is taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestCentroid;

impl AssignmentPolicy for NearestCentroid {
    fn assign(&self, previous: &[Option<Point2<f64>>], detections: &[Option<Point2<f64>>]) -> Vec<usize> {
        let mut pairs: Vec<(f64, usize, usize)> = Vec::new();
        for (d, detection) in detections.iter().enumerate() {
            let Some(detection) = detection else { continue };
            for (s, center) in previous.iter().enumerate() {
                if let Some(center) = center {
                    pairs.push((nalgebra::distance(detection, center), d, s));
                }
            }
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut assignment: Vec<Option<usize>> = vec![None; detections.len()];
        let mut claimed = vec![false; previous.len()];
        for (_, d, s) in pairs {
            if assignment[d].is_none() && !claimed[s] {
                assignment[d] = Some(s);
                claimed[s] = true;
            }
        }

        let mut next_new = previous.len();
        assignment
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    if let Some(free) = claimed.iter().position(|&taken| !taken) {
                        claimed[free] = true;
                        free
                    } else {
                        next_new += 1;
                        next_new - 1
                    }
                })
            })
            .collect()
    }

    fn name(&self) -> &str {
        "nearest_centroid"
    }
}

/// Create an assignment policy by name
///
/// # Errors
///
/// Returns an error for an unknown policy name
pub fn create_policy(name: &str) -> Result<Box<dyn AssignmentPolicy>> {
    match name.to_lowercase().as_str() {
        "positional" => Ok(Box::new(Positional)),
        "nearest_centroid" | "nearestcentroid" | "nearest" => Ok(Box::new(NearestCentroid)),
        _ => Err(Error::AssignmentPolicy(format!("Unknown assignment policy: {name}"))),
    }
}

/// One face's measurements for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Extracted head geometry
    pub geometry: HeadGeometry,
    /// Estimated distance, absent before calibration
    pub distance: Option<f64>,
}

/// Smoothed output of one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedTarget {
    /// Slot index
    pub slot: usize,
    /// Mean head center over the window
    pub center: Point2<f64>,
    /// Mean head radius over the window
    pub radius: f64,
    /// Mean distance over the window, absent until a distance was recorded
    pub distance: Option<f64>,
    /// Latest (unsmoothed) target point
    pub target_point: Point3<f64>,
    /// Latest (unsmoothed) normalized control point
    pub control_point: Point2<f64>,
    /// Consecutive frames without a measurement
    pub misses: u32,
}

/// Persistent per-slot smoothing state
#[derive(Debug, Clone)]
pub struct TrackedTarget {
    position: MovingAverage<Vector2<f64>>,
    radius: MovingAverage<f64>,
    distance: MovingAverage<f64>,
    latest: Option<HeadGeometry>,
    misses: u32,
}

impl TrackedTarget {
    fn new(window_size: usize) -> Self {
        Self {
            position: MovingAverage::new(window_size),
            radius: MovingAverage::new(window_size),
            distance: MovingAverage::new(window_size),
            latest: None,
            misses: 0,
        }
    }

    fn record(&mut self, measurement: &Measurement) {
        let geometry = measurement.geometry;
        self.position.push(geometry.center.coords);
        self.radius.push(geometry.radius);
        if let Some(distance) = measurement.distance {
            self.distance.push(distance);
        }
        self.latest = Some(geometry);
        self.misses = 0;
    }

    /// Smoothed values, `None` if the slot never received a measurement
    pub fn smoothed(&self, slot: usize) -> Option<SmoothedTarget> {
        let latest = self.latest?;
        Some(SmoothedTarget {
            slot,
            center: Point2::from(self.position.mean()?),
            radius: self.radius.mean()?,
            distance: self.distance.mean(),
            target_point: latest.target_point,
            control_point: latest.control_point,
            misses: self.misses,
        })
    }

    /// Number of position samples currently buffered
    pub fn buffered(&self) -> usize {
        self.position.len()
    }

    /// Consecutive frames without a measurement
    pub const fn misses(&self) -> u32 {
        self.misses
    }
}

/// Slot-indexed multi-target tracker
pub struct TargetTracker {
    slots: Vec<TrackedTarget>,
    window_size: usize,
    policy: Box<dyn AssignmentPolicy>,
}

impl Default for TargetTracker {
    fn default() -> Self {
        Self::new(SMOOTHING_WINDOW, Box::new(Positional))
    }
}

impl TargetTracker {
    /// Create a tracker whose slot buffers hold `window_size` samples
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize, policy: Box<dyn AssignmentPolicy>) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            slots: Vec::new(),
            window_size,
            policy,
        }
    }

    /// Route this frame's measurements into slots and return the smoothed
    /// output of every slot that was assigned a detection.
    ///
    /// `detections` is in provider order; `None` marks a face that was
    /// detected but whose geometry could not be extracted. Its slot keeps its
    /// previous values.
    pub fn update(&mut self, detections: &[Option<Measurement>]) -> Vec<SmoothedTarget> {
        let previous: Vec<Option<Point2<f64>>> =
            self.slots.iter().map(|s| s.position.mean().map(Point2::from)).collect();
        let centers: Vec<Option<Point2<f64>>> =
            detections.iter().map(|d| d.map(|m| m.geometry.center)).collect();

        let assignment = self.policy.assign(&previous, &centers);

        let needed = assignment.iter().max().map_or(0, |&s| s + 1);
        if needed > self.slots.len() {
            debug!("Growing tracker from {} to {} slots", self.slots.len(), needed);
            let window_size = self.window_size;
            self.slots.resize_with(needed, || TrackedTarget::new(window_size));
        }

        let mut touched = vec![false; self.slots.len()];
        for (detection, &slot) in detections.iter().zip(&assignment) {
            if let Some(measurement) = detection {
                self.slots[slot].record(measurement);
                touched[slot] = true;
            }
        }
        for (slot, target) in self.slots.iter_mut().enumerate() {
            if !touched[slot] {
                target.misses = target.misses.saturating_add(1);
            }
        }

        assignment
            .iter()
            .filter_map(|&slot| self.slots[slot].smoothed(slot))
            .collect()
    }

    /// Smoothed values of one slot, stale or not
    pub fn smoothed(&self, slot: usize) -> Option<SmoothedTarget> {
        self.slots.get(slot)?.smoothed(slot)
    }

    /// Number of slots ever created
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// All slots in index order
    pub fn slots(&self) -> &[TrackedTarget] {
        &self.slots
    }

    /// Name of the active assignment policy
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }
}
