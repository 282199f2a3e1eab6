//! Face landmark sets and the capture/detection capabilities that produce them.
//!
//! The vision provider is external: anything that can turn a captured frame
//! into a list of [`FaceLandmarks`] plugs in through [`LandmarkProvider`].
//! A YAML [`Recording`] implements both capabilities so the pipeline can be
//! replayed without a camera.

use crate::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path, sync::Arc};

/// A single normalized landmark: x and y relative to the frame, z relative depth
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Landmark {
    /// Horizontal position in [0, 1]
    pub x: f64,
    /// Vertical position in [0, 1]
    pub y: f64,
    /// Relative depth (same scale as x)
    pub z: f64,
}

impl Landmark {
    /// Create a landmark from normalized coordinates
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Landmark {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Landmark> for [f64; 3] {
    fn from(l: Landmark) -> Self {
        [l.x, l.y, l.z]
    }
}

/// Landmarks of one detected face in one frame, keyed by landmark id
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    points: BTreeMap<u16, Landmark>,
}

impl FaceLandmarks {
    /// Empty landmark set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace one landmark
    pub fn insert(&mut self, id: u16, landmark: Landmark) {
        self.points.insert(id, landmark);
    }

    /// Look up a landmark by id
    pub fn get(&self, id: u16) -> Option<Landmark> {
        self.points.get(&id).copied()
    }

    /// Number of landmarks present
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no landmark
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over `(id, landmark)` in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u16, Landmark)> + '_ {
        self.points.iter().map(|(&id, &p)| (id, p))
    }
}

impl FromIterator<(u16, Landmark)> for FaceLandmarks {
    fn from_iter<I: IntoIterator<Item = (u16, Landmark)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// A captured video frame as seen by the core: its index and pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Zero-based capture index
    pub index: u64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Frame acquisition capability
pub trait FrameSource {
    /// Block until the next frame is available, `None` at end of stream
    ///
    /// # Errors
    ///
    /// Returns an error if the device or stream fails
    fn read(&mut self) -> Result<Option<CapturedFrame>>;
}

/// Face landmark detection capability
pub trait LandmarkProvider {
    /// Detect zero or more faces in `frame`
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails for this frame
    fn detect(&mut self, frame: &CapturedFrame) -> Result<Vec<FaceLandmarks>>;
}

/// Faces detected in one recorded frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Faces in provider order
    #[serde(default)]
    pub faces: Vec<FaceLandmarks>,
}

/// A recorded landmark stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frames in capture order
    #[serde(default)]
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Load a recording from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or has a zero-sized frame
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let recording = Self::from_yaml(&content)?;
        info!(
            "Loaded recording {} ({} frames, {}x{})",
            path.display(),
            recording.frames.len(),
            recording.width,
            recording.height
        );
        Ok(recording)
    }

    /// Parse a recording from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid recording
    pub fn from_yaml(content: &str) -> Result<Self> {
        let recording: Self = serde_yaml::from_str(content)?;
        if recording.width == 0 || recording.height == 0 {
            return Err(Error::InvalidInput(format!(
                "Recording frame size must be positive, got {}x{}",
                recording.width, recording.height
            )));
        }
        Ok(recording)
    }

    /// Split into a frame source and a matching landmark provider
    #[must_use]
    pub fn replay(self) -> (ReplaySource, ReplayDetector) {
        let shared = Arc::new(self);
        (
            ReplaySource {
                recording: Arc::clone(&shared),
                next: 0,
            },
            ReplayDetector {
                recording: shared,
                max_faces: usize::MAX,
            },
        )
    }
}

/// Frame source that walks a [`Recording`] in order
#[derive(Debug, Clone)]
pub struct ReplaySource {
    recording: Arc<Recording>,
    next: usize,
}

impl FrameSource for ReplaySource {
    fn read(&mut self) -> Result<Option<CapturedFrame>> {
        if self.next >= self.recording.frames.len() {
            return Ok(None);
        }
        let index = u64::try_from(self.next)
            .map_err(|_| Error::FrameSource(format!("Frame index {} overflows", self.next)))?;
        self.next += 1;
        Ok(Some(CapturedFrame {
            index,
            width: self.recording.width,
            height: self.recording.height,
        }))
    }
}

/// Landmark provider answering from a [`Recording`]
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    recording: Arc<Recording>,
    max_faces: usize,
}

impl ReplayDetector {
    /// Cap the number of faces reported per frame
    #[must_use]
    pub fn with_max_faces(mut self, max_faces: usize) -> Self {
        self.max_faces = max_faces;
        self
    }
}

impl LandmarkProvider for ReplayDetector {
    fn detect(&mut self, frame: &CapturedFrame) -> Result<Vec<FaceLandmarks>> {
        let index = usize::try_from(frame.index)
            .map_err(|_| Error::Provider(format!("Frame index {} out of range", frame.index)))?;
        let recorded = self.recording.frames.get(index).ok_or_else(|| {
            Error::Provider(format!("Frame {index} is not part of the recording"))
        })?;
        let faces: Vec<FaceLandmarks> =
            recorded.faces.iter().take(self.max_faces).cloned().collect();
        debug!("Frame {}: {} face(s)", frame.index, faces.len());
        Ok(faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = r"
width: 640
height: 480
frames:
  - faces:
      - {1: [0.5, 0.4, -0.02], 10: [0.5, 0.2, 0.0]}
      - {1: [0.2, 0.5, 0.0]}
  - faces: []
";

    #[test]
    fn test_landmark_lookup() {
        let mut face = FaceLandmarks::new();
        face.insert(1, Landmark::new(0.5, 0.4, 0.0));
        assert_eq!(face.get(1), Some(Landmark::new(0.5, 0.4, 0.0)));
        assert!(face.get(2).is_none());
        assert_eq!(face.len(), 1);
    }

    #[test]
    fn test_replay_walks_frames() {
        let recording = Recording::from_yaml(RECORDING).unwrap();
        let (mut source, mut detector) = recording.replay();

        let first = source.read().unwrap().unwrap();
        assert_eq!((first.width, first.height, first.index), (640, 480, 0));
        let faces = detector.detect(&first).unwrap();
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].get(1), Some(Landmark::new(0.5, 0.4, -0.02)));

        let second = source.read().unwrap().unwrap();
        assert!(detector.detect(&second).unwrap().is_empty());

        assert!(source.read().unwrap().is_none());
    }

    #[test]
    fn test_replay_max_faces() {
        let (mut source, detector) = Recording::from_yaml(RECORDING).unwrap().replay();
        let mut detector = detector.with_max_faces(1);
        let frame = source.read().unwrap().unwrap();
        assert_eq!(detector.detect(&frame).unwrap().len(), 1);
    }

    #[test]
    fn test_zero_sized_recording_rejected() {
        assert!(Recording::from_yaml("width: 0\nheight: 480\n").is_err());
    }

    #[test]
    fn test_unknown_frame_is_provider_error() {
        let (_, mut detector) = Recording::from_yaml(RECORDING).unwrap().replay();
        let frame = CapturedFrame { index: 99, width: 640, height: 480 };
        assert!(matches!(detector.detect(&frame), Err(Error::Provider(_))));
    }
}
