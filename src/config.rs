//! Configuration management for the head tracking application

use crate::{
    constants::{
        DEFAULT_AI_CORRECTION_RATE, DEFAULT_CONTROL_GAIN, DEFAULT_CONTROL_SENSITIVITY,
        KNOWN_CALIBRATION_DISTANCE, MAX_CROSSHAIR_SIZE, MAX_GLOW_INTENSITY, MAX_LINE_THICKNESS,
        REAL_HEAD_WIDTH, SMOOTHING_WINDOW,
    },
    game::ControlTuning,
    tracker::{create_policy, AssignmentPolicy},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// RGB color triple
pub type Rgb = [u8; 3];

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Face tracking configuration
    pub tracking: TrackingConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Crosshair appearance
    pub crosshair: CrosshairConfig,

    /// Overlay colors
    pub colors: ColorConfig,

    /// Distance calibration constants
    pub calibration: CalibrationConfig,

    /// Game control tuning
    pub game: GameConfig,
}

/// Face tracking parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Maximum number of faces the provider reports
    pub max_faces: usize,

    /// Minimum detection confidence (0.0-1.0)
    ///
    /// Read by camera-backed landmark providers only; replayed recordings
    /// carry already filtered faces.
    pub detection_confidence: f64,

    /// Minimum tracking confidence (0.0-1.0), provider-only like
    /// `detection_confidence`
    pub tracking_confidence: f64,

    /// Moving average window size
    pub smoothing_window: usize,

    /// Detection-to-slot assignment policy
    pub assignment: String,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Requested capture width in pixels
    ///
    /// Read by camera frame sources only; the tick uses the size each
    /// captured frame reports.
    pub width: u32,

    /// Requested capture height in pixels, frame-source-only like `width`
    pub height: u32,

    /// HUD font scale
    pub font_scale: f64,

    /// Base line thickness in pixels
    pub line_thickness: i32,

    /// Draw the FPS counter
    pub show_fps: bool,
}

/// Crosshair configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosshairConfig {
    /// Half length of each crosshair arm in pixels
    pub size: i32,

    /// Number of stacked strokes forming the glow
    pub glow_intensity: u32,
}

/// Overlay colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Head circle
    pub circle: Rgb,

    /// Target crosshair
    pub crosshair: Rgb,

    /// Distance label
    pub distance_text: Rgb,

    /// HUD text
    pub text: Rgb,

    /// Game paddles
    pub paddle: Rgb,

    /// Game ball
    pub ball: Rgb,
}

/// Distance calibration constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Assumed subject distance on the calibration frame
    pub known_distance: f64,

    /// Assumed real head width, same unit as `known_distance`
    pub real_head_width: f64,
}

/// Game control tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Head control sensitivity
    pub sensitivity: f64,

    /// Fixed per-tick easing fraction
    pub control_gain: f64,

    /// Per-tick AI correction rate
    pub ai_correction_rate: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_faces: 4,
            detection_confidence: 0.5,
            tracking_confidence: 0.5,
            smoothing_window: SMOOTHING_WINDOW,
            assignment: "positional".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            font_scale: 0.7,
            line_thickness: 2,
            show_fps: true,
        }
    }
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            size: 20,
            glow_intensity: 3,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            circle: [0, 255, 0],
            crosshair: [0, 0, 200],
            distance_text: [255, 255, 255],
            text: [255, 255, 255],
            paddle: [200, 200, 200],
            ball: [255, 255, 255],
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            known_distance: KNOWN_CALIBRATION_DISTANCE,
            real_head_width: REAL_HEAD_WIDTH,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_CONTROL_SENSITIVITY,
            control_gain: DEFAULT_CONTROL_GAIN,
            ai_correction_rate: DEFAULT_AI_CORRECTION_RATE,
        }
    }
}

impl GameConfig {
    /// Engine tuning from this configuration
    pub const fn tuning(&self) -> ControlTuning {
        ControlTuning {
            sensitivity: self.sensitivity,
            gain: self.control_gain,
            ai_correction_rate: self.ai_correction_rate,
        }
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create the configured assignment policy
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown policy name
    pub fn create_policy(&self) -> Result<Box<dyn AssignmentPolicy>> {
        create_policy(&self.tracking.assignment)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found
    pub fn validate(&self) -> Result<()> {
        // Validate tracking
        if !(0.0..=1.0).contains(&self.tracking.detection_confidence) {
            return Err(Error::ConfigError(
                "Detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tracking.tracking_confidence) {
            return Err(Error::ConfigError(
                "Tracking confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.tracking.max_faces == 0 {
            return Err(Error::ConfigError("Max faces must be greater than 0".to_string()));
        }
        if self.tracking.smoothing_window == 0 {
            return Err(Error::ConfigError(
                "Smoothing window size must be greater than 0".to_string(),
            ));
        }
        create_policy(&self.tracking.assignment).map_err(|e| Error::ConfigError(e.to_string()))?;

        // Validate display settings
        if self.display.width == 0 || self.display.height == 0 {
            return Err(Error::ConfigError("Display dimensions must be positive".to_string()));
        }
        if !positive(self.display.font_scale) {
            return Err(Error::ConfigError("Font scale must be positive".to_string()));
        }
        if !(1..=MAX_LINE_THICKNESS).contains(&self.display.line_thickness) {
            return Err(Error::ConfigError(format!(
                "Line thickness must be between 1 and {MAX_LINE_THICKNESS}"
            )));
        }
        if !(0..=MAX_CROSSHAIR_SIZE).contains(&self.crosshair.size) {
            return Err(Error::ConfigError(format!(
                "Crosshair size must be between 0 and {MAX_CROSSHAIR_SIZE}"
            )));
        }
        if self.crosshair.glow_intensity > MAX_GLOW_INTENSITY {
            return Err(Error::ConfigError(format!(
                "Crosshair glow intensity must be at most {MAX_GLOW_INTENSITY}"
            )));
        }

        // Validate calibration and game tuning
        if !positive(self.calibration.known_distance) || !positive(self.calibration.real_head_width) {
            return Err(Error::ConfigError(
                "Calibration distance and head width must be positive".to_string(),
            ));
        }
        if !positive(self.game.sensitivity) || !positive(self.game.control_gain) {
            return Err(Error::ConfigError(
                "Control sensitivity and gain must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.game.ai_correction_rate) {
            return Err(Error::ConfigError(
                "AI correction rate must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Tracker Configuration

# Face tracking
tracking:
  max_faces: 4
  detection_confidence: 0.5
  tracking_confidence: 0.5
  smoothing_window: 5
  assignment: "positional"   # or "nearest_centroid"

# Display settings
display:
  width: 640
  height: 480
  font_scale: 0.7
  line_thickness: 2
  show_fps: true

# Target crosshair
crosshair:
  size: 20
  glow_intensity: 3

# Overlay colors (RGB)
colors:
  circle: [0, 255, 0]
  crosshair: [0, 0, 200]
  distance_text: [255, 255, 255]
  text: [255, 255, 255]
  paddle: [200, 200, 200]
  ball: [255, 255, 255]

# Distance calibration
calibration:
  known_distance: 60.0
  real_head_width: 15.0

# Game control
game:
  sensitivity: 1.8
  control_gain: 0.1
  ai_correction_rate: 0.08
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = serde_yaml::from_str("tracking:\n  max_faces: 2\n").unwrap();
        assert_eq!(parsed.tracking.max_faces, 2);
        assert_eq!(parsed.tracking.smoothing_window, SMOOTHING_WINDOW);
        assert_eq!(parsed.display, DisplayConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.tracking.detection_confidence = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tracking.assignment = "hungarian".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.calibration.real_head_width = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tracking.smoothing_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_overlay_sizes() {
        let mut config = Config::default();
        config.crosshair.size = i32::MAX;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.line_thickness = MAX_LINE_THICKNESS + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.crosshair.glow_intensity = MAX_GLOW_INTENSITY + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.crosshair.size = MAX_CROSSHAIR_SIZE;
        config.display.line_thickness = MAX_LINE_THICKNESS;
        config.crosshair.glow_intensity = MAX_GLOW_INTENSITY;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_game_tuning() {
        let tuning = GameConfig::default().tuning();
        assert_eq!(tuning, ControlTuning::default());
    }
}
