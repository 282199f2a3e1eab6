//! Constants used throughout the application

/// Number of samples kept by every per-target smoothing buffer
pub const SMOOTHING_WINDOW: usize = 5;

/// Enclosing circle inflation to cover hair and margin around the face outline
pub const HEAD_RADIUS_INFLATION: f64 = 1.15;

/// Subject distance used for the one-shot calibration (cm)
pub const KNOWN_CALIBRATION_DISTANCE: f64 = 60.0;

/// Average real head width (cm)
pub const REAL_HEAD_WIDTH: f64 = 15.0;

/// Face mesh landmark ids
pub mod landmark_ids {
    /// Tip of the nose, used as the paddle control signal
    pub const NOSE_TIP: u16 = 1;
    /// Top of the head (forehead apex)
    pub const TOP_OF_HEAD: u16 = 10;
    /// Left ear (tragion side of the outline)
    pub const LEFT_EAR: u16 = 234;
    /// Right ear
    pub const RIGHT_EAR: u16 = 454;

    /// Head outline including jaw, temples and extra hair volume (contains duplicates)
    pub const HEAD_OUTLINE: [u16; 76] = [
        10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377,
        // top of head and hair
        10, 108, 67, 103, 54, 21, 162, 127, 234, 93, 132, 58, 172, 136, 150, 149, 176, 148, 152,
        // sides of head
        447, 366, 401, 435, 367, 364, 394, 395, 369, 396, 175, 171, 140, 170, 169, 135, 138, 215,
        // hair volume
        54, 55, 56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71, 72, 73, 74,
    ];
}

/// Default paddle control gain applied to the distance to target
pub const DEFAULT_CONTROL_SENSITIVITY: f64 = 1.8;

/// Fixed per-tick fraction of the eased paddle step
pub const DEFAULT_CONTROL_GAIN: f64 = 0.1;

/// Per-tick fraction by which the AI paddle closes on its predicted target
pub const DEFAULT_AI_CORRECTION_RATE: f64 = 0.08;

/// Vertical speed multiplier applied on every wall bounce
pub const WALL_BOUNCE_AMPLIFICATION: f64 = 1.02;

/// Horizontal speed multiplier applied on every paddle hit
pub const PADDLE_HIT_SPEEDUP: f64 = 1.05;

/// Vertical velocity added per unit of hit offset
pub const HIT_OFFSET_DEFLECTION: f64 = 2.0;

/// Speed cap as a multiple of the base ball speed
pub const MAX_SPEED_FACTOR: f64 = 2.0;

/// Half-width of the random serve angle range (radians)
pub const SERVE_ANGLE_SPREAD: f64 = 0.5;

/// Paddle thickness in pixels
pub const PADDLE_WIDTH: f64 = 15.0;

/// Paddle height in pixels
pub const PADDLE_HEIGHT: f64 = 90.0;

/// Ball size (collision radius) in pixels
pub const BALL_SIZE: f64 = 15.0;

/// Two-player readiness: leftmost face must sit left of this frame fraction
pub const LEFT_PLAYER_ZONE: f64 = 0.4;

/// Two-player readiness: second face must sit right of this frame fraction
pub const RIGHT_PLAYER_ZONE: f64 = 0.6;

/// Largest accepted overlay line thickness in pixels
pub const MAX_LINE_THICKNESS: i32 = 64;

/// Largest accepted crosshair arm length in pixels
pub const MAX_CROSSHAIR_SIZE: i32 = 4096;

/// Largest accepted number of crosshair glow strokes
pub const MAX_GLOW_INTENSITY: u32 = 32;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
