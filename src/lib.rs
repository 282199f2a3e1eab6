//! Multi-target head tracking library with head-controlled Pong.
//!
//! Per video frame an external landmark provider reports zero or more faces.
//! This crate turns them into stable on-screen targets and game input:
//! 1. Geometry extraction reduces each face to an enclosing head circle, a
//!    3D target point and a normalized nose-tip control point
//! 2. The tracker routes detections into per-target slots, each smoothed by
//!    fixed-window moving averages
//! 3. A one-shot calibration turns head radius into camera distance
//! 4. Games map the nose-tip signal onto paddles and run the Pong physics
//!
//! Rendering is left to the caller: every frame yields a list of
//! [`overlay::DrawCommand`]s.
//!
//! # Examples
//!
//! ## Tracking
//!
//! ```no_run
//! use head_tracker::{landmarks::Recording, session::TrackingSession};
//! use head_tracker::landmarks::{FrameSource, LandmarkProvider};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (mut frames, mut detector) = Recording::from_file("recording.yaml")?.replay();
//! let mut session = TrackingSession::default();
//!
//! while let Some(frame) = frames.read()? {
//!     let faces = detector.detect(&frame)?;
//!     let report = session.tick(&faces, frame.width, frame.height);
//!     for target in &report.targets {
//!         match target.distance {
//!             Some(d) => println!("slot {}: {:.1}cm", target.slot, d),
//!             None => println!("slot {}: uncalibrated", target.slot),
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pong
//!
//! ```
//! use head_tracker::game::{GameMode, PaddleInput, PongEngine};
//!
//! let mut engine = PongEngine::new(GameMode::TwoPlayer, Some(42));
//! engine.start(true).unwrap();
//! let events = engine.update(PaddleInput { left: Some(0.5), right: Some(0.4) });
//! assert!(events.scored.is_none());
//! ```

/// Command line arguments
pub mod cli;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Head-driven paddle control
pub mod control;

/// Camera distance estimation
pub mod distance;

/// Error types and result handling
pub mod error;

/// Moving average smoothing
pub mod filters;

/// Pong game state and physics
pub mod game;

/// Head geometry extraction
pub mod geometry;

/// Single-slot frame handoff between threads
pub mod handoff;

/// Face landmarks and provider capabilities
pub mod landmarks;

/// Draw-command emission
pub mod overlay;

/// Per-session tick context
pub mod session;

/// Multi-target tracking
pub mod tracker;

/// Utility functions for coordinate transformations
pub mod utils;

/// Main application module
pub mod app;

pub use error::{Error, Result};
