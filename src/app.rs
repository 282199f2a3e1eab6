//! Main application module: the per-tick batch loop.
//!
//! Every tick runs, strictly in order: frame read, landmark detection,
//! geometry extraction and tracker update, distance, control mapping and
//! physics, then overlay emission. All tracking and game state is owned by
//! the thread calling [`HeadTrackerApp::run`].

use crate::{
    cli::Mode,
    config::Config,
    game::{paddle_input, readiness, GameMode, Phase, PongEngine, Readiness, TickEvents},
    handoff::{frame_handoff, Publish},
    landmarks::{CapturedFrame, FaceLandmarks, FrameSource, LandmarkProvider},
    overlay::{render_game, render_hud, render_start_screen, render_targets, DrawCommand, OverlaySink, OverlayStyle},
    session::{FrameReport, TrackingSession},
    Error, Result,
};
use log::{debug, info, warn};
use std::thread;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// What to do with tracked faces
    pub mode: Mode,
    /// Loaded configuration file (or defaults)
    pub config: Config,
    /// Seed for serve angles, random when absent
    pub seed: Option<u64>,
    /// Start the game as soon as the players are ready
    pub autostart: bool,
}

impl AppConfig {
    /// Default configuration for `mode`
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            config: Config::default(),
            seed: None,
            autostart: false,
        }
    }
}

/// User commands, checked once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Leave the start screen
    Start,
    /// Toggle pause
    TogglePause,
    /// Exit the loop
    Quit,
}

/// Source of user commands
pub trait ControlSource {
    /// Command issued before tick `frame`, if any
    fn poll(&mut self, frame: u64) -> Option<Control>;
}

/// No user input at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoControls;

impl ControlSource for NoControls {
    fn poll(&mut self, _frame: u64) -> Option<Control> {
        None
    }
}

impl<F: FnMut(u64) -> Option<Control>> ControlSource for F {
    fn poll(&mut self, frame: u64) -> Option<Control> {
        self(frame)
    }
}

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickOutput {
    /// Tracking output
    pub report: FrameReport,
    /// Physics events, games only
    pub events: Option<TickEvents>,
    /// Overlay for this frame
    pub commands: Vec<DrawCommand>,
}

/// Totals at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks processed
    pub frames: u64,
    /// Final `(left, right)` score, games only
    pub score: Option<(u32, u32)>,
}

/// Main application struct
pub struct HeadTrackerApp {
    mode: Mode,
    session: TrackingSession,
    engine: Option<PongEngine>,
    style: OverlayStyle,
    max_faces: usize,
    autostart: bool,
    readiness: Readiness,
    // Last non-zero face count, held on the HUD while faces are lost
    shown_targets: usize,
}

impl HeadTrackerApp {
    /// Create the application for one session
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(app_config: AppConfig) -> Result<Self> {
        let AppConfig {
            mode,
            config,
            seed,
            autostart,
        } = app_config;
        config.validate()?;
        info!(
            "Initializing head tracker ({mode:?}, {} assignment)",
            config.tracking.assignment
        );

        let engine = game_mode(mode).map(|game| {
            PongEngine::with_params(game, game.params(), config.game.tuning(), seed)
        });

        Ok(Self {
            mode,
            session: TrackingSession::from_config(&config)?,
            engine,
            style: OverlayStyle::from_config(&config),
            max_faces: config.tracking.max_faces,
            autostart,
            readiness: Readiness::default(),
            shown_targets: 0,
        })
    }

    /// Tracking context
    pub const fn session(&self) -> &TrackingSession {
        &self.session
    }

    /// Game engine, games only
    pub const fn engine(&self) -> Option<&PongEngine> {
        self.engine.as_ref()
    }

    /// Player readiness seen on the last tick
    pub const fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Apply one user command, returning `false` when the loop should exit
    ///
    /// Start and pause requests that are not valid right now are logged and
    /// ignored.
    pub fn handle_control(&mut self, control: Control) -> bool {
        match control {
            Control::Quit => {
                info!("Exit requested by user");
                return false;
            }
            Control::Start => {
                if let Some(engine) = self.engine.as_mut() {
                    if let Err(e) = engine.start(self.readiness.all()) {
                        warn!("Start ignored: {e}");
                    }
                }
            }
            Control::TogglePause => {
                if let Some(engine) = self.engine.as_mut() {
                    if let Err(e) = engine.toggle_pause() {
                        warn!("Pause ignored: {e}");
                    }
                }
            }
        }
        true
    }

    /// Run one tick on already detected faces
    pub fn process_frame(&mut self, frame: &CapturedFrame, faces: &[FaceLandmarks]) -> TickOutput {
        let faces = &faces[..faces.len().min(self.max_faces)];
        let report = self.session.tick(faces, frame.width, frame.height);

        let Some(engine) = self.engine.as_mut() else {
            if report.faces > 0 {
                self.shown_targets = report.faces;
            }
            let mut commands = render_targets(&report.targets, &self.style);
            commands.extend(render_hud(report.fps, self.shown_targets, frame.height, &self.style));
            return TickOutput {
                report,
                events: None,
                commands,
            };
        };

        let mode = engine.mode();
        self.readiness = readiness(mode, &report.noses);
        if self.autostart && engine.phase() == Phase::StartScreen && self.readiness.all() {
            if let Err(e) = engine.start(true) {
                warn!("Autostart failed: {e}");
            }
        }

        let events = engine.update(paddle_input(mode, &report.noses));
        let commands = if engine.phase() == Phase::StartScreen {
            render_start_screen(mode, self.readiness, engine.params())
        } else {
            render_game(engine.state(), engine.params(), &self.style)
        };

        TickOutput {
            report,
            events: Some(events),
            commands,
        }
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.session.frames(),
            score: self
                .engine
                .as_ref()
                .map(|engine| (engine.state().left_score, engine.state().right_score)),
        }
    }

    fn step<P, O, C>(
        &mut self,
        frame: &CapturedFrame,
        provider: &mut P,
        sink: &mut O,
        controls: &mut C,
    ) -> Result<bool>
    where
        P: LandmarkProvider + ?Sized,
        O: OverlaySink + ?Sized,
        C: ControlSource + ?Sized,
    {
        if let Some(control) = controls.poll(frame.index) {
            if !self.handle_control(control) {
                return Ok(false);
            }
        }
        let faces = provider.detect(frame)?;
        let output = self.process_frame(frame, &faces);
        debug!(
            "Frame {}: {} face(s), {} target(s)",
            frame.index,
            output.report.faces,
            output.report.targets.len()
        );
        sink.present(&output.commands)?;
        Ok(true)
    }

    /// Run the main loop until the source ends or a quit command arrives
    ///
    /// # Errors
    ///
    /// Returns the first capture, provider or overlay failure
    pub fn run<F, P, O, C>(&mut self, source: &mut F, provider: &mut P, sink: &mut O, controls: &mut C) -> Result<RunSummary>
    where
        F: FrameSource + ?Sized,
        P: LandmarkProvider + ?Sized,
        O: OverlaySink + ?Sized,
        C: ControlSource + ?Sized,
    {
        info!("Starting main application loop ({:?})", self.mode);
        while let Some(frame) = source.read()? {
            if !self.step(&frame, provider, sink, controls)? {
                break;
            }
        }
        let summary = self.summary();
        info!("Application shutting down after {} frame(s)", summary.frames);
        Ok(summary)
    }

    /// Like [`run`](Self::run), but frames are read on a separate capture
    /// thread and handed over through a single slot. Frames the tick thread
    /// is too slow for are dropped, never queued.
    ///
    /// # Errors
    ///
    /// Returns the first capture, provider or overlay failure
    pub fn run_with_capture_thread<F, P, O, C>(
        &mut self,
        mut source: F,
        provider: &mut P,
        sink: &mut O,
        controls: &mut C,
    ) -> Result<RunSummary>
    where
        F: FrameSource + Send + 'static,
        P: LandmarkProvider + ?Sized,
        O: OverlaySink + ?Sized,
        C: ControlSource + ?Sized,
    {
        info!("Starting main application loop ({:?}, threaded capture)", self.mode);
        let (publisher, frames) = frame_handoff::<Result<CapturedFrame>>();
        let capture = thread::Builder::new()
            .name("capture".to_string())
            .spawn(move || loop {
                match source.read() {
                    Ok(Some(frame)) => {
                        if publisher.publish(Ok(frame)) == Publish::Closed {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        publisher.publish(Err(e));
                        break;
                    }
                }
            })?;

        let mut outcome = Ok(());
        while let Some(next) = frames.take() {
            let keep_going = next.and_then(|frame| self.step(&frame, provider, sink, controls));
            match keep_going {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        let dropped = frames.dropped();
        // Dropping the receiver stops a capture thread that is still running.
        drop(frames);
        if capture.join().is_err() {
            return Err(Error::FrameSource("Capture thread panicked".to_string()));
        }
        if dropped > 0 {
            info!("Capture outpaced processing: {dropped} frame(s) dropped");
        }
        outcome?;

        let summary = self.summary();
        info!("Application shutting down after {} frame(s)", summary.frames);
        Ok(summary)
    }
}

/// Game played in `mode`, `None` for the detector
pub const fn game_mode(mode: Mode) -> Option<GameMode> {
    match mode {
        Mode::Detector => None,
        Mode::SinglePlayer => Some(GameMode::SinglePlayer),
        Mode::TwoPlayer => Some(GameMode::TwoPlayer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    fn nose_face(x: f64, y: f64) -> FaceLandmarks {
        let mut face = FaceLandmarks::new();
        face.insert(1, Landmark::new(x, y, 0.0));
        face
    }

    fn frame(index: u64) -> CapturedFrame {
        CapturedFrame {
            index,
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn test_detector_has_no_engine() {
        let app = HeadTrackerApp::new(AppConfig::new(Mode::Detector)).unwrap();
        assert!(app.engine().is_none());
    }

    #[test]
    fn test_start_requires_ready_players() {
        let mut app = HeadTrackerApp::new(AppConfig::new(Mode::TwoPlayer)).unwrap();
        app.process_frame(&frame(0), &[nose_face(0.2, 0.5)]);
        assert!(app.handle_control(Control::Start));
        assert_eq!(app.engine().unwrap().phase(), Phase::StartScreen);

        app.process_frame(&frame(1), &[nose_face(0.2, 0.5), nose_face(0.8, 0.5)]);
        app.handle_control(Control::Start);
        assert_eq!(app.engine().unwrap().phase(), Phase::Playing);

        app.handle_control(Control::TogglePause);
        assert_eq!(app.engine().unwrap().phase(), Phase::Paused);
        assert!(!app.handle_control(Control::Quit));
    }

    #[test]
    fn test_autostart() {
        let mut config = AppConfig::new(Mode::SinglePlayer);
        config.autostart = true;
        config.seed = Some(3);
        let mut app = HeadTrackerApp::new(config).unwrap();
        let output = app.process_frame(&frame(0), &[nose_face(0.5, 0.5)]);
        assert_eq!(app.engine().unwrap().phase(), Phase::Playing);
        assert!(output.events.is_some());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = AppConfig::new(Mode::Detector);
        config.config.tracking.max_faces = 0;
        assert!(HeadTrackerApp::new(config).is_err());
    }

    #[test]
    fn test_hud_holds_last_target_count() {
        let hud_texts = |output: &TickOutput| -> Vec<String> {
            output
                .commands
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Text { text, .. } if text.starts_with("Targets") => Some(text.clone()),
                    _ => None,
                })
                .collect()
        };
        let mut app = HeadTrackerApp::new(AppConfig::new(Mode::Detector)).unwrap();
        assert_eq!(hud_texts(&app.process_frame(&frame(0), &[])), vec!["Targets: 0"]);
        let faces = [nose_face(0.3, 0.5), nose_face(0.7, 0.5)];
        assert_eq!(hud_texts(&app.process_frame(&frame(1), &faces)), vec!["Targets: 2"]);
        assert_eq!(hud_texts(&app.process_frame(&frame(2), &[])), vec!["Targets: 2"]);
    }

    #[test]
    fn test_oversized_crosshair_is_rejected() {
        let mut config = AppConfig::new(Mode::Detector);
        config.config.crosshair.size = i32::MAX;
        assert!(matches!(HeadTrackerApp::new(config), Err(Error::ConfigError(_))));
    }
}
