//! Head tracker application: HUD read-out or head-controlled Pong.

use anyhow::{bail, Context, Result};
use clap::Parser;
use head_tracker::{
    app::{AppConfig, HeadTrackerApp, NoControls},
    cli::Args,
    config::Config,
    landmarks::Recording,
    overlay::LogSink,
};
use log::{info, warn};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Head Tracker");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    if let Some(assignment) = args.assignment {
        config.tracking.assignment = assignment;
    }

    let Some(replay_path) = args.replay else {
        bail!("No landmark provider linked; pass --replay <PATH> to run from a recorded landmark stream");
    };
    let recording = Recording::from_file(&replay_path)
        .with_context(|| format!("Failed to open replay {}", replay_path.display()))?;
    let (source, detector) = recording.replay();
    let mut detector = detector.with_max_faces(config.tracking.max_faces);

    // Create and run application
    let mut app = HeadTrackerApp::new(AppConfig {
        mode: args.mode,
        config,
        seed: args.seed,
        autostart: args.autostart,
    })?;
    let mut sink = LogSink::default();
    let mut controls = NoControls;

    let summary = if args.threaded_capture {
        app.run_with_capture_thread(source, &mut detector, &mut sink, &mut controls)?
    } else {
        let mut source = source;
        app.run(&mut source, &mut detector, &mut sink, &mut controls)?
    };

    info!("Processed {} frame(s)", summary.frames);
    if let Some((left, right)) = summary.score {
        info!("Final score {left} - {right}");
    }
    if let Some(focal) = app.session().distance().focal_length() {
        info!("Calibrated focal length {focal:.2}");
    }

    Ok(())
}
