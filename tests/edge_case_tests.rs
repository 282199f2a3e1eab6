//! Edge case tests: degenerate landmarks, extreme values, error surfaces


use head_tracker::{
    constants::landmark_ids,
    filters::MovingAverage,
    game::{GameMode, PaddleInput, Phase, PongEngine},
    geometry::{extract, min_enclosing_circle},
    handoff::frame_handoff,
    landmarks::{FaceLandmarks, Landmark},
    session::TrackingSession,
    utils::safe_cast::{f64_to_i32_clamp, to_pixel, u32_to_i32},
    Error,
};
use nalgebra::{Point2, Vector2};
use std::thread;
use test_helpers::{head_face, HEIGHT, WIDTH};

#[test]
fn test_face_missing_outline_is_skipped() {
    let mut face = head_face(320.0, 240.0, 50.0);
    let mut partial = FaceLandmarks::new();
    for (id, landmark) in face.iter().filter(|(id, _)| *id != landmark_ids::LEFT_EAR) {
        partial.insert(id, landmark);
    }
    assert!(extract(&partial, WIDTH, HEIGHT).is_none());

    // Dropping only the nose removes the control point too.
    face = head_face(320.0, 240.0, 50.0);
    let mut no_nose = FaceLandmarks::new();
    for (id, landmark) in face.iter().filter(|(id, _)| *id != landmark_ids::NOSE_TIP) {
        no_nose.insert(id, landmark);
    }
    assert!(extract(&no_nose, WIDTH, HEIGHT).is_none());
}

#[test]
fn test_collapsed_face_never_calibrates() {
    let mut face = FaceLandmarks::new();
    for &id in landmark_ids::HEAD_OUTLINE.iter() {
        face.insert(id, Landmark::new(0.5, 0.5, 0.0));
    }
    face.insert(landmark_ids::LEFT_EAR, Landmark::new(0.5, 0.5, 0.0));
    face.insert(landmark_ids::RIGHT_EAR, Landmark::new(0.5, 0.5, 0.0));
    face.insert(landmark_ids::TOP_OF_HEAD, Landmark::new(0.5, 0.5, 0.0));
    face.insert(landmark_ids::NOSE_TIP, Landmark::new(0.5, 0.5, 0.0));

    let geometry = extract(&face, WIDTH, HEIGHT).unwrap();
    assert_eq!(geometry.radius, 0.0);

    let mut session = TrackingSession::default();
    let report = session.tick(&[face], WIDTH, HEIGHT);
    assert_eq!(report.skipped, 0);
    assert!(!session.distance().is_calibrated());
    assert!(report.targets.iter().all(|t| t.distance.is_none()));
}

#[test]
fn test_extreme_coordinates_stay_finite() {
    let points: Vec<Point2<f64>> = (0..40)
        .map(|i| {
            let angle = f64::from(i) * 0.3;
            Point2::new(1e8 + 1e6 * angle.cos(), -1e8 + 1e6 * angle.sin())
        })
        .collect();
    let circle = min_enclosing_circle(&points).unwrap();
    assert!(circle.radius.is_finite());
    assert!(circle.center.x.is_finite() && circle.center.y.is_finite());
    assert!((circle.radius - 1e6).abs() < 10.0);

    // Far off-screen positions saturate instead of wrapping.
    assert_eq!(to_pixel(circle.center.x), 1 << 24);
    assert_eq!(to_pixel(-1e300), -(1 << 24));
}

#[test]
fn test_empty_frames_are_harmless() {
    let mut session = TrackingSession::default();
    for _ in 0..10 {
        let report = session.tick(&[], WIDTH, HEIGHT);
        assert!(report.targets.is_empty());
        assert!(report.noses.is_empty());
    }
    assert_eq!(session.frames(), 10);
    assert_eq!(session.tracker().slot_count(), 0);
}

#[test]
fn test_invalid_game_transitions() {
    let mut engine = PongEngine::new(GameMode::TwoPlayer, Some(3));
    assert!(matches!(engine.toggle_pause(), Err(Error::GameTransition(_))));
    assert!(matches!(engine.start(false), Err(Error::GameTransition(_))));
    assert_eq!(engine.phase(), Phase::StartScreen);

    engine.start(true).unwrap();
    assert!(engine.start(true).is_err());
    assert_eq!(engine.toggle_pause().unwrap(), Phase::Paused);
    assert_eq!(engine.toggle_pause().unwrap(), Phase::Playing);
}

#[test]
fn test_lost_faces_freeze_paddles() {
    let mut engine = PongEngine::new(GameMode::TwoPlayer, Some(3));
    engine.start(true).unwrap();
    engine.update(PaddleInput {
        left: Some(0.2),
        right: Some(0.8),
    });
    let (left, right) = (engine.state().left_paddle_y, engine.state().right_paddle_y);

    for _ in 0..5 {
        engine.update(PaddleInput::default());
    }
    assert_eq!(engine.state().left_paddle_y, left);
    assert_eq!(engine.state().right_paddle_y, right);
}

#[test]
fn test_moving_average_rejects_zero_window() {
    assert!(matches!(
        MovingAverage::<f64>::try_new(0),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
#[should_panic(expected = "Window size must be greater than 0")]
fn test_moving_average_zero_window_panics() {
    let _ = MovingAverage::<Vector2<f64>>::new(0);
}

#[test]
fn test_safe_cast_errors() {
    assert!(u32_to_i32(u32::MAX).is_err());
    assert_eq!(u32_to_i32(640).unwrap(), 640);
    assert_eq!(f64_to_i32_clamp(f64::NAN, -5, 5), -5);
    assert_eq!(f64_to_i32_clamp(3e10, -5, 5), 5);
    assert_eq!(f64_to_i32_clamp(-12.9, -100, 100), -12);
}

#[test]
fn test_error_display_formatting() {
    let errors = vec![
        Error::InvalidInput("Test input".to_string()),
        Error::Provider("Test provider".to_string()),
        Error::FrameSource("Test source".to_string()),
        Error::AssignmentPolicy("Test policy".to_string()),
        Error::GameTransition("Test transition".to_string()),
        Error::Overlay("Test overlay".to_string()),
        Error::ConfigError("Test config".to_string()),
    ];

    for error in errors {
        let display = format!("{error}");
        assert!(display.contains("Test"), "{display}");
        assert!(!format!("{error:?}").is_empty());
    }
}

#[test]
fn test_concurrent_publishers() {
    let (publisher, receiver) = frame_handoff::<u32>();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let publisher = publisher.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    publisher.publish(t * 1000 + i);
                }
            })
        })
        .collect();
    drop(publisher);

    for handle in handles {
        handle.join().unwrap();
    }

    // Exactly one value survives; everything else was replaced.
    assert!(receiver.take().is_some());
    assert!(receiver.take().is_none());
    assert_eq!(receiver.dropped(), 399);
}
