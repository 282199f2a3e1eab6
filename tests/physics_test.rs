//! Tests for the Pong physics engine


use head_tracker::game::{
    paddle_input, readiness, GameMode, PaddleInput, Phase, PongEngine, Side,
};
use nalgebra::{Point2, Vector2};
use proptest::prelude::*;
use test_helpers::assert_close;

fn playing(mode: GameMode, seed: u64) -> PongEngine {
    let mut engine = PongEngine::new(mode, Some(seed));
    engine.start(true).unwrap();
    engine
}

fn place(engine: &mut PongEngine, position: (f64, f64), velocity: (f64, f64)) {
    let state = engine.state_mut();
    state.ball_position = Point2::new(position.0, position.1);
    state.ball_velocity = Vector2::new(velocity.0, velocity.1);
}

#[test]
fn test_center_hit_on_right_paddle() {
    let mut engine = playing(GameMode::TwoPlayer, 1);
    place(&mut engine, (970.0, 300.0), (7.0, 0.0));

    let events = engine.update(PaddleInput::default());

    assert_eq!(events.paddle_hit, Some(Side::Right));
    assert_close(engine.state().ball_velocity.x, -7.35, 1e-9);
    assert_close(engine.state().ball_velocity.y, 0.0, 1e-12);
}

#[test]
fn test_top_edge_hit_deflects_upward() {
    let mut engine = playing(GameMode::TwoPlayer, 1);
    // After one step the ball sits exactly 45px above the paddle center.
    place(&mut engine, (970.0, 255.0), (7.0, 0.0));

    engine.update(PaddleInput::default());

    assert_close(engine.state().ball_velocity.y, -2.0, 1e-9);
    assert!(engine.state().ball_velocity.x < 0.0);
}

#[test]
fn test_left_paddle_returns_ball() {
    let mut engine = playing(GameMode::TwoPlayer, 1);
    place(&mut engine, (35.0, 320.0), (-6.0, 1.0));

    let events = engine.update(PaddleInput::default());

    // Ball at (29, 321): 321 - 300 = 21 below center.
    assert_eq!(events.paddle_hit, Some(Side::Left));
    assert_close(engine.state().ball_velocity.x, 6.3, 1e-9);
    assert_close(engine.state().ball_velocity.y, 1.0 + 21.0 / 45.0 * 2.0, 1e-9);
}

#[test]
fn test_ball_outside_band_is_missed() {
    let mut engine = playing(GameMode::TwoPlayer, 1);
    place(&mut engine, (970.0, 400.0), (7.0, 0.0));

    let events = engine.update(PaddleInput::default());

    assert!(events.paddle_hit.is_none());
    assert_close(engine.state().ball_velocity.x, 7.0, 1e-12);
}

#[test]
fn test_exit_right_scores_for_left() {
    let mut engine = playing(GameMode::TwoPlayer, 5);
    engine.state_mut().right_paddle_y = 100.0;
    place(&mut engine, (998.0, 300.0), (7.0, 0.0));

    let events = engine.update(PaddleInput::default());

    assert_eq!(events.scored, Some(Side::Left));
    assert_eq!(engine.state().left_score, 1);
    assert_eq!(engine.state().right_score, 0);
    assert_eq!(engine.state().ball_position, Point2::new(500.0, 300.0));
    // Serve travels toward the side that conceded.
    assert!(engine.state().ball_velocity.x > 0.0);
    assert_close(engine.state().ball_velocity.norm(), 7.0, 1e-9);
}

#[test]
fn test_exit_left_scores_for_right() {
    let mut engine = playing(GameMode::TwoPlayer, 5);
    engine.state_mut().left_paddle_y = 550.0;
    place(&mut engine, (3.0, 300.0), (-7.0, 0.0));

    let events = engine.update(PaddleInput::default());

    assert_eq!(events.scored, Some(Side::Right));
    assert_eq!(engine.state().right_score, 1);
    assert!(engine.state().ball_velocity.x < 0.0);
}

#[test]
fn test_serve_angle_within_spread() {
    let mut engine = PongEngine::new(GameMode::SinglePlayer, Some(11));
    for _ in 0..200 {
        engine.serve(Some(Side::Right));
        let v = engine.state().ball_velocity;
        let angle = v.y.atan2(v.x);
        assert!(angle.abs() <= 0.5 + 1e-12);
        assert_eq!(engine.state().ball_position, Point2::new(400.0, 300.0));
    }
}

#[test]
fn test_wall_bounce_then_speed_cap() {
    let mut engine = playing(GameMode::TwoPlayer, 1);
    place(&mut engine, (500.0, 590.0), (0.0, 13.9));

    let events = engine.update(PaddleInput::default());

    assert!(events.wall_bounce);
    // 13.9 * 1.02 exceeds the cap of 14 and is rescaled onto it.
    assert_close(engine.state().ball_velocity.y, -14.0, 1e-9);
}

#[test]
fn test_paused_update_is_noop() {
    let mut engine = playing(GameMode::SinglePlayer, 9);
    engine.update(PaddleInput { left: None, right: Some(0.2) });
    engine.toggle_pause().unwrap();
    let frozen = engine.state().clone();

    for _ in 0..10 {
        let events = engine.update(PaddleInput { left: None, right: Some(0.9) });
        assert_eq!(events, Default::default());
    }
    assert_eq!(engine.state(), &frozen);
    assert_eq!(engine.phase(), Phase::Paused);
}

#[test]
fn test_head_control_moves_right_paddle() {
    let mut engine = playing(GameMode::SinglePlayer, 2);
    place(&mut engine, (400.0, 300.0), (0.0, 0.0));
    engine.update(PaddleInput { left: None, right: Some(0.25) });
    // Target 150 from 300: 300 - 150 * 1.8 * 0.1
    assert_close(engine.state().right_paddle_y, 273.0, 1e-9);
}

#[test]
fn test_two_player_faces_drive_paddles_by_side() {
    let mut engine = playing(GameMode::TwoPlayer, 2);
    place(&mut engine, (500.0, 300.0), (0.0, 0.0));
    let noses = [Point2::new(0.85, 0.5), Point2::new(0.15, 0.0)];
    assert!(readiness(GameMode::TwoPlayer, &noses).all());

    engine.update(paddle_input(GameMode::TwoPlayer, &noses));

    assert_close(engine.state().left_paddle_y, 300.0 - 300.0 * 0.18, 1e-9);
    assert_close(engine.state().right_paddle_y, 300.0, 1e-9);
}

#[test]
fn test_same_seed_same_rally() {
    let mut a = playing(GameMode::SinglePlayer, 77);
    let mut b = playing(GameMode::SinglePlayer, 77);
    for tick in 0..2000 {
        let input = PaddleInput {
            left: None,
            right: Some(0.5 + 0.4 * (f64::from(tick) * 0.05).sin()),
        };
        assert_eq!(a.update(input), b.update(input));
    }
    assert_eq!(a.state(), b.state());
}

proptest! {
    #[test]
    fn prop_speed_never_exceeds_cap(
        vx in -40.0f64..40.0,
        vy in -40.0f64..40.0,
        y in 20.0f64..580.0,
        paddle in 0.0f64..600.0,
    ) {
        let mut engine = playing(GameMode::TwoPlayer, 3);
        engine.state_mut().right_paddle_y = paddle;
        engine.state_mut().left_paddle_y = paddle;
        place(&mut engine, (500.0, y), (vx, vy));
        engine.update(PaddleInput::default());
        let speed = engine.state().ball_velocity.norm();
        prop_assert!(speed <= 14.0 + 1e-9);
    }

    #[test]
    fn prop_fast_ball_is_rescaled_exactly(
        speed in 14.5f64..40.0,
        angle in 0.0f64..std::f64::consts::TAU,
    ) {
        let mut engine = playing(GameMode::TwoPlayer, 3);
        // Mid-field: no wall, paddle or goal within one step.
        place(&mut engine, (500.0, 300.0), (speed * angle.cos(), speed * angle.sin()));
        engine.update(PaddleInput::default());
        prop_assert!((engine.state().ball_velocity.norm() - 14.0).abs() < 1e-9);
    }
}
