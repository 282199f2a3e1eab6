//! Mapping detected faces to players.
//!
//! Every function here works on normalized nose-tip positions (one per
//! detected face, in provider order), so frame size does not matter.

use super::physics::{GameMode, PaddleInput};
use crate::constants::{LEFT_PLAYER_ZONE, RIGHT_PLAYER_ZONE};
use nalgebra::Point2;

/// Readiness of each player slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    /// Left player in position (always `true` against the AI)
    pub left: bool,
    /// Right player in position
    pub right: bool,
}

impl Readiness {
    /// Whether the game may start
    pub const fn all(&self) -> bool {
        self.left && self.right
    }
}

/// Noses ordered left to right
fn sorted_by_x(noses: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut sorted = noses.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
    sorted
}

/// Which players are in position this frame
pub fn readiness(mode: GameMode, noses: &[Point2<f64>]) -> Readiness {
    match mode {
        GameMode::SinglePlayer => Readiness {
            left: true,
            right: !noses.is_empty(),
        },
        GameMode::TwoPlayer => {
            if noses.len() < 2 {
                return Readiness::default();
            }
            let sorted = sorted_by_x(noses);
            Readiness {
                left: sorted[0].x < LEFT_PLAYER_ZONE,
                right: sorted[1].x > RIGHT_PLAYER_ZONE,
            }
        }
    }
}

/// Control samples for this tick
///
/// Single-player follows the first detected face. Two-player needs at least
/// two faces; the leftmost drives the left paddle and the next one the right.
pub fn paddle_input(mode: GameMode, noses: &[Point2<f64>]) -> PaddleInput {
    match mode {
        GameMode::SinglePlayer => PaddleInput {
            left: None,
            right: noses.first().map(|nose| nose.y),
        },
        GameMode::TwoPlayer => {
            if noses.len() < 2 {
                return PaddleInput::default();
            }
            let sorted = sorted_by_x(noses);
            PaddleInput {
                left: Some(sorted[0].y),
                right: Some(sorted[1].y),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_player_readiness() {
        assert!(!readiness(GameMode::SinglePlayer, &[]).all());
        assert!(readiness(GameMode::SinglePlayer, &[Point2::new(0.5, 0.5)]).all());
    }

    #[test]
    fn test_two_player_readiness_needs_both_halves() {
        let both = [Point2::new(0.8, 0.5), Point2::new(0.2, 0.4)];
        assert!(readiness(GameMode::TwoPlayer, &both).all());

        let crowded = [Point2::new(0.45, 0.5), Point2::new(0.7, 0.5)];
        let status = readiness(GameMode::TwoPlayer, &crowded);
        assert!(!status.left);
        assert!(status.right);

        assert_eq!(readiness(GameMode::TwoPlayer, &[Point2::new(0.1, 0.5)]), Readiness::default());
    }

    #[test]
    fn test_two_player_input_sorted_by_x() {
        let noses = [Point2::new(0.9, 0.7), Point2::new(0.1, 0.2)];
        let input = paddle_input(GameMode::TwoPlayer, &noses);
        assert_eq!(input.left, Some(0.2));
        assert_eq!(input.right, Some(0.7));
        assert_eq!(paddle_input(GameMode::TwoPlayer, &noses[..1]), PaddleInput::default());
    }

    #[test]
    fn test_single_player_follows_first_face() {
        let noses = [Point2::new(0.9, 0.7), Point2::new(0.1, 0.2)];
        let input = paddle_input(GameMode::SinglePlayer, &noses);
        assert_eq!(input.left, None);
        assert_eq!(input.right, Some(0.7));
    }
}
