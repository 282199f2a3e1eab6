//! Temporal smoothing for per-target signals.
//!
//! A single primitive is used everywhere: a fixed-capacity moving average.
//! Positions and scalar signals (radius, distance, control input) share it
//! through the [`Sample`] trait.

/// Moving average filter over a bounded FIFO window
pub mod moving_average;

pub use moving_average::MovingAverage;

use nalgebra::Vector2;

/// A value that can be summed and divided for averaging
pub trait Sample: Copy {
    /// Additive identity
    fn zero() -> Self;

    /// Component-wise sum
    fn add(self, other: Self) -> Self;

    /// Divide every component by `divisor`
    fn div_by(self, divisor: f64) -> Self;
}

impl Sample for f64 {
    fn zero() -> Self {
        0.0
    }

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn div_by(self, divisor: f64) -> Self {
        self / divisor
    }
}

impl Sample for Vector2<f64> {
    fn zero() -> Self {
        Self::zeros()
    }

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn div_by(self, divisor: f64) -> Self {
        self / divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_sample() {
        assert_eq!(<f64 as Sample>::zero(), 0.0);
        assert_eq!(<f64 as Sample>::add(2.0, 3.0), 5.0);
        assert_eq!(<f64 as Sample>::div_by(4.0, 2.0), 2.0);
    }

    #[test]
    fn test_vector_sample() {
        let a: Vector2<f64> = Vector2::new(1.0, 2.0);
        let b: Vector2<f64> = Vector2::new(3.0, 4.0);
        assert_eq!(Sample::add(a, b), Vector2::new(4.0, 6.0));
        assert_eq!(Sample::div_by(b, 2.0), Vector2::new(1.5, 2.0));
        assert_eq!(<Vector2<f64> as Sample>::zero(), Vector2::zeros());
    }
}
