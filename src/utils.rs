//! Utility functions for coordinate transformations.

pub mod safe_cast;

use nalgebra::Point2;
use safe_cast::to_pixel;

/// Pixel position of a float point
#[must_use]
pub fn pixel_point(point: &Point2<f64>) -> (i32, i32) {
    (to_pixel(point.x), to_pixel(point.y))
}

/// Map a normalized `[0, 1]` point onto a frame of the given size
#[must_use]
pub fn denormalize(point: &Point2<f64>, width: f64, height: f64) -> Point2<f64> {
    Point2::new(point.x * width, point.y * height)
}
