//! Head geometry extraction from a face landmark set.
//!
//! Reduces one face to the values the tracker and games consume:
//! an enclosing head circle in pixels, a 3D target point approximating the
//! center of the skull, and the normalized nose-tip position used as a
//! control signal.

use crate::{
    constants::{landmark_ids, EPSILON, HEAD_RADIUS_INFLATION},
    landmarks::FaceLandmarks,
    utils::denormalize,
};
use nalgebra::{Point2, Point3};

/// A circle in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center in pixels
    pub center: Point2<f64>,
    /// Radius in pixels
    pub radius: f64,
}

impl Circle {
    fn contains(&self, p: &Point2<f64>) -> bool {
        // Relative tolerance keeps large pixel coordinates stable.
        nalgebra::distance(&self.center, p) <= self.radius * (1.0 + 1e-9) + EPSILON
    }

    fn from_two(a: &Point2<f64>, b: &Point2<f64>) -> Self {
        let center = nalgebra::center(a, b);
        Self {
            center,
            radius: nalgebra::distance(&center, a),
        }
    }

    fn from_three(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Self {
        let (bx, by) = (b.x - a.x, b.y - a.y);
        let (cx, cy) = (c.x - a.x, c.y - a.y);
        let d = 2.0 * (bx * cy - by * cx);

        if d.abs() < EPSILON {
            // Collinear: the widest pair spans the other point.
            return [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)]
                .into_iter()
                .fold(Self::from_two(a, b), |best, cand| if cand.radius > best.radius { cand } else { best });
        }

        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        let center = Point2::new(a.x + ux, a.y + uy);
        Self {
            center,
            radius: nalgebra::distance(&center, a),
        }
    }
}

/// Smallest circle enclosing every point, `None` for an empty set
///
/// Incremental Welzl construction; exact for the input up to floating point.
pub fn min_enclosing_circle(points: &[Point2<f64>]) -> Option<Circle> {
    let first = points.first()?;
    let mut circle = Circle {
        center: *first,
        radius: 0.0,
    };

    for i in 1..points.len() {
        if circle.contains(&points[i]) {
            continue;
        }
        circle = Circle {
            center: points[i],
            radius: 0.0,
        };
        for j in 0..i {
            if circle.contains(&points[j]) {
                continue;
            }
            circle = Circle::from_two(&points[i], &points[j]);
            for k in 0..j {
                if !circle.contains(&points[k]) {
                    circle = Circle::from_three(&points[i], &points[j], &points[k]);
                }
            }
        }
    }

    Some(circle)
}

/// Geometry of one face in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadGeometry {
    /// Head circle center in pixels
    pub center: Point2<f64>,
    /// Inflated head circle radius in pixels
    pub radius: f64,
    /// Skull-center approximation; z is scaled by frame width
    pub target_point: Point3<f64>,
    /// Nose tip in normalized frame coordinates
    pub control_point: Point2<f64>,
}

/// Project the head outline of `face` to pixel coordinates
///
/// Returns `None` if any outline landmark is missing.
pub fn outline_points(face: &FaceLandmarks, width: f64, height: f64) -> Option<Vec<Point2<f64>>> {
    landmark_ids::HEAD_OUTLINE
        .iter()
        .map(|&id| face.get(id).map(|l| denormalize(&Point2::new(l.x, l.y), width, height)))
        .collect()
}

/// Approximate skull center from both ears and the top of the head
pub fn target_point(face: &FaceLandmarks, width: f64, height: f64) -> Option<Point3<f64>> {
    let left = face.get(landmark_ids::LEFT_EAR)?;
    let right = face.get(landmark_ids::RIGHT_EAR)?;
    let top = face.get(landmark_ids::TOP_OF_HEAD)?;

    let x = (left.x + right.x) / 2.0;
    let y = (left.y + right.y + top.y) / 3.0;
    let z = (left.z + right.z) / 2.0;

    Some(Point3::new(x * width, y * height, z * width))
}

/// Normalized nose-tip position used as the paddle control signal
pub fn control_point(face: &FaceLandmarks) -> Option<Point2<f64>> {
    face.get(landmark_ids::NOSE_TIP).map(|l| Point2::new(l.x, l.y))
}

/// Reduce a face to its [`HeadGeometry`]
///
/// Returns `None` when a required landmark is missing; callers skip the face
/// for this frame.
pub fn extract(face: &FaceLandmarks, width: u32, height: u32) -> Option<HeadGeometry> {
    let (w, h) = (f64::from(width), f64::from(height));
    let outline = outline_points(face, w, h)?;
    let circle = min_enclosing_circle(&outline)?;

    Some(HeadGeometry {
        center: circle.center,
        radius: circle.radius * HEAD_RADIUS_INFLATION,
        target_point: target_point(face, w, h)?,
        control_point: control_point(face)?,
    })
}
