//! Concave corner detection.
//!
//! Candidate points are the container corners plus the corners of every placed
//! rectangle. Each point is probed at four diagonal offsets; a point whose
//! neighbourhood has exactly one free probe is a concave corner, and the free
//! probe gives the direction a new rectangle must extend into.
//!
//! Everything here is a pure function over `(size, placed)`.

use std::collections::HashSet;

use crate::geometry::outside_container;
use crate::model::{CornerOrientation, Rectangle};
use crate::types::Point;

/// A usable anchor point together with the direction of its free quadrant.
pub type ConcaveCorner = (Point, CornerOrientation);

/// Collects the container corners and all placed-rectangle corners.
///
/// Duplicates from abutting rectangles collapse by exact value equality;
/// the first occurrence determines the order.
pub fn all_corner_points(size: &Point, placed: &[Rectangle]) -> Vec<Point> {
    let container = [
        Point::zero(),
        Point::new(0.0, size.y),
        Point::new(size.x, 0.0),
        *size,
    ];

    let mut seen = HashSet::with_capacity(4 + placed.len() * 4);
    container
        .into_iter()
        .chain(placed.iter().flat_map(Rectangle::corners))
        .filter(|p| seen.insert(*p))
        .collect()
}

/// Checks if a point is on/outside the container boundary or inside any placed rectangle.
pub fn is_occupied(point: &Point, size: &Point, placed: &[Rectangle]) -> bool {
    outside_container(point, size) || placed.iter().any(|r| r.contains(point))
}

/// Probes the four diagonal neighbours of `point` at distance `epsilon`.
///
/// The result is in `CornerOrientation` order: `(+,+)`, `(-,+)`, `(+,-)`, `(-,-)`.
/// `true` means occupied.
pub fn probe_occupancy(
    point: &Point,
    size: &Point,
    placed: &[Rectangle],
    epsilon: f64,
) -> [bool; 4] {
    CornerOrientation::ALL.map(|orientation| {
        let (dx, dy) = orientation.direction();
        is_occupied(&point.offset(dx * epsilon, dy * epsilon), size, placed)
    })
}

/// Classifies a probe pattern.
///
/// Returns the orientation of the single free probe when exactly three are occupied.
pub fn orientation_from_probes(probes: [bool; 4]) -> Option<CornerOrientation> {
    let occupied = probes.iter().filter(|&&p| p).count();
    if occupied != 3 {
        return None;
    }
    probes
        .iter()
        .position(|&p| !p)
        .and_then(CornerOrientation::from_index)
}

/// Classifies a single point.
pub fn corner_orientation(
    point: &Point,
    size: &Point,
    placed: &[Rectangle],
    epsilon: f64,
) -> Option<CornerOrientation> {
    orientation_from_probes(probe_occupancy(point, size, placed, epsilon))
}

/// Finds every concave corner of the configuration.
///
/// Each point appears at most once in the result.
pub fn concave_corners(size: &Point, placed: &[Rectangle], epsilon: f64) -> Vec<ConcaveCorner> {
    all_corner_points(size, placed)
        .into_iter()
        .filter_map(|p| corner_orientation(&p, size, placed, epsilon).map(|o| (p, o)))
        .collect()
}
