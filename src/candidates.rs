//! Corner-occupying action (CCOA) generation.
//!
//! For every distinct placed extent of the unplaced sizes and every concave
//! corner, the rectangle anchored at the corner is built and kept when it fits.

use tracing::trace;

use crate::corners::{ConcaveCorner, concave_corners};
use crate::error::PlacementViolation;
use crate::geometry::{overlaps_with_tolerance, within_bounds};
use crate::inventory::SizeInventory;
use crate::model::{Rectangle, SizePair};
use crate::packing::EngineConfig;
use crate::types::Point;

/// Checks whether `rect` is a legal placement.
///
/// Bounds are checked first, then overlap against `placed` in order; the
/// first violation found is reported.
pub fn check_fit(
    rect: &Rectangle,
    size: &Point,
    placed: &[Rectangle],
    tolerance: f64,
) -> Result<(), PlacementViolation> {
    if !within_bounds(rect, size, tolerance) {
        return Err(PlacementViolation::OutOfBounds);
    }
    match placed
        .iter()
        .position(|p| overlaps_with_tolerance(rect, p, tolerance))
    {
        Some(index) => Err(PlacementViolation::Overlaps { index }),
        None => Ok(()),
    }
}

/// Shorthand for `check_fit(..).is_ok()`.
pub fn fits(rect: &Rectangle, size: &Point, placed: &[Rectangle], tolerance: f64) -> bool {
    check_fit(rect, size, placed, tolerance).is_ok()
}

/// Generates all legal CCOAs for the given corners.
///
/// Every placed extent is tried once per corner. Unrotated entries come first,
/// so a rotated pass whose extent an unrotated entry already covers is
/// skipped. Square sizes, and all sizes when rotation is disabled, are only
/// tried unrotated.
pub fn candidates_for_corners(
    corners: &[ConcaveCorner],
    size: &Point,
    placed: &[Rectangle],
    unplaced: &SizeInventory,
    config: &EngineConfig,
) -> Vec<Rectangle> {
    let tolerance = config.general_epsilon;
    let sizes = unplaced.distinct();

    let mut passes: Vec<(SizePair, bool)> =
        sizes.iter().map(|&item| (item, false)).collect();
    if config.allow_rotation {
        for &item in &sizes {
            if item.is_square(tolerance) {
                continue;
            }
            let turned = item.rotated();
            let covered = passes.iter().any(|&(other, other_rotated)| {
                let extent = if other_rotated { other.rotated() } else { other };
                extent.matches_exact((turned.width, turned.height), tolerance)
            });
            if !covered {
                passes.push((item, true));
            }
        }
    }

    let mut ccoas = Vec::new();
    for &(item, rotated) in &passes {
        for &(corner, orientation) in corners {
            let ccoa = Rectangle::anchored(corner, item.width, item.height, orientation, rotated);
            if fits(&ccoa, size, placed, tolerance) {
                ccoas.push(ccoa);
            }
        }
    }

    trace!(
        corners = corners.len(),
        passes = passes.len(),
        candidates = ccoas.len(),
        "generated corner-occupying actions"
    );
    ccoas
}

/// Detects the concave corners and generates all legal CCOAs from scratch.
pub fn generate_candidates(
    size: &Point,
    placed: &[Rectangle],
    unplaced: &SizeInventory,
    config: &EngineConfig,
) -> Vec<Rectangle> {
    let corners = concave_corners(size, placed, config.corner_epsilon);
    candidates_for_corners(&corners, size, placed, unplaced, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CornerOrientation;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rectangle {
        Rectangle::new(Point::new(x, y), w, h).unwrap()
    }

    fn inventory(dims: &[(f64, f64)]) -> SizeInventory {
        SizeInventory::from_dims(dims.iter().copied()).unwrap()
    }

    #[test]
    fn square_in_empty_container_yields_one_per_corner() {
        let size = Point::new(10.0, 10.0);
        let ccoas = generate_candidates(
            &size,
            &[],
            &inventory(&[(4.0, 4.0)]),
            &EngineConfig::default(),
        );

        assert_eq!(ccoas.len(), 4);
        let mut origins: Vec<(f64, f64)> = ccoas.iter().map(|r| r.origin.as_tuple()).collect();
        origins.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(origins, vec![(0.0, 0.0), (0.0, 6.0), (6.0, 0.0), (6.0, 6.0)]);
        assert!(ccoas.iter().all(|r| !r.rotated));
    }

    #[test]
    fn non_square_yields_both_rotations() {
        let size = Point::new(10.0, 10.0);
        let ccoas = generate_candidates(
            &size,
            &[],
            &inventory(&[(4.0, 2.0)]),
            &EngineConfig::default(),
        );

        assert_eq!(ccoas.len(), 8);
        assert_eq!(ccoas.iter().filter(|r| r.rotated).count(), 4);
    }

    #[test]
    fn rotation_can_be_disabled() {
        let size = Point::new(10.0, 10.0);
        let config = EngineConfig::builder().allow_rotation(false).build();
        let ccoas = generate_candidates(&size, &[], &inventory(&[(4.0, 2.0)]), &config);

        assert_eq!(ccoas.len(), 4);
        assert!(ccoas.iter().all(|r| r.dims() == (4.0, 2.0)));
    }

    #[test]
    fn duplicate_sizes_do_not_duplicate_candidates() {
        let size = Point::new(10.0, 10.0);
        let ccoas = generate_candidates(
            &size,
            &[],
            &inventory(&[(4.0, 4.0), (4.0, 4.0), (4.0, 4.0)]),
            &EngineConfig::default(),
        );
        assert_eq!(ccoas.len(), 4);
    }

    #[test]
    fn swapped_entries_share_their_extents() {
        let size = Point::new(10.0, 10.0);
        let ccoas = generate_candidates(
            &size,
            &[],
            &inventory(&[(2.0, 4.0), (4.0, 2.0)]),
            &EngineConfig::default(),
        );

        // both extents are covered unrotated, so no rotated copies appear
        assert_eq!(ccoas.len(), 8);
        assert!(ccoas.iter().all(|r| !r.rotated));
        for (i, a) in ccoas.iter().enumerate() {
            for b in &ccoas[i + 1..] {
                assert!(
                    a.origin != b.origin || a.dims() != b.dims() || a.orientation != b.orientation,
                    "duplicate candidate {:?}",
                    a
                );
            }
        }

        let config = EngineConfig::builder().allow_rotation(false).build();
        let ccoas = generate_candidates(
            &size,
            &[],
            &inventory(&[(2.0, 4.0), (4.0, 2.0)]),
            &config,
        );
        assert_eq!(ccoas.len(), 8);
    }

    #[test]
    fn oversized_items_produce_no_candidates() {
        let size = Point::new(10.0, 10.0);
        let ccoas = generate_candidates(
            &size,
            &[],
            &inventory(&[(11.0, 1.0)]),
            &EngineConfig::default(),
        );
        // rotated 1x11 does not fit either
        assert!(ccoas.is_empty());
    }

    #[test]
    fn candidates_blocked_by_placed_rectangles_are_rejected() {
        let size = Point::new(10.0, 4.0);
        let placed = [rect(0.0, 0.0, 4.0, 4.0)];
        let ccoas = generate_candidates(
            &size,
            &placed,
            &inventory(&[(7.0, 4.0)]),
            &EngineConfig::default(),
        );

        // 7 wide only fits from the right wall, and there it overlaps
        assert!(ccoas.is_empty());

        let ccoas = generate_candidates(
            &size,
            &placed,
            &inventory(&[(6.0, 4.0)]),
            &EngineConfig::default(),
        );
        // the gap is exactly 6x4, so all four of its corners anchor the same extent
        assert_eq!(ccoas.len(), 4);
        assert!(ccoas.iter().all(|r| r.origin == Point::new(4.0, 0.0)));
        let orientations: Vec<_> = ccoas.iter().map(|r| r.orientation).collect();
        for orientation in CornerOrientation::ALL {
            assert!(orientations.contains(&orientation));
        }
    }

    #[test]
    fn check_fit_reports_first_violation() {
        let size = Point::new(10.0, 10.0);
        let placed = [rect(0.0, 0.0, 2.0, 2.0), rect(5.0, 5.0, 2.0, 2.0)];

        assert_eq!(
            check_fit(&rect(9.0, 0.0, 2.0, 2.0), &size, &placed, 1e-9),
            Err(PlacementViolation::OutOfBounds)
        );
        assert_eq!(
            check_fit(&rect(4.0, 4.0, 2.0, 2.0), &size, &placed, 1e-9),
            Err(PlacementViolation::Overlaps { index: 1 })
        );
        assert_eq!(check_fit(&rect(2.0, 0.0, 3.0, 5.0), &size, &placed, 1e-9), Ok(()));
    }
}
