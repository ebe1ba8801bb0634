//! Data models for the rectangle packing engine.
//!
//! This module defines the fundamental data structures for 2D corner packing:
//! - `CornerOrientation`: Which diagonal quadrant at a corner is still free
//! - `Rectangle`: An axis-aligned rectangle anchored at a corner
//! - `SizePair`: A (width, height) pair still waiting to be placed

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::geometry;
use crate::types::{Point, validation};

/// Validation error for rectangle and size data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

fn validate_extent(dims: (f64, f64)) -> Result<(), ValidationError> {
    validation::validate_dimensions_2d(dims).map_err(ValidationError::InvalidDimension)
}

/// Direction of the free quadrant at a concave corner.
///
/// A new rectangle anchored at the corner extends into this quadrant.
/// The discriminants follow the probe order used by corner detection:
/// `(+,+)`, `(-,+)`, `(+,-)`, `(-,-)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CornerOrientation {
    TopRight = 0,
    TopLeft = 1,
    BottomRight = 2,
    BottomLeft = 3,
}

impl CornerOrientation {
    /// All orientations in probe order.
    pub const ALL: [CornerOrientation; 4] = [
        CornerOrientation::TopRight,
        CornerOrientation::TopLeft,
        CornerOrientation::BottomRight,
        CornerOrientation::BottomLeft,
    ];

    /// Maps a probe index back to its orientation.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Unit direction `(dx, dy)` of the free quadrant.
    pub const fn direction(self) -> (f64, f64) {
        match self {
            CornerOrientation::TopRight => (1.0, 1.0),
            CornerOrientation::TopLeft => (-1.0, 1.0),
            CornerOrientation::BottomRight => (1.0, -1.0),
            CornerOrientation::BottomLeft => (-1.0, -1.0),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CornerOrientation::TopRight => "top_right",
            CornerOrientation::TopLeft => "top_left",
            CornerOrientation::BottomRight => "bottom_right",
            CornerOrientation::BottomLeft => "bottom_left",
        }
    }
}

impl std::fmt::Display for CornerOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// An axis-aligned rectangle in the container.
///
/// # Fields
/// * `origin` - Bottom-left corner
/// * `width` - Extent along X as placed (after rotation)
/// * `height` - Extent along Y as placed (after rotation)
/// * `orientation` - Orientation of the corner it was anchored on
/// * `rotated` - Whether the nominal width and height were swapped
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "origin": [0.0, 0.0],
    "width": 4.0,
    "height": 2.0,
    "orientation": "top_right",
    "rotated": false
}))]
pub struct Rectangle {
    #[schema(value_type = [f64; 2])]
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_orientation")]
    pub orientation: CornerOrientation,
    #[serde(default)]
    pub rotated: bool,
}

fn default_orientation() -> CornerOrientation {
    CornerOrientation::TopRight
}

impl Rectangle {
    /// Creates a rectangle from its bottom-left corner with validation.
    ///
    /// The rectangle is treated as anchored on its own origin, extending to the top right.
    ///
    /// # Examples
    /// ```
    /// use corner_pack::model::Rectangle;
    /// use corner_pack::types::Point;
    ///
    /// assert!(Rectangle::new(Point::zero(), 4.0, 2.0).is_ok());
    /// assert!(Rectangle::new(Point::zero(), -4.0, 2.0).is_err());
    /// ```
    pub fn new(origin: Point, width: f64, height: f64) -> Result<Self, ValidationError> {
        let rect = Self {
            origin,
            width,
            height,
            orientation: CornerOrientation::TopRight,
            rotated: false,
        };
        rect.validate()?;
        Ok(rect)
    }

    /// Builds the rectangle anchored at `corner` that extends into the free
    /// quadrant given by `orientation`.
    ///
    /// With `rotated` set, the nominal `width` and `height` are swapped before anchoring.
    pub fn anchored(
        corner: Point,
        width: f64,
        height: f64,
        orientation: CornerOrientation,
        rotated: bool,
    ) -> Self {
        let (w, h) = if rotated { (height, width) } else { (width, height) };
        let origin = match orientation {
            CornerOrientation::TopRight => corner,
            CornerOrientation::TopLeft => Point::new(corner.x - w, corner.y),
            CornerOrientation::BottomRight => Point::new(corner.x, corner.y - h),
            CornerOrientation::BottomLeft => Point::new(corner.x - w, corner.y - h),
        };
        Self {
            origin,
            width: w,
            height: h,
            orientation,
            rotated,
        }
    }

    /// Checks the rectangle for positive, finite extents and a finite origin.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_extent((self.width, self.height))?;
        validation::validate_coordinate(self.origin.x, "Origin x")
            .and_then(|_| validation::validate_coordinate(self.origin.y, "Origin y"))
            .map_err(ValidationError::InvalidCoordinate)
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.origin.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.origin.y
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.origin.y + self.height
    }

    #[inline]
    pub fn bottom_left(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        Point::new(self.left(), self.top())
    }

    #[inline]
    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    /// Returns the four corner points: bottom-left, bottom-right, top-left, top-right.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.bottom_left(),
            self.bottom_right(),
            self.top_left(),
            self.top_right(),
        ]
    }

    /// Returns the corner point this rectangle was anchored on.
    ///
    /// It is the corner opposite to the direction the rectangle extends into.
    pub fn anchor(&self) -> Point {
        match self.orientation {
            CornerOrientation::TopRight => self.bottom_left(),
            CornerOrientation::TopLeft => self.bottom_right(),
            CornerOrientation::BottomRight => self.top_left(),
            CornerOrientation::BottomLeft => self.top_right(),
        }
    }

    /// Extent as placed, `(width, height)`.
    #[inline]
    pub fn dims(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        geometry::area(self)
    }

    /// Checks if a point lies within the closed extent of this rectangle.
    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        geometry::contains(self, point)
    }

    /// Checks if two rectangles share a region of positive area.
    #[inline]
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        geometry::overlaps(self, other)
    }
}

/// A rectangle size that still has to be placed.
///
/// Matching against a placed rectangle is orientation-insensitive, but only
/// through the explicit `matches_exact` and `matches_rotated` checks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "(f64, f64)")]
pub struct SizePair {
    pub width: f64,
    pub height: f64,
}

impl SizePair {
    /// Creates a new size pair with validation.
    pub fn new(width: f64, height: f64) -> Result<Self, ValidationError> {
        validate_extent((width, height))?;
        Ok(Self { width, height })
    }

    /// A square size looks the same in both rotations.
    pub fn is_square(&self, tolerance: f64) -> bool {
        (self.width - self.height).abs() <= tolerance
    }

    /// The size with width and height swapped.
    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Checks if `dims` equals `(width, height)` within the tolerance.
    pub fn matches_exact(&self, dims: (f64, f64), tolerance: f64) -> bool {
        (self.width - dims.0).abs() <= tolerance && (self.height - dims.1).abs() <= tolerance
    }

    /// Checks if `dims` equals `(height, width)` within the tolerance.
    pub fn matches_rotated(&self, dims: (f64, f64), tolerance: f64) -> bool {
        self.rotated().matches_exact(dims, tolerance)
    }
}

impl From<SizePair> for (f64, f64) {
    fn from(size: SizePair) -> Self {
        (size.width, size.height)
    }
}
