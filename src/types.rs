//! Common types for 2D packing geometry.
//!
//! This module defines the point type shared by every layer of the engine,
//! the numerical tolerances and the validation helpers for raw dimensions.

use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Offset used when probing the four diagonal neighbourhoods of a corner.
///
/// Must be smaller than the smallest meaningful feature in the container.
pub const EPSILON_CORNER: f64 = 1e-3;

/// Tolerance for bounds and overlap comparisons.
///
/// Absorbs floating-point noise when rectangles abut exactly.
pub const EPSILON_GENERAL: f64 = 1e-9;

/// Represents a 2D point or extent.
///
/// Equality and hashing are value based, so points can be collected into
/// sets. `-0.0` and `0.0` compare and hash the same.
///
/// # Examples
/// ```
/// use corner_pack::types::Point;
///
/// let origin = Point::new(0.0, 0.0);
/// let corner = origin + Point::new(4.0, 3.0);
/// assert_eq!(corner, Point::new(4.0, 3.0));
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Converts to tuple format for API compatibility.
    #[inline]
    pub const fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Product of both components, useful when the point is an extent.
    #[inline]
    pub fn area(&self) -> f64 {
        self.x * self.y
    }

    /// Offsets the point by `(dx, dy)`.
    #[inline]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Checks if both components are positive and finite.
    #[inline]
    pub fn is_valid_dimension(&self) -> bool {
        self.x > 0.0 && self.y > 0.0 && self.x.is_finite() && self.y.is_finite()
    }

    fn key(&self) -> (u64, u64) {
        // 0.0 == -0.0 but their bit patterns differ
        (normalize_zero(self.x).to_bits(), normalize_zero(self.y).to_bits())
    }
}

#[inline]
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from(tuple: (f64, f64)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<Point> for (f64, f64) {
    #[inline]
    fn from(point: Point) -> Self {
        point.as_tuple()
    }
}

/// Validation functions for raw dimensions.
pub mod validation {

    /// Validates a single dimension.
    ///
    /// # Parameters
    /// * `value` - The value to validate
    /// * `name` - Name of the dimension for error messages
    ///
    /// # Returns
    /// `Ok(())` for valid values, otherwise error text
    pub fn validate_dimension(value: f64, name: &str) -> Result<(), String> {
        if value.is_nan() {
            return Err(format!("{} must not be NaN", name));
        }
        if value <= 0.0 {
            return Err(format!("{} must be positive, got: {}", name, value));
        }
        if value.is_infinite() {
            return Err(format!("{} must not be infinite", name));
        }
        Ok(())
    }

    /// Validates both dimensions of a 2D extent.
    pub fn validate_dimensions_2d(dims: (f64, f64)) -> Result<(), String> {
        validate_dimension(dims.0, "Width")?;
        validate_dimension(dims.1, "Height")?;
        Ok(())
    }

    /// Validates a coordinate, which may be zero or negative but must be finite.
    pub fn validate_coordinate(value: f64, name: &str) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("{} must be finite, got: {}", name, value));
        }
        Ok(())
    }
}
