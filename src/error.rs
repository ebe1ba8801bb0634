//! Error types reported by the packing engine.

use thiserror::Error;

use crate::model::ValidationError;

/// Why a rectangle is not a legal placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementViolation {
    /// At least one edge lies outside the container.
    OutOfBounds,
    /// The rectangle overlaps the placed rectangle at this index.
    Overlaps { index: usize },
    /// The rectangle is not anchored at a concave corner with its orientation.
    NotAtConcaveCorner,
}

impl std::fmt::Display for PlacementViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementViolation::OutOfBounds => write!(f, "rectangle exceeds the container bounds"),
            PlacementViolation::Overlaps { index } => {
                write!(f, "rectangle overlaps placed rectangle #{}", index)
            }
            PlacementViolation::NotAtConcaveCorner => {
                write!(f, "rectangle is not a candidate at any concave corner")
            }
        }
    }
}

/// Errors of the packing engine.
///
/// Every error leaves the configuration untouched.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PackingError {
    #[error("Illegal placement: {violation}")]
    IllegalPlacement { violation: PlacementViolation },

    #[error("Unknown size: no unplaced entry matches {width} x {height}")]
    UnknownSize { width: f64, height: f64 },

    #[error("Degenerate container: {width} x {height} has no positive area")]
    DegenerateContainer { width: f64, height: f64 },

    #[error("Invalid pre-seeded rectangle #{index}: {violation}")]
    InvalidSeed {
        index: usize,
        violation: PlacementViolation,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PackingError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            PackingError::IllegalPlacement { .. } => "illegal_placement",
            PackingError::UnknownSize { .. } => "unknown_size",
            PackingError::DegenerateContainer { .. } => "degenerate_container",
            PackingError::InvalidSeed { .. } => "invalid_seed",
            PackingError::Validation(_) => "invalid_input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_and_codes() {
        let err = PackingError::IllegalPlacement {
            violation: PlacementViolation::Overlaps { index: 2 },
        };
        assert_eq!(err.code(), "illegal_placement");
        assert_eq!(
            err.to_string(),
            "Illegal placement: rectangle overlaps placed rectangle #2"
        );

        let err = PackingError::DegenerateContainer {
            width: 0.0,
            height: 5.0,
        };
        assert_eq!(err.code(), "degenerate_container");

        let err: PackingError = ValidationError::InvalidDimension("Width".into()).into();
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.to_string(), "Invalid dimension: Width");
    }
}
