//! Corner-occupying action engine for 2D rectangle packing.
//!
//! Given a container, the rectangles placed so far and the sizes still to
//! place, the engine finds the concave corners of the current layout,
//! generates every legal placement anchored at one of them and keeps the
//! packing state consistent as placements are committed.
//!
//! Choosing which candidate to commit is left to the caller.

pub mod api;
pub mod candidates;
pub mod config;
pub mod corners;
pub mod error;
pub mod geometry;
pub mod inventory;
pub mod model;
pub mod packing;
pub mod types;

pub use error::{PackingError, PlacementViolation};
pub use model::{CornerOrientation, Rectangle, SizePair};
pub use packing::{Configuration, EngineConfig};
pub use types::Point;
