//! Packing state and its transitions.
//!
//! `Configuration` owns the container size, the placed rectangles, the unplaced
//! inventory and the current candidate list. It is mutated only through
//! [`Configuration::place`], which re-validates the rectangle, consumes one
//! matching inventory entry and regenerates the candidates from scratch.

use serde::Serialize;
use tracing::{debug, warn};

use crate::candidates::{check_fit, generate_candidates};
use crate::corners::{ConcaveCorner, concave_corners};
use crate::error::{PackingError, PlacementViolation};
use crate::inventory::{SizeInventory, SizeMatch};
use crate::model::{CornerOrientation, Rectangle, SizePair};
use crate::types::{EPSILON_CORNER, EPSILON_GENERAL, Point};

/// Configuration of the candidate engine.
///
/// Holds the tolerances that control corner detection and legality checks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Offset of the diagonal probes around a corner point
    pub corner_epsilon: f64,
    /// Tolerance for bounds, overlap and size matching
    pub general_epsilon: f64,
    /// Whether rotated candidates are generated
    pub allow_rotation: bool,
}

impl EngineConfig {
    pub const DEFAULT_CORNER_EPSILON: f64 = EPSILON_CORNER;
    pub const DEFAULT_GENERAL_EPSILON: f64 = EPSILON_GENERAL;
    pub const DEFAULT_ALLOW_ROTATION: bool = true;

    /// Creates a builder for a custom configuration.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            corner_epsilon: Self::DEFAULT_CORNER_EPSILON,
            general_epsilon: Self::DEFAULT_GENERAL_EPSILON,
            allow_rotation: Self::DEFAULT_ALLOW_ROTATION,
        }
    }
}

/// Builder for `EngineConfig`.
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Sets the corner probe offset.
    pub fn corner_epsilon(mut self, epsilon: f64) -> Self {
        self.config.corner_epsilon = epsilon;
        self
    }

    /// Sets the general tolerance.
    pub fn general_epsilon(mut self, epsilon: f64) -> Self {
        self.config.general_epsilon = epsilon;
        self
    }

    /// Enables or disables rotated candidates.
    pub fn allow_rotation(mut self, allow: bool) -> Self {
        self.config.allow_rotation = allow;
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

/// The aggregate packing state.
///
/// # Invariants
/// * placed rectangles are inside the container and never overlap each other
/// * `placed.len() + unplaced.len()` equals the count at construction
/// * `candidates` always reflects the current `placed` and `unplaced`
#[derive(Clone, Debug)]
pub struct Configuration {
    size: Point,
    placed: Vec<Rectangle>,
    unplaced: SizeInventory,
    candidates: Vec<Rectangle>,
    engine: EngineConfig,
    total: usize,
}

impl Configuration {
    /// Creates an empty configuration with the default engine settings.
    ///
    /// # Examples
    /// ```
    /// use corner_pack::inventory::SizeInventory;
    /// use corner_pack::packing::Configuration;
    /// use corner_pack::types::Point;
    ///
    /// let sizes = SizeInventory::from_dims([(4.0, 4.0)]).unwrap();
    /// let config = Configuration::new(Point::new(10.0, 10.0), sizes).unwrap();
    /// assert_eq!(config.candidates().len(), 4);
    /// assert!(!config.is_complete());
    /// ```
    pub fn new(size: Point, unplaced: SizeInventory) -> Result<Self, PackingError> {
        Self::with_placed(size, unplaced, Vec::new(), EngineConfig::default())
    }

    /// Creates a configuration with pre-seeded placements.
    ///
    /// Pre-seeded rectangles do not consume inventory entries; they count
    /// towards the total. Each one must be valid, inside the container and
    /// free of overlap with the ones before it.
    pub fn with_placed(
        size: Point,
        unplaced: SizeInventory,
        placed: Vec<Rectangle>,
        engine: EngineConfig,
    ) -> Result<Self, PackingError> {
        if !size.is_valid_dimension() {
            return Err(PackingError::DegenerateContainer {
                width: size.x,
                height: size.y,
            });
        }

        for (index, rect) in placed.iter().enumerate() {
            rect.validate()?;
            check_fit(rect, &size, &placed[..index], engine.general_epsilon)
                .map_err(|violation| PackingError::InvalidSeed { index, violation })?;
        }

        let total = placed.len() + unplaced.len();
        let mut config = Self {
            size,
            placed,
            unplaced,
            candidates: Vec::new(),
            engine,
            total,
        };
        config.regenerate();
        Ok(config)
    }

    /// Container size `(width, height)`.
    pub fn size(&self) -> Point {
        self.size
    }

    pub fn placed(&self) -> &[Rectangle] {
        &self.placed
    }

    pub fn unplaced(&self) -> &SizeInventory {
        &self.unplaced
    }

    /// The current list of legal corner-occupying actions.
    ///
    /// Invalidated by every successful `place`.
    pub fn candidates(&self) -> &[Rectangle] {
        &self.candidates
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    /// Number of rectangles this configuration started with, placed or not.
    pub fn total_count(&self) -> usize {
        self.total
    }

    /// The concave corners of the current placement.
    pub fn concave_corners(&self) -> Vec<ConcaveCorner> {
        concave_corners(&self.size, &self.placed, self.engine.corner_epsilon)
    }

    /// Checks whether `rect` could be placed right now.
    pub fn check_fit(&self, rect: &Rectangle) -> Result<(), PackingError> {
        check_fit(rect, &self.size, &self.placed, self.engine.general_epsilon)
            .map_err(|violation| PackingError::IllegalPlacement { violation })
    }

    pub fn fits(&self, rect: &Rectangle) -> bool {
        self.check_fit(rect).is_ok()
    }

    /// Checks whether `rect` is one of the current candidates.
    ///
    /// Origin, extent and orientation must agree within the general tolerance.
    /// The `rotated` flag is not compared; the inventory match decides it.
    pub fn is_candidate(&self, rect: &Rectangle) -> bool {
        let tolerance = self.engine.general_epsilon;
        self.candidates.iter().any(|c| {
            c.orientation == rect.orientation
                && (c.origin.x - rect.origin.x).abs() <= tolerance
                && (c.origin.y - rect.origin.y).abs() <= tolerance
                && (c.width - rect.width).abs() <= tolerance
                && (c.height - rect.height).abs() <= tolerance
        })
    }

    /// Commits a placement.
    ///
    /// The rectangle must be legal, must match an unplaced size in either
    /// orientation and must be one of the current candidates. On error
    /// nothing changes.
    pub fn place(&mut self, rect: Rectangle) -> Result<SizeMatch, PackingError> {
        let tolerance = self.engine.general_epsilon;
        let unknown_size = || PackingError::UnknownSize {
            width: rect.width,
            height: rect.height,
        };

        let checked = rect
            .validate()
            .map_err(PackingError::from)
            .and_then(|_| self.check_fit(&rect))
            .and_then(|_| match self.unplaced.find_matching(rect.dims(), tolerance) {
                Some(_) => Ok(()),
                None => Err(unknown_size()),
            })
            .and_then(|_| {
                if self.is_candidate(&rect) {
                    Ok(())
                } else {
                    Err(PackingError::IllegalPlacement {
                        violation: PlacementViolation::NotAtConcaveCorner,
                    })
                }
            });
        if let Err(err) = checked {
            warn!(?rect, %err, "rejected placement");
            return Err(err);
        }

        let (_, kind) = self
            .unplaced
            .remove_matching(rect.dims(), tolerance)
            .ok_or_else(unknown_size)?;

        self.placed.push(rect);
        self.regenerate();

        debug!(
            x = rect.origin.x,
            y = rect.origin.y,
            width = rect.width,
            height = rect.height,
            orientation = %rect.orientation,
            matched = ?kind,
            remaining = self.unplaced.len(),
            candidates = self.candidates.len(),
            "placed rectangle"
        );
        Ok(kind)
    }

    /// Placed area divided by container area, in `[0, 1]`.
    pub fn density(&self) -> Result<f64, PackingError> {
        let total_area = self.size.area();
        if total_area.is_nan() || total_area <= 0.0 || total_area.is_infinite() {
            return Err(PackingError::DegenerateContainer {
                width: self.size.x,
                height: self.size.y,
            });
        }
        let occupied_area: f64 = self.placed.iter().map(Rectangle::area).sum();
        Ok(occupied_area / total_area)
    }

    /// True once every size has been placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> Result<ConfigurationSnapshot, PackingError> {
        Ok(ConfigurationSnapshot {
            container: self.size,
            placed: self.placed.clone(),
            unplaced: self.unplaced.as_slice().to_vec(),
            corners: self
                .concave_corners()
                .into_iter()
                .map(|(point, orientation)| CornerEntry { point, orientation })
                .collect(),
            candidates: self.candidates.clone(),
            density: self.density()?,
            is_complete: self.is_complete(),
            total: self.total,
        })
    }

    fn regenerate(&mut self) {
        self.candidates =
            generate_candidates(&self.size, &self.placed, &self.unplaced, &self.engine);
    }
}

/// A concave corner in serialized form.
#[derive(Clone, Debug, Serialize)]
pub struct CornerEntry {
    pub point: Point,
    pub orientation: CornerOrientation,
}

/// Serializable view of a `Configuration`.
#[derive(Clone, Debug, Serialize)]
pub struct ConfigurationSnapshot {
    pub container: Point,
    pub placed: Vec<Rectangle>,
    pub unplaced: Vec<SizePair>,
    pub corners: Vec<CornerEntry>,
    pub candidates: Vec<Rectangle>,
    pub density: f64,
    pub is_complete: bool,
    pub total: usize,
}
