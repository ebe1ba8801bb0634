//! Multiset of rectangle sizes that still have to be placed.

use crate::model::{SizePair, ValidationError};

/// How a placed rectangle was matched against the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeMatch {
    /// `(width, height)` matched an entry as is.
    Exact,
    /// `(height, width)` matched an entry.
    Rotated,
}

/// Strongly typed multiset of unplaced sizes.
///
/// Entries keep their insertion order. Duplicates are allowed and each one
/// must be removed separately.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SizeInventory {
    entries: Vec<SizePair>,
}

impl SizeInventory {
    /// Builds an inventory from raw `(width, height)` pairs, validating each one.
    pub fn from_dims<I>(dims: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let entries = dims
            .into_iter()
            .map(|(w, h)| SizePair::new(w, h))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SizePair> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[SizePair] {
        &self.entries
    }

    /// Entries with exact duplicates removed, first occurrence kept.
    ///
    /// `(w, h)` and `(h, w)` stay distinct here; rotation is handled by the caller.
    pub fn distinct(&self) -> Vec<SizePair> {
        let mut seen: Vec<SizePair> = Vec::with_capacity(self.entries.len());
        for size in &self.entries {
            if !seen.iter().any(|s| s == size) {
                seen.push(*size);
            }
        }
        seen
    }

    /// Finds the entry a rectangle of extent `dims` would consume.
    ///
    /// An exact match anywhere in the inventory wins over a rotated one.
    pub fn find_matching(&self, dims: (f64, f64), tolerance: f64) -> Option<(usize, SizeMatch)> {
        if let Some(idx) = self
            .entries
            .iter()
            .position(|s| s.matches_exact(dims, tolerance))
        {
            return Some((idx, SizeMatch::Exact));
        }
        self.entries
            .iter()
            .position(|s| s.matches_rotated(dims, tolerance))
            .map(|idx| (idx, SizeMatch::Rotated))
    }

    /// Removes one entry matching `dims` and returns it.
    pub fn remove_matching(
        &mut self,
        dims: (f64, f64),
        tolerance: f64,
    ) -> Option<(SizePair, SizeMatch)> {
        let (idx, kind) = self.find_matching(dims, tolerance)?;
        Some((self.entries.remove(idx), kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EPSILON_GENERAL;

    fn inventory(dims: &[(f64, f64)]) -> SizeInventory {
        SizeInventory::from_dims(dims.iter().copied()).unwrap()
    }

    #[test]
    fn exact_match_is_preferred_over_rotated() {
        let mut inv = inventory(&[(2.0, 4.0), (4.0, 2.0)]);

        let (removed, kind) = inv.remove_matching((4.0, 2.0), EPSILON_GENERAL).unwrap();
        assert_eq!(kind, SizeMatch::Exact);
        assert_eq!(removed, SizePair::new(4.0, 2.0).unwrap());
        assert_eq!(inv.as_slice(), &[SizePair::new(2.0, 4.0).unwrap()]);
    }

    #[test]
    fn rotated_match_is_used_as_fallback() {
        let mut inv = inventory(&[(2.0, 4.0)]);

        let (_, kind) = inv.remove_matching((4.0, 2.0), EPSILON_GENERAL).unwrap();
        assert_eq!(kind, SizeMatch::Rotated);
        assert!(inv.is_empty());
    }

    #[test]
    fn removes_only_one_duplicate() {
        let mut inv = inventory(&[(3.0, 3.0), (3.0, 3.0), (1.0, 2.0)]);

        assert!(inv.remove_matching((3.0, 3.0), EPSILON_GENERAL).is_some());
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.distinct().len(), 2);
    }

    #[test]
    fn missing_size_is_not_removed() {
        let mut inv = inventory(&[(3.0, 3.0)]);
        assert!(inv.remove_matching((3.0, 4.0), EPSILON_GENERAL).is_none());
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn invalid_dims_are_rejected() {
        assert!(SizeInventory::from_dims([(1.0, 1.0), (0.0, 1.0)]).is_err());
    }

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        let inv = inventory(&[(1.0, 2.0), (3.0, 3.0), (1.0, 2.0), (2.0, 1.0)]);
        let distinct: Vec<_> = inv.distinct().iter().map(|s| (s.width, s.height)).collect();
        assert_eq!(distinct, vec![(1.0, 2.0), (3.0, 3.0), (2.0, 1.0)]);
    }
}
