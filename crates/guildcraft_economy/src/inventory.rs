//! # Inventory System
//!
//! An ordered list of material stacks. Stacks are keyed by material id and
//! quality in practice, but duplicates are tolerated and summed at query
//! time.
//!
//! Every operation returns a new [`Inventory`]; the receiver is never
//! modified. Consumption walks stacks in storage order (FIFO), not quality
//! order, splitting the last stack it touches.

use serde::{Deserialize, Serialize};

use crate::card::RequiredMaterial;
use crate::error::{EconomyError, EconomyResult};
use crate::material::MaterialInstance;
use crate::quality::QualityRank;

/// Outcome of a satisfiability check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Satisfaction {
    /// Units requested.
    pub required: u32,
    /// Units held at an acceptable quality.
    pub available: u32,
}

impl Satisfaction {
    /// Returns true if the request can be met.
    #[inline]
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.available >= self.required
    }

    /// Units short, or `None` when the request can be met.
    #[inline]
    #[must_use]
    pub const fn missing(&self) -> Option<u32> {
        if self.is_ok() {
            None
        } else {
            Some(self.required - self.available)
        }
    }
}

/// Result of a successful consumption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consumption {
    /// Inventory after removal.
    pub inventory: Inventory,
    /// One entry per stack units were taken from, in consumption order.
    pub used: Vec<MaterialInstance>,
}

/// A player's material holdings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    entries: Vec<MaterialInstance>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inventory holding exactly `entries`, in order.
    #[must_use]
    pub fn from_entries(entries: Vec<MaterialInstance>) -> Self {
        Self { entries }
    }

    /// Stacks in storage order.
    #[must_use]
    pub fn entries(&self) -> &[MaterialInstance] {
        &self.entries
    }

    /// Number of stacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no stacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total units of a material at any quality.
    #[must_use]
    pub fn total_quantity(&self, material_id: &str) -> u32 {
        self.quantity_at_least(material_id, None)
    }

    /// Total units of a material at `min_quality` or better.
    #[must_use]
    pub fn quantity_at_least(&self, material_id: &str, min_quality: Option<QualityRank>) -> u32 {
        self.entries
            .iter()
            .filter(|e| accepts(e, material_id, min_quality))
            .fold(0u32, |acc, e| acc.saturating_add(e.quantity()))
    }

    /// Adds a stack, merging into the first stack of the same material and
    /// quality. Empty stacks are ignored.
    #[must_use]
    pub fn add(&self, instance: &MaterialInstance) -> Self {
        let mut entries = self.entries.clone();
        push_merged(&mut entries, instance);
        Self { entries }
    }

    /// Adds several stacks in order.
    #[must_use]
    pub fn add_all<'a, I>(&self, instances: I) -> Self
    where
        I: IntoIterator<Item = &'a MaterialInstance>,
    {
        let mut entries = self.entries.clone();
        for instance in instances {
            push_merged(&mut entries, instance);
        }
        Self { entries }
    }

    /// Checks whether `quantity` units of a material at `min_quality` or
    /// better are held.
    #[must_use]
    pub fn can_satisfy(
        &self,
        material_id: &str,
        quantity: u32,
        min_quality: Option<QualityRank>,
    ) -> Satisfaction {
        Satisfaction {
            required: quantity,
            available: self.quantity_at_least(material_id, min_quality),
        }
    }

    /// Removes `quantity` units of a material at `min_quality` or better.
    ///
    /// Stacks are drained in storage order; a partially drained stack keeps
    /// its position and quality.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientMaterials` if not enough units are held. The
    /// receiver is untouched either way.
    pub fn consume(
        &self,
        material_id: &str,
        quantity: u32,
        min_quality: Option<QualityRank>,
    ) -> EconomyResult<Consumption> {
        let check = self.can_satisfy(material_id, quantity, min_quality);
        if !check.is_ok() {
            return Err(EconomyError::InsufficientMaterials {
                material_id: material_id.to_string(),
                required: quantity,
                available: check.available,
            });
        }

        let mut remaining = quantity;
        let mut entries = Vec::with_capacity(self.entries.len());
        let mut used = Vec::new();

        for entry in &self.entries {
            if remaining == 0 || !accepts(entry, material_id, min_quality) {
                entries.push(entry.clone());
                continue;
            }

            let take = entry.quantity().min(remaining);
            remaining -= take;
            if take > 0 {
                used.push(entry.with_quantity(take));
            }
            if entry.quantity() > take {
                entries.push(entry.with_subtracted(take));
            }
        }

        Ok(Consumption {
            inventory: Self { entries },
            used,
        })
    }

    /// Consumes every line of a recipe, all or nothing.
    ///
    /// Lines are applied one after another against a working copy; the copy
    /// is returned only if every line succeeds.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientMaterials` for the first line that cannot be met.
    pub fn consume_all(&self, lines: &[RequiredMaterial]) -> EconomyResult<Consumption> {
        let mut working = self.clone();
        let mut used = Vec::new();

        for line in lines {
            let step = working.consume(&line.material_id, line.quantity, line.min_quality)?;
            working = step.inventory;
            used.extend(step.used);
        }

        Ok(Consumption {
            inventory: working,
            used,
        })
    }
}

fn accepts(entry: &MaterialInstance, material_id: &str, min_quality: Option<QualityRank>) -> bool {
    entry.material_id() == material_id && min_quality.map_or(true, |min| entry.quality() >= min)
}

fn push_merged(entries: &mut Vec<MaterialInstance>, instance: &MaterialInstance) {
    if instance.quantity() == 0 {
        return;
    }
    match entries.iter_mut().find(|e| e.is_same_material(instance)) {
        Some(existing) => *existing = existing.with_added(instance.quantity()),
        None => entries.push(instance.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn herb(quality: QualityRank, quantity: u32) -> MaterialInstance {
        MaterialInstance::new("herb", quality, quantity)
    }

    #[test]
    fn test_add_merges_same_material() {
        let inv = Inventory::new().add(&herb(QualityRank::C, 3)).add(&herb(QualityRank::C, 2));
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.total_quantity("herb"), 5);

        let inv = inv.add(&herb(QualityRank::B, 1));
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.total_quantity("herb"), 6);
    }

    #[test]
    fn test_duplicates_are_summed() {
        let inv = Inventory::from_entries(vec![herb(QualityRank::C, 2), herb(QualityRank::C, 4)]);
        assert_eq!(inv.total_quantity("herb"), 6);
        assert_eq!(inv.len(), 2);
    }

    #[test]
    fn test_can_satisfy_respects_min_quality() {
        let inv = Inventory::from_entries(vec![herb(QualityRank::C, 5), herb(QualityRank::A, 1)]);
        assert!(inv.can_satisfy("herb", 6, None).is_ok());
        let strict = inv.can_satisfy("herb", 2, Some(QualityRank::B));
        assert!(!strict.is_ok());
        assert_eq!(strict.available, 1);
        assert_eq!(strict.missing(), Some(1));
        assert_eq!(inv.can_satisfy("ore", 1, None).missing(), Some(1));
    }

    #[test]
    fn test_consume_is_fifo_and_splits() {
        let inv = Inventory::from_entries(vec![
            herb(QualityRank::A, 2),
            MaterialInstance::new("ore", QualityRank::D, 4),
            herb(QualityRank::C, 5),
        ]);
        let out = inv.consume("herb", 4, None).unwrap();

        assert_eq!(out.used, vec![herb(QualityRank::A, 2), herb(QualityRank::C, 2)]);
        assert_eq!(
            out.inventory.entries(),
            &[MaterialInstance::new("ore", QualityRank::D, 4), herb(QualityRank::C, 3)]
        );
        // original untouched
        assert_eq!(inv.total_quantity("herb"), 7);
    }

    #[test]
    fn test_consume_skips_low_quality() {
        let inv = Inventory::from_entries(vec![herb(QualityRank::D, 3), herb(QualityRank::B, 3)]);
        let out = inv.consume("herb", 2, Some(QualityRank::C)).unwrap();
        assert_eq!(out.used, vec![herb(QualityRank::B, 2)]);
        assert_eq!(out.inventory.entries(), &[herb(QualityRank::D, 3), herb(QualityRank::B, 1)]);
    }

    #[test]
    fn test_consume_insufficient() {
        let inv = Inventory::from_entries(vec![herb(QualityRank::C, 1)]);
        let result = inv.consume("herb", 2, None);
        assert!(matches!(
            result,
            Err(EconomyError::InsufficientMaterials { required: 2, available: 1, .. })
        ));
    }

    #[test]
    fn test_consume_all_is_atomic() {
        let inv = Inventory::from_entries(vec![
            herb(QualityRank::C, 5),
            MaterialInstance::new("water", QualityRank::C, 1),
        ]);
        let lines = [RequiredMaterial::new("herb", 2), RequiredMaterial::new("water", 3)];
        assert!(inv.consume_all(&lines).is_err());
        assert_eq!(inv.total_quantity("herb"), 5);

        let lines = [RequiredMaterial::new("herb", 2), RequiredMaterial::new("water", 1)];
        let out = inv.consume_all(&lines).unwrap();
        assert_eq!(out.inventory.entries(), &[herb(QualityRank::C, 3)]);
        assert_eq!(out.used.len(), 2);
    }

    #[test]
    fn test_same_material_across_lines_uses_remaining_stock() {
        let inv = Inventory::from_entries(vec![herb(QualityRank::C, 3)]);
        let lines = [RequiredMaterial::new("herb", 2), RequiredMaterial::new("herb", 2)];
        assert!(inv.consume_all(&lines).is_err());
    }
}
