//! # Materials
//!
//! Master data for gatherable materials and the quantity-by-quality stacks
//! the player actually holds.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::quality::QualityRank;

/// Unique identifier for a material type.
pub type MaterialId = String;

/// A material definition (master data).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    id: MaterialId,
    name: String,
    base_quality: QualityRank,
    #[serde(default)]
    attributes: BTreeSet<String>,
    #[serde(default)]
    is_rare: bool,
}

impl Material {
    /// Creates a new material definition.
    #[must_use]
    pub fn new(id: impl Into<MaterialId>, name: impl Into<String>, base_quality: QualityRank) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_quality,
            attributes: BTreeSet::new(),
            is_rare: false,
        }
    }

    /// Adds an attribute tag.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.insert(attribute.into());
        self
    }

    /// Marks the material as rare.
    #[must_use]
    pub const fn rare(mut self) -> Self {
        self.is_rare = true;
        self
    }

    /// Material id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quality a freshly gathered unit has when the source does not say otherwise.
    #[must_use]
    pub const fn base_quality(&self) -> QualityRank {
        self.base_quality
    }

    /// Attribute tags, in sorted order.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }

    /// Returns true if the material carries `attribute`.
    #[must_use]
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains(attribute)
    }

    /// Returns true for rare materials.
    #[must_use]
    pub const fn is_rare(&self) -> bool {
        self.is_rare
    }
}

/// A stack of one material at one quality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialInstance {
    material_id: MaterialId,
    quality: QualityRank,
    quantity: u32,
}

impl MaterialInstance {
    /// Creates a new stack.
    #[must_use]
    pub fn new(material_id: impl Into<MaterialId>, quality: QualityRank, quantity: u32) -> Self {
        Self {
            material_id: material_id.into(),
            quality,
            quantity,
        }
    }

    /// Material id.
    #[must_use]
    pub fn material_id(&self) -> &str {
        &self.material_id
    }

    /// Quality rank of every unit in the stack.
    #[must_use]
    pub const fn quality(&self) -> QualityRank {
        self.quality
    }

    /// Number of units.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Same material id and same quality.
    #[must_use]
    pub fn is_same_material(&self, other: &Self) -> bool {
        self.material_id == other.material_id && self.quality == other.quality
    }

    /// Same material id, any quality.
    #[must_use]
    pub fn is_same_material_id(&self, other: &Self) -> bool {
        self.material_id == other.material_id
    }

    /// Returns a copy with `amount` more units.
    #[must_use]
    pub fn with_added(&self, amount: u32) -> Self {
        self.with_quantity(self.quantity.saturating_add(amount))
    }

    /// Returns a copy with `amount` fewer units, floored at zero.
    #[must_use]
    pub fn with_subtracted(&self, amount: u32) -> Self {
        self.with_quantity(self.quantity.saturating_sub(amount))
    }

    /// Returns a copy holding exactly `quantity` units.
    #[must_use]
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            material_id: self.material_id.clone(),
            quality: self.quality,
            quantity,
        }
    }
}

/// Read access to material master data by id.
pub trait MaterialLookup {
    /// Returns the material with `id`, if known.
    fn find_material(&self, id: &str) -> Option<&Material>;
}

impl MaterialLookup for BTreeMap<MaterialId, Material> {
    fn find_material(&self, id: &str) -> Option<&Material> {
        self.get(id)
    }
}

impl MaterialLookup for [Material] {
    fn find_material(&self, id: &str) -> Option<&Material> {
        self.iter().find(|material| material.id == id)
    }
}

impl MaterialLookup for Vec<Material> {
    fn find_material(&self, id: &str) -> Option<&Material> {
        self.as_slice().find_material(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sameness() {
        let a = MaterialInstance::new("herb", QualityRank::C, 3);
        let b = MaterialInstance::new("herb", QualityRank::C, 9);
        let c = MaterialInstance::new("herb", QualityRank::B, 3);
        assert!(a.is_same_material(&b));
        assert!(!a.is_same_material(&c));
        assert!(a.is_same_material_id(&c));
    }

    #[test]
    fn test_quantity_adjustments_do_not_touch_original() {
        let a = MaterialInstance::new("herb", QualityRank::C, 3);
        let more = a.with_added(2);
        let less = a.with_subtracted(10);
        assert_eq!(a.quantity(), 3);
        assert_eq!(more.quantity(), 5);
        assert_eq!(less.quantity(), 0);
        assert_eq!(more.quality(), QualityRank::C);
    }

    #[test]
    fn test_attributes() {
        let ore = Material::new("ore", "Iron Ore", QualityRank::D)
            .with_attribute("metal")
            .with_attribute("heavy")
            .rare();
        assert!(ore.has_attribute("metal"));
        assert!(!ore.has_attribute("liquid"));
        assert!(ore.is_rare());
        assert_eq!(ore.attributes(), ore.attributes());
        assert_eq!(ore.attributes().len(), 2);
    }

    #[test]
    fn test_lookup() {
        let list = vec![Material::new("herb", "Herb", QualityRank::C)];
        assert_eq!(list.find_material("herb").map(Material::name), Some("Herb"));
        assert!(list.find_material("ore").is_none());

        let map: BTreeMap<MaterialId, Material> =
            list.into_iter().map(|m| (m.id().to_string(), m)).collect();
        assert!(map.find_material("herb").is_some());
    }
}
