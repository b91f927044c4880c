//! # Master Data
//!
//! Materials, cards, artifacts and shop items, loaded once from a TOML
//! document and read-only afterwards.
//!
//! ```toml
//! [[materials]]
//! id = "herb"
//! name = "Healing Herb"
//! base_quality = "C"
//!
//! [[cards]]
//! kind = "gathering"
//! id = "forest"
//! name = "Whispering Forest"
//! cost = 1
//! materials = [{ material_id = "herb", quantity = 2, probability = 0.8 }]
//!
//! [[shop_items]]
//! id = "flask"
//! name = "Flask"
//! kind = "material"
//! reference_id = "herb"
//! price = 15
//! ```
//!
//! Every record is validated on load, ids must be unique per table, and every
//! cross reference (card yields, recipe inputs, shop references) must
//! resolve.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::artifact::Artifact;
use crate::card::{Card, GatheringCard};
use crate::error::{EconomyError, EconomyResult};
use crate::material::{Material, MaterialId, MaterialLookup};
use crate::shop::{ShopCatalog, ShopItem, ShopItemKind};
use crate::state::GuildRank;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMasterData {
    materials: Vec<Material>,
    cards: Vec<Card>,
    artifacts: Vec<Artifact>,
    shop_items: Vec<ShopItem>,
}

/// Validated master data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MasterData {
    materials: BTreeMap<MaterialId, Material>,
    cards: Vec<Card>,
    artifacts: Vec<Artifact>,
    shop_items: Vec<ShopItem>,
}

impl MasterData {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML, an invalid record, a
    /// duplicate id or a dangling reference.
    pub fn from_toml_str(source: &str) -> EconomyResult<Self> {
        let raw: RawMasterData =
            toml::from_str(source).map_err(|e| EconomyError::InvalidConfig(e.to_string()))?;
        Self::from_parts(raw.materials, raw.cards, raw.artifacts, raw.shop_items)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> EconomyResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| EconomyError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let data = Self::from_toml_str(&source)?;
        tracing::info!(
            "Loaded master data from {}: {} materials, {} cards, {} artifacts, {} shop items",
            path.display(),
            data.materials.len(),
            data.cards.len(),
            data.artifacts.len(),
            data.shop_items.len()
        );
        Ok(data)
    }

    /// Builds master data from already-constructed records.
    ///
    /// # Errors
    ///
    /// Same checks as [`from_toml_str`](Self::from_toml_str).
    pub fn from_parts(
        materials: Vec<Material>,
        cards: Vec<Card>,
        artifacts: Vec<Artifact>,
        shop_items: Vec<ShopItem>,
    ) -> EconomyResult<Self> {
        let mut material_map = BTreeMap::new();
        for material in materials {
            let id = material.id().to_string();
            if material_map.insert(id.clone(), material).is_some() {
                return Err(duplicate("material", &id));
            }
        }

        unique_ids("card", cards.iter().map(Card::id))?;
        unique_ids("artifact", artifacts.iter().map(Artifact::id))?;
        unique_ids("shop item", shop_items.iter().map(|item| item.id.as_str()))?;

        let data = Self {
            materials: material_map,
            cards,
            artifacts,
            shop_items,
        };
        data.validate()?;
        Ok(data)
    }

    fn validate(&self) -> EconomyResult<()> {
        for card in &self.cards {
            card.validate()?;
            let referenced: Vec<&str> = match card {
                Card::Gathering(c) => c.materials().iter().map(|m| m.material_id.as_str()).collect(),
                Card::Recipe(c) => c.required_materials().iter().map(|m| m.material_id.as_str()).collect(),
                Card::Enhancement(_) => Vec::new(),
            };
            if let Some(missing) = referenced.into_iter().find(|id| !self.materials.contains_key(*id)) {
                return Err(EconomyError::InvalidConfig(format!(
                    "card {} references unknown material {missing}",
                    card.id()
                )));
            }
        }

        for item in &self.shop_items {
            item.validate()?;
            let known = match item.kind {
                ShopItemKind::Material => self.materials.contains_key(&item.reference_id),
                ShopItemKind::Card => self.card(&item.reference_id).is_some(),
                ShopItemKind::Artifact => self.artifact(&item.reference_id).is_some(),
            };
            if !known {
                return Err(EconomyError::InvalidConfig(format!(
                    "shop item {} references unknown {:?} {}",
                    item.id, item.kind, item.reference_id
                )));
            }
        }
        Ok(())
    }

    /// Material by id.
    #[must_use]
    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Card by id.
    #[must_use]
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id() == id)
    }

    /// Card by id, as an error when missing.
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` if no card has `id`.
    pub fn require_card(&self, id: &str) -> EconomyResult<&Card> {
        self.card(id).ok_or_else(|| EconomyError::CardNotFound(id.to_string()))
    }

    /// Artifact by id.
    #[must_use]
    pub fn artifact(&self, id: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|artifact| artifact.id() == id)
    }

    /// Shop item by id.
    #[must_use]
    pub fn shop_item(&self, id: &str) -> Option<&ShopItem> {
        self.find_shop_item(id)
    }

    /// Every material, ordered by id.
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// Every card, in file order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Every artifact, in file order.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Gathering cards a player of `rank` may draft.
    #[must_use]
    pub fn gathering_cards_unlocked_at(&self, rank: GuildRank) -> Vec<GatheringCard> {
        self.cards
            .iter()
            .filter(|card| rank.unlocks(card.unlock_rank()))
            .filter_map(Card::as_gathering)
            .cloned()
            .collect()
    }
}

impl MaterialLookup for MasterData {
    fn find_material(&self, id: &str) -> Option<&Material> {
        self.material(id)
    }
}

impl ShopCatalog for MasterData {
    fn shop_items(&self) -> &[ShopItem] {
        &self.shop_items
    }
}

fn unique_ids<'a>(table: &str, ids: impl Iterator<Item = &'a str>) -> EconomyResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(duplicate(table, id));
        }
    }
    Ok(())
}

fn duplicate(table: &str, id: &str) -> EconomyError {
    EconomyError::InvalidConfig(format!("duplicate {table} id {id}"))
}
