//! # Shop
//!
//! **Rank-Gated Purchases with Finite Stock**
//!
//! A purchase is checked in a fixed order and the first failure wins:
//!
//! 1. the item exists (`"item not found"`)
//! 2. the guild rank unlocks it (`"rank too low"`)
//! 3. the player can pay (`"insufficient gold"`)
//! 4. there is stock left (`"insufficient stock"`)
//!
//! Stock of `-1` is unlimited and never decremented. Items the shop state has
//! not tracked yet start from the catalog's stock.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};
use crate::state::{GuildRank, PlayerState};

/// Stock value meaning "never runs out".
pub const UNLIMITED_STOCK: i32 = -1;

/// What a shop item delivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopItemKind {
    /// A material stack.
    Material,
    /// A card for the deck.
    Card,
    /// An artifact.
    Artifact,
}

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    /// Shop item id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What is delivered.
    pub kind: ShopItemKind,
    /// Id of the delivered material, card or artifact.
    pub reference_id: String,
    /// Price in gold.
    pub price: u32,
    /// Lowest guild rank allowed to buy.
    #[serde(default)]
    pub required_rank: GuildRank,
    /// Initial stock; [`UNLIMITED_STOCK`] for no limit.
    #[serde(default = "unlimited")]
    pub stock: i32,
}

const fn unlimited() -> i32 {
    UNLIMITED_STOCK
}

impl ShopItem {
    /// Creates an unlimited item available from the lowest rank.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ShopItemKind,
        reference_id: impl Into<String>,
        price: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            reference_id: reference_id.into(),
            price,
            required_rank: GuildRank::G,
            stock: UNLIMITED_STOCK,
        }
    }

    /// Sets the rank required to buy.
    #[must_use]
    pub const fn with_required_rank(mut self, rank: GuildRank) -> Self {
        self.required_rank = rank;
        self
    }

    /// Sets a finite initial stock.
    #[must_use]
    pub const fn with_stock(mut self, stock: i32) -> Self {
        self.stock = stock;
        self
    }

    /// Returns true if the item never runs out.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.stock == UNLIMITED_STOCK
    }

    /// Checks that stock is `-1` or non-negative.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for any other negative stock.
    pub fn validate(&self) -> EconomyResult<()> {
        if self.stock < UNLIMITED_STOCK {
            return Err(EconomyError::InvalidConfig(format!(
                "shop item {}: stock {} below -1",
                self.id, self.stock
            )));
        }
        Ok(())
    }
}

/// Read access to the list of shop items.
pub trait ShopCatalog {
    /// Every item, in catalog order.
    fn shop_items(&self) -> &[ShopItem];

    /// The item with `id`, if listed.
    fn find_shop_item(&self, id: &str) -> Option<&ShopItem> {
        self.shop_items().iter().find(|item| item.id == id)
    }
}

impl ShopCatalog for [ShopItem] {
    fn shop_items(&self) -> &[ShopItem] {
        self
    }
}

impl ShopCatalog for Vec<ShopItem> {
    fn shop_items(&self) -> &[ShopItem] {
        self
    }
}

/// The buyer's side of the shop.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopState {
    current_rank: GuildRank,
    gold: u32,
    stock_map: BTreeMap<String, i32>,
}

/// Result of a successful purchase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseOutcome {
    /// Shop after the purchase.
    pub state: ShopState,
    /// The item bought.
    pub item: ShopItem,
}

impl ShopState {
    /// A shop with no stock tracked yet.
    #[must_use]
    pub const fn new(current_rank: GuildRank, gold: u32) -> Self {
        Self {
            current_rank,
            gold,
            stock_map: BTreeMap::new(),
        }
    }

    /// A shop seeded from the player's rank and gold.
    #[must_use]
    pub const fn for_player(player: &PlayerState) -> Self {
        Self::new(player.rank(), player.gold())
    }

    /// Rank used for unlock checks.
    #[must_use]
    pub const fn current_rank(&self) -> GuildRank {
        self.current_rank
    }

    /// Gold on hand.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Returns a copy at a new rank, keeping tracked stock.
    #[must_use]
    pub fn with_rank(&self, rank: GuildRank) -> Self {
        Self {
            current_rank: rank,
            ..self.clone()
        }
    }

    /// Returns a copy holding `gold`, keeping tracked stock.
    #[must_use]
    pub fn with_gold(&self, gold: u32) -> Self {
        Self {
            gold,
            ..self.clone()
        }
    }

    /// Units left of `item`; `None` when unlimited.
    ///
    /// Unlimited catalog items never consult the tracked stock.
    #[must_use]
    pub fn remaining_stock(&self, item: &ShopItem) -> Option<u32> {
        if item.is_unlimited() {
            return None;
        }
        let stock = self.stock_map.get(&item.id).copied().unwrap_or(item.stock);
        Some(u32::try_from(stock).unwrap_or(0))
    }

    /// Items unlocked at the current rank that are still in stock.
    #[must_use]
    pub fn available_items<'a, C>(&self, catalog: &'a C) -> Vec<&'a ShopItem>
    where
        C: ShopCatalog + ?Sized,
    {
        catalog
            .shop_items()
            .iter()
            .filter(|item| self.current_rank.unlocks(item.required_rank))
            .filter(|item| self.remaining_stock(item) != Some(0))
            .collect()
    }

    /// Buys one unit of `item_id`.
    ///
    /// # Errors
    ///
    /// `ItemNotFound`, `RankTooLow`, `InsufficientGold` or
    /// `InsufficientStock`, checked in that order. The state is unchanged on
    /// failure.
    pub fn purchase<C>(&self, catalog: &C, item_id: &str) -> EconomyResult<PurchaseOutcome>
    where
        C: ShopCatalog + ?Sized,
    {
        let item = catalog
            .find_shop_item(item_id)
            .ok_or_else(|| EconomyError::ItemNotFound(item_id.to_string()))?;

        if !self.current_rank.unlocks(item.required_rank) {
            return Err(EconomyError::RankTooLow {
                required: item.required_rank.order(),
                current: self.current_rank.order(),
            });
        }
        if self.gold < item.price {
            return Err(EconomyError::InsufficientGold {
                required: item.price,
                available: self.gold,
            });
        }
        let remaining = self.remaining_stock(item);
        if remaining == Some(0) {
            return Err(EconomyError::InsufficientStock(item_id.to_string()));
        }

        let mut next = self.clone();
        next.gold -= item.price;
        if let Some(left) = remaining {
            let left = i32::try_from(left - 1).unwrap_or(i32::MAX);
            next.stock_map.insert(item.id.clone(), left);
        }

        tracing::debug!(
            "Purchased {} for {} gold ({} gold left)",
            item.id,
            item.price,
            next.gold
        );

        Ok(PurchaseOutcome {
            state: next,
            item: item.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<ShopItem> {
        vec![
            ShopItem::new("flask", "Flask", ShopItemKind::Material, "glass", 15),
            ShopItem::new("tome", "Tome", ShopItemKind::Card, "recipe_elixir", 40)
                .with_required_rank(GuildRank::D),
            ShopItem::new("idol", "Idol", ShopItemKind::Artifact, "idol", 5).with_stock(1),
        ]
    }

    #[test]
    fn test_insufficient_gold_leaves_state() {
        let shop = ShopState::new(GuildRank::G, 10);
        let err = shop.purchase(&catalog(), "flask").unwrap_err();
        assert_eq!(err.to_string(), "insufficient gold");
        assert_eq!(shop.gold(), 10);
    }

    #[test]
    fn test_validation_order() {
        let broke_low_rank = ShopState::new(GuildRank::G, 0);
        assert_eq!(
            broke_low_rank.purchase(&catalog(), "nope").unwrap_err(),
            EconomyError::ItemNotFound("nope".to_string())
        );
        assert_eq!(
            broke_low_rank.purchase(&catalog(), "tome").unwrap_err(),
            EconomyError::RankTooLow {
                required: 4,
                current: 1
            }
        );
        assert!(matches!(
            broke_low_rank.with_rank(GuildRank::A).purchase(&catalog(), "tome"),
            Err(EconomyError::InsufficientGold { .. })
        ));
    }

    #[test]
    fn test_finite_stock_runs_out() {
        let shop = ShopState::new(GuildRank::G, 100);
        let items = catalog();
        let idol = &items[2];
        assert_eq!(shop.remaining_stock(idol), Some(1));

        let outcome = shop.purchase(&items, "idol").unwrap();
        assert_eq!(outcome.item.reference_id, "idol");
        assert_eq!(outcome.state.gold(), 95);
        assert_eq!(outcome.state.remaining_stock(idol), Some(0));

        let err = outcome.state.purchase(&items, "idol").unwrap_err();
        assert_eq!(err.to_string(), "insufficient stock");
    }

    #[test]
    fn test_unlimited_stock_untracked() {
        let shop = ShopState::new(GuildRank::G, 100);
        let items = catalog();
        let after = shop.purchase(&items, "flask").unwrap().state;
        let after = after.purchase(&items, "flask").unwrap().state;
        assert_eq!(after.gold(), 70);
        assert_eq!(after.remaining_stock(&items[0]), None);
    }

    #[test]
    fn test_unlimited_ignores_tracked_stock() {
        let shop: ShopState = toml::from_str(
            r#"
            current_rank = "G"
            gold = 50

            [stock_map]
            flask = 0
            "#,
        )
        .unwrap();
        let items = catalog();

        assert_eq!(shop.remaining_stock(&items[0]), None);
        assert_eq!(shop.available_items(&items).first().map(|i| i.id.as_str()), Some("flask"));
        let outcome = shop.purchase(&items, "flask").unwrap();
        assert_eq!(outcome.state.gold(), 35);
        assert_eq!(outcome.state.stock_map.get("flask"), Some(&0));
    }

    #[test]
    fn test_available_items() {
        let items = catalog();
        let shop = ShopState::new(GuildRank::G, 100);
        let ids: Vec<&str> = shop.available_items(&items).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["flask", "idol"]);

        let shop = shop.purchase(&items, "idol").unwrap().state.with_rank(GuildRank::D);
        let ids: Vec<&str> = shop.available_items(&items).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["flask", "tome"]);
    }

    #[test]
    fn test_stock_validation() {
        assert!(catalog()[2].validate().is_ok());
        let broken = ShopItem::new("x", "X", ShopItemKind::Card, "x", 1).with_stock(-2);
        assert!(broken.validate().is_err());
    }
}
