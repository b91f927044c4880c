//! # GUILDCRAFT Economy Engine
//!
//! Pure Rust resolution logic for the GUILDCRAFT card game economy.
//!
//! ## Design Principles
//!
//! 1. **Immutable state** - Every operation takes a state and returns a new one
//! 2. **Integer math** - Quality values and roll chances never touch floats
//! 3. **Transactional crafting** - All recipe lines are consumed or none are
//! 4. **Injected randomness** - Every roll goes through a caller-owned [`RandomSource`]
//! 5. **External configuration** - Balance numbers and master data live in TOML files
//!
//! ## Resolution Systems
//!
//! - [`inventory`]: material stacks, FIFO consumption
//! - [`quality`]: weighted base quality, bonuses, banding
//! - [`crafting`]: recipe checks and alchemy
//! - [`draft`]: gathering location draft
//! - [`deck`]: draw, use, reshuffle
//! - [`shop`]: rank-gated purchases
//!
//! ## Example
//!
//! ```rust,ignore
//! use guildcraft_economy::{craft_with_enhancements, rng, Inventory, MasterData};
//!
//! let data = MasterData::load("data/master.toml")?;
//! let recipe = data.require_card("recipe_potion")?.as_recipe().unwrap();
//!
//! let mut rng = rng::seeded(42);
//! let outcome = craft_with_enhancements(&inventory, recipe, &played, &mut rng)?;
//! println!("{} ({})", outcome.crafted_item.item_id, outcome.quality.quality_rank);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod artifact;
pub mod card;
pub mod catalog;
pub mod config;
pub mod crafting;
pub mod deck;
pub mod draft;
pub mod effect;
pub mod error;
pub mod inventory;
pub mod material;
pub mod quality;
pub mod rng;
pub mod shop;
pub mod state;

pub use artifact::{AcquisitionType, Artifact, ArtifactId};
pub use card::{
    Card, CardId, CardInfo, EnhancementCard, GatheringCard, GatheringMaterial, Rarity, RecipeCard,
    RequiredMaterial,
};
pub use catalog::MasterData;
pub use config::EngineConfig;
pub use crafting::{
    can_craft, craft, craft_with_bonuses, craft_with_enhancements, CraftCheck, CraftOutcome,
    CraftedItem, EnhancedCraftOutcome, MissingMaterial,
};
pub use deck::Deck;
pub use draft::{DraftPick, DraftState};
pub use effect::{apply_effect, Effect, EffectContext, EffectType, TargetAction};
pub use error::{EconomyError, EconomyResult, ErrorCategory};
pub use inventory::{Consumption, Inventory, Satisfaction};
pub use material::{Material, MaterialId, MaterialInstance, MaterialLookup};
pub use quality::{calculate_final_quality, QualityRank, QualityResult};
pub use rng::{FixedRoll, RandomSource};
pub use shop::{PurchaseOutcome, ShopCatalog, ShopItem, ShopItemKind, ShopState};
pub use state::{GamePhase, GameState, GuildRank, PlayerState};
