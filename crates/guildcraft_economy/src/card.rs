//! # Cards
//!
//! Three kinds of card share a common header (id, name, rarity, unlock rank):
//!
//! - [`GatheringCard`]: a location; selecting it in a draft rolls for materials
//! - [`RecipeCard`]: consumes materials to craft an item
//! - [`EnhancementCard`]: free card carrying an [`Effect`] for one action type
//!
//! Cards are built once (from master data or a validating constructor) and
//! never change afterwards. Fields are private; list accessors return
//! read-only slices.

use serde::{Deserialize, Serialize};

use crate::effect::{Effect, TargetAction};
use crate::error::{EconomyError, EconomyResult};
use crate::material::MaterialId;
use crate::quality::QualityRank;
use crate::rng::BASIS_POINTS;
use crate::state::GuildRank;

/// Unique identifier for a card.
pub type CardId = String;

/// Highest action point cost of a gathering card.
pub const MAX_GATHERING_COST: u8 = 3;

/// Allowed action point costs of a recipe card.
pub const RECIPE_COST_RANGE: std::ops::RangeInclusive<u8> = 1..=3;

/// Rarity tier for cards and artifacts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Rarity {
    /// Common (weight 1).
    #[default]
    Common = 1,
    /// Uncommon (weight 2).
    Uncommon = 2,
    /// Rare (weight 3).
    Rare = 3,
    /// Epic (weight 4).
    Epic = 4,
    /// Legendary (weight 5).
    Legendary = 5,
}

impl Rarity {
    /// Integer weight, 1 (common) to 5 (legendary).
    #[inline]
    #[must_use]
    pub const fn weight(self) -> u8 {
        self as u8
    }
}

/// Fields every card carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    id: CardId,
    name: String,
    #[serde(default)]
    rarity: Rarity,
    #[serde(default)]
    unlock_rank: GuildRank,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl CardInfo {
    /// Creates a common card header unlocked from the lowest rank.
    #[must_use]
    pub fn new(id: impl Into<CardId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity: Rarity::Common,
            unlock_rank: GuildRank::G,
            description: None,
        }
    }

    /// Sets the rarity.
    #[must_use]
    pub const fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Sets the guild rank that unlocks the card.
    #[must_use]
    pub const fn with_unlock_rank(mut self, rank: GuildRank) -> Self {
        self.unlock_rank = rank;
        self
    }

    /// Sets the flavour text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Probabilities travel as `0.0..=1.0` floats in data files and as basis
/// points inside the engine.
mod probability {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::rng::BASIS_POINTS;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(bp: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(f64::from(*bp) / f64::from(BASIS_POINTS))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let p = f64::deserialize(deserializer)?;
        if !(0.0..=1.0).contains(&p) {
            return Err(de::Error::custom(format!("probability {p} outside [0, 1]")));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok((p * f64::from(BASIS_POINTS)).round() as u32)
    }
}

/// One material a gathering card can yield.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatheringMaterial {
    /// Material yielded.
    pub material_id: MaterialId,
    /// Units yielded on a successful roll.
    pub quantity: u32,
    /// Chance of the roll succeeding, in basis points.
    #[serde(rename = "probability", with = "probability")]
    pub probability_bp: u32,
    /// Quality of the yield; the material's base quality when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityRank>,
}

impl GatheringMaterial {
    /// Creates an entry from a probability in basis points.
    #[must_use]
    pub fn new(material_id: impl Into<MaterialId>, quantity: u32, probability_bp: u32) -> Self {
        Self {
            material_id: material_id.into(),
            quantity,
            probability_bp,
            quality: None,
        }
    }

    /// Pins the quality of the yield.
    #[must_use]
    pub const fn with_quality(mut self, quality: QualityRank) -> Self {
        self.quality = Some(quality);
        self
    }
}

/// One input line of a recipe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredMaterial {
    /// Material consumed.
    pub material_id: MaterialId,
    /// Units consumed.
    pub quantity: u32,
    /// Lowest acceptable quality, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quality: Option<QualityRank>,
}

impl RequiredMaterial {
    /// Creates a requirement accepting any quality.
    #[must_use]
    pub fn new(material_id: impl Into<MaterialId>, quantity: u32) -> Self {
        Self {
            material_id: material_id.into(),
            quantity,
            min_quality: None,
        }
    }

    /// Requires at least `quality`.
    #[must_use]
    pub const fn with_min_quality(mut self, quality: QualityRank) -> Self {
        self.min_quality = Some(quality);
        self
    }
}

/// A gathering location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGatheringCard")]
pub struct GatheringCard {
    #[serde(flatten)]
    info: CardInfo,
    cost: u8,
    materials: Vec<GatheringMaterial>,
}

impl GatheringCard {
    /// Creates a gathering card.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the cost exceeds 3, a quantity is zero or a
    /// probability exceeds 100%.
    pub fn new(info: CardInfo, cost: u8, materials: Vec<GatheringMaterial>) -> EconomyResult<Self> {
        let card = Self { info, cost, materials };
        card.validate()?;
        Ok(card)
    }

    fn validate(&self) -> EconomyResult<()> {
        if self.cost > MAX_GATHERING_COST {
            return Err(invalid(&self.info, format!("gathering cost {} above {MAX_GATHERING_COST}", self.cost)));
        }
        for entry in &self.materials {
            if entry.quantity == 0 {
                return Err(invalid(&self.info, format!("zero quantity of {}", entry.material_id)));
            }
            if entry.probability_bp > BASIS_POINTS {
                return Err(invalid(&self.info, format!("probability of {} above 1", entry.material_id)));
            }
        }
        Ok(())
    }

    /// Card id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Action point cost.
    #[must_use]
    pub const fn cost(&self) -> u8 {
        self.cost
    }

    /// Possible yields, in roll order.
    #[must_use]
    pub fn materials(&self) -> &[GatheringMaterial] {
        &self.materials
    }
}

/// A crafting recipe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecipeCard")]
pub struct RecipeCard {
    #[serde(flatten)]
    info: CardInfo,
    cost: u8,
    required_materials: Vec<RequiredMaterial>,
    output_item_id: String,
    category: String,
}

impl RecipeCard {
    /// Creates a recipe card.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the cost is outside 1..=3, there are no
    /// inputs, or an input quantity is zero.
    pub fn new(
        info: CardInfo,
        cost: u8,
        required_materials: Vec<RequiredMaterial>,
        output_item_id: impl Into<String>,
        category: impl Into<String>,
    ) -> EconomyResult<Self> {
        let card = Self {
            info,
            cost,
            required_materials,
            output_item_id: output_item_id.into(),
            category: category.into(),
        };
        card.validate()?;
        Ok(card)
    }

    fn validate(&self) -> EconomyResult<()> {
        if !RECIPE_COST_RANGE.contains(&self.cost) {
            return Err(invalid(&self.info, format!("recipe cost {} outside 1..=3", self.cost)));
        }
        if self.required_materials.is_empty() {
            return Err(invalid(&self.info, "recipe must have at least one input".to_string()));
        }
        if let Some(line) = self.required_materials.iter().find(|l| l.quantity == 0) {
            return Err(invalid(&self.info, format!("zero quantity of {}", line.material_id)));
        }
        Ok(())
    }

    /// Card id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Action point cost.
    #[must_use]
    pub const fn cost(&self) -> u8 {
        self.cost
    }

    /// Input lines, in consumption order.
    #[must_use]
    pub fn required_materials(&self) -> &[RequiredMaterial] {
        &self.required_materials
    }

    /// Id of the item this recipe produces.
    #[must_use]
    pub fn output_item_id(&self) -> &str {
        &self.output_item_id
    }

    /// Item category of the output.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }
}

/// A free card that modifies one kind of action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEnhancementCard")]
pub struct EnhancementCard {
    #[serde(flatten)]
    info: CardInfo,
    cost: u8,
    effect: Effect,
    target_action: TargetAction,
}

impl EnhancementCard {
    /// Creates an enhancement card. Enhancements always cost 0.
    #[must_use]
    pub const fn new(info: CardInfo, effect: Effect, target_action: TargetAction) -> Self {
        Self {
            info,
            cost: 0,
            effect,
            target_action,
        }
    }

    fn validate(&self) -> EconomyResult<()> {
        if self.cost != 0 {
            return Err(invalid(&self.info, format!("enhancement cost must be 0, got {}", self.cost)));
        }
        Ok(())
    }

    /// The carried effect.
    #[must_use]
    pub const fn effect(&self) -> &Effect {
        &self.effect
    }

    /// The action this card targets.
    #[must_use]
    pub const fn target_action(&self) -> TargetAction {
        self.target_action
    }

    /// Returns true if the card may be played on `action`.
    #[must_use]
    pub fn can_apply_to(&self, action: TargetAction) -> bool {
        self.target_action.covers(action)
    }

    /// Card id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.info.id
    }
}

// Deserialized cards pass through the same checks as the constructors.

#[derive(Deserialize)]
struct RawGatheringCard {
    #[serde(flatten)]
    info: CardInfo,
    cost: u8,
    materials: Vec<GatheringMaterial>,
}

impl TryFrom<RawGatheringCard> for GatheringCard {
    type Error = EconomyError;

    fn try_from(raw: RawGatheringCard) -> EconomyResult<Self> {
        Self::new(raw.info, raw.cost, raw.materials)
    }
}

#[derive(Deserialize)]
struct RawRecipeCard {
    #[serde(flatten)]
    info: CardInfo,
    cost: u8,
    required_materials: Vec<RequiredMaterial>,
    output_item_id: String,
    category: String,
}

impl TryFrom<RawRecipeCard> for RecipeCard {
    type Error = EconomyError;

    fn try_from(raw: RawRecipeCard) -> EconomyResult<Self> {
        Self::new(
            raw.info,
            raw.cost,
            raw.required_materials,
            raw.output_item_id,
            raw.category,
        )
    }
}

#[derive(Deserialize)]
struct RawEnhancementCard {
    #[serde(flatten)]
    info: CardInfo,
    #[serde(default)]
    cost: u8,
    effect: Effect,
    target_action: TargetAction,
}

impl TryFrom<RawEnhancementCard> for EnhancementCard {
    type Error = EconomyError;

    fn try_from(raw: RawEnhancementCard) -> EconomyResult<Self> {
        let card = Self {
            info: raw.info,
            cost: raw.cost,
            effect: raw.effect,
            target_action: raw.target_action,
        };
        card.validate()?;
        Ok(card)
    }
}

/// Any card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Card {
    /// Gathering location.
    Gathering(GatheringCard),
    /// Crafting recipe.
    Recipe(RecipeCard),
    /// Action enhancement.
    Enhancement(EnhancementCard),
}

impl Card {
    fn info(&self) -> &CardInfo {
        match self {
            Self::Gathering(card) => &card.info,
            Self::Recipe(card) => &card.info,
            Self::Enhancement(card) => &card.info,
        }
    }

    /// Checks every construction invariant. Used on cards read from data files.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first broken invariant.
    pub fn validate(&self) -> EconomyResult<()> {
        match self {
            Self::Gathering(card) => card.validate(),
            Self::Recipe(card) => card.validate(),
            Self::Enhancement(card) => card.validate(),
        }
    }

    /// Card id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.info().id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// Rarity tier.
    #[must_use]
    pub fn rarity(&self) -> Rarity {
        self.info().rarity
    }

    /// Guild rank that unlocks this card.
    #[must_use]
    pub fn unlock_rank(&self) -> GuildRank {
        self.info().unlock_rank
    }

    /// Flavour text.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.info().description.as_deref()
    }

    /// Action point cost.
    #[must_use]
    pub const fn cost(&self) -> u8 {
        match self {
            Self::Gathering(card) => card.cost,
            Self::Recipe(card) => card.cost,
            Self::Enhancement(_) => 0,
        }
    }

    /// Returns true for gathering cards.
    #[must_use]
    pub const fn is_gathering(&self) -> bool {
        matches!(self, Self::Gathering(_))
    }

    /// Returns true for recipe cards.
    #[must_use]
    pub const fn is_recipe(&self) -> bool {
        matches!(self, Self::Recipe(_))
    }

    /// Returns true for enhancement cards.
    #[must_use]
    pub const fn is_enhancement(&self) -> bool {
        matches!(self, Self::Enhancement(_))
    }

    /// The gathering card, if this is one.
    #[must_use]
    pub const fn as_gathering(&self) -> Option<&GatheringCard> {
        match self {
            Self::Gathering(card) => Some(card),
            _ => None,
        }
    }

    /// The recipe card, if this is one.
    #[must_use]
    pub const fn as_recipe(&self) -> Option<&RecipeCard> {
        match self {
            Self::Recipe(card) => Some(card),
            _ => None,
        }
    }

    /// The enhancement card, if this is one.
    #[must_use]
    pub const fn as_enhancement(&self) -> Option<&EnhancementCard> {
        match self {
            Self::Enhancement(card) => Some(card),
            _ => None,
        }
    }
}

impl From<GatheringCard> for Card {
    fn from(card: GatheringCard) -> Self {
        Self::Gathering(card)
    }
}

impl From<RecipeCard> for Card {
    fn from(card: RecipeCard) -> Self {
        Self::Recipe(card)
    }
}

impl From<EnhancementCard> for Card {
    fn from(card: EnhancementCard) -> Self {
        Self::Enhancement(card)
    }
}

fn invalid(info: &CardInfo, reason: String) -> EconomyError {
    EconomyError::InvalidConfig(format!("card {}: {reason}", info.id))
}
