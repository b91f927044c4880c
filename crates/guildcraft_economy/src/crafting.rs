//! # Alchemy System
//!
//! **Transactional Recipe Crafting with Enhancement Effects**
//!
//! This module resolves recipe cards against an inventory with the following
//! guarantees:
//!
//! 1. **Full Diagnosis**: [`can_craft`] reports every short line, not just the first
//! 2. **Transactional**: all lines are consumed OR nothing happens
//! 3. **Provenance**: crafted items carry a snapshot of the exact stacks used
//! 4. **Effects**: `MATERIAL_SAVE` and `QUALITY_UP` enhancements are honored
//!
//! ## Enhancement Targeting
//!
//! An enhancement takes part in crafting when it targets `ALCHEMY` or `ALL`.
//!
//! ## Example
//!
//! ```rust,ignore
//! let check = can_craft(&inventory, &recipe);
//! if check.can_craft {
//!     let outcome = craft_with_enhancements(&inventory, &recipe, &played, &mut rng)?;
//!     inventory = outcome.inventory;
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::card::{EnhancementCard, RecipeCard};
use crate::effect::{additive_bonus, EffectContext, EffectType, TargetAction};
use crate::error::{EconomyError, EconomyResult};
use crate::inventory::{Consumption, Inventory};
use crate::material::{MaterialId, MaterialInstance};
use crate::quality::{
    apply_artifact_bonus, calculate_base_quality, calculate_final_quality, resolve_quality, saturate,
    QualityRank, QualityResult,
};
use crate::rng::{roll_percent, RandomSource};

/// One recipe line the inventory cannot cover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingMaterial {
    /// Material that is short.
    pub material_id: MaterialId,
    /// Units the recipe needs.
    pub required: u32,
    /// Units held at an acceptable quality.
    pub available: u32,
    /// `required - available`.
    pub shortage: u32,
}

/// Result of a craftability check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftCheck {
    /// True when every line can be met.
    pub can_craft: bool,
    /// Every line that cannot be met, in recipe order.
    pub missing_materials: Vec<MissingMaterial>,
}

/// An item produced by alchemy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftedItem {
    /// Item id (the recipe's output item).
    pub item_id: String,
    /// Recipe card that produced it.
    pub recipe_id: String,
    /// Item category.
    pub category: String,
    /// Final quality value, `0..=100`.
    pub quality_value: u32,
    /// Quality band of `quality_value`.
    pub quality_rank: QualityRank,
    /// Stacks the quality was computed from.
    pub used_materials: Vec<MaterialInstance>,
}

/// Result of a plain craft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CraftOutcome {
    /// The new item.
    pub crafted_item: CraftedItem,
    /// Inventory after consumption.
    pub inventory: Inventory,
    /// Quality breakdown.
    pub quality: QualityResult,
}

/// Result of a craft with enhancements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnhancedCraftOutcome {
    /// The new item.
    pub crafted_item: CraftedItem,
    /// Inventory after consumption (unchanged when materials were saved).
    pub inventory: Inventory,
    /// Quality breakdown.
    pub quality: QualityResult,
    /// Effect types that took effect, in the order their cards were played.
    pub applied_effects: Vec<EffectType>,
    /// True when a `MATERIAL_SAVE` roll succeeded.
    pub materials_saved: bool,
}

/// Checks every recipe line independently and collects all shortages.
#[must_use]
pub fn can_craft(inventory: &Inventory, recipe: &RecipeCard) -> CraftCheck {
    let missing_materials: Vec<MissingMaterial> = recipe
        .required_materials()
        .iter()
        .filter_map(|line| {
            let check = inventory.can_satisfy(&line.material_id, line.quantity, line.min_quality);
            check.missing().map(|shortage| MissingMaterial {
                material_id: line.material_id.clone(),
                required: line.quantity,
                available: check.available,
                shortage,
            })
        })
        .collect();

    CraftCheck {
        can_craft: missing_materials.is_empty(),
        missing_materials,
    }
}

/// Crafts a recipe with no bonuses.
///
/// # Errors
///
/// Returns `InsufficientMaterials` if any line cannot be met. The input
/// inventory is never modified.
pub fn craft(inventory: &Inventory, recipe: &RecipeCard) -> EconomyResult<CraftOutcome> {
    let consumption = consume_recipe(inventory, recipe)?;
    let quality = calculate_final_quality(&consumption.used, &[], &[]);
    let crafted_item = build_item(recipe, &quality, consumption.used);

    tracing::debug!(
        "Crafted {} from {} (quality {} / {})",
        crafted_item.item_id,
        recipe.id(),
        quality.quality_value,
        quality.quality_rank
    );

    Ok(CraftOutcome {
        crafted_item,
        inventory: consumption.inventory,
        quality,
    })
}

/// Crafts a recipe with enhancement cards played on it.
///
/// # Errors
///
/// Returns `InsufficientMaterials` if any line cannot be met.
pub fn craft_with_enhancements<R: RandomSource + ?Sized>(
    inventory: &Inventory,
    recipe: &RecipeCard,
    enhancements: &[EnhancementCard],
    rng: &mut R,
) -> EconomyResult<EnhancedCraftOutcome> {
    craft_with_bonuses(inventory, recipe, enhancements, &[], rng)
}

/// Crafts a recipe with enhancement cards and owned artifacts.
///
/// # Algorithm
///
/// 1. Fail if the recipe cannot be met
/// 2. Compute the stacks that would be consumed
/// 3. Keep enhancements targeting `ALCHEMY` or `ALL`
/// 4. If any `MATERIAL_SAVE` is present, roll once at the summed percentage
///    (capped at 100); on success the inventory is returned unchanged
/// 5. Quality = weighted base of the computed stacks + `QUALITY_UP` from
///    enhancements and artifacts, clamped then banded
///
/// # Errors
///
/// Returns `InsufficientMaterials` if any line cannot be met.
pub fn craft_with_bonuses<R: RandomSource + ?Sized>(
    inventory: &Inventory,
    recipe: &RecipeCard,
    enhancements: &[EnhancementCard],
    artifacts: &[Artifact],
    rng: &mut R,
) -> EconomyResult<EnhancedCraftOutcome> {
    let consumption = consume_recipe(inventory, recipe)?;

    let active: Vec<&EnhancementCard> = enhancements
        .iter()
        .filter(|card| card.can_apply_to(TargetAction::Alchemy))
        .collect();

    let save_percent: i64 = active
        .iter()
        .map(|card| card.effect())
        .filter(|effect| effect.kind == EffectType::MaterialSave)
        .map(|effect| i64::from(effect.value))
        .sum();
    let has_save = active
        .iter()
        .any(|card| card.effect().kind == EffectType::MaterialSave);
    let materials_saved = has_save && {
        let percent = u32::try_from(save_percent.clamp(0, 100)).unwrap_or(0);
        roll_percent(rng, percent)
    };

    let mut applied_effects = Vec::new();
    for card in &active {
        let kind = card.effect().kind;
        let applies = match kind {
            EffectType::QualityUp => true,
            EffectType::MaterialSave => materials_saved,
            _ => false,
        };
        if applies && !applied_effects.contains(&kind) {
            applied_effects.push(kind);
        }
    }

    let enhancement_bonus = additive_bonus(EffectContext::Quality, active.iter().map(|c| c.effect()));
    let artifact_bonus = apply_artifact_bonus(artifacts);
    let base_quality = calculate_base_quality(&consumption.used);
    let (quality_value, quality_rank) =
        resolve_quality(base_quality, enhancement_bonus + i64::from(artifact_bonus));
    let quality = QualityResult {
        quality_value,
        quality_rank,
        base_quality,
        enhancement_bonus: saturate(enhancement_bonus),
        artifact_bonus,
    };

    let crafted_item = build_item(recipe, &quality, consumption.used);
    let inventory = if materials_saved {
        inventory.clone()
    } else {
        consumption.inventory
    };

    tracing::debug!(
        "Crafted {} from {} (quality {} / {}, effects {:?}, saved {})",
        crafted_item.item_id,
        recipe.id(),
        quality.quality_value,
        quality.quality_rank,
        applied_effects,
        materials_saved
    );

    Ok(EnhancedCraftOutcome {
        crafted_item,
        inventory,
        quality,
        applied_effects,
        materials_saved,
    })
}

/// Validates the recipe and consumes all lines against a snapshot.
fn consume_recipe(inventory: &Inventory, recipe: &RecipeCard) -> EconomyResult<Consumption> {
    let check = can_craft(inventory, recipe);
    if let Some(first) = check.missing_materials.first() {
        return Err(EconomyError::InsufficientMaterials {
            material_id: first.material_id.clone(),
            required: first.required,
            available: first.available,
        });
    }
    inventory.consume_all(recipe.required_materials())
}

fn build_item(recipe: &RecipeCard, quality: &QualityResult, used: Vec<MaterialInstance>) -> CraftedItem {
    CraftedItem {
        item_id: recipe.output_item_id().to_string(),
        recipe_id: recipe.id().to_string(),
        category: recipe.category().to_string(),
        quality_value: quality.quality_value,
        quality_rank: quality.quality_rank,
        used_materials: used,
    }
}
