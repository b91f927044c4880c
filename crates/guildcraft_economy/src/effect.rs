//! # Effects
//!
//! Enhancement cards and artifacts both carry an [`Effect`]. Rather than
//! scattering type checks across systems, every system resolves effects
//! through [`apply_effect`] with its own [`EffectContext`]. A context honors
//! a fixed whitelist of effect types and ignores everything else.
//!
//! | Context       | Honors            | Rule                              |
//! |---------------|-------------------|-----------------------------------|
//! | `Quality`     | `QUALITY_UP`      | `base + value`                    |
//! | `Probability` | `GATHERING_BONUS` | `base + value` percent, in bp     |
//! | `Cost`        | `COST_REDUCTION`  | `max(base - value, 0)`            |
//! | `Gold`        | `GOLD_BOOST`      | `base + base * value / 100`       |
//!
//! `MATERIAL_SAVE` is a trigger rather than a modifier and is resolved by the
//! alchemy system directly.

use serde::{Deserialize, Serialize};

use crate::rng::BASIS_POINTS;

/// The kind of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    /// Raises crafted quality by `value` points.
    QualityUp,
    /// `value` percent chance that crafting consumes no materials.
    MaterialSave,
    /// Raises every gathering roll chance by `value` percentage points.
    GatheringBonus,
    /// Lowers action point cost by `value`.
    CostReduction,
    /// Raises gold rewards by `value` percent.
    GoldBoost,
}

/// A typed effect with a signed magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    /// What the effect does.
    #[serde(rename = "type")]
    pub kind: EffectType,
    /// Magnitude; meaning depends on `kind`.
    pub value: i32,
}

impl Effect {
    /// Creates a new effect.
    #[inline]
    #[must_use]
    pub const fn new(kind: EffectType, value: i32) -> Self {
        Self { kind, value }
    }
}

/// The game action an enhancement card can be played on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetAction {
    /// Gathering (draft) actions.
    Gathering,
    /// Alchemy (crafting) actions.
    Alchemy,
    /// Quest delivery actions.
    Delivery,
    /// Any action.
    All,
}

impl TargetAction {
    /// Returns true if a card targeting `self` may be played on `action`.
    #[inline]
    #[must_use]
    pub fn covers(self, action: Self) -> bool {
        self == Self::All || self == action
    }
}

/// The calculation an effect is being applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectContext {
    /// Crafted quality value.
    Quality,
    /// Gathering roll chance, in basis points.
    Probability,
    /// Action point cost of a card.
    Cost,
    /// Gold reward.
    Gold,
}

impl EffectContext {
    /// Returns true if this context honors `kind`.
    #[inline]
    #[must_use]
    pub const fn honors(self, kind: EffectType) -> bool {
        matches!(
            (self, kind),
            (Self::Quality, EffectType::QualityUp)
                | (Self::Probability, EffectType::GatheringBonus)
                | (Self::Cost, EffectType::CostReduction)
                | (Self::Gold, EffectType::GoldBoost)
        )
    }
}

/// Applies a single effect to `base` within `context`.
///
/// Effects the context does not honor return `base` unchanged.
#[must_use]
pub fn apply_effect(context: EffectContext, base: i64, effect: &Effect) -> i64 {
    if !context.honors(effect.kind) {
        return base;
    }
    let value = i64::from(effect.value);
    match context {
        EffectContext::Quality => base + value,
        EffectContext::Probability => base + value * i64::from(BASIS_POINTS) / 100,
        EffectContext::Cost => (base - value).max(0),
        EffectContext::Gold => base + base * value / 100,
    }
}

/// Folds every effect over `base` in order.
#[must_use]
pub fn apply_effects<'a, I>(context: EffectContext, base: i64, effects: I) -> i64
where
    I: IntoIterator<Item = &'a Effect>,
{
    effects
        .into_iter()
        .fold(base, |acc, effect| apply_effect(context, acc, effect))
}

/// Sum of the contribution each honored effect makes on a zero base.
///
/// Only meaningful for additive contexts (`Quality`, `Probability`).
#[must_use]
pub fn additive_bonus<'a, I>(context: EffectContext, effects: I) -> i64
where
    I: IntoIterator<Item = &'a Effect>,
{
    apply_effects(context, 0, effects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_whitelists() {
        let quality = Effect::new(EffectType::QualityUp, 10);
        let save = Effect::new(EffectType::MaterialSave, 50);
        assert_eq!(apply_effect(EffectContext::Quality, 50, &quality), 60);
        assert_eq!(apply_effect(EffectContext::Quality, 50, &save), 50);
        assert_eq!(apply_effect(EffectContext::Gold, 50, &quality), 50);
        for context in [
            EffectContext::Quality,
            EffectContext::Probability,
            EffectContext::Cost,
            EffectContext::Gold,
        ] {
            assert!(!context.honors(EffectType::MaterialSave));
        }
    }

    #[test]
    fn test_cost_floor() {
        let reduce = Effect::new(EffectType::CostReduction, 5);
        assert_eq!(apply_effect(EffectContext::Cost, 2, &reduce), 0);
        assert_eq!(apply_effect(EffectContext::Cost, 7, &reduce), 2);
    }

    #[test]
    fn test_gold_and_probability() {
        let boost = Effect::new(EffectType::GoldBoost, 50);
        assert_eq!(apply_effect(EffectContext::Gold, 200, &boost), 300);
        let bonus = Effect::new(EffectType::GatheringBonus, 15);
        assert_eq!(apply_effect(EffectContext::Probability, 5_000, &bonus), 6_500);
    }

    #[test]
    fn test_additive_bonus_ignores_other_types() {
        let effects = [
            Effect::new(EffectType::QualityUp, 10),
            Effect::new(EffectType::GoldBoost, 99),
            Effect::new(EffectType::QualityUp, -3),
        ];
        assert_eq!(additive_bonus(EffectContext::Quality, &effects), 7);
    }

    #[test]
    fn test_target_all_covers_everything() {
        assert!(TargetAction::All.covers(TargetAction::Alchemy));
        assert!(TargetAction::Alchemy.covers(TargetAction::Alchemy));
        assert!(!TargetAction::Gathering.covers(TargetAction::Alchemy));
    }
}
