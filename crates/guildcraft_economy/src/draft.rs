//! # Draft Gathering
//!
//! **Round-Based Location Draft**
//!
//! Each gathering phase runs a short draft:
//!
//! 1. [`DraftState::generate_pool`] deals a pool of gathering cards
//! 2. [`DraftState::select_card`] picks one, rolls each of its yields and
//!    clears the pool
//! 3. Repeat until `current_round` reaches `max_rounds`
//!
//! Every yield is an independent Bernoulli trial with its own draw. Material
//! ids are resolved against master data before any roll happens, so a bad
//! card never consumes randomness.

use serde::{Deserialize, Serialize};

use crate::card::{EnhancementCard, GatheringCard};
use crate::config::EngineConfig;
use crate::effect::{apply_effects, Effect, EffectContext, TargetAction};
use crate::error::{EconomyError, EconomyResult};
use crate::material::{MaterialInstance, MaterialLookup};
use crate::quality::QualityRank;
use crate::rng::{roll_basis_points, shuffle, RandomSource, BASIS_POINTS};

/// Progress of one gathering draft.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    current_round: u32,
    max_rounds: u32,
    pool: Vec<GatheringCard>,
    selected_cards: Vec<GatheringCard>,
    obtained_materials: Vec<MaterialInstance>,
    is_complete: bool,
}

/// Result of picking a card from the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftPick {
    /// Draft after the pick.
    pub state: DraftState,
    /// Stacks won by this pick alone, in roll order.
    pub gathered: Vec<MaterialInstance>,
}

impl DraftState {
    /// A fresh draft of `max_rounds` rounds.
    #[must_use]
    pub const fn new(max_rounds: u32) -> Self {
        Self {
            current_round: 0,
            max_rounds,
            pool: Vec::new(),
            selected_cards: Vec::new(),
            obtained_materials: Vec::new(),
            is_complete: false,
        }
    }

    /// A fresh draft sized by `config.draft_rounds`.
    #[must_use]
    pub const fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.draft_rounds)
    }

    /// Rounds dealt so far.
    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Rounds in this draft.
    #[must_use]
    pub const fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Cards on offer this round.
    #[must_use]
    pub fn pool(&self) -> &[GatheringCard] {
        &self.pool
    }

    /// Cards picked so far, in pick order.
    #[must_use]
    pub fn selected_cards(&self) -> &[GatheringCard] {
        &self.selected_cards
    }

    /// Every stack won so far.
    #[must_use]
    pub fn obtained_materials(&self) -> &[MaterialInstance] {
        &self.obtained_materials
    }

    /// True once the final round has been picked.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Deals the next round's pool.
    ///
    /// The available cards are shuffled and the first `pool_size` (or all of
    /// them, if fewer) become the pool. Any unpicked pool is replaced.
    ///
    /// # Errors
    ///
    /// Returns `DraftComplete` if the draft is over.
    pub fn generate_pool<R: RandomSource + ?Sized>(
        &self,
        available: &[GatheringCard],
        pool_size: usize,
        rng: &mut R,
    ) -> EconomyResult<Self> {
        if self.is_complete {
            return Err(EconomyError::DraftComplete);
        }

        let mut deck = available.to_vec();
        shuffle(&mut deck, rng);
        deck.truncate(pool_size);

        let mut next = self.clone();
        next.pool = deck;
        next.current_round = self.current_round.saturating_add(1);
        tracing::debug!(
            "Draft round {}/{}: dealt {} cards",
            next.current_round,
            next.max_rounds,
            next.pool.len()
        );
        Ok(next)
    }

    /// Picks `card_id` from the pool and rolls its yields.
    ///
    /// # Errors
    ///
    /// - `PoolEmpty` if no pool has been dealt
    /// - `CardNotInPool` if the card is not on offer
    /// - `MaterialNotFound` if a yield names an unknown material
    pub fn select_card<L, R>(&self, card_id: &str, materials: &L, rng: &mut R) -> EconomyResult<DraftPick>
    where
        L: MaterialLookup + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.pick(card_id, materials, &[], rng)
    }

    /// Like [`select_card`](Self::select_card), with `GATHERING_BONUS`
    /// enhancements raising every yield chance. Only cards targeting
    /// `GATHERING` or `ALL` count; chances are capped at 100%.
    ///
    /// # Errors
    ///
    /// Same as [`select_card`](Self::select_card).
    pub fn select_card_with_enhancements<L, R>(
        &self,
        card_id: &str,
        materials: &L,
        enhancements: &[EnhancementCard],
        rng: &mut R,
    ) -> EconomyResult<DraftPick>
    where
        L: MaterialLookup + ?Sized,
        R: RandomSource + ?Sized,
    {
        let effects: Vec<Effect> = enhancements
            .iter()
            .filter(|card| card.can_apply_to(TargetAction::Gathering))
            .map(|card| *card.effect())
            .collect();
        self.pick(card_id, materials, &effects, rng)
    }

    fn pick<L, R>(&self, card_id: &str, materials: &L, effects: &[Effect], rng: &mut R) -> EconomyResult<DraftPick>
    where
        L: MaterialLookup + ?Sized,
        R: RandomSource + ?Sized,
    {
        if self.pool.is_empty() {
            return Err(EconomyError::PoolEmpty);
        }
        let card = self
            .pool
            .iter()
            .find(|card| card.id() == card_id)
            .ok_or_else(|| EconomyError::CardNotInPool(card_id.to_string()))?;

        let qualities = card
            .materials()
            .iter()
            .map(|entry| {
                let material = materials
                    .find_material(&entry.material_id)
                    .ok_or_else(|| EconomyError::MaterialNotFound(entry.material_id.clone()))?;
                Ok(entry.quality.unwrap_or_else(|| material.base_quality()))
            })
            .collect::<EconomyResult<Vec<QualityRank>>>()?;

        let mut gathered = Vec::new();
        for (entry, quality) in card.materials().iter().zip(qualities) {
            let chance = apply_effects(EffectContext::Probability, i64::from(entry.probability_bp), effects)
                .clamp(0, i64::from(BASIS_POINTS));
            let chance = u32::try_from(chance).unwrap_or(BASIS_POINTS);
            if roll_basis_points(rng, chance) {
                gathered.push(MaterialInstance::new(entry.material_id.clone(), quality, entry.quantity));
            }
        }

        let mut next = self.clone();
        next.pool.clear();
        next.selected_cards.push(card.clone());
        next.obtained_materials.extend(gathered.iter().cloned());
        next.is_complete = next.current_round >= next.max_rounds;

        tracing::debug!(
            "Selected {} in round {}: gathered {} stacks{}",
            card_id,
            next.current_round,
            gathered.len(),
            if next.is_complete { ", draft complete" } else { "" }
        );

        Ok(DraftPick { state: next, gathered })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardInfo, GatheringMaterial};
    use crate::effect::EffectType;
    use crate::material::Material;
    use crate::rng::{seeded, FixedRoll};

    fn catalog() -> Vec<Material> {
        vec![
            Material::new("herb", "Herb", QualityRank::C),
            Material::new("moss", "Moss", QualityRank::D),
        ]
    }

    fn location(id: &str, entries: Vec<GatheringMaterial>) -> GatheringCard {
        GatheringCard::new(CardInfo::new(id, id), 1, entries).unwrap()
    }

    fn forest() -> GatheringCard {
        location(
            "forest",
            vec![
                GatheringMaterial::new("herb", 2, BASIS_POINTS),
                GatheringMaterial::new("moss", 1, 5_000).with_quality(QualityRank::A),
            ],
        )
    }

    fn pool_of(cards: &[GatheringCard]) -> DraftState {
        DraftState::new(2).generate_pool(cards, 3, &mut FixedRoll::LOW).unwrap()
    }

    #[test]
    fn test_pool_is_bounded_by_available() {
        let cards = vec![forest(), location("cave", vec![])];
        let state = DraftState::new(3).generate_pool(&cards, 5, &mut seeded(1)).unwrap();
        assert_eq!(state.pool().len(), 2);
        assert_eq!(state.current_round(), 1);

        let state = state.generate_pool(&cards, 1, &mut seeded(2)).unwrap();
        assert_eq!(state.pool().len(), 1);
        assert_eq!(state.current_round(), 2);
    }

    #[test]
    fn test_select_requires_pool() {
        let err = DraftState::new(1)
            .select_card("forest", &catalog(), &mut FixedRoll::LOW)
            .unwrap_err();
        assert_eq!(err, EconomyError::PoolEmpty);

        let state = pool_of(&[forest()]);
        let err = state.select_card("swamp", &catalog(), &mut FixedRoll::LOW).unwrap_err();
        assert_eq!(err, EconomyError::CardNotInPool("swamp".to_string()));
    }

    #[test]
    fn test_select_rolls_each_entry() {
        let state = pool_of(&[forest()]);

        let pick = state.select_card("forest", &catalog(), &mut FixedRoll::LOW).unwrap();
        assert_eq!(
            pick.gathered,
            vec![
                MaterialInstance::new("herb", QualityRank::C, 2),
                MaterialInstance::new("moss", QualityRank::A, 1),
            ]
        );
        assert!(pick.state.pool().is_empty());
        assert_eq!(pick.state.selected_cards().len(), 1);
        assert!(!pick.state.is_complete());

        let pick = state.select_card("forest", &catalog(), &mut FixedRoll::HIGH).unwrap();
        assert_eq!(pick.gathered, vec![MaterialInstance::new("herb", QualityRank::C, 2)]);
    }

    #[test]
    fn test_unknown_material_fails_before_rolling() {
        let bad = location("bog", vec![GatheringMaterial::new("slime", 1, BASIS_POINTS)]);
        let state = pool_of(&[bad]);
        let err = state.select_card("bog", &catalog(), &mut FixedRoll::LOW).unwrap_err();
        assert_eq!(err, EconomyError::MaterialNotFound("slime".to_string()));
    }

    #[test]
    fn test_completion_by_rounds() {
        let cards = [forest()];
        let mut state = DraftState::new(2);
        for _ in 0..2 {
            state = state.generate_pool(&cards, 3, &mut FixedRoll::LOW).unwrap();
            state = state.select_card("forest", &catalog(), &mut FixedRoll::LOW).unwrap().state;
        }
        assert!(state.is_complete());
        assert_eq!(state.obtained_materials().len(), 4);
        assert_eq!(
            state.generate_pool(&cards, 3, &mut FixedRoll::LOW).unwrap_err(),
            EconomyError::DraftComplete
        );
    }

    #[test]
    fn test_gathering_bonus_raises_chance() {
        let state = pool_of(&[location("marsh", vec![GatheringMaterial::new("moss", 1, 0)])]);
        let bonus = EnhancementCard::new(
            CardInfo::new("lure", "Lure"),
            Effect::new(EffectType::GatheringBonus, 100),
            TargetAction::Gathering,
        );
        let off_target = EnhancementCard::new(
            CardInfo::new("still", "Still"),
            Effect::new(EffectType::GatheringBonus, 100),
            TargetAction::Alchemy,
        );

        let pick = state
            .select_card_with_enhancements("marsh", &catalog(), &[off_target], &mut FixedRoll::LOW)
            .unwrap();
        assert!(pick.gathered.is_empty());

        let pick = state
            .select_card_with_enhancements("marsh", &catalog(), &[bonus], &mut FixedRoll::HIGH)
            .unwrap();
        assert_eq!(pick.gathered, vec![MaterialInstance::new("moss", QualityRank::D, 1)]);
    }
}
