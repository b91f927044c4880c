//! # Player & Game State
//!
//! Small immutable records for the player's resources and the day/phase
//! cycle. Every mutation returns a new record and clamps its numeric fields:
//!
//! - `gold >= 0`
//! - `0 <= promotion_gauge <= max_promotion_gauge`
//! - `0 <= action_points <= max_action_points`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::card::Card;
use crate::config::EngineConfig;
use crate::effect::{apply_effects, Effect, EffectContext};
use crate::error::{EconomyError, EconomyResult};

/// Guild rank, lowest to highest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GuildRank {
    /// Apprentice.
    #[default]
    G,
    /// Novice.
    F,
    /// Journeyman.
    E,
    /// Adept.
    D,
    /// Expert.
    C,
    /// Veteran.
    B,
    /// Master.
    A,
    /// Grandmaster.
    S,
}

impl GuildRank {
    /// Every rank, lowest first.
    pub const ALL: [Self; 8] = [
        Self::G,
        Self::F,
        Self::E,
        Self::D,
        Self::C,
        Self::B,
        Self::A,
        Self::S,
    ];

    /// Position in the ladder, 1 (G) to 8 (S).
    #[inline]
    #[must_use]
    pub const fn order(self) -> u8 {
        self as u8 + 1
    }

    /// The next rank up, or `None` at the top.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::G => Some(Self::F),
            Self::F => Some(Self::E),
            Self::E => Some(Self::D),
            Self::D => Some(Self::C),
            Self::C => Some(Self::B),
            Self::B => Some(Self::A),
            Self::A => Some(Self::S),
            Self::S => None,
        }
    }

    /// Returns true if this rank unlocks content requiring `required`.
    #[inline]
    #[must_use]
    pub const fn unlocks(self, required: Self) -> bool {
        self.order() >= required.order()
    }
}

impl fmt::Display for GuildRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Phase of a game day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Pick a quest from the board.
    #[default]
    QuestAccept,
    /// Draft gathering locations.
    Gathering,
    /// Craft items.
    Alchemy,
    /// Deliver items for rewards.
    Delivery,
}

impl GamePhase {
    /// The following phase; `Delivery` wraps to `QuestAccept`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::QuestAccept => Self::Gathering,
            Self::Gathering => Self::Alchemy,
            Self::Alchemy => Self::Delivery,
            Self::Delivery => Self::QuestAccept,
        }
    }
}

/// The day/phase clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    phase: GamePhase,
    day: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Day 1, quest board.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: GamePhase::QuestAccept,
            day: 1,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current day, starting at 1.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Advances one phase. Wrapping back to the quest board starts a new day.
    #[must_use]
    pub const fn next_phase(&self) -> Self {
        let phase = self.phase.next();
        let day = if matches!(phase, GamePhase::QuestAccept) {
            self.day.saturating_add(1)
        } else {
            self.day
        };
        Self { phase, day }
    }
}

/// The player's resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerState {
    rank: GuildRank,
    gold: u32,
    promotion_gauge: u32,
    max_promotion_gauge: u32,
    action_points: u32,
    max_action_points: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl PlayerState {
    /// A fresh player with full action points.
    #[must_use]
    pub const fn new(config: &EngineConfig) -> Self {
        Self {
            rank: config.starting_rank,
            gold: config.starting_gold,
            promotion_gauge: 0,
            max_promotion_gauge: config.max_promotion_gauge,
            action_points: config.max_action_points,
            max_action_points: config.max_action_points,
        }
    }

    /// Guild rank.
    #[must_use]
    pub const fn rank(&self) -> GuildRank {
        self.rank
    }

    /// Gold on hand.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Accumulated contribution toward promotion.
    #[must_use]
    pub const fn promotion_gauge(&self) -> u32 {
        self.promotion_gauge
    }

    /// Gauge value at which promotion becomes available.
    #[must_use]
    pub const fn max_promotion_gauge(&self) -> u32 {
        self.max_promotion_gauge
    }

    /// Action points left today.
    #[must_use]
    pub const fn action_points(&self) -> u32 {
        self.action_points
    }

    /// Action points restored each day.
    #[must_use]
    pub const fn max_action_points(&self) -> u32 {
        self.max_action_points
    }

    /// Adds gold, saturating.
    #[must_use]
    pub const fn add_gold(&self, amount: u32) -> Self {
        Self {
            gold: self.gold.saturating_add(amount),
            ..*self
        }
    }

    /// Removes gold, never going below zero.
    #[must_use]
    pub const fn subtract_gold(&self, amount: u32) -> Self {
        Self {
            gold: self.gold.saturating_sub(amount),
            ..*self
        }
    }

    /// Adds a reward after `GOLD_BOOST` artifacts are applied.
    #[must_use]
    pub fn reward_gold(&self, amount: u32, artifacts: &[Artifact]) -> Self {
        let boosted = apply_effects(
            EffectContext::Gold,
            i64::from(amount),
            artifacts.iter().map(Artifact::effect),
        );
        self.add_gold(u32::try_from(boosted.max(0)).unwrap_or(u32::MAX))
    }

    /// Raises the promotion gauge, capped at its maximum.
    #[must_use]
    pub fn add_promotion_gauge(&self, amount: u32) -> Self {
        Self {
            promotion_gauge: self
                .promotion_gauge
                .saturating_add(amount)
                .min(self.max_promotion_gauge),
            ..*self
        }
    }

    /// Empties the promotion gauge.
    #[must_use]
    pub const fn reset_promotion_gauge(&self) -> Self {
        Self {
            promotion_gauge: 0,
            ..*self
        }
    }

    /// Returns true once the gauge is full and a higher rank exists.
    #[must_use]
    pub const fn is_promotion_ready(&self) -> bool {
        self.promotion_gauge >= self.max_promotion_gauge && self.rank.next().is_some()
    }

    /// Moves up one rank and empties the gauge. No change at the top rank.
    #[must_use]
    pub fn promote(&self) -> Self {
        match self.rank.next() {
            Some(rank) => {
                tracing::debug!("Promoted from {} to {}", self.rank, rank);
                Self {
                    rank,
                    promotion_gauge: 0,
                    ..*self
                }
            }
            None => *self,
        }
    }

    /// Removes action points, never going below zero.
    #[must_use]
    pub const fn consume_action_points(&self, amount: u32) -> Self {
        Self {
            action_points: self.action_points.saturating_sub(amount),
            ..*self
        }
    }

    /// Refills action points for a new day.
    #[must_use]
    pub const fn restore_action_points(&self) -> Self {
        Self {
            action_points: self.max_action_points,
            ..*self
        }
    }

    /// Returns true if `cost` action points are available.
    #[must_use]
    pub const fn can_afford_action(&self, cost: u32) -> bool {
        self.action_points >= cost
    }

    /// Action point cost of `card` after `COST_REDUCTION` effects.
    #[must_use]
    pub fn effective_card_cost<'a, I>(card: &Card, effects: I) -> u32
    where
        I: IntoIterator<Item = &'a Effect>,
    {
        let cost = apply_effects(EffectContext::Cost, i64::from(card.cost()), effects);
        u32::try_from(cost).unwrap_or(0)
    }

    /// Pays the action point cost of playing `card`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientActionPoints` if the reduced cost exceeds the
    /// points left.
    pub fn spend_for_card<'a, I>(&self, card: &Card, effects: I) -> EconomyResult<Self>
    where
        I: IntoIterator<Item = &'a Effect>,
    {
        let cost = Self::effective_card_cost(card, effects);
        if !self.can_afford_action(cost) {
            return Err(EconomyError::InsufficientActionPoints {
                required: cost,
                available: self.action_points,
            });
        }
        Ok(self.consume_action_points(cost))
    }
}
