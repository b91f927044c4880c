//! # Quality Resolution
//!
//! Quality is tracked two ways:
//!
//! - **Rank** ([`QualityRank`]): the six-letter grade stored on material stacks
//!   and crafted items, ordered `E < D < C < B < A < S`.
//! - **Value**: an integer in `0..=100` used for arithmetic.
//!
//! ## Scale
//!
//! | Rank | Value | Final value band |
//! |------|-------|------------------|
//! | S    | 100   | `>= 90`          |
//! | A    | 90    | `>= 70`          |
//! | B    | 70    | `>= 50`          |
//! | C    | 50    | `>= 30`          |
//! | D    | 30    | `>= 10`          |
//! | E    | 10    | below 10         |
//!
//! A crafted item's value is the quantity-weighted average of its inputs
//! plus every `QUALITY_UP` bonus, clamped to `0..=100` before banding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::card::EnhancementCard;
use crate::effect::{additive_bonus, EffectContext};
use crate::material::MaterialInstance;

/// Lowest quality value.
pub const MIN_QUALITY_VALUE: u32 = 0;

/// Highest quality value.
pub const MAX_QUALITY_VALUE: u32 = 100;

/// Quality grade, lowest to highest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityRank {
    /// Crude.
    E,
    /// Poor.
    D,
    /// Standard.
    #[default]
    C,
    /// Good.
    B,
    /// Excellent.
    A,
    /// Masterwork.
    S,
}

impl QualityRank {
    /// Every rank, lowest first.
    pub const ALL: [Self; 6] = [Self::E, Self::D, Self::C, Self::B, Self::A, Self::S];

    /// Band thresholds, highest first. A value belongs to the first band whose
    /// lower bound it reaches.
    const BANDS: [(i64, Self); 5] = [
        (90, Self::S),
        (70, Self::A),
        (50, Self::B),
        (30, Self::C),
        (10, Self::D),
    ];

    /// Numeric value of this rank.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::E => 10,
            Self::D => 30,
            Self::C => 50,
            Self::B => 70,
            Self::A => 90,
            Self::S => 100,
        }
    }

    /// Bands a quality value into a rank. Anything below the lowest band,
    /// including negative values, is `E`.
    #[must_use]
    pub fn from_value(value: i64) -> Self {
        Self::BANDS
            .iter()
            .find(|(floor, _)| value >= *floor)
            .map_or(Self::E, |&(_, rank)| rank)
    }
}

impl fmt::Display for QualityRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::E => "E",
            Self::D => "D",
            Self::C => "C",
            Self::B => "B",
            Self::A => "A",
            Self::S => "S",
        };
        f.write_str(letter)
    }
}

/// Breakdown of a quality calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityResult {
    /// Final clamped value.
    pub quality_value: u32,
    /// Band of the final value.
    pub quality_rank: QualityRank,
    /// Weighted average of the inputs.
    pub base_quality: u32,
    /// Sum of enhancement `QUALITY_UP` values.
    pub enhancement_bonus: i32,
    /// Sum of artifact `QUALITY_UP` values.
    pub artifact_bonus: i32,
}

/// Quantity-weighted average quality value, rounded half up.
///
/// Empty input (or zero total quantity) yields the value of `C`.
#[must_use]
pub fn calculate_base_quality(materials: &[MaterialInstance]) -> u32 {
    let (weighted, total) = materials.iter().fold((0u64, 0u64), |(weighted, total), m| {
        let quantity = u64::from(m.quantity());
        (
            weighted + u64::from(m.quality().value()) * quantity,
            total + quantity,
        )
    });
    if total == 0 {
        return QualityRank::C.value();
    }
    let average = (weighted * 2 + total) / (total * 2);
    u32::try_from(average).unwrap_or(MAX_QUALITY_VALUE)
}

/// Sum of `QUALITY_UP` values across enhancement cards.
#[must_use]
pub fn apply_enhancement_bonus(enhancements: &[EnhancementCard]) -> i32 {
    saturate(additive_bonus(
        EffectContext::Quality,
        enhancements.iter().map(EnhancementCard::effect),
    ))
}

/// Sum of `QUALITY_UP` values across artifacts.
#[must_use]
pub fn apply_artifact_bonus(artifacts: &[Artifact]) -> i32 {
    saturate(additive_bonus(
        EffectContext::Quality,
        artifacts.iter().map(Artifact::effect),
    ))
}

/// Clamps `base + bonus` into `0..=100` and bands it.
#[must_use]
pub fn resolve_quality(base: u32, bonus: i64) -> (u32, QualityRank) {
    let raw = i64::from(base) + bonus;
    let clamped = raw.clamp(i64::from(MIN_QUALITY_VALUE), i64::from(MAX_QUALITY_VALUE));
    let value = u32::try_from(clamped).unwrap_or(MIN_QUALITY_VALUE);
    (value, QualityRank::from_value(clamped))
}

/// Full quality calculation for a set of inputs and bonuses.
#[must_use]
pub fn calculate_final_quality(
    materials: &[MaterialInstance],
    enhancements: &[EnhancementCard],
    artifacts: &[Artifact],
) -> QualityResult {
    let base_quality = calculate_base_quality(materials);
    let enhancement_bonus = apply_enhancement_bonus(enhancements);
    let artifact_bonus = apply_artifact_bonus(artifacts);
    let (quality_value, quality_rank) = resolve_quality(
        base_quality,
        i64::from(enhancement_bonus) + i64::from(artifact_bonus),
    );
    QualityResult {
        quality_value,
        quality_rank,
        base_quality,
        enhancement_bonus,
        artifact_bonus,
    }
}

/// Narrows a bonus sum to `i32`, saturating at the bounds.
pub(crate) fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value > 0 { i32::MAX } else { i32::MIN })
}
