//! # Artifacts
//!
//! Passive relics the player owns. Each carries one [`Effect`] that applies
//! to every action it is relevant to.

use serde::{Deserialize, Serialize};

use crate::card::Rarity;
use crate::effect::Effect;

/// Unique identifier for an artifact.
pub type ArtifactId = String;

/// How an artifact entered the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionType {
    /// Bought in the guild shop.
    Shop,
    /// Awarded on promotion.
    Promotion,
}

/// An artifact definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    id: ArtifactId,
    name: String,
    effect: Effect,
    #[serde(default)]
    rarity: Rarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    acquisition_type: Option<AcquisitionType>,
}

impl Artifact {
    /// Creates a common artifact.
    #[must_use]
    pub fn new(id: impl Into<ArtifactId>, name: impl Into<String>, effect: Effect) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            effect,
            rarity: Rarity::Common,
            acquisition_type: None,
        }
    }

    /// Sets the rarity.
    #[must_use]
    pub const fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Sets how the artifact is acquired.
    #[must_use]
    pub const fn with_acquisition(mut self, acquisition: AcquisitionType) -> Self {
        self.acquisition_type = Some(acquisition);
        self
    }

    /// Artifact id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The carried effect.
    #[must_use]
    pub const fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Rarity tier.
    #[must_use]
    pub const fn rarity(&self) -> Rarity {
        self.rarity
    }

    /// Rarity as an integer weight, 1 to 5.
    #[must_use]
    pub const fn rarity_weight(&self) -> u8 {
        self.rarity.weight()
    }

    /// How the artifact is acquired, if recorded.
    #[must_use]
    pub const fn acquisition_type(&self) -> Option<AcquisitionType> {
        self.acquisition_type
    }
}
