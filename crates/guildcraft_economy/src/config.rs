//! # Engine Configuration
//!
//! Balance numbers that are not part of the card/material master data.
//! Loaded once at startup from TOML; every field has a default so a partial
//! file (or none at all) is valid.
//!
//! ```toml
//! deck_capacity = 30
//! draft_rounds = 3
//! draft_pool_size = 3
//! hand_size = 5
//! max_action_points = 3
//! max_promotion_gauge = 100
//! starting_gold = 100
//! starting_rank = "G"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};
use crate::state::GuildRank;

/// Default hard cap on cards in a deck.
pub const DEFAULT_DECK_CAPACITY: usize = 30;

/// Tunable engine parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Most cards a deck may hold across all piles.
    pub deck_capacity: usize,
    /// Rounds in one gathering draft.
    pub draft_rounds: u32,
    /// Cards offered per draft round.
    pub draft_pool_size: usize,
    /// Cards drawn at the start of a turn.
    pub hand_size: usize,
    /// Action points restored each day.
    pub max_action_points: u32,
    /// Promotion gauge needed to attempt promotion.
    pub max_promotion_gauge: u32,
    /// Gold a new player starts with.
    pub starting_gold: u32,
    /// Guild rank a new player starts with.
    pub starting_rank: GuildRank,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deck_capacity: DEFAULT_DECK_CAPACITY,
            draft_rounds: 3,
            draft_pool_size: 3,
            hand_size: 5,
            max_action_points: 3,
            max_promotion_gauge: 100,
            starting_gold: 100,
            starting_rank: GuildRank::G,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML or out-of-range values.
    pub fn from_toml_str(source: &str) -> EconomyResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| EconomyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
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
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> EconomyResult<()> {
        let zero_field = [
            ("deck_capacity", self.deck_capacity == 0),
            ("draft_rounds", self.draft_rounds == 0),
            ("draft_pool_size", self.draft_pool_size == 0),
            ("hand_size", self.hand_size == 0),
            ("max_action_points", self.max_action_points == 0),
            ("max_promotion_gauge", self.max_promotion_gauge == 0),
        ]
        .into_iter()
        .find(|(_, is_zero)| *is_zero);

        if let Some((field, _)) = zero_field {
            return Err(EconomyError::InvalidConfig(format!("{field} must be positive")));
        }
        if self.hand_size > self.deck_capacity {
            return Err(EconomyError::InvalidConfig(
                "hand_size cannot exceed deck_capacity".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.deck_capacity, 30);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str("draft_rounds = 5\nstarting_rank = \"D\"").unwrap();
        assert_eq!(config.draft_rounds, 5);
        assert_eq!(config.starting_rank, GuildRank::D);
        assert_eq!(config.hand_size, 5);
    }

    #[test]
    fn test_rejects_zero_values() {
        let err = EngineConfig::from_toml_str("draft_pool_size = 0").unwrap_err();
        assert_eq!(
            err,
            EconomyError::InvalidConfig("draft_pool_size must be positive".to_string())
        );
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("deck_capacity = \"lots\""),
            Err(EconomyError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = EngineConfig::load("/definitely/not/here/engine.toml");
        assert!(matches!(result, Err(EconomyError::InvalidConfig(_))));
    }
}
