//! # Economy Error Types
//!
//! All errors that can occur while resolving a game economy operation.
//!
//! Every variant renders to a short, stable message so the presentation
//! layer can tell failures apart without inspecting numeric state.

use thiserror::Error;

/// Broad classification of an [`EconomyError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller passed something that does not exist or is not allowed here.
    Validation,
    /// The player lacks a resource; a different action may succeed.
    Resource,
    /// A domain contract was broken by the caller (programmer error).
    Invariant,
    /// Master data or engine configuration is malformed.
    Configuration,
}

/// Errors that can occur in the economy engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// Card id does not exist where it was looked up.
    #[error("card not found")]
    CardNotFound(String),

    /// Shop item id does not exist in the catalog.
    #[error("item not found")]
    ItemNotFound(String),

    /// Material id does not exist in the master data.
    #[error("material not found")]
    MaterialNotFound(String),

    /// The selected card is not part of the current draft pool.
    #[error("card not in pool")]
    CardNotInPool(String),

    /// The card to use is not in the player's hand.
    #[error("card not in hand")]
    CardNotInHand(String),

    /// The deck already holds its maximum number of cards.
    #[error("deck at capacity")]
    DeckFull {
        /// Maximum number of cards the deck may hold.
        capacity: usize,
    },

    /// Not enough materials to satisfy a requirement.
    #[error("insufficient materials")]
    InsufficientMaterials {
        /// The material that was short.
        material_id: String,
        /// The amount required.
        required: u32,
        /// The amount available at the requested quality.
        available: u32,
    },

    /// Not enough gold for a purchase.
    #[error("insufficient gold")]
    InsufficientGold {
        /// Price of the item.
        required: u32,
        /// Gold on hand.
        available: u32,
    },

    /// The shop has no stock left for an item.
    #[error("insufficient stock")]
    InsufficientStock(String),

    /// Not enough action points left to play a card.
    #[error("insufficient action points")]
    InsufficientActionPoints {
        /// Points the action costs.
        required: u32,
        /// Points left.
        available: u32,
    },

    /// The guild rank is too low to unlock an item.
    #[error("rank too low")]
    RankTooLow {
        /// Rank order the item requires.
        required: u8,
        /// Rank order the player holds.
        current: u8,
    },

    /// A draft operation was attempted after the final round.
    #[error("draft already complete")]
    DraftComplete,

    /// A card was selected before any pool was generated.
    #[error("draft pool is empty")]
    PoolEmpty,

    /// Invalid master data or configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EconomyError {
    /// Returns the broad category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::CardNotFound(_)
            | Self::ItemNotFound(_)
            | Self::MaterialNotFound(_)
            | Self::CardNotInPool(_)
            | Self::CardNotInHand(_)
            | Self::DeckFull { .. } => ErrorCategory::Validation,
            Self::InsufficientMaterials { .. }
            | Self::InsufficientGold { .. }
            | Self::InsufficientStock(_)
            | Self::InsufficientActionPoints { .. }
            | Self::RankTooLow { .. } => ErrorCategory::Resource,
            Self::DraftComplete | Self::PoolEmpty => ErrorCategory::Invariant,
            Self::InvalidConfig(_) => ErrorCategory::Configuration,
        }
    }

    /// Returns true if the player can recover by taking a different action.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Validation | ErrorCategory::Resource)
    }
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
