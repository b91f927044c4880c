//! # Deck Cycling
//!
//! **Three-Pile Deck with Bounded Reshuffle**
//!
//! A deck is split into a draw pile, a hand and a discard pile. The three are
//! disjoint and every operation except [`Deck::add_card`] and
//! [`Deck::remove_card`] preserves the total card count.
//!
//! ## Draw Rule
//!
//! When the draw pile runs out mid-draw, the discard pile is shuffled back
//! into it once. A second exhaustion in the same call ends the draw early
//! with whatever was drawn; that is not an error.
//!
//! ## Example
//!
//! ```rust,ignore
//! let (deck, drawn) = deck.draw(config.hand_size, &mut rng);
//! let deck = deck.use_card(drawn[0].id())?;
//! let deck = deck.discard_hand();
//! ```

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::config::{EngineConfig, DEFAULT_DECK_CAPACITY};
use crate::error::{EconomyError, EconomyResult};
use crate::rng::{shuffle, RandomSource};

/// A player's cards across draw pile, hand and discard pile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
    hand: Vec<Card>,
    discard_pile: Vec<Card>,
    capacity: usize,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            hand: Vec::new(),
            discard_pile: Vec::new(),
            capacity: DEFAULT_DECK_CAPACITY,
        }
    }
}

impl Deck {
    /// Creates a deck whose draw pile is `cards`, top first.
    ///
    /// Capacity only limits [`add_card`](Self::add_card); a starter deck may
    /// already hold more.
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self::with_capacity(cards, DEFAULT_DECK_CAPACITY)
    }

    /// Creates a deck with the capacity from `config`.
    #[must_use]
    pub fn from_config(cards: Vec<Card>, config: &EngineConfig) -> Self {
        Self::with_capacity(cards, config.deck_capacity)
    }

    /// Creates a deck with an explicit capacity.
    #[must_use]
    pub fn with_capacity(cards: Vec<Card>, capacity: usize) -> Self {
        Self {
            cards,
            capacity,
            ..Self::default()
        }
    }

    /// Draw pile, top first.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards in hand, in draw order.
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Discard pile, oldest first.
    #[must_use]
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    /// Most cards the deck may hold.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cards across all three piles.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len() + self.hand.len() + self.discard_pile.len()
    }

    /// Draws up to `count` cards into the hand.
    ///
    /// Returns the new deck and the cards drawn, in draw order. Fewer than
    /// `count` cards come back when both piles run dry.
    #[must_use]
    pub fn draw<R: RandomSource + ?Sized>(&self, count: usize, rng: &mut R) -> (Self, Vec<Card>) {
        let mut next = self.clone();
        let mut drawn = Vec::with_capacity(count);
        let mut reshuffled = false;

        while drawn.len() < count {
            if next.cards.is_empty() {
                if reshuffled || next.discard_pile.is_empty() {
                    break;
                }
                next.cards = std::mem::take(&mut next.discard_pile);
                shuffle(&mut next.cards, rng);
                reshuffled = true;
                tracing::debug!("Reshuffled {} discarded cards into the draw pile", next.cards.len());
            }
            // Top of the pile is index 0
            let card = next.cards.remove(0);
            drawn.push(card);
        }

        next.hand.extend(drawn.iter().cloned());
        (next, drawn)
    }

    /// Moves a card from the hand to the discard pile.
    ///
    /// # Errors
    ///
    /// Returns `CardNotInHand` if no card in hand has `card_id`.
    pub fn use_card(&self, card_id: &str) -> EconomyResult<Self> {
        let index = self
            .hand
            .iter()
            .position(|card| card.id() == card_id)
            .ok_or_else(|| EconomyError::CardNotInHand(card_id.to_string()))?;

        let mut next = self.clone();
        let card = next.hand.remove(index);
        next.discard_pile.push(card);
        Ok(next)
    }

    /// Puts a new card at the bottom of the draw pile.
    ///
    /// # Errors
    ///
    /// Returns `DeckFull` if the deck is at capacity.
    pub fn add_card(&self, card: Card) -> EconomyResult<Self> {
        if self.total_cards() >= self.capacity {
            return Err(EconomyError::DeckFull {
                capacity: self.capacity,
            });
        }
        let mut next = self.clone();
        next.cards.push(card);
        Ok(next)
    }

    /// Removes a card for good, looking in the draw pile first and then the
    /// discard pile. Cards in hand cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` if neither pile holds `card_id`.
    pub fn remove_card(&self, card_id: &str) -> EconomyResult<Self> {
        let mut next = self.clone();
        if let Some(index) = next.cards.iter().position(|card| card.id() == card_id) {
            next.cards.remove(index);
            return Ok(next);
        }
        if let Some(index) = next.discard_pile.iter().position(|card| card.id() == card_id) {
            next.discard_pile.remove(index);
            return Ok(next);
        }
        Err(EconomyError::CardNotFound(card_id.to_string()))
    }

    /// Shuffles the draw pile.
    #[must_use]
    pub fn shuffle<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Self {
        let mut next = self.clone();
        shuffle(&mut next.cards, rng);
        next
    }

    /// Moves the whole hand to the discard pile.
    #[must_use]
    pub fn discard_hand(&self) -> Self {
        let mut next = self.clone();
        let hand = std::mem::take(&mut next.hand);
        next.discard_pile.extend(hand);
        next
    }
}
