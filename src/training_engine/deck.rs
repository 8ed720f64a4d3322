//! The 52-card deck and the two deals the drills need.
//!
//! Dealing draws distinct cards by partially shuffling a fresh deck, so a
//! seeded rng always produces the same cards.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::training_engine::models::{Card, Rank, Suit};

pub const DECK_SIZE: usize = 52;

/// Every card, suit by suit, each suit deuce to ace.
pub fn full_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::DESCENDING.iter().rev().map(move |&rank| Card { rank, suit }))
        .collect()
}

/// Three distinct cards.
pub fn deal_flop<R: Rng + ?Sized>(rng: &mut R) -> [Card; 3] {
    let mut deck = full_deck();
    let (flop, _) = deck.partial_shuffle(rng, 3);
    [flop[0], flop[1], flop[2]]
}

/// Two distinct cards.
pub fn deal_hole_cards<R: Rng + ?Sized>(rng: &mut R) -> (Card, Card) {
    let mut deck = full_deck();
    let (hole, _) = deck.partial_shuffle(rng, 2);
    (hole[0], hole[1])
}
