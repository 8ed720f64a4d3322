//! The 169 canonical starting-hand classes.
//!
//! A [`Hand`] is a class, not two concrete cards: `AKs` stands for the four
//! suited ace-king combos. Classes map one-to-one onto a 13×13 grid indexed by
//! [`Rank::index`]:
//!
//! ```text
//!        A    K    Q   ...
//!   A   AA   AKs  AQs
//!   K   AKo  KK   KQs
//!   Q   AQo  KQo  QQ
//! ```
//!
//! `row == col` is a pair, `row < col` is suited, `row > col` is offsuit.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::training_engine::{
    deck::deal_hole_cards,
    equity,
    models::{Card, Rank},
};

pub const GRID_SIZE: usize = 13;
pub const HAND_CLASSES: usize = 169;

/// Equity reported for notation that does not name one of the 169 classes.
/// A coin flip, so an unknown hand never looks like a free win or a sure loss.
pub const UNKNOWN_EQUITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Pair,
    Suited,
    Offsuit,
}

impl Shape {
    pub fn combos(self) -> u32 {
        match self {
            Shape::Pair    => 6,
            Shape::Suited  => 4,
            Shape::Offsuit => 12,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Shape::Pair    => "",
            Shape::Suited  => "s",
            Shape::Offsuit => "o",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Pair    => write!(f, "pair"),
            Shape::Suited  => write!(f, "suited"),
            Shape::Offsuit => write!(f, "offsuit"),
        }
    }
}

/// One of the 169 starting-hand classes. Immutable, `Copy`, and serialised as
/// its canonical notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hand {
    high: Rank,
    low: Rank,
    shape: Shape,
}

impl Hand {
    /// Ranks may come in either order. A pair ignores `suited`.
    pub fn new(a: Rank, b: Rank, suited: bool) -> Self {
        let (high, low) = if a >= b { (a, b) } else { (b, a) };
        let shape = if high == low {
            Shape::Pair
        } else if suited {
            Shape::Suited
        } else {
            Shape::Offsuit
        };
        Hand { high, low, shape }
    }

    /// Parse 2–3 character notation: two ranks in any order plus an optional
    /// `s`/`o` suffix. Unpaired hands without a suffix are offsuit; a suffix on
    /// a pair is dropped.
    pub fn parse(notation: &str) -> Result<Hand, TutorError> {
        let trimmed = notation.trim();
        let chars: Vec<char> = trimmed.chars().collect();
        if chars.len() < 2 || chars.len() > 3 {
            return Err(TutorError::invalid_notation(notation, "expected 2 or 3 characters"));
        }

        let first = Rank::from_char(chars[0])
            .ok_or_else(|| TutorError::invalid_notation(notation, "unknown rank"))?;
        let second = Rank::from_char(chars[1])
            .ok_or_else(|| TutorError::invalid_notation(notation, "unknown rank"))?;

        let suited = match chars.get(2).map(|c| c.to_ascii_lowercase()) {
            None | Some('o') => false,
            Some('s') => true,
            Some(_) => return Err(TutorError::invalid_notation(notation, "suffix must be 's' or 'o'")),
        };

        Ok(Hand::new(first, second, suited))
    }

    /// The class two concrete hole cards belong to.
    pub fn from_cards(a: Card, b: Card) -> Self {
        Hand::new(a.rank, b.rank, a.suit == b.suit)
    }

    pub fn from_grid(row: usize, col: usize) -> Option<Hand> {
        let r = Rank::from_index(row)?;
        let c = Rank::from_index(col)?;
        Some(match row.cmp(&col) {
            Ordering::Equal   => Hand { high: r, low: r, shape: Shape::Pair },
            Ordering::Less    => Hand { high: r, low: c, shape: Shape::Suited },
            Ordering::Greater => Hand { high: c, low: r, shape: Shape::Offsuit },
        })
    }

    pub fn grid_coord(self) -> (usize, usize) {
        let (h, l) = (self.high.index(), self.low.index());
        match self.shape {
            Shape::Pair | Shape::Suited => (h, l),
            Shape::Offsuit => (l, h),
        }
    }

    /// Row-major cell index, `0..169`.
    pub fn grid_index(self) -> usize {
        let (row, col) = self.grid_coord();
        row * GRID_SIZE + col
    }

    pub fn high(self) -> Rank {
        self.high
    }

    pub fn low(self) -> Rank {
        self.low
    }

    pub fn shape(self) -> Shape {
        self.shape
    }

    pub fn is_pair(self) -> bool {
        self.shape == Shape::Pair
    }

    pub fn is_suited(self) -> bool {
        self.shape == Shape::Suited
    }

    /// Physical card combinations in this class: 6, 4 or 12.
    pub fn combos(self) -> u32 {
        self.shape.combos()
    }

    /// Heads-up all-in equity against a uniformly random hand, `0.0..=1.0`.
    pub fn equity(self) -> f64 {
        let (row, col) = self.grid_coord();
        equity::PREFLOP_EQUITY[row][col]
    }

    pub fn notation(self) -> String {
        format!("{}{}{}", self.high, self.low, self.shape.suffix())
    }

    fn sort_key(self) -> (usize, usize, Shape) {
        (self.high.index(), self.low.index(), self.shape)
    }
}

/// Orders hands the way [`enumerate_all`] yields them: strongest high card
/// first, then strongest kicker, then pair/suited/offsuit.
impl Ord for Hand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.high, self.low, self.shape.suffix())
    }
}

impl FromStr for Hand {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hand::parse(s)
    }
}

impl TryFrom<String> for Hand {
    type Error = TutorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Hand::parse(&value)
    }
}

impl From<Hand> for String {
    fn from(hand: Hand) -> Self {
        hand.notation()
    }
}

/// Canonical notation for `notation`: high rank first, pairs without suffix,
/// unpaired hands defaulting to offsuit. Idempotent.
pub fn normalize(notation: &str) -> Result<String, TutorError> {
    Hand::parse(notation).map(Hand::notation)
}

/// Table equity for arbitrary notation, [`UNKNOWN_EQUITY`] when it does not
/// parse.
pub fn equity_for(notation: &str) -> f64 {
    match Hand::parse(notation) {
        Ok(hand) => hand.equity(),
        Err(err) => {
            tracing::debug!(%err, "equity lookup fell back to the unknown-hand sentinel");
            UNKNOWN_EQUITY
        }
    }
}

/// All 169 classes in a fixed order: for each high rank (Ace down), its pair,
/// then for each lower kicker the suited and the offsuit class.
pub fn enumerate_all() -> &'static [Hand] {
    static ALL: OnceLock<Vec<Hand>> = OnceLock::new();
    ALL.get_or_init(|| {
        let mut hands = Vec::with_capacity(HAND_CLASSES);
        for (i, &high) in Rank::DESCENDING.iter().enumerate() {
            hands.push(Hand { high, low: high, shape: Shape::Pair });
            for &low in &Rank::DESCENDING[i + 1..] {
                hands.push(Hand { high, low, shape: Shape::Suited });
                hands.push(Hand { high, low, shape: Shape::Offsuit });
            }
        }
        hands
    })
}

/// Uniform over the 169 classes.
///
/// This is not how cards are dealt: a pair class is picked 13 times in 169
/// here, while real deals produce pairs only 78 times in 1,326. Use
/// [`random_hand_weighted`] when deal frequency matters.
pub fn random_hand<R: Rng + ?Sized>(rng: &mut R) -> Hand {
    let all = enumerate_all();
    all[rng.gen_range(0..all.len())]
}

/// Deals two real cards, so each class shows up in proportion to its combos.
pub fn random_hand_weighted<R: Rng + ?Sized>(rng: &mut R) -> Hand {
    let (a, b) = deal_hole_cards(rng);
    Hand::from_cards(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn normalize_orders_ranks_high_to_low() {
        assert_eq!(normalize("AKs").unwrap(), "AKs");
        assert_eq!(normalize("KAs").unwrap(), "AKs");
        assert_eq!(normalize("ka").unwrap(), "AKo");
        assert_eq!(normalize("TT").unwrap(), "TT");
        assert_eq!(normalize("TTs").unwrap(), "TT");
        assert_eq!(normalize("72O").unwrap(), "72o");
    }

    #[test]
    fn normalize_is_idempotent_for_every_class() {
        for hand in enumerate_all() {
            let once = normalize(&hand.notation()).unwrap();
            assert_eq!(normalize(&once).unwrap(), once);
            assert_eq!(once, hand.notation());
        }
    }

    #[test]
    fn parse_rejects_bad_notation() {
        for bad in ["", "A", "AKx", "A1s", "AKso", "ZZ", "  "] {
            assert!(
                matches!(Hand::parse(bad), Err(TutorError::InvalidNotation { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn hand_built_from_bad_ranks_still_looks_up() {
        let hand = Hand::new(Rank(15), Rank::TWO, true);
        assert_eq!(hand.grid_coord(), (0, 12));
        assert!((0.0..=1.0).contains(&hand.equity()));
    }

    #[test]
    fn grid_is_a_bijection() {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let hand = Hand::from_grid(row, col).unwrap();
                assert_eq!(hand.grid_coord(), (row, col), "{hand}");
            }
        }
        assert_eq!(Hand::from_grid(13, 0), None);
    }

    #[test]
    fn grid_regions_match_shape() {
        assert_eq!(Hand::parse("AA").unwrap().grid_coord(), (0, 0));
        assert_eq!(Hand::parse("AKs").unwrap().grid_coord(), (0, 1));
        assert_eq!(Hand::parse("AKo").unwrap().grid_coord(), (1, 0));
        assert_eq!(Hand::parse("32o").unwrap().grid_coord(), (12, 11));
    }

    #[test]
    fn enumeration_visits_every_cell_once() {
        let all = enumerate_all();
        assert_eq!(all.len(), HAND_CLASSES);
        let cells: HashSet<usize> = all.iter().map(|h| h.grid_index()).collect();
        assert_eq!(cells.len(), HAND_CLASSES);
        assert_eq!(all[0].notation(), "AA");
        assert_eq!(all[1].notation(), "AKs");
        assert_eq!(all[2].notation(), "AKo");
        assert_eq!(all[168].notation(), "22");
        let mut sorted = all.to_vec();
        sorted.sort();
        assert_eq!(sorted, all, "Ord agrees with enumeration order");
    }

    #[test]
    fn shape_counts_and_combos_cover_the_deck() {
        let all = enumerate_all();
        let pairs = all.iter().filter(|h| h.is_pair()).count();
        let suited = all.iter().filter(|h| h.is_suited()).count();
        assert_eq!((pairs, suited, all.len() - pairs - suited), (13, 78, 78));
        let combos: u32 = all.iter().map(|h| h.combos()).sum();
        assert_eq!(combos, 1326);
    }

    #[test]
    fn equity_table_is_sane() {
        let aa = Hand::parse("AA").unwrap().equity();
        let trash = Hand::parse("72o").unwrap().equity();
        assert!(aa > 0.84 && aa < 0.86, "AA equity {aa}");
        assert!(trash < 0.37, "72o equity {trash}");
        for hand in enumerate_all() {
            let eq = hand.equity();
            assert!((0.0..=1.0).contains(&eq), "{hand} equity {eq}");
        }
        assert!(Hand::parse("AKs").unwrap().equity() > Hand::parse("AKo").unwrap().equity());
    }

    #[test]
    fn unknown_notation_uses_the_sentinel() {
        assert_eq!(equity_for("XYZ"), UNKNOWN_EQUITY);
        assert_eq!(equity_for("KAs"), Hand::parse("AKs").unwrap().equity());
    }

    #[test]
    fn random_hand_is_deterministic_per_seed() {
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10).map(|_| random_hand(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(3), draw(3));
    }

    #[test]
    fn weighted_sampling_favours_offsuit_classes() {
        let mut rng = StdRng::seed_from_u64(11);
        let trials = 4000;
        let pairs = (0..trials)
            .filter(|_| random_hand_weighted(&mut rng).is_pair())
            .count();
        // 78 / 1326 ≈ 5.9% of real deals are pairs, versus 13 / 169 ≈ 7.7% of classes.
        assert!(pairs < trials * 7 / 100, "pairs drawn: {pairs}");
    }

    #[test]
    fn serde_uses_canonical_notation() {
        let hand = Hand::parse("KAs").unwrap();
        let json = serde_json::to_string(&hand).unwrap();
        assert_eq!(json, "\"AKs\"");
        let back: Hand = serde_json::from_str("\"ka\"").unwrap();
        assert_eq!(back.notation(), "AKo");
    }
}
