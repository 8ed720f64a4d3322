use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;

// ---------------------------------------------------------------------------
// Card primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suit::Clubs => write!(f, "c"),
            Suit::Diamonds => write!(f, "d"),
            Suit::Hearts => write!(f, "h"),
            Suit::Spades => write!(f, "s"),
        }
    }
}

/// Rank 2..=14 where 14 = Ace. Deserialising anything else fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct Rank(pub u8);

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (2..=14).contains(&value) {
            Ok(Rank(value))
        } else {
            Err(format!("rank {value} is outside 2..=14"))
        }
    }
}

impl Rank {
    pub const ACE: Rank = Rank(14);
    pub const TWO: Rank = Rank(2);

    /// All thirteen ranks, strongest first (the chart/grid order).
    pub const DESCENDING: [Rank; 13] = [
        Rank(14), Rank(13), Rank(12), Rank(11), Rank(10), Rank(9), Rank(8),
        Rank(7), Rank(6), Rank(5), Rank(4), Rank(3), Rank(2),
    ];

    pub fn symbol(self) -> &'static str {
        match self.0 {
            2 => "2", 3 => "3", 4 => "4", 5 => "5", 6 => "6",
            7 => "7", 8 => "8", 9 => "9", 10 => "T",
            11 => "J", 12 => "Q", 13 => "K", 14 => "A",
            _ => "?",
        }
    }

    pub fn from_char(c: char) -> Option<Rank> {
        let value = match c.to_ascii_uppercase() {
            'A' => 14,
            'K' => 13,
            'Q' => 12,
            'J' => 11,
            'T' => 10,
            d @ '2'..='9' => d as u8 - b'0',
            _ => return None,
        };
        Some(Rank(value))
    }

    /// Position in [`Rank::DESCENDING`]: Ace = 0, Two = 12. Out-of-range
    /// values clamp to the nearest end.
    pub fn index(self) -> usize {
        (14 - self.0.clamp(2, 14)) as usize
    }

    pub fn from_index(index: usize) -> Option<Rank> {
        Rank::DESCENDING.get(index).copied()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = TutorError;

    /// Parses two-character card text such as `"Kh"` or `"2c"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(TutorError::invalid_notation(s, "a card is a rank followed by a suit"));
        };
        let rank = Rank::from_char(r).ok_or_else(|| TutorError::invalid_notation(s, "unknown rank"))?;
        let suit = Suit::from_char(su).ok_or_else(|| TutorError::invalid_notation(s, "unknown suit"))?;
        Ok(Card { rank, suit })
    }
}

// ---------------------------------------------------------------------------
// Table metadata
// ---------------------------------------------------------------------------

/// Seats at a 6-handed table, listed in preflop action order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    UTG,
    MP,
    CO,
    BTN,
    SB,
    BB,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::UTG => "UTG",
            Position::MP  => "MP",
            Position::CO  => "CO",
            Position::BTN => "BTN",
            Position::SB  => "SB",
            Position::BB  => "BB",
        };
        write!(f, "{}", s)
    }
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::UTG, Position::MP, Position::CO,
        Position::BTN, Position::SB, Position::BB,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Position::UTG => "Under the Gun",
            Position::MP  => "Middle Position",
            Position::CO  => "Cutoff",
            Position::BTN => "Button",
            Position::SB  => "Small Blind",
            Position::BB  => "Big Blind",
        }
    }

    /// 0 acts first before the flop.
    pub fn preflop_order(self) -> usize {
        self as usize
    }

    /// 0 acts first after the flop: the blinds lead, the button closes.
    pub fn postflop_order(self) -> usize {
        match self {
            Position::SB  => 0,
            Position::BB  => 1,
            Position::UTG => 2,
            Position::MP  => 3,
            Position::CO  => 4,
            Position::BTN => 5,
        }
    }

    /// Is this position considered "in position" (acts last postflop)?
    pub fn is_late(self) -> bool {
        matches!(self, Position::CO | Position::BTN)
    }
}

impl FromStr for Position {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Position::ALL
            .into_iter()
            .find(|p| p.to_string() == upper || p.name().to_ascii_uppercase() == upper)
            .ok_or_else(|| TutorError::invalid_config("position", format!("unknown position {s:?}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    Preflop,
    Postflop,
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop  => write!(f, "preflop"),
            Street::Postflop => write!(f, "postflop"),
        }
    }
}

/// Preflop action label. Doubles as the bucket label of a bucketed range.
///
/// Declared weakest first so `Ord` matches bucket precedence
/// (`FourBet > ThreeBet > Raise > Call > Fold`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Fold,
    Call,
    Raise,
    ThreeBet,
    FourBet,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Fold     => "fold",
            Action::Call     => "call",
            Action::Raise    => "raise",
            Action::ThreeBet => "3bet",
            Action::FourBet  => "4bet",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Action {
    type Err = TutorError;

    /// Accepts the labels players actually type: `3bet`, `3-bet`, `threeBet`,
    /// `open`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "fold" | "f" => Ok(Action::Fold),
            "call" | "c" | "flat" => Ok(Action::Call),
            "raise" | "r" | "open" | "openraise" => Ok(Action::Raise),
            "3bet" | "threebet" | "3b" => Ok(Action::ThreeBet),
            "4bet" | "fourbet" | "4b" => Ok(Action::FourBet),
            _ => Err(TutorError::invalid_config("action", format!("unknown action {s:?}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Drill request types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillKind {
    HandVsHand,
    OpenFold,
    RangeMembership,
    EquityBucket,
    PositionOrder,
    PreflopScenario,
    BoardTexture,
    RangeBuilder,
}

impl DrillKind {
    pub const ALL: [DrillKind; 8] = [
        DrillKind::HandVsHand,
        DrillKind::OpenFold,
        DrillKind::RangeMembership,
        DrillKind::EquityBucket,
        DrillKind::PositionOrder,
        DrillKind::PreflopScenario,
        DrillKind::BoardTexture,
        DrillKind::RangeBuilder,
    ];

    /// Question-id prefix, e.g. `OF-1A2B3C4D`.
    pub fn prefix(self) -> &'static str {
        match self {
            DrillKind::HandVsHand      => "HV",
            DrillKind::OpenFold        => "OF",
            DrillKind::RangeMembership => "RM",
            DrillKind::EquityBucket    => "EQ",
            DrillKind::PositionOrder   => "PS",
            DrillKind::PreflopScenario => "SC",
            DrillKind::BoardTexture    => "BT",
            DrillKind::RangeBuilder    => "RB",
        }
    }
}

impl fmt::Display for DrillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DrillKind::HandVsHand      => "Hand vs Hand",
            DrillKind::OpenFold        => "Open or Fold",
            DrillKind::RangeMembership => "Range Membership",
            DrillKind::EquityBucket    => "Equity Estimation",
            DrillKind::PositionOrder   => "Position Order",
            DrillKind::PreflopScenario => "Preflop Scenario",
            DrillKind::BoardTexture    => "Board Texture",
            DrillKind::RangeBuilder    => "Range Builder",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextStyle {
    /// Plain English, no jargon.
    #[default]
    Simple,
    /// Combos, equity percentages, 3-bet/4-bet vocabulary.
    Technical,
}

/// Everything needed to run one drill session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillConfig {
    pub kind: DrillKind,
    pub total_questions: usize,
    /// Accuracy (percent) a finished session needs to pass.
    pub pass_threshold: f64,
    /// `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub text_style: TextStyle,
    /// Narrows a drill to one spot, position, or range name where supported.
    #[serde(default)]
    pub focus: Option<String>,
}

impl DrillConfig {
    pub const DEFAULT_QUESTIONS: usize = 20;
    pub const DEFAULT_PASS_THRESHOLD: f64 = 80.0;

    /// Defaults: 20 questions, 80% to pass, entropy seed, simple wording.
    pub fn new(kind: DrillKind) -> Self {
        DrillConfig {
            kind,
            total_questions: Self::DEFAULT_QUESTIONS,
            pass_threshold: Self::DEFAULT_PASS_THRESHOLD,
            rng_seed: None,
            text_style: TextStyle::Simple,
            focus: None,
        }
    }

    pub fn with_questions(mut self, total: usize) -> Self {
        self.total_questions = total;
        self
    }

    pub fn with_threshold(mut self, pass_threshold: f64) -> Self {
        self.pass_threshold = pass_threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }

    pub fn validate(&self) -> Result<(), TutorError> {
        if self.total_questions == 0 {
            return Err(TutorError::invalid_config(
                "total_questions",
                "a session needs at least one question",
            ));
        }
        if !(0.0..=100.0).contains(&self.pass_threshold) {
            return Err(TutorError::invalid_config(
                "pass_threshold",
                format!("{} is not a percentage", self.pass_threshold),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_index_round_trips_through_descending_order() {
        for (i, rank) in Rank::DESCENDING.iter().enumerate() {
            assert_eq!(rank.index(), i);
            assert_eq!(Rank::from_index(i), Some(*rank));
        }
        assert_eq!(Rank::from_index(13), None);
    }

    #[test]
    fn out_of_range_ranks_never_underflow() {
        assert_eq!(Rank(15).index(), 0);
        assert_eq!(Rank(0).index(), 12);
        assert!(serde_json::from_str::<Rank>("15").is_err());
        assert!(serde_json::from_str::<Rank>("1").is_err());
        assert_eq!(serde_json::from_str::<Rank>("14").unwrap(), Rank::ACE);
        assert_eq!(serde_json::to_string(&Rank::TWO).unwrap(), "2");
    }

    #[test]
    fn card_parses_rank_then_suit() {
        let card: Card = "Kh".parse().unwrap();
        assert_eq!(card, Card { rank: Rank(13), suit: Suit::Hearts });
        assert_eq!(card.to_string(), "Kh");
        assert!("K".parse::<Card>().is_err());
        assert!("Kx".parse::<Card>().is_err());
        assert!("1h".parse::<Card>().is_err());
    }

    #[test]
    fn blinds_act_first_after_the_flop() {
        assert_eq!(Position::UTG.preflop_order(), 0);
        assert_eq!(Position::BB.preflop_order(), 5);
        assert_eq!(Position::SB.postflop_order(), 0);
        assert_eq!(Position::BTN.postflop_order(), 5);
    }

    #[test]
    fn action_order_matches_bucket_precedence() {
        assert!(Action::FourBet > Action::ThreeBet);
        assert!(Action::ThreeBet > Action::Raise);
        assert!(Action::Raise > Action::Call);
        assert!(Action::Call > Action::Fold);
        assert_eq!("3-bet".parse::<Action>().unwrap(), Action::ThreeBet);
        assert_eq!("Four Bet".parse::<Action>().unwrap(), Action::FourBet);
        assert!("shove".parse::<Action>().is_err());
    }

    #[test]
    fn drill_config_rejects_empty_sessions() {
        assert!(DrillConfig::new(DrillKind::OpenFold).validate().is_ok());
        assert!(DrillConfig::new(DrillKind::OpenFold).with_questions(0).validate().is_err());
        assert!(DrillConfig::new(DrillKind::OpenFold).with_threshold(120.0).validate().is_err());
    }
}
