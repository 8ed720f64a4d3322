use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::training_engine::models::{Card, Suit};

/// Coarse flop texture used by the texture drill and explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardTexture {
    /// Rainbow, unpaired, ranks spread out.
    Dry,
    /// Flush draw or straight draw available.
    Wet,
    /// Two cards share a rank.
    Paired,
    /// All three cards share a suit.
    Monotone,
}

impl BoardTexture {
    pub const ALL: [BoardTexture; 4] = [
        BoardTexture::Dry,
        BoardTexture::Wet,
        BoardTexture::Paired,
        BoardTexture::Monotone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BoardTexture::Dry      => "dry",
            BoardTexture::Wet      => "wet",
            BoardTexture::Paired   => "paired",
            BoardTexture::Monotone => "monotone",
        }
    }
}

impl fmt::Display for BoardTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BoardTexture {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        BoardTexture::ALL
            .into_iter()
            .find(|t| t.label() == key)
            .ok_or_else(|| TutorError::invalid_config("texture", format!("unknown texture {s:?}")))
    }
}

/// Classify a flop. Checks run in a fixed order: monotone, then paired, then
/// wet (two-tone or connected), otherwise dry.
pub fn classify_board_texture(flop: &[Card; 3]) -> BoardTexture {
    if flop.iter().all(|c| c.suit == flop[0].suit) {
        return BoardTexture::Monotone;
    }
    if flop[0].rank == flop[1].rank || flop[0].rank == flop[2].rank || flop[1].rank == flop[2].rank {
        return BoardTexture::Paired;
    }
    if has_flush_draw(flop) || is_connected(flop) {
        BoardTexture::Wet
    } else {
        BoardTexture::Dry
    }
}

/// True if 2+ cards share a suit (flush draw possible).
pub fn has_flush_draw(board: &[Card]) -> bool {
    let mut counts = [0u8; 4];
    for c in board {
        let idx = match c.suit {
            Suit::Clubs    => 0,
            Suit::Diamonds => 1,
            Suit::Hearts   => 2,
            Suit::Spades   => 3,
        };
        counts[idx] += 1;
        if counts[idx] >= 2 {
            return true;
        }
    }
    false
}

/// True if two board ranks sit within two of each other, so a straight
/// draw can use both.
pub fn has_straight_draw(board: &[Card]) -> bool {
    let ranks = sorted_ranks(board);
    ranks.windows(2).any(|w| w[1] - w[0] <= 2)
}

/// Every gap between neighbouring ranks is at most two, e.g. `J T 9` or
/// `9 7 5`. The ace only plays high.
fn is_connected(board: &[Card]) -> bool {
    let ranks = sorted_ranks(board);
    ranks.len() == board.len() && ranks.windows(2).all(|w| w[1] - w[0] <= 2)
}

fn sorted_ranks(board: &[Card]) -> Vec<u8> {
    let mut ranks: Vec<u8> = board.iter().map(|c| c.rank.0).collect();
    ranks.sort_unstable();
    ranks.dedup();
    ranks
}
