//! Shared builder functions used by every drill.
//!
//! Drills assemble the same pieces: an id, a prompt in the active text style,
//! a list of choices, and answer matching that tolerates case and spacing.
//! These helpers keep the drill files focused on poker logic.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

use crate::training_engine::{
    drill::{Choice, Question, Subject, Validation},
    models::{Card, DrillKind, TextStyle},
};

/// Question id from drill prefix + random suffix, e.g. `OF-0A1B2C3D`.
pub fn question_id(kind: DrillKind, rng: &mut dyn RngCore) -> String {
    format!("{}-{:08X}", kind.prefix(), rng.next_u32())
}

/// Format a flop as space-separated cards (e.g. "Kh 7d 2c").
pub fn board_str(board: &[Card]) -> String {
    board.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
}

/// Pick the right wording based on the active text style.
pub fn styled(ts: TextStyle, simple: String, technical: String) -> String {
    match ts {
        TextStyle::Simple => simple,
        TextStyle::Technical => technical,
    }
}

/// `"wet"` → `"Wet"`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Percent with one decimal, e.g. `0.6543` → `"65.4%"`.
pub fn pct(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Build one choice. The id doubles as the canonical answer string.
pub fn choice(id: impl Into<String>, text: impl Into<String>) -> Choice {
    Choice {
        id: id.into(),
        text: text.into(),
    }
}

/// Assemble a [`Question`] with a fresh id.
pub fn question(
    kind: DrillKind,
    rng: &mut dyn RngCore,
    category: impl Into<String>,
    prompt: String,
    choices: Vec<Choice>,
    subject: Subject,
) -> Question {
    Question {
        id: question_id(kind, rng),
        kind,
        category: category.into(),
        prompt,
        choices,
        subject,
    }
}

/// Index into `weights`, chosen proportionally. Falls back to uniform if
/// every weight is zero.
pub fn weighted_pick<R: Rng + ?Sized>(rng: &mut R, weights: &[u32]) -> usize {
    match WeightedIndex::new(weights) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.gen_range(0..weights.len().max(1)),
    }
}

fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// The choice a free-text answer refers to, by id or by text.
pub fn match_choice<'q>(question: &'q Question, answer: &str) -> Option<&'q Choice> {
    let key = squash(answer);
    if key.is_empty() {
        return None;
    }
    question
        .choices
        .iter()
        .find(|c| squash(&c.id) == key || squash(&c.text) == key)
}

/// Grade a multiple-choice answer against the canonical choice id.
pub fn grade_choice(question: &Question, answer: &str, correct_id: &str) -> Validation {
    let picked = match_choice(question, answer);
    Validation {
        correct: picked.is_some_and(|c| c.id == correct_id),
        correct_answer: correct_id.to_string(),
    }
}
