//! # poker_tutor
//!
//! The engine of an offline poker-strategy tutor: starting-hand and range
//! models, timed multiple-choice drills, and persisted learner progress with
//! unlock cascades and achievements.
//!
//! ## How it works
//!
//! 1. Build a [`DrillEngine`] from a [`DrillConfig`] (drill kind, question
//!    count, pass mark, optional RNG seed, text style).
//! 2. Drive it explicitly: [`DrillEngine::start`], then
//!    [`submit_answer`](DrillEngine::submit_answer) and
//!    [`next_question`](DrillEngine::next_question) per question. The engine
//!    never advances on its own, so tests and UIs pace it however they like.
//! 3. Hand the final [`SessionSummary`] to a [`ProgressStore`], which updates
//!    the unit's record, applies the curriculum's cascade rules, awards
//!    achievements and saves through its [`ProgressBackend`].
//!
//! ## Key features
//!
//! - **169 hand classes** with notation parsing, a 13×13 grid bijection and
//!   precomputed heads-up equity.
//! - **Ranges** parsed from `TT+, ATs+, A5s-A2s` style notation, with
//!   combo-weighted deck percentages and similarity grading.
//! - **Deterministic**: `DrillConfig::with_seed` reproduces the same questions.
//! - **Data-driven curriculum**: units, cascade rules and achievements are
//!   JSON ([`Curriculum::standard`] ships a default one).
//! - **Never crashes a session**: out-of-phase engine calls return `None`,
//!   storage failures degrade to in-memory progress plus a warning.
//!
//! ## Quick start
//!
//! ```rust
//! use poker_tutor::{
//!     Curriculum, DrillConfig, DrillEngine, DrillKind, MemoryBackend, NextStep, ProgressStore,
//! };
//!
//! let config = DrillConfig::new(DrillKind::HandVsHand).with_questions(5).with_seed(42);
//! let mut engine = DrillEngine::new(config).unwrap();
//!
//! let mut ready = engine.start().unwrap();
//! let summary = loop {
//!     let answer = ready.question.choices[0].id.clone();
//!     let feedback = engine.submit_answer(&answer).unwrap();
//!     println!("{} {}", if feedback.correct { "+" } else { "-" }, feedback.explanation);
//!     match engine.next_question().unwrap() {
//!         NextStep::Question(next) => ready = next,
//!         NextStep::Ended(summary) => break summary,
//!     }
//! };
//! println!("accuracy {:.0}%", summary.accuracy);
//!
//! let mut store = ProgressStore::open(Curriculum::standard().unwrap(), MemoryBackend::new()).unwrap();
//! let update = store.record_attempt("hand-strength", &summary).unwrap();
//! println!("unlocked: {:?}", update.newly_unlocked);
//! assert!(store.is_unlocked("hand-strength"));
//! ```

pub mod error;
pub mod logging;
pub mod progress;
pub mod training_engine;

// Convenience re-exports so callers can use `poker_tutor::DrillEngine`
// directly without reaching into sub-modules.
pub use error::TutorError;
pub use progress::{
    Curriculum, GroupStats, JsonFileBackend, MemoryBackend, ProgressBackend, ProgressDocument,
    ProgressRecord, ProgressStore, ProgressUpdate,
};
pub use training_engine::{
    classify_board_texture, AnswerFeedback, BoardTexture, DrillConfig, DrillEngine, DrillKind,
    DrillPhase, Hand, NextStep, Position, Question, QuestionReady, Range, SessionSummary,
    TextStyle,
};

#[cfg(test)]
mod tests;
