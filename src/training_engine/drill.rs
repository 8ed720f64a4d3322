//! The drill engine: a fixed-length, timed question/answer loop.
//!
//! ```text
//! Idle --start--> QuestionReady --submit_answer--> Answered --next_question--+
//!                      ^                                                     |
//!                      +-----------------------(more questions)--------------+
//!                                                                            |
//!                                        Ended <---(last question answered)--+
//! any live phase --stop--> Stopped
//! ```
//!
//! The engine is synchronous. It never advances on its own; callers pace it
//! with explicit [`DrillEngine::next_question`] calls. Calls made in the wrong
//! phase are ignored (they return `None` and log a warning). One engine runs
//! one session; `Ended` and `Stopped` are final.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::TutorError;
use crate::training_engine::{
    generator,
    hand::Hand,
    models::{Card, DrillConfig, DrillKind, Position, Street, TextStyle},
};

// ---------------------------------------------------------------------------
// Question / answer data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
}

/// Structured payload a renderer can draw (cards, seats, grid cells).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Subject {
    None,
    Matchup { first: Hand, second: Hand },
    Seat { hand: Hand, position: Position },
    Membership { hand: Hand, range: String },
    Equity { hand: Hand },
    Order { first: Position, second: Position, street: Street },
    Scenario { hand: Hand, spot: String },
    Board { cards: [Card; 3] },
    RangeBuild { range: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub kind: DrillKind,
    /// Opaque statistics key chosen by the drill (a position, matchup,
    /// texture, ...). The engine never interprets it.
    pub category: String,
    pub prompt: String,
    /// Empty for free-form answers.
    pub choices: Vec<Choice>,
    pub subject: Subject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub correct: bool,
    pub correct_answer: String,
}

/// A pluggable question source and grader.
///
/// `generate` must depend only on the session it is handed and the rng; the
/// engine owns both, so repeated or parallel sessions never interfere.
pub trait Drill {
    fn kind(&self) -> DrillKind;

    fn generate(&self, session: &SessionState, rng: &mut dyn RngCore) -> Question;

    fn validate(&self, answer: &str, question: &Question) -> Validation;

    /// Feedback text shown after an answer. Cosmetic; never scored.
    fn explain(&self, question: &Question, validation: &Validation, style: TextStyle) -> String {
        let _ = (question, style);
        if validation.correct {
            format!("Correct: {}.", validation.correct_answer)
        } else {
            format!("The answer is {}.", validation.correct_answer)
        }
    }
}

impl<D: Drill + ?Sized> Drill for Box<D> {
    fn kind(&self) -> DrillKind {
        (**self).kind()
    }

    fn generate(&self, session: &SessionState, rng: &mut dyn RngCore) -> Question {
        (**self).generate(session, rng)
    }

    fn validate(&self, answer: &str, question: &Question) -> Validation {
        (**self).validate(answer, question)
    }

    fn explain(&self, question: &Question, validation: &Validation, style: TextStyle) -> String {
        (**self).explain(question, validation, style)
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Monotonic millisecond clock used to time answers.
pub trait Clock: Send {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and replays. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Session state and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillPhase {
    Idle,
    QuestionReady,
    Answered,
    Ended,
    Stopped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: u32,
    pub correct: u32,
}

impl CategoryStats {
    pub fn accuracy(&self) -> f64 {
        percent(self.correct as usize, self.total as usize)
    }
}

/// One answered question. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub index: usize,
    pub question: Question,
    pub player_answer: String,
    pub correct_answer: String,
    pub correct: bool,
    pub elapsed_ms: u64,
}

/// Everything a drill may look at when generating the next question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// 1-based index of the current question, 0 before `start`.
    pub question_index: usize,
    pub total_questions: usize,
    pub correct: usize,
    pub streak: u32,
    pub best_streak: u32,
    pub records: Vec<AnswerRecord>,
    pub categories: BTreeMap<String, CategoryStats>,
}

impl SessionState {
    fn new(total_questions: usize) -> Self {
        SessionState {
            total_questions,
            ..Default::default()
        }
    }

    pub fn answered(&self) -> usize {
        self.records.len()
    }

    pub fn running(&self) -> RunningStats {
        RunningStats {
            answered: self.answered(),
            correct: self.correct,
            accuracy: percent(self.correct, self.answered()),
            streak: self.streak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    pub answered: usize,
    pub correct: usize,
    /// Percent of answered questions.
    pub accuracy: f64,
    pub streak: u32,
}

/// Emitted when a question is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionReady {
    pub question: Question,
    pub index: usize,
    pub total: usize,
}

/// Emitted after a graded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub index: usize,
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub elapsed_ms: u64,
    pub stats: RunningStats,
}

/// Final (or interim, when stopped) session statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub kind: DrillKind,
    pub total_questions: usize,
    pub answered: usize,
    pub correct: usize,
    /// Finished sessions: correct / total questions. Stopped sessions:
    /// correct / answered. Percent, 0 when nothing was answered.
    pub accuracy: f64,
    pub avg_time_ms: u64,
    pub min_time_ms: u64,
    pub best_streak: u32,
    /// `None` for stopped sessions; they are never judged.
    pub passed: Option<bool>,
    pub finished: bool,
    pub categories: BTreeMap<String, CategoryStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NextStep {
    Question(QuestionReady),
    Ended(SessionSummary),
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

struct Pending {
    question: Question,
    shown_at: u64,
}

pub struct DrillEngine {
    drill: Box<dyn Drill + Send>,
    config: DrillConfig,
    rng: StdRng,
    clock: Box<dyn Clock>,
    phase: DrillPhase,
    session: SessionState,
    pending: Option<Pending>,
    summary: Option<SessionSummary>,
}

impl DrillEngine {
    /// Engine for the built-in drill named by `config.kind`.
    pub fn new(config: DrillConfig) -> Result<Self, TutorError> {
        let drill = generator::build_drill(config.kind, config.focus.as_deref())?;
        Self::with_drill(drill, config)
    }

    /// Engine around any [`Drill`] implementation.
    pub fn with_drill(drill: impl Drill + Send + 'static, config: DrillConfig) -> Result<Self, TutorError> {
        config.validate()?;
        let rng = generator::seeded_rng(config.rng_seed);
        Ok(DrillEngine {
            drill: Box::new(drill),
            session: SessionState::new(config.total_questions),
            config,
            rng,
            clock: Box::new(SystemClock::new()),
            phase: DrillPhase::Idle,
            pending: None,
            summary: None,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn phase(&self) -> DrillPhase {
        self.phase
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.pending.as_ref().map(|p| &p.question)
    }

    /// Set once the session ends or is stopped; immutable afterwards.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Show question 1. An engine runs exactly one session, so calls after
    /// the first are ignored.
    pub fn start(&mut self) -> Option<QuestionReady> {
        if self.phase != DrillPhase::Idle {
            warn!(phase = ?self.phase, "start ignored: this engine already ran its session");
            return None;
        }
        info!(kind = ?self.config.kind, total = self.config.total_questions, "drill session started");
        Some(self.show_next())
    }

    /// Grade the answer to the pending question. Exactly one answer per
    /// question is accepted; anything else returns `None`.
    pub fn submit_answer(&mut self, answer: &str) -> Option<AnswerFeedback> {
        if self.phase != DrillPhase::QuestionReady {
            warn!(phase = ?self.phase, "answer ignored: no question is waiting for one");
            return None;
        }
        let pending = self.pending.as_ref()?;
        let elapsed_ms = self.clock.now_ms().saturating_sub(pending.shown_at);
        let question = pending.question.clone();

        let validation = self.drill.validate(answer, &question);
        let explanation = self.drill.explain(&question, &validation, self.config.text_style);

        let session = &mut self.session;
        let bucket = session.categories.entry(question.category.clone()).or_default();
        bucket.total += 1;
        if validation.correct {
            bucket.correct += 1;
            session.correct += 1;
            session.streak += 1;
            session.best_streak = session.best_streak.max(session.streak);
        } else {
            session.streak = 0;
        }
        let index = session.question_index;
        session.records.push(AnswerRecord {
            index,
            question,
            player_answer: answer.to_string(),
            correct_answer: validation.correct_answer.clone(),
            correct: validation.correct,
            elapsed_ms,
        });
        self.phase = DrillPhase::Answered;

        debug!(index, correct = validation.correct, elapsed_ms, "answer graded");
        Some(AnswerFeedback {
            index,
            correct: validation.correct,
            correct_answer: validation.correct_answer,
            explanation,
            elapsed_ms,
            stats: self.session.running(),
        })
    }

    /// Advance after an answer: the next question, or the final summary once
    /// the last question has been answered.
    pub fn next_question(&mut self) -> Option<NextStep> {
        if self.phase != DrillPhase::Answered {
            warn!(phase = ?self.phase, "next_question ignored: current question is unanswered or the session is over");
            return None;
        }
        if self.session.question_index >= self.config.total_questions {
            let summary = self.finish(true);
            return Some(NextStep::Ended(summary));
        }
        Some(NextStep::Question(self.show_next()))
    }

    /// Quit early. The partial summary is never judged pass/fail.
    pub fn stop(&mut self) -> Option<SessionSummary> {
        if matches!(self.phase, DrillPhase::Ended | DrillPhase::Stopped) {
            warn!(phase = ?self.phase, "stop ignored: session already over");
            return None;
        }
        Some(self.finish(false))
    }

    fn show_next(&mut self) -> QuestionReady {
        self.session.question_index += 1;
        let question = self.drill.generate(&self.session, &mut self.rng);
        debug!(
            index = self.session.question_index,
            id = %question.id,
            category = %question.category,
            "question ready"
        );
        self.pending = Some(Pending {
            question: question.clone(),
            shown_at: self.clock.now_ms(),
        });
        self.phase = DrillPhase::QuestionReady;
        QuestionReady {
            question,
            index: self.session.question_index,
            total: self.config.total_questions,
        }
    }

    fn finish(&mut self, finished: bool) -> SessionSummary {
        let session = &self.session;
        let answered = session.answered();
        let times = session.records.iter().map(|r| r.elapsed_ms);
        let avg_time_ms = if answered == 0 {
            0
        } else {
            times.clone().sum::<u64>() / answered as u64
        };
        let min_time_ms = times.min().unwrap_or(0);

        let accuracy = if finished {
            percent(session.correct, self.config.total_questions)
        } else {
            percent(session.correct, answered)
        };
        let passed = finished.then(|| accuracy >= self.config.pass_threshold);

        let summary = SessionSummary {
            kind: self.config.kind,
            total_questions: self.config.total_questions,
            answered,
            correct: session.correct,
            accuracy,
            avg_time_ms,
            min_time_ms,
            best_streak: session.best_streak,
            passed,
            finished,
            categories: session.categories.clone(),
        };

        self.phase = if finished { DrillPhase::Ended } else { DrillPhase::Stopped };
        self.pending = None;
        self.summary = Some(summary.clone());
        info!(
            kind = ?summary.kind,
            accuracy = summary.accuracy,
            passed = ?summary.passed,
            finished,
            "drill session over"
        );
        summary
    }
}
