//! Core training engine: hands, ranges, charts, drills, and the session loop.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | Shared types: cards, positions, actions, drill kinds, `DrillConfig` |
//! | `hand`      | The 169 starting-hand classes, notation, grid mapping, equity lookup |
//! | `equity`    | Precomputed preflop equity table |
//! | `range`     | Named hand sets, bucketed decisions, range algebra |
//! | `charts`    | Static opening, defend and 3-bet charts |
//! | `deck`      | 52-card deck and seeded flop / hole-card deals |
//! | `evaluator` | Flop texture classification and draw detection |
//! | `drill`     | The `Drill` trait and the `DrillEngine` state machine |
//! | `helpers`   | Shared builder functions used by every drill |
//! | `generator` | `build_drill()` dispatch from `DrillKind` to a concrete drill |
//! | `drills`    | The eight concrete drills |

pub mod charts;
pub mod deck;
pub mod drill;
pub mod drills;
pub mod equity;
pub mod evaluator;
pub mod generator;
pub mod hand;
pub mod helpers;
pub mod models;
pub mod range;

// Re-export the public API surface so callers can use
// `training_engine::DrillEngine` without reaching into sub-modules.
pub use charts::{Catalogue, ScenarioSpot, SpotKind};
pub use drill::{
    AnswerFeedback, CategoryStats, Clock, Drill, DrillEngine, DrillPhase, ManualClock,
    NextStep, Question, QuestionReady, SessionState, SessionSummary, SystemClock, Validation,
};
pub use evaluator::{classify_board_texture, BoardTexture};
pub use generator::build_drill;
pub use hand::{Hand, Shape};
pub use models::{Action, Card, DrillConfig, DrillKind, Position, Rank, Street, Suit, TextStyle};
pub use range::{BucketedRange, Range, RangeDiff, RangeGrade};
