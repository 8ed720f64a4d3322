//! Concrete drills, one per [`DrillKind`](crate::training_engine::models::DrillKind).
//!
//! Every drill plugs into the engine through the
//! [`Drill`](crate::training_engine::drill::Drill) trait. Drills hold only
//! immutable chart data; all randomness comes from the engine's rng.

pub mod board_texture;
pub mod equity_bucket;
pub mod hand_vs_hand;
pub mod open_fold;
pub mod position_order;
pub mod preflop_scenario;
pub mod range_builder;
pub mod range_membership;

pub use board_texture::BoardTextureDrill;
pub use equity_bucket::EquityBucketDrill;
pub use hand_vs_hand::HandVsHandDrill;
pub use open_fold::OpenFoldDrill;
pub use position_order::PositionOrderDrill;
pub use preflop_scenario::PreflopScenarioDrill;
pub use range_builder::RangeBuilderDrill;
pub use range_membership::RangeMembershipDrill;

use rand::seq::IteratorRandom;
use rand::RngCore;

use crate::training_engine::{
    hand::{enumerate_all, random_hand, Hand},
    range::Range,
};

/// A hand from `range` or, with `inside == false`, from outside it.
/// Falls back to any hand when the requested side is empty.
pub(crate) fn hand_near_range(range: &Range, inside: bool, rng: &mut dyn RngCore) -> Hand {
    enumerate_all()
        .iter()
        .copied()
        .filter(|h| range.contains(*h) == inside)
        .choose(rng)
        .unwrap_or_else(|| random_hand(rng))
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::training_engine::drill::{Drill, Question, SessionState};

    /// `n` questions from `drill` with a fixed seed.
    pub fn questions(drill: &dyn Drill, seed: u64, n: usize) -> Vec<Question> {
        let mut rng = StdRng::seed_from_u64(seed);
        let session = SessionState::default();
        (0..n).map(|_| drill.generate(&session, &mut rng)).collect()
    }

    /// Exactly one listed choice grades as correct.
    pub fn assert_single_correct_choice(drill: &dyn Drill, question: &Question) {
        let correct: Vec<_> = question
            .choices
            .iter()
            .filter(|c| drill.validate(&c.id, question).correct)
            .collect();
        assert_eq!(correct.len(), 1, "question {:?}: {:?}", question.prompt, question.choices);
    }
}
