use rand::RngCore;

use crate::training_engine::{
    drill::{Drill, Question, SessionState, Subject, Validation},
    hand::{random_hand, Hand},
    helpers::{choice, grade_choice, pct, question, styled},
    models::{DrillKind, TextStyle},
};

/// Equity bands offered as answers: (id, label, lower bound inclusive).
/// Upper bound is the next band's lower bound.
const BUCKETS: [(&str, &str, f64); 5] = [
    ("under-40", "Under 40%", 0.0),
    ("40-50",    "40% to 50%", 0.40),
    ("50-60",    "50% to 60%", 0.50),
    ("60-70",    "60% to 70%", 0.60),
    ("70-plus",  "70% or more", 0.70),
];

fn bucket_of(equity: f64) -> &'static str {
    BUCKETS
        .iter()
        .rev()
        .find(|(_, _, floor)| equity >= *floor)
        .map(|(id, _, _)| *id)
        .unwrap_or(BUCKETS[0].0)
}

/// "Roughly how much equity does {hand} have against a random hand?"
///
/// Hands are drawn uniformly over the 169 classes, not by deal frequency.
#[derive(Debug, Clone, Default)]
pub struct EquityBucketDrill;

impl EquityBucketDrill {
    pub fn new() -> Self {
        EquityBucketDrill
    }

    fn hand(question: &Question) -> Option<Hand> {
        match question.subject {
            Subject::Equity { hand } => Some(hand),
            _ => None,
        }
    }
}

impl Drill for EquityBucketDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::EquityBucket
    }

    fn generate(&self, _session: &SessionState, rng: &mut dyn RngCore) -> Question {
        let hand = random_hand(rng);
        question(
            self.kind(),
            rng,
            hand.shape().to_string(),
            format!("Roughly how often does {hand} win all-in preflop against a random hand?"),
            BUCKETS.iter().map(|(id, label, _)| choice(*id, *label)).collect(),
            Subject::Equity { hand },
        )
    }

    fn validate(&self, answer: &str, question: &Question) -> Validation {
        let correct = Self::hand(question).map_or(BUCKETS[0].0, |h| bucket_of(h.equity()));
        grade_choice(question, answer, correct)
    }

    fn explain(&self, question: &Question, _validation: &Validation, style: TextStyle) -> String {
        let Some(hand) = Self::hand(question) else {
            return String::new();
        };
        let equity = hand.equity();
        styled(
            style,
            format!("{hand} wins about {} of the time against a random hand.", pct(equity)),
            format!(
                "{hand}: {} preflop equity vs a random hand ({} combos, band {}).",
                pct(equity),
                hand.combos(),
                bucket_of(equity),
            ),
        )
    }
}
