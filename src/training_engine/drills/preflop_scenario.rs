use rand::seq::IteratorRandom;
use rand::{Rng, RngCore};

use crate::error::TutorError;
use crate::training_engine::{
    charts::{Catalogue, ScenarioSpot, SpotKind},
    drill::{Drill, Question, SessionState, Subject, Validation},
    hand::{enumerate_all, random_hand, Hand},
    helpers::{choice, grade_choice, question, styled, weighted_pick},
    models::{Action, DrillKind, TextStyle},
};

/// Facing an open or a 3-bet: pick the chart action for the hand.
///
/// Each question first picks one of the spot's three options with equal
/// weight, then a hand from that bucket, so folds don't swamp the drill.
#[derive(Debug, Clone)]
pub struct PreflopScenarioDrill {
    spots: Vec<ScenarioSpot>,
}

impl PreflopScenarioDrill {
    /// `focus` picks a single spot by id or label.
    pub fn new(catalogue: &Catalogue, focus: Option<&str>) -> Result<Self, TutorError> {
        let spots = match focus {
            Some(key) => {
                let spot = catalogue
                    .spot(key)
                    .ok_or_else(|| TutorError::invalid_config("focus", format!("unknown spot {key:?}")))?;
                vec![spot.clone()]
            }
            None => catalogue.spots().to_vec(),
        };
        if spots.is_empty() {
            return Err(TutorError::invalid_config("focus", "no scenario spots to drill"));
        }
        Ok(PreflopScenarioDrill { spots })
    }

    fn lookup(&self, question: &Question) -> Option<(Hand, &ScenarioSpot)> {
        match &question.subject {
            Subject::Scenario { hand, spot } => {
                let found = self.spots.iter().find(|s| &s.id == spot)?;
                Some((*hand, found))
            }
            _ => None,
        }
    }

    fn situation(spot: &ScenarioSpot) -> String {
        match spot.kind {
            SpotKind::FacingOpen => format!(
                "You are in the {}. The {} opens.",
                spot.hero.name(),
                spot.villain.name()
            ),
            SpotKind::FacingThreeBet => format!(
                "You open from the {}. The {} 3-bets.",
                spot.hero.name(),
                spot.villain.name()
            ),
        }
    }
}

fn option_text(action: Action) -> &'static str {
    match action {
        Action::FourBet  => "4-bet",
        Action::ThreeBet => "3-bet",
        Action::Raise    => "Raise",
        Action::Call     => "Call",
        Action::Fold     => "Fold",
    }
}

impl Drill for PreflopScenarioDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::PreflopScenario
    }

    fn generate(&self, _session: &SessionState, rng: &mut dyn RngCore) -> Question {
        let spot = &self.spots[rng.gen_range(0..self.spots.len())];
        let options = spot.options();

        let buckets: Vec<Vec<Hand>> = options
            .iter()
            .map(|&action| {
                enumerate_all()
                    .iter()
                    .copied()
                    .filter(|h| spot.decision.bucket_for(*h) == action)
                    .collect()
            })
            .collect();
        let weights: Vec<u32> = buckets.iter().map(|b| u32::from(!b.is_empty())).collect();
        let hand = buckets[weighted_pick(rng, &weights)]
            .iter()
            .copied()
            .choose(rng)
            .unwrap_or_else(|| random_hand(rng));

        question(
            self.kind(),
            rng,
            spot.label(),
            format!("{} You hold {hand}. What do you do?", Self::situation(spot)),
            options
                .iter()
                .map(|&a| choice(a.label(), option_text(a)))
                .collect(),
            Subject::Scenario {
                hand,
                spot: spot.id.clone(),
            },
        )
    }

    fn validate(&self, answer: &str, question: &Question) -> Validation {
        let action = self
            .lookup(question)
            .map_or(Action::Fold, |(hand, spot)| spot.decision.bucket_for(hand));
        grade_choice(question, answer, action.label())
    }

    fn explain(&self, question: &Question, validation: &Validation, style: TextStyle) -> String {
        let Some((hand, spot)) = self.lookup(question) else {
            return String::new();
        };
        let action = spot.decision.bucket_for(hand);
        let verdict = if validation.correct { "Correct." } else { "Not the chart play." };
        let simple = match action {
            Action::Fold => format!("{hand} is not strong enough to continue here. Fold."),
            Action::Call => format!("{hand} plays well enough to call, but is not strong enough to raise."),
            _ => format!("{hand} is strong enough to raise again: {}.", option_text(action)),
        };
        let continuing = spot.decision.continuing();
        let technical = format!(
            "{}: {hand} is in the {} bucket. Continuing range is {:.1}% of combos.",
            spot.label(),
            action.label(),
            continuing.percentage_of_deck(),
        );
        format!("{verdict} {}", styled(style, simple, technical))
    }
}
