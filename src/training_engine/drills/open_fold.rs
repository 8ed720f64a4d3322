use rand::{Rng, RngCore};

use crate::error::TutorError;
use crate::training_engine::{
    charts::Catalogue,
    drill::{Drill, Question, SessionState, Subject, Validation},
    drills::hand_near_range,
    hand::Hand,
    helpers::{choice, grade_choice, question, styled, weighted_pick},
    models::{Action, DrillKind, Position, TextStyle},
    range::Range,
};

/// "Folded to you on the {position} with {hand}. Raise or fold?"
///
/// Half the hands come from inside the opening range so both answers show up
/// about equally often.
#[derive(Debug, Clone)]
pub struct OpenFoldDrill {
    openings: Vec<(Position, Range)>,
}

impl OpenFoldDrill {
    /// `focus` narrows the drill to one position.
    pub fn new(catalogue: &Catalogue, focus: Option<&str>) -> Result<Self, TutorError> {
        let openings: Vec<(Position, Range)> = match focus {
            Some(key) => {
                let position: Position = key.parse()?;
                let range = catalogue.opening(position).ok_or_else(|| {
                    TutorError::invalid_config("focus", format!("{position} has no opening range"))
                })?;
                vec![(position, range.clone())]
            }
            None => catalogue.openings().map(|(p, r)| (p, r.clone())).collect(),
        };
        if openings.is_empty() {
            return Err(TutorError::invalid_config("focus", "no opening ranges to drill"));
        }
        Ok(OpenFoldDrill { openings })
    }

    fn seat(question: &Question) -> Option<(Hand, Position)> {
        match question.subject {
            Subject::Seat { hand, position } => Some((hand, position)),
            _ => None,
        }
    }

    fn answer_for(&self, hand: Hand, position: Position) -> Option<Action> {
        let (_, range) = self.openings.iter().find(|(p, _)| *p == position)?;
        Some(if range.contains(hand) { Action::Raise } else { Action::Fold })
    }
}

impl Drill for OpenFoldDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::OpenFold
    }

    fn generate(&self, _session: &SessionState, rng: &mut dyn RngCore) -> Question {
        let (position, range) = &self.openings[rng.gen_range(0..self.openings.len())];
        let position = *position;
        let inside = weighted_pick(rng, &[1, 1]) == 0;
        let hand = hand_near_range(range, inside, rng);

        question(
            self.kind(),
            rng,
            position.to_string(),
            format!("It folds to you in the {}. You hold {hand}. Raise or fold?", position.name()),
            vec![
                choice(Action::Raise.label(), "Raise"),
                choice(Action::Fold.label(), "Fold"),
            ],
            Subject::Seat { hand, position },
        )
    }

    fn validate(&self, answer: &str, question: &Question) -> Validation {
        let correct = Self::seat(question)
            .and_then(|(hand, position)| self.answer_for(hand, position))
            .unwrap_or(Action::Fold);
        grade_choice(question, answer, correct.label())
    }

    fn explain(&self, question: &Question, validation: &Validation, style: TextStyle) -> String {
        let Some((hand, position)) = Self::seat(question) else {
            return String::new();
        };
        let Some((_, range)) = self.openings.iter().find(|(p, _)| *p == position) else {
            return String::new();
        };
        let opens = range.contains(hand);
        let simple = if opens {
            format!("{hand} is strong enough to open from the {}.", position.name())
        } else {
            format!("{hand} is too weak to open from the {}. Fold it.", position.name())
        };
        let technical = format!(
            "{position} opens {:.1}% of hands ({} combos); {hand} is {} that range.",
            range.percentage_of_deck(),
            range.combos(),
            if opens { "inside" } else { "outside" },
        );
        let verdict = if validation.correct { "Correct." } else { "Incorrect." };
        format!("{verdict} {}", styled(style, simple, technical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_engine::drills::test_support::{assert_single_correct_choice, questions};

    fn drill(focus: Option<&str>) -> OpenFoldDrill {
        OpenFoldDrill::new(&Catalogue::standard().unwrap(), focus).unwrap()
    }

    #[test]
    fn both_answers_come_up() {
        let d = drill(None);
        let qs = questions(&d, 11, 60);
        let raises = qs.iter().filter(|q| d.validate("raise", q).correct).count();
        assert!(raises > 10 && raises < 50, "raises: {raises}");
        for q in &qs {
            assert_single_correct_choice(&d, q);
        }
    }

    #[test]
    fn focus_limits_positions() {
        let d = drill(Some("btn"));
        for q in questions(&d, 2, 20) {
            assert_eq!(q.category, "BTN");
        }
    }

    #[test]
    fn big_blind_focus_is_rejected() {
        let cat = Catalogue::standard().unwrap();
        assert!(OpenFoldDrill::new(&cat, Some("BB")).is_err());
        assert!(OpenFoldDrill::new(&cat, Some("dealer")).is_err());
    }

    #[test]
    fn utg_folds_king_nine_offsuit() {
        let d = drill(Some("UTG"));
        let mut q = questions(&d, 4, 1).remove(0);
        q.subject = Subject::Seat {
            hand: Hand::parse("K9o").unwrap(),
            position: Position::UTG,
        };
        let v = d.validate("Fold", &q);
        assert!(v.correct);
        assert_eq!(v.correct_answer, "fold");
        assert!(d.explain(&q, &v, TextStyle::Simple).contains("too weak"));
    }
}
