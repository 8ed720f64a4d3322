use rand::RngCore;

use crate::training_engine::{
    drill::{Drill, Question, SessionState, Subject, Validation},
    hand::{random_hand, Hand},
    helpers::{choice, grade_choice, pct, question, styled},
    models::{DrillKind, TextStyle},
};

/// Equity gap below which two hands are too close to quiz on.
const MIN_GAP: f64 = 0.01;
const MAX_DRAWS: usize = 32;

/// "Which hand has more equity against a random hand?"
#[derive(Debug, Clone, Default)]
pub struct HandVsHandDrill;

impl HandVsHandDrill {
    pub fn new() -> Self {
        HandVsHandDrill
    }

    fn matchup(subject: &Subject) -> Option<(Hand, Hand)> {
        match subject {
            Subject::Matchup { first, second } => Some((*first, *second)),
            _ => None,
        }
    }

    fn stronger(first: Hand, second: Hand) -> Hand {
        if second.equity() > first.equity() {
            second
        } else {
            first
        }
    }
}

impl Drill for HandVsHandDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::HandVsHand
    }

    fn generate(&self, _session: &SessionState, rng: &mut dyn RngCore) -> Question {
        let mut first = random_hand(rng);
        let mut second = random_hand(rng);
        for _ in 0..MAX_DRAWS {
            if first != second && (first.equity() - second.equity()).abs() >= MIN_GAP {
                break;
            }
            first = random_hand(rng);
            second = random_hand(rng);
        }

        let mut shapes = [first.shape(), second.shape()];
        shapes.sort();
        let category = format!("{} vs {}", shapes[0], shapes[1]);

        question(
            self.kind(),
            rng,
            category,
            format!("Which hand wins more often against a random hand: {first} or {second}?"),
            vec![
                choice(first.notation(), first.notation()),
                choice(second.notation(), second.notation()),
            ],
            Subject::Matchup { first, second },
        )
    }

    fn validate(&self, answer: &str, question: &Question) -> Validation {
        match Self::matchup(&question.subject) {
            Some((first, second)) => {
                grade_choice(question, answer, &Self::stronger(first, second).notation())
            }
            None => Validation {
                correct: false,
                correct_answer: String::new(),
            },
        }
    }

    fn explain(&self, question: &Question, validation: &Validation, style: TextStyle) -> String {
        let Some((first, second)) = Self::matchup(&question.subject) else {
            return String::new();
        };
        let (winner, loser) = if Self::stronger(first, second) == first {
            (first, second)
        } else {
            (second, first)
        };
        let verdict = if validation.correct { "Right." } else { "Not quite." };
        styled(
            style,
            format!("{verdict} {winner} is the stronger starting hand; {loser} wins less often."),
            format!(
                "{verdict} {winner} has {} equity vs a random hand, {loser} has {}.",
                pct(winner.equity()),
                pct(loser.equity()),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_engine::drills::test_support::{assert_single_correct_choice, questions};

    #[test]
    fn every_question_has_one_stronger_hand() {
        let drill = HandVsHandDrill::new();
        for q in questions(&drill, 3, 50) {
            assert_eq!(q.choices.len(), 2);
            assert_ne!(q.choices[0].id, q.choices[1].id);
            assert_single_correct_choice(&drill, &q);
        }
    }

    #[test]
    fn aces_beat_seven_deuce() {
        let drill = HandVsHandDrill::new();
        let q = questions(&drill, 1, 1).remove(0);
        let rigged = Question {
            subject: Subject::Matchup {
                first: Hand::parse("72o").unwrap(),
                second: Hand::parse("AA").unwrap(),
            },
            choices: vec![choice("72o", "72o"), choice("AA", "AA")],
            ..q
        };
        let v = drill.validate("aa", &rigged);
        assert!(v.correct);
        assert_eq!(v.correct_answer, "AA");
        assert!(drill.explain(&rigged, &v, TextStyle::Technical).contains("85.1%"));
    }

    #[test]
    fn category_names_both_shapes() {
        let drill = HandVsHandDrill::new();
        for q in questions(&drill, 8, 20) {
            assert!(q.category.contains(" vs "), "{}", q.category);
        }
    }
}
