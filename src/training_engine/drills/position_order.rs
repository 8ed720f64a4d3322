use rand::seq::index::sample;
use rand::RngCore;

use crate::training_engine::{
    drill::{Drill, Question, SessionState, Subject, Validation},
    helpers::{capitalize, choice, grade_choice, question, styled, weighted_pick},
    models::{DrillKind, Position, Street, TextStyle},
};

/// "Preflop, who acts first: CO or BB?" Pure table-order trivia.
#[derive(Debug, Clone, Default)]
pub struct PositionOrderDrill;

impl PositionOrderDrill {
    pub fn new() -> Self {
        PositionOrderDrill
    }

    fn order(position: Position, street: Street) -> usize {
        match street {
            Street::Preflop  => position.preflop_order(),
            Street::Postflop => position.postflop_order(),
        }
    }

    fn first_to_act(a: Position, b: Position, street: Street) -> Position {
        if Self::order(a, street) <= Self::order(b, street) {
            a
        } else {
            b
        }
    }

    fn seats(question: &Question) -> Option<(Position, Position, Street)> {
        match question.subject {
            Subject::Order { first, second, street } => Some((first, second, street)),
            _ => None,
        }
    }
}

impl Drill for PositionOrderDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::PositionOrder
    }

    fn generate(&self, _session: &SessionState, rng: &mut dyn RngCore) -> Question {
        let picked = sample(rng, Position::ALL.len(), 2);
        let (first, second) = (Position::ALL[picked.index(0)], Position::ALL[picked.index(1)]);
        let street = if weighted_pick(rng, &[1, 1]) == 0 { Street::Preflop } else { Street::Postflop };

        question(
            self.kind(),
            rng,
            street.to_string(),
            format!("{}, who acts first: {first} or {second}?", capitalize(&street.to_string())),
            vec![
                choice(first.to_string(), first.name()),
                choice(second.to_string(), second.name()),
            ],
            Subject::Order { first, second, street },
        )
    }

    fn validate(&self, answer: &str, question: &Question) -> Validation {
        match Self::seats(question) {
            Some((a, b, street)) => {
                grade_choice(question, answer, &Self::first_to_act(a, b, street).to_string())
            }
            None => Validation {
                correct: false,
                correct_answer: String::new(),
            },
        }
    }

    fn explain(&self, question: &Question, _validation: &Validation, style: TextStyle) -> String {
        let Some((a, b, street)) = Self::seats(question) else {
            return String::new();
        };
        let first = Self::first_to_act(a, b, street);
        let order: Vec<String> = {
            let mut all = Position::ALL;
            all.sort_by_key(|p| Self::order(*p, street));
            all.iter().map(|p| p.to_string()).collect()
        };
        styled(
            style,
            format!("{} acts first {street}.", first.name()),
            format!("{street} order: {}. {first} acts first.", order.join(" > ")),
        )
    }
}
