use rand::{Rng, RngCore};

use crate::error::TutorError;
use crate::training_engine::{
    charts::Catalogue,
    drill::{Drill, Question, SessionState, Subject, Validation},
    drills::hand_near_range,
    hand::Hand,
    helpers::{choice, grade_choice, question, styled, weighted_pick},
    models::{DrillKind, TextStyle},
    range::Range,
};

/// "Is {hand} part of {range}?" over every named chart range.
#[derive(Debug, Clone)]
pub struct RangeMembershipDrill {
    ranges: Vec<Range>,
}

impl RangeMembershipDrill {
    /// `focus` picks a single range by name or position.
    pub fn new(catalogue: &Catalogue, focus: Option<&str>) -> Result<Self, TutorError> {
        let ranges = match focus {
            Some(name) => {
                let range = catalogue
                    .range(name)
                    .ok_or_else(|| TutorError::invalid_config("focus", format!("unknown range {name:?}")))?;
                vec![range.clone()]
            }
            None => catalogue.ranges().cloned().collect::<Vec<_>>(),
        };
        if ranges.is_empty() {
            return Err(TutorError::invalid_config("focus", "no ranges to drill"));
        }
        Ok(RangeMembershipDrill { ranges })
    }

    fn lookup(&self, question: &Question) -> Option<(Hand, &Range)> {
        match &question.subject {
            Subject::Membership { hand, range } => {
                let found = self.ranges.iter().find(|r| r.name() == range)?;
                Some((*hand, found))
            }
            _ => None,
        }
    }
}

impl Drill for RangeMembershipDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::RangeMembership
    }

    fn generate(&self, _session: &SessionState, rng: &mut dyn RngCore) -> Question {
        let range = &self.ranges[rng.gen_range(0..self.ranges.len())];
        let inside = weighted_pick(rng, &[1, 1]) == 0;
        let hand = hand_near_range(range, inside, rng);

        question(
            self.kind(),
            rng,
            range.name(),
            format!("Is {hand} part of the {} range?", range.name()),
            vec![choice("yes", "Yes"), choice("no", "No")],
            Subject::Membership {
                hand,
                range: range.name().to_string(),
            },
        )
    }

    fn validate(&self, answer: &str, question: &Question) -> Validation {
        let inside = self
            .lookup(question)
            .is_some_and(|(hand, range)| range.contains(hand));
        grade_choice(question, answer, if inside { "yes" } else { "no" })
    }

    fn explain(&self, question: &Question, validation: &Validation, style: TextStyle) -> String {
        let Some((hand, range)) = self.lookup(question) else {
            return String::new();
        };
        let is_in = if range.contains(hand) { "is" } else { "is not" };
        let lead = if validation.correct { "Correct" } else { "Wrong" };
        styled(
            style,
            format!("{lead}: {hand} {is_in} in the {} range.", range.name()),
            format!(
                "{lead}: {hand} {is_in} in {} ({} classes, {:.1}% of combos).",
                range.name(),
                range.len(),
                range.percentage_of_deck(),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_engine::drills::test_support::{assert_single_correct_choice, questions};

    #[test]
    fn covers_openings_and_defends() {
        let drill = RangeMembershipDrill::new(&Catalogue::standard().unwrap(), None).unwrap();
        let qs = questions(&drill, 21, 200);
        assert!(qs.iter().any(|q| q.category.ends_with("open")));
        assert!(qs.iter().any(|q| q.category.ends_with("defend")));
        for q in &qs {
            assert_single_correct_choice(&drill, q);
        }
    }

    #[test]
    fn focused_drill_grades_against_that_range() {
        let drill = RangeMembershipDrill::new(&Catalogue::standard().unwrap(), Some("BB vs UTG defend")).unwrap();
        let mut q = questions(&drill, 1, 1).remove(0);
        assert_eq!(q.category, "BB vs UTG defend");
        q.subject = Subject::Membership {
            hand: Hand::parse("KQo").unwrap(),
            range: "BB vs UTG defend".into(),
        };
        assert!(drill.validate("Yes", &q).correct);
        q.subject = Subject::Membership {
            hand: Hand::parse("K9o").unwrap(),
            range: "BB vs UTG defend".into(),
        };
        assert!(drill.validate("no", &q).correct);
    }

    #[test]
    fn unknown_focus_is_an_error() {
        assert!(RangeMembershipDrill::new(&Catalogue::standard().unwrap(), Some("HJ open")).is_err());
    }
}
