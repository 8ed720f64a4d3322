use rand::{Rng, RngCore};
use tracing::debug;

use crate::error::TutorError;
use crate::training_engine::{
    charts::Catalogue,
    drill::{Drill, Question, SessionState, Subject, Validation},
    helpers::{question, styled},
    models::{DrillKind, TextStyle},
    range::{grade_selection, parse_hands, Range, RangeGrade},
};

/// "Build the {range} range." The answer is free-form range notation, graded
/// by how many of the 169 classes it gets right.
#[derive(Debug, Clone)]
pub struct RangeBuilderDrill {
    ranges: Vec<Range>,
    pass_similarity: f64,
}

impl RangeBuilderDrill {
    pub const DEFAULT_PASS_SIMILARITY: f64 = 90.0;

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
        Ok(RangeBuilderDrill {
            ranges,
            pass_similarity: Self::DEFAULT_PASS_SIMILARITY,
        })
    }

    pub fn with_pass_similarity(mut self, pct: f64) -> Self {
        self.pass_similarity = pct;
        self
    }

    fn target(&self, question: &Question) -> Option<&Range> {
        match &question.subject {
            Subject::RangeBuild { range } => self.ranges.iter().find(|r| r.name() == range),
            _ => None,
        }
    }

    /// Full grade for an answer: similarity plus missing and extra hands.
    pub fn grade(&self, answer: &str, question: &Question) -> Result<RangeGrade, TutorError> {
        let target = self
            .target(question)
            .ok_or_else(|| TutorError::invalid_config("question", "not a range-builder question"))?;
        let hands = parse_hands(answer)?;
        Ok(grade_selection(&hands, target, self.pass_similarity))
    }
}

impl Drill for RangeBuilderDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::RangeBuilder
    }

    fn generate(&self, _session: &SessionState, rng: &mut dyn RngCore) -> Question {
        let range = &self.ranges[rng.gen_range(0..self.ranges.len())];
        question(
            self.kind(),
            rng,
            range.name(),
            format!(
                "Build the {} range. Enter hands in range notation, e.g. \"77+, ATs+, KQo\".",
                range.name()
            ),
            Vec::new(),
            Subject::RangeBuild {
                range: range.name().to_string(),
            },
        )
    }

    fn validate(&self, answer: &str, question: &Question) -> Validation {
        let correct_answer = self.target(question).map(Range::to_notation).unwrap_or_default();
        let correct = match self.grade(answer, question) {
            Ok(grade) => grade.passed,
            Err(err) => {
                debug!(%err, "range answer rejected");
                false
            }
        };
        Validation { correct, correct_answer }
    }

    fn explain(&self, question: &Question, validation: &Validation, style: TextStyle) -> String {
        let Some(target) = self.target(question) else {
            return String::new();
        };
        let verdict = if validation.correct { "Close enough." } else { "Too far off." };
        styled(
            style,
            format!("{verdict} The {} range has {} hands.", target.name(), target.len()),
            format!(
                "{verdict} {} is {} classes, {} combos ({:.1}% of deals). Pass mark: {:.0}% agreement.",
                target.name(),
                target.len(),
                target.combos(),
                target.percentage_of_deck(),
                self.pass_similarity,
            ),
        )
    }
}
