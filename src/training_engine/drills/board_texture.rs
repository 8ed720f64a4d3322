use rand::RngCore;

use crate::training_engine::{
    deck::deal_flop,
    drill::{Drill, Question, SessionState, Subject, Validation},
    evaluator::{classify_board_texture, has_flush_draw, has_straight_draw, BoardTexture},
    helpers::{board_str, capitalize, choice, grade_choice, question, styled, weighted_pick},
    models::{Card, DrillKind, TextStyle},
};

/// Redeals allowed while hunting for the target texture. Monotone flops are
/// about 5% of deals.
const MAX_DEALS: usize = 128;

/// "Classify this flop: dry, wet, paired or monotone?"
///
/// Random flops are mostly wet, so each question first picks a target texture
/// and redeals until it gets one.
#[derive(Debug, Clone, Default)]
pub struct BoardTextureDrill;

impl BoardTextureDrill {
    pub fn new() -> Self {
        BoardTextureDrill
    }

    fn board(question: &Question) -> Option<[Card; 3]> {
        match question.subject {
            Subject::Board { cards } => Some(cards),
            _ => None,
        }
    }

    fn deal_target(target: BoardTexture, rng: &mut dyn RngCore) -> [Card; 3] {
        let mut flop = deal_flop(rng);
        for _ in 1..MAX_DEALS {
            if classify_board_texture(&flop) == target {
                break;
            }
            flop = deal_flop(rng);
        }
        flop
    }
}

impl Drill for BoardTextureDrill {
    fn kind(&self) -> DrillKind {
        DrillKind::BoardTexture
    }

    fn generate(&self, _session: &SessionState, rng: &mut dyn RngCore) -> Question {
        let target = BoardTexture::ALL[weighted_pick(rng, &[1, 1, 1, 1])];
        let cards = Self::deal_target(target, rng);
        let texture = classify_board_texture(&cards);

        question(
            self.kind(),
            rng,
            texture.label(),
            format!("The flop comes {}. How would you describe it?", board_str(&cards)),
            BoardTexture::ALL
                .iter()
                .map(|t| choice(t.label(), capitalize(t.label())))
                .collect(),
            Subject::Board { cards },
        )
    }

    fn validate(&self, answer: &str, question: &Question) -> Validation {
        let texture = Self::board(question).map_or(BoardTexture::Dry, |c| classify_board_texture(&c));
        grade_choice(question, answer, texture.label())
    }

    fn explain(&self, question: &Question, _validation: &Validation, style: TextStyle) -> String {
        let Some(cards) = Self::board(question) else {
            return String::new();
        };
        let board = board_str(&cards);
        let texture = classify_board_texture(&cards);
        let simple = match texture {
            BoardTexture::Monotone => format!("{board}: all three cards share a suit."),
            BoardTexture::Paired   => format!("{board}: two cards share a rank."),
            BoardTexture::Wet      => format!("{board}: lots of draws are possible."),
            BoardTexture::Dry      => format!("{board}: few draws are possible."),
        };
        let flush = if has_flush_draw(&cards) { "flush draw possible" } else { "rainbow" };
        let straight = if has_straight_draw(&cards) { "straight draw possible" } else { "no straight draw" };
        styled(
            style,
            simple,
            format!("{board} is {texture}: {flush}, {straight}."),
        )
    }
}
