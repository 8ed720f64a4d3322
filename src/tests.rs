//! Crate-level behaviour tests for `poker_tutor`.
//!
//! Included from `lib.rs` under `#[cfg(test)]`. Per-module unit tests live
//! next to their code; these exercise the pieces together.
//!
//! | Group | What is tested |
//! |-------|----------------|
//! | Hands | Normalisation idempotence, grid bijection, enumeration coverage |
//! | Ranges | Similarity bounds, combo weighting, chart notation round trip |
//! | Board texture | The four reference flops |
//! | Engine | Session arithmetic, every drill answerable, determinism |
//! | Progress | Linear cascade, monotonic records, persistence across reopen |
//! | End to end | Engine summary feeding the standard curriculum |

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::progress::{Curriculum, JsonFileBackend, MemoryBackend, ProgressStore};
use crate::training_engine::{
    build_drill, classify_board_texture,
    hand::{enumerate_all, normalize, random_hand, GRID_SIZE, HAND_CLASSES},
    range::{parse_hands, similarity},
    BoardTexture, Card, Catalogue, Drill, DrillConfig, DrillEngine, DrillKind, Hand, ManualClock,
    NextStep, Range, SessionSummary,
};

// ── helpers ──────────────────────────────────────────────────────────────────

const WRONG: &str = "definitely not an answer";

/// Five seeds that span different RNG states.
const SEEDS: [u64; 5] = [1, 42, 999, 0xDEAD_BEEF, 7];

fn cards(text: &str) -> [Card; 3] {
    let parsed: Vec<Card> = text.split_whitespace().map(|c| c.parse().unwrap()).collect();
    [parsed[0], parsed[1], parsed[2]]
}

/// Run a full session, answering correctly whenever `answer_right(index)`
/// holds. A second drill instance of the same kind acts as the answer key.
fn play(config: DrillConfig, clock: &ManualClock, answer_right: impl Fn(usize) -> bool) -> SessionSummary {
    let key = build_drill(config.kind, config.focus.as_deref()).unwrap();
    let mut engine = DrillEngine::new(config).unwrap().with_clock(clock.clone());

    let mut ready = engine.start().unwrap();
    loop {
        clock.advance(1_000);
        let answer = if answer_right(ready.index) {
            key.validate("", &ready.question).correct_answer
        } else {
            WRONG.to_string()
        };
        let feedback = engine.submit_answer(&answer).unwrap();
        assert_eq!(feedback.correct, answer_right(ready.index), "{:?}", ready.question);
        match engine.next_question().unwrap() {
            NextStep::Question(next) => ready = next,
            NextStep::Ended(summary) => return summary,
        }
    }
}

fn four_drill_curriculum() -> Curriculum {
    Curriculum::from_json_str(
        r#"{
            "units": [
                {"id": "d1", "title": "Drill 1", "kind": "drill", "drill": "hand_vs_hand", "initially_unlocked": true},
                {"id": "d2", "title": "Drill 2", "kind": "drill", "drill": "position_order"},
                {"id": "d3", "title": "Drill 3", "kind": "drill", "drill": "equity_bucket"},
                {"id": "d4", "title": "Drill 4", "kind": "drill", "drill": "board_texture"}
            ],
            "cascades": [{"rule": "sequence", "units": ["d1", "d2", "d3", "d4"]}]
        }"#,
    )
    .unwrap()
}

fn perfect_run(kind: DrillKind, seed: u64) -> SessionSummary {
    let config = DrillConfig::new(kind).with_seed(seed);
    play(config, &ManualClock::new(), |_| true)
}

// ── hands ────────────────────────────────────────────────────────────────────

#[test]
fn normalisation_is_idempotent_and_order_insensitive() {
    assert_eq!(normalize("AKs").unwrap(), "AKs");
    assert_eq!(normalize("KAs").unwrap(), "AKs");
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let notation = random_hand(&mut rng).notation();
        let reversed: String = notation[..2].chars().rev().chain(notation[2..].chars()).collect();
        let once = normalize(&reversed).unwrap();
        assert_eq!(normalize(&once).unwrap(), once);
        assert_eq!(once, notation);
    }
}

#[test]
fn enumeration_visits_every_grid_cell_once() {
    let cells: HashSet<(usize, usize)> = enumerate_all().iter().map(|h| h.grid_coord()).collect();
    assert_eq!(enumerate_all().len(), HAND_CLASSES);
    assert_eq!(cells.len(), HAND_CLASSES);
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            assert_eq!(Hand::from_grid(row, col).unwrap().grid_coord(), (row, col));
        }
    }
}

// ── ranges ───────────────────────────────────────────────────────────────────

#[test]
fn similarity_stays_within_bounds_for_every_chart_range() {
    let catalogue = Catalogue::standard().unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    for range in catalogue.ranges() {
        assert_eq!(similarity(range.hands(), range), 100.0, "{}", range.name());
        let guess: Vec<Hand> = (0..40).map(|_| random_hand(&mut rng)).collect();
        let score = similarity(&guess, range);
        assert!((0.0..=100.0).contains(&score), "{}: {score}", range.name());
    }
}

#[test]
fn deck_percentage_is_combo_weighted() {
    for (notation, expected) in [("AA", 0.4525), ("AKs", 0.3016), ("AKo", 0.9050)] {
        let range = Range::from_notation(notation, notation).unwrap();
        let pct = range.percentage_of_deck();
        assert!((pct - expected).abs() < 1e-3, "{notation}: {pct}");
    }
}

#[test]
fn chart_ranges_survive_a_notation_round_trip() {
    let catalogue = Catalogue::standard().unwrap();
    for range in catalogue.ranges() {
        let reparsed = parse_hands(&range.to_notation()).unwrap();
        assert_eq!(&reparsed, range.hands(), "{}", range.name());
    }
}

// ── board texture ────────────────────────────────────────────────────────────

#[test]
fn reference_flops_classify_as_documented() {
    assert_eq!(classify_board_texture(&cards("Kh 7d 2c")), BoardTexture::Dry);
    assert_eq!(classify_board_texture(&cards("Jh Th 9c")), BoardTexture::Wet);
    assert_eq!(classify_board_texture(&cards("Kc Kd 4s")), BoardTexture::Paired);
    assert_eq!(classify_board_texture(&cards("9h 6h 3h")), BoardTexture::Monotone);
}

// ── engine ───────────────────────────────────────────────────────────────────

#[test]
fn fifteen_of_twenty_is_seventy_five_percent() {
    let clock = ManualClock::new();
    let config = DrillConfig::new(DrillKind::OpenFold).with_seed(5);
    let summary = play(config, &clock, |index| index > 5);

    assert_eq!(summary.total_questions, 20);
    assert_eq!(summary.correct, 15);
    assert_eq!(summary.accuracy, 75.0);
    assert_eq!(summary.passed, Some(false));
    assert_eq!(summary.avg_time_ms, 1_000);
    assert_eq!(summary.min_time_ms, 1_000);
    assert_eq!(summary.best_streak, 15);
    let by_category: u32 = summary.categories.values().map(|c| c.total).sum();
    assert_eq!(by_category, 20);
}

#[test]
fn stopping_before_any_answer_is_harmless() {
    let mut engine = DrillEngine::new(DrillConfig::new(DrillKind::BoardTexture).with_seed(1)).unwrap();
    engine.start();
    let summary = engine.stop().unwrap();
    assert_eq!(summary.answered, 0);
    assert_eq!(summary.avg_time_ms, 0);
    assert_eq!(summary.accuracy, 0.0);
    assert_eq!(summary.passed, None);
    assert!(engine.submit_answer("dry").is_none());
    assert!(engine.stop().is_none());
}

#[test]
fn every_drill_can_be_answered_perfectly() {
    for kind in DrillKind::ALL {
        for seed in SEEDS {
            let summary = perfect_run(kind, seed);
            assert_eq!(summary.accuracy, 100.0, "{kind:?} seed {seed}");
            assert_eq!(summary.passed, Some(true), "{kind:?} seed {seed}");
        }
    }
}

#[test]
fn every_choice_question_offers_its_answer() {
    for kind in DrillKind::ALL {
        let drill = build_drill(kind, None).unwrap();
        let mut engine = DrillEngine::new(DrillConfig::new(kind).with_seed(21)).unwrap();
        let ready = engine.start().unwrap();
        let answer = drill.validate("", &ready.question).correct_answer;
        if kind == DrillKind::RangeBuilder {
            assert!(ready.question.choices.is_empty());
            assert!(parse_hands(&answer).is_ok());
        } else {
            assert!(
                ready.question.choices.iter().any(|c| c.id == answer),
                "{kind:?}: {answer} not among {:?}",
                ready.question.choices
            );
        }
    }
}

#[test]
fn same_seed_replays_the_same_session() {
    for kind in DrillKind::ALL {
        let ids = |seed: u64| {
            let mut engine = DrillEngine::new(DrillConfig::new(kind).with_seed(seed).with_questions(5)).unwrap();
            let mut ids = vec![engine.start().unwrap().question.id];
            while engine.submit_answer(WRONG).is_some() {
                match engine.next_question() {
                    Some(NextStep::Question(q)) => ids.push(q.question.id),
                    _ => break,
                }
            }
            ids
        };
        assert_eq!(ids(123), ids(123), "{kind:?}");
        assert_eq!(ids(123).len(), 5);
    }
}

// ── progress ─────────────────────────────────────────────────────────────────

#[test]
fn linear_cascade_unlocks_one_drill_at_a_time() {
    let mut store = ProgressStore::open(four_drill_curriculum(), MemoryBackend::new()).unwrap();
    let unlocked = |s: &ProgressStore<MemoryBackend>| {
        ["d1", "d2", "d3", "d4"].map(|id| s.is_unlocked(id))
    };
    assert_eq!(unlocked(&store), [true, false, false, false]);

    let pass = perfect_run(DrillKind::HandVsHand, 1);
    let update = store.record_attempt_at("d1", &pass, 1).unwrap();
    assert_eq!(update.newly_unlocked, vec!["d2".to_string()]);
    assert_eq!(unlocked(&store), [true, true, false, false]);

    store.record_attempt_at("d2", &pass, 2).unwrap();
    assert_eq!(unlocked(&store), [true, true, true, false]);

    store.record_attempt_at("d3", &pass, 3).unwrap();
    assert_eq!(unlocked(&store), [true, true, true, true]);
}

#[test]
fn worse_sessions_never_lower_the_record() {
    let mut store = ProgressStore::open(four_drill_curriculum(), MemoryBackend::new()).unwrap();
    let clock = ManualClock::new();
    let config = || DrillConfig::new(DrillKind::HandVsHand).with_seed(8);

    let mut last_best = 0.0;
    for right in [18, 12, 19, 4, 0] {
        let summary = play(config(), &clock, |index| index <= right);
        store.record_attempt_at("d1", &summary, 0).unwrap();
        let record = store.record("d1").unwrap();
        assert!(record.best_score >= last_best);
        assert!(record.completed, "completion is sticky after the first pass");
        last_best = record.best_score;
    }
    assert_eq!(last_best, 95.0);
    assert_eq!(store.record("d1").unwrap().attempts, 5);
}

#[test]
fn file_backed_progress_survives_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");

    {
        let mut store = ProgressStore::open(four_drill_curriculum(), JsonFileBackend::new(&path)).unwrap();
        let update = store
            .record_attempt_at("d1", &perfect_run(DrillKind::HandVsHand, 2), 1_700_000_000_000)
            .unwrap();
        assert_eq!(update.warning, None);
    }

    let mut store = ProgressStore::open(four_drill_curriculum(), JsonFileBackend::new(&path)).unwrap();
    assert!(store.take_warnings().is_empty());
    assert!(store.is_completed("d1"));
    assert!(store.is_unlocked("d2"));
    assert!(!store.is_unlocked("d3"));
    assert_eq!(store.record("d1").unwrap().last_attempt_timestamp, Some(1_700_000_000_000));
}

// ── end to end ───────────────────────────────────────────────────────────────

#[test]
fn standard_curriculum_first_unit_end_to_end() {
    let curriculum = Curriculum::standard().unwrap();
    let config = curriculum
        .unit("hand-strength")
        .and_then(|u| u.drill_config())
        .unwrap()
        .with_seed(99);
    let summary = play(config, &ManualClock::new(), |_| true);

    let mut store = ProgressStore::open(curriculum, MemoryBackend::new()).unwrap();
    assert!(!store.is_unlocked("table-positions"));
    let update = store.record_attempt("hand-strength", &summary).unwrap();

    assert_eq!(update.newly_completed, vec!["hand-strength".to_string()]);
    assert_eq!(update.newly_unlocked, vec!["table-positions".to_string()]);
    for badge in ["quick-thinker", "flawless", "on-fire"] {
        assert!(update.new_achievements.iter().any(|a| a == badge), "{badge}");
    }
    assert!(store.backend().document().is_some());

    let stats = store.stats("foundations");
    assert_eq!(stats.completed_count, 1);
    assert_eq!(stats.total_count, 4);
    assert_eq!(stats.best_streak, 20);
}
