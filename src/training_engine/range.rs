//! Hand ranges and the algebra drills grade against.
//!
//! A [`Range`] is a named set of hand classes. A [`BucketedRange`] splits a
//! decision into action buckets (`fourBet`, `threeBet`, `call`, ...) with an
//! implicit `fold` for every unlisted hand.
//!
//! Notation accepted by [`Range::from_notation`]:
//!
//! | Item      | Expands to |
//! |-----------|------------|
//! | `AKs`     | one class |
//! | `AK`      | `AKs`, `AKo` |
//! | `TT+`     | `TT` up to `AA` |
//! | `ATs+`    | `ATs`, `AJs`, `AQs`, `AKs` |
//! | `A5s-A2s` | `A5s`, `A4s`, `A3s`, `A2s` |
//! | `99-66`   | `99`, `88`, `77`, `66` |

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::training_engine::{
    hand::{enumerate_all, Hand, GRID_SIZE, HAND_CLASSES},
    models::{Action, Rank},
};

pub const TOTAL_COMBOS: u32 = 1326;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    name: String,
    hands: BTreeSet<Hand>,
}

impl Range {
    pub fn new(name: impl Into<String>, hands: impl IntoIterator<Item = Hand>) -> Self {
        Range {
            name: name.into(),
            hands: hands.into_iter().collect(),
        }
    }

    pub fn from_notation(name: impl Into<String>, notation: &str) -> Result<Self, TutorError> {
        Ok(Range {
            name: name.into(),
            hands: parse_hands(notation)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hands(&self) -> &BTreeSet<Hand> {
        &self.hands
    }

    pub fn contains(&self, hand: Hand) -> bool {
        self.hands.contains(&hand)
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Hand> + '_ {
        self.hands.iter().copied()
    }

    pub fn combos(&self) -> u32 {
        self.hands.iter().map(|h| h.combos()).sum()
    }

    /// Share of all dealt hands, weighted by combos.
    pub fn percentage_of_deck(&self) -> f64 {
        percentage_of_deck(&self.hands)
    }

    /// Canonical hands in enumeration order, comma separated.
    pub fn to_notation(&self) -> String {
        self.hands
            .iter()
            .map(|h| h.notation())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `grid[row][col]` is true when the hand at that cell is in the range.
    pub fn grid(&self) -> [[bool; GRID_SIZE]; GRID_SIZE] {
        let mut grid = [[false; GRID_SIZE]; GRID_SIZE];
        for hand in &self.hands {
            let (row, col) = hand.grid_coord();
            grid[row][col] = true;
        }
        grid
    }
}

/// Parse comma or whitespace separated range notation into hand classes.
pub fn parse_hands(notation: &str) -> Result<BTreeSet<Hand>, TutorError> {
    let mut hands = BTreeSet::new();
    for item in notation
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
    {
        parse_item(item, &mut hands)?;
    }
    Ok(hands)
}

/// Shape filter of one notation item: `s`, `o`, or both when absent.
#[derive(Clone, Copy)]
struct ItemShape {
    suited: bool,
    offsuit: bool,
}

struct Item {
    high: Rank,
    low: Rank,
    shape: ItemShape,
}

fn parse_item(item: &str, hands: &mut BTreeSet<Hand>) -> Result<(), TutorError> {
    if let Some((start, end)) = item.split_once('-') {
        let start = parse_bare(item, start)?;
        let end = parse_bare(item, end)?;
        return expand_span(item, start, end, hands);
    }

    if let Some(base) = item.strip_suffix('+') {
        let base = parse_bare(item, base)?;
        if base.high == base.low {
            for rank in (base.high.0..=Rank::ACE.0).map(Rank) {
                hands.insert(Hand::new(rank, rank, false));
            }
        } else {
            for kicker in (base.low.0..base.high.0).map(Rank) {
                insert_shapes(base.high, kicker, base.shape, hands);
            }
        }
        return Ok(());
    }

    let single = parse_bare(item, item)?;
    insert_shapes(single.high, single.low, single.shape, hands);
    Ok(())
}

fn parse_bare(item: &str, text: &str) -> Result<Item, TutorError> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 2 || chars.len() > 3 {
        return Err(TutorError::invalid_notation(item, "range items are 2 or 3 characters"));
    }
    let a = Rank::from_char(chars[0]).ok_or_else(|| TutorError::invalid_notation(item, "unknown rank"))?;
    let b = Rank::from_char(chars[1]).ok_or_else(|| TutorError::invalid_notation(item, "unknown rank"))?;
    let shape = match chars.get(2).map(|c| c.to_ascii_lowercase()) {
        None => ItemShape { suited: true, offsuit: true },
        Some('s') => ItemShape { suited: true, offsuit: false },
        Some('o') => ItemShape { suited: false, offsuit: true },
        Some(_) => return Err(TutorError::invalid_notation(item, "suffix must be 's' or 'o'")),
    };
    let (high, low) = if a >= b { (a, b) } else { (b, a) };
    Ok(Item { high, low, shape })
}

fn insert_shapes(high: Rank, low: Rank, shape: ItemShape, hands: &mut BTreeSet<Hand>) {
    if high == low {
        hands.insert(Hand::new(high, low, false));
        return;
    }
    if shape.suited {
        hands.insert(Hand::new(high, low, true));
    }
    if shape.offsuit {
        hands.insert(Hand::new(high, low, false));
    }
}

fn expand_span(item: &str, start: Item, end: Item, hands: &mut BTreeSet<Hand>) -> Result<(), TutorError> {
    let start_pair = start.high == start.low;
    let end_pair = end.high == end.low;

    if start_pair && end_pair {
        let (lo, hi) = ordered(start.high.0, end.high.0);
        for rank in (lo..=hi).map(Rank) {
            hands.insert(Hand::new(rank, rank, false));
        }
        return Ok(());
    }

    if start_pair || end_pair || start.high != end.high {
        return Err(TutorError::invalid_notation(item, "a span must share its high card"));
    }

    let shape = ItemShape {
        suited: start.shape.suited && end.shape.suited,
        offsuit: start.shape.offsuit && end.shape.offsuit,
    };
    let (lo, hi) = ordered(start.low.0, end.low.0);
    for kicker in (lo..=hi).map(Rank) {
        insert_shapes(start.high, kicker, shape, hands);
    }
    Ok(())
}

fn ordered(a: u8, b: u8) -> (u8, u8) {
    if a <= b { (a, b) } else { (b, a) }
}

// ---------------------------------------------------------------------------
// Bucketed ranges
// ---------------------------------------------------------------------------

/// A decision split into action buckets, strongest action first.
///
/// Buckets are kept mutually exclusive: a hand listed under two actions stays
/// only in the stronger one (`FourBet > ThreeBet > Raise > Call`). Unlisted
/// hands fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketedRange {
    name: String,
    buckets: Vec<(Action, BTreeSet<Hand>)>,
}

impl BucketedRange {
    pub fn new(name: impl Into<String>) -> Self {
        BucketedRange {
            name: name.into(),
            buckets: Vec::new(),
        }
    }

    /// Add (or extend) the bucket for `action`. Listing hands under `Fold` is
    /// allowed but redundant.
    pub fn with_bucket(mut self, action: Action, notation: &str) -> Result<Self, TutorError> {
        let hands = parse_hands(notation)?;
        match self.buckets.iter_mut().find(|(a, _)| *a == action) {
            Some((_, existing)) => existing.extend(hands),
            None => self.buckets.push((action, hands)),
        }
        self.buckets.sort_by(|a, b| b.0.cmp(&a.0));
        self.enforce_precedence();
        Ok(self)
    }

    fn enforce_precedence(&mut self) {
        let mut claimed: BTreeSet<Hand> = BTreeSet::new();
        for (_, hands) in &mut self.buckets {
            hands.retain(|h| !claimed.contains(h));
            claimed.extend(hands.iter().copied());
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The strongest bucket holding `hand`, `Fold` when none does.
    pub fn bucket_for(&self, hand: Hand) -> Action {
        self.buckets
            .iter()
            .find(|(_, hands)| hands.contains(&hand))
            .map(|(action, _)| *action)
            .unwrap_or(Action::Fold)
    }

    pub fn bucket(&self, action: Action) -> Option<&BTreeSet<Hand>> {
        self.buckets
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, hands)| hands)
    }

    /// Actions with a non-empty explicit bucket, strongest first.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.buckets
            .iter()
            .filter(|(_, hands)| !hands.is_empty())
            .map(|(action, _)| *action)
    }

    /// Every hand that does not fold, as a plain range.
    pub fn continuing(&self) -> Range {
        Range::new(
            self.name.clone(),
            self.buckets
                .iter()
                .filter(|(action, _)| *action != Action::Fold)
                .flat_map(|(_, hands)| hands.iter().copied()),
        )
    }
}

// ---------------------------------------------------------------------------
// Range algebra
// ---------------------------------------------------------------------------

/// Percent of the 169 classes on which `user` and `reference` agree, counting
/// correct exclusions as well as correct inclusions.
pub fn similarity<'a>(user: impl IntoIterator<Item = &'a Hand>, reference: &Range) -> f64 {
    let user: BTreeSet<Hand> = user.into_iter().copied().collect();
    let disagreements = user.symmetric_difference(reference.hands()).count();
    (HAND_CLASSES - disagreements) as f64 / HAND_CLASSES as f64 * 100.0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDiff {
    /// In the reference, not selected.
    pub missing: Vec<Hand>,
    /// Selected, not in the reference.
    pub extra: Vec<Hand>,
}

pub fn difference<'a>(user: impl IntoIterator<Item = &'a Hand>, reference: &Range) -> RangeDiff {
    let user: BTreeSet<Hand> = user.into_iter().copied().collect();
    RangeDiff {
        missing: reference.hands().difference(&user).copied().collect(),
        extra: user.difference(reference.hands()).copied().collect(),
    }
}

/// Combo-weighted share of all 1,326 starting hands, as a percentage.
pub fn percentage_of_deck<'a>(hands: impl IntoIterator<Item = &'a Hand>) -> f64 {
    let unique: BTreeSet<Hand> = hands.into_iter().copied().collect();
    let combos: u32 = unique.iter().map(|h| h.combos()).sum();
    combos as f64 / TOTAL_COMBOS as f64 * 100.0
}

/// Result of grading a range-builder selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeGrade {
    pub similarity: f64,
    pub diff: RangeDiff,
    pub passed: bool,
}

pub fn grade_selection<'a>(
    user: impl IntoIterator<Item = &'a Hand>,
    reference: &Range,
    pass_pct: f64,
) -> RangeGrade {
    let user: BTreeSet<Hand> = user.into_iter().copied().collect();
    let similarity = similarity(&user, reference);
    RangeGrade {
        similarity,
        diff: difference(&user, reference),
        passed: similarity >= pass_pct,
    }
}

/// Every class in `range`'s complement, handy for "build the fold range" prompts.
pub fn complement(range: &Range) -> Range {
    Range::new(
        format!("not {}", range.name()),
        enumerate_all().iter().copied().filter(|h| !range.contains(*h)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(s: &str) -> Hand {
        Hand::parse(s).unwrap()
    }

    fn notations(range: &Range) -> Vec<String> {
        range.iter().map(|h| h.notation()).collect()
    }

    #[test]
    fn plus_notation_expands_pairs_and_kickers() {
        let r = Range::from_notation("t", "TT+").unwrap();
        assert_eq!(notations(&r), ["AA", "KK", "QQ", "JJ", "TT"]);

        let r = Range::from_notation("t", "ATs+").unwrap();
        assert_eq!(notations(&r), ["AKs", "AQs", "AJs", "ATs"]);

        let r = Range::from_notation("t", "KQ+").unwrap();
        assert_eq!(notations(&r), ["KQs", "KQo"]);
    }

    #[test]
    fn spans_expand_in_either_direction() {
        let r = Range::from_notation("t", "A5s-A2s").unwrap();
        assert_eq!(notations(&r), ["A5s", "A4s", "A3s", "A2s"]);

        let r = Range::from_notation("t", "66-99").unwrap();
        assert_eq!(notations(&r), ["99", "88", "77", "66"]);

        assert!(Range::from_notation("t", "A5s-K2s").is_err());
        assert!(Range::from_notation("t", "AA-A2s").is_err());
    }

    #[test]
    fn bare_two_rank_item_includes_both_shapes() {
        let r = Range::from_notation("t", "AK, 72o  QJs").unwrap();
        assert_eq!(notations(&r), ["AKs", "AKo", "QJs", "72o"]);
    }

    #[test]
    fn malformed_items_are_rejected() {
        for bad in ["AKx", "A", "ZZ+", "AKs-", "1234"] {
            assert!(Range::from_notation("t", bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn percentage_of_deck_uses_combo_weights() {
        let aa = Range::from_notation("t", "AA").unwrap();
        assert!((aa.percentage_of_deck() - 0.4525).abs() < 1e-3);
        let aks = Range::from_notation("t", "AKs").unwrap();
        assert!((aks.percentage_of_deck() - 0.3016).abs() < 1e-3);
        let ako = Range::from_notation("t", "AKo").unwrap();
        assert!((ako.percentage_of_deck() - 0.9050).abs() < 1e-3);
        let everything = Range::new("all", enumerate_all().iter().copied());
        assert!((everything.percentage_of_deck() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn similarity_counts_agreement_on_all_classes() {
        let reference = Range::from_notation("ref", "22+, AKs").unwrap();
        assert_eq!(similarity(reference.hands(), &reference), 100.0);

        // Empty selection still agrees on every excluded class.
        let empty: Vec<Hand> = Vec::new();
        let expected = (169 - 14) as f64 / 169.0 * 100.0;
        assert!((similarity(&empty, &reference) - expected).abs() < 1e-9);

        let everything: Vec<Hand> = enumerate_all().to_vec();
        let s = similarity(&everything, &reference);
        assert!((0.0..=100.0).contains(&s));
        assert!((s - 14.0 / 169.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn difference_splits_missing_and_extra() {
        let reference = Range::from_notation("ref", "AA, KK, AKs").unwrap();
        let user = vec![hand("AA"), hand("AKo")];
        let diff = difference(&user, &reference);
        assert_eq!(diff.missing, vec![hand("AKs"), hand("KK")]);
        assert_eq!(diff.extra, vec![hand("AKo")]);
    }

    #[test]
    fn grade_selection_applies_pass_mark() {
        let reference = Range::from_notation("ref", "AA, KK").unwrap();
        let grade = grade_selection(&[hand("AA")], &reference, 99.0);
        assert!(grade.passed, "168/169 agreement clears 99%");
        assert_eq!(grade.diff.missing, vec![hand("KK")]);
        let grade = grade_selection(&[hand("AA")], &reference, 100.0);
        assert!(!grade.passed);
    }

    #[test]
    fn bucket_for_prefers_the_strongest_action() {
        let spot = BucketedRange::new("BB vs BTN")
            .with_bucket(Action::Call, "22-99, AQs, KQs")
            .unwrap()
            .with_bucket(Action::ThreeBet, "TT+, AKs, AQs")
            .unwrap();
        assert_eq!(spot.bucket_for(hand("AQs")), Action::ThreeBet);
        assert_eq!(spot.bucket_for(hand("55")), Action::Call);
        assert_eq!(spot.bucket_for(hand("72o")), Action::Fold);
        assert!(!spot.bucket(Action::Call).unwrap().contains(&hand("AQs")));
        assert_eq!(spot.actions().collect::<Vec<_>>(), [Action::ThreeBet, Action::Call]);
        // 3-bet: TT+, AKs, AQs. Call: 22-99, KQs.
        assert_eq!(spot.continuing().len(), 7 + 9);
    }

    #[test]
    fn grid_marks_range_cells() {
        let r = Range::from_notation("t", "AA, AKo").unwrap();
        let grid = r.grid();
        assert!(grid[0][0]);
        assert!(grid[1][0]);
        assert!(!grid[0][1]);
        assert_eq!(grid.iter().flatten().filter(|&&b| b).count(), 2);
    }

    #[test]
    fn complement_partitions_the_classes() {
        let r = Range::from_notation("t", "22+").unwrap();
        let rest = complement(&r);
        assert_eq!(r.len() + rest.len(), 169);
        assert!(rest.iter().all(|h| !r.contains(h)));
    }
}
