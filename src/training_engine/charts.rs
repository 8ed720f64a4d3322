//! Static 6-max preflop charts.
//!
//! These are fixed reference tables, not solver output. Each chart is written
//! in range notation and parsed once when a [`Catalogue`] is built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::training_engine::{
    models::{Action, Position},
    range::{BucketedRange, Range},
};

const OPENING_CHARTS: &[(Position, &str)] = &[
    (Position::UTG, "55+, A2s+, K9s+, QTs+, JTs, T9s, 98s, AJo+, KQo"),
    (Position::MP,  "33+, A2s+, K8s+, Q9s+, J9s+, T9s, 98s, 87s, ATo+, KJo+, QJo"),
    (Position::CO,  "22+, A2s+, K6s+, Q8s+, J8s+, T8s+, 97s+, 86s+, 76s, 65s, A9o+, KTo+, QTo+, JTo"),
    (Position::BTN, "22+, A2s+, K2s+, Q4s+, J6s+, T6s+, 96s+, 85s+, 75s+, 64s+, 54s, A2o+, K8o+, Q9o+, J9o+, T9o, 98o"),
    (Position::SB,  "22+, A2s+, K4s+, Q6s+, J7s+, T7s+, 97s+, 86s+, 75s+, 65s, 54s, A7o+, A5o, K9o+, QTo+, JTo"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotKind {
    /// Villain opened, hero acts next: 3-bet, call or fold.
    FacingOpen,
    /// Hero opened, villain 3-bet: 4-bet, call or fold.
    FacingThreeBet,
}

struct SpotChart {
    id: &'static str,
    hero: Position,
    villain: Position,
    kind: SpotKind,
    buckets: &'static [(Action, &'static str)],
}

const SPOT_CHARTS: &[SpotChart] = &[
    SpotChart {
        id: "bb-vs-btn",
        hero: Position::BB,
        villain: Position::BTN,
        kind: SpotKind::FacingOpen,
        buckets: &[
            (Action::ThreeBet, "TT+, AJs+, KQs, A5s-A4s, 76s, AQo+"),
            (Action::Call, "22-99, A2s-ATs, K2s-KJs, Q5s+, J7s+, T7s+, 96s+, 85s+, 75s+, 64s+, 53s+, A2o-AJo, K9o+, QTo+, JTo, T9o"),
        ],
    },
    SpotChart {
        id: "bb-vs-co",
        hero: Position::BB,
        villain: Position::CO,
        kind: SpotKind::FacingOpen,
        buckets: &[
            (Action::ThreeBet, "JJ+, AQs+, A5s, AKo"),
            (Action::Call, "22-TT, A2s-AJs, K6s+, Q8s+, J8s+, T8s+, 97s+, 86s+, 75s+, 65s, 54s, ATo-AQo, KTo+, QTo+, JTo"),
        ],
    },
    SpotChart {
        id: "sb-vs-btn",
        hero: Position::SB,
        villain: Position::BTN,
        kind: SpotKind::FacingOpen,
        buckets: &[
            (Action::ThreeBet, "88+, A8s+, A5s-A4s, KTs+, QTs+, JTs, T9s, AJo+, KQo"),
        ],
    },
    SpotChart {
        id: "btn-vs-co",
        hero: Position::BTN,
        villain: Position::CO,
        kind: SpotKind::FacingOpen,
        buckets: &[
            (Action::ThreeBet, "JJ+, AQs+, A5s, KQs, AKo"),
            (Action::Call, "22-TT, A9s-AJs, KTs-KJs, QTs+, JTs, T9s, 98s, 87s, AJo-AQo, KQo"),
        ],
    },
    SpotChart {
        id: "bb-vs-utg",
        hero: Position::BB,
        villain: Position::UTG,
        kind: SpotKind::FacingOpen,
        buckets: &[
            (Action::ThreeBet, "QQ+, AKs, AKo"),
            (Action::Call, "22-JJ, ATs-AQs, KTs+, QTs+, JTs, T9s, 98s, 87s, AQo, KQo"),
        ],
    },
    SpotChart {
        id: "btn-vs-sb-3bet",
        hero: Position::BTN,
        villain: Position::SB,
        kind: SpotKind::FacingThreeBet,
        buckets: &[
            (Action::FourBet, "QQ+, AKs, AKo, A5s"),
            (Action::Call, "22-JJ, A9s-AQs, KTs+, QTs+, JTs, T9s, 98s, 87s, 76s, AQo, KQo"),
        ],
    },
    SpotChart {
        id: "co-vs-btn-3bet",
        hero: Position::CO,
        villain: Position::BTN,
        kind: SpotKind::FacingThreeBet,
        buckets: &[
            (Action::FourBet, "KK+, AKs, A5s"),
            (Action::Call, "77-QQ, ATs-AQs, KJs+, QJs, JTs, T9s, AKo, AQo"),
        ],
    },
    SpotChart {
        id: "utg-vs-bb-3bet",
        hero: Position::UTG,
        villain: Position::BB,
        kind: SpotKind::FacingThreeBet,
        buckets: &[
            (Action::FourBet, "KK+, AKs"),
            (Action::Call, "88-QQ, AJs-AQs, KQs, AKo"),
        ],
    },
];

/// One preflop decision point with its reference answer per hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpot {
    pub id: String,
    pub hero: Position,
    pub villain: Position,
    pub kind: SpotKind,
    pub decision: BucketedRange,
}

impl ScenarioSpot {
    /// Short matchup label used as the statistics category, e.g. `BB vs BTN`.
    pub fn label(&self) -> String {
        match self.kind {
            SpotKind::FacingOpen     => format!("{} vs {}", self.hero, self.villain),
            SpotKind::FacingThreeBet => format!("{} vs {} 3-bet", self.hero, self.villain),
        }
    }

    /// The actions a player may pick here, strongest first.
    pub fn options(&self) -> [Action; 3] {
        match self.kind {
            SpotKind::FacingOpen     => [Action::ThreeBet, Action::Call, Action::Fold],
            SpotKind::FacingThreeBet => [Action::FourBet, Action::Call, Action::Fold],
        }
    }

    fn matches(&self, key: &str) -> bool {
        self.id.eq_ignore_ascii_case(key) || self.label().eq_ignore_ascii_case(key)
    }
}

impl fmt::Display for ScenarioSpot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// All charts the drills grade against.
#[derive(Debug, Clone)]
pub struct Catalogue {
    openings: Vec<(Position, Range)>,
    spots: Vec<ScenarioSpot>,
    /// Non-folding hands of each facing-open spot, e.g. `BB vs BTN defend`.
    defends: Vec<Range>,
}

impl Catalogue {
    pub fn standard() -> Result<Self, TutorError> {
        let openings = OPENING_CHARTS
            .iter()
            .map(|&(position, notation)| {
                Range::from_notation(format!("{position} open"), notation).map(|r| (position, r))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let spots = SPOT_CHARTS
            .iter()
            .map(|chart| {
                let mut decision = BucketedRange::new(chart.id);
                for &(action, notation) in chart.buckets {
                    decision = decision.with_bucket(action, notation)?;
                }
                Ok(ScenarioSpot {
                    id: chart.id.to_string(),
                    hero: chart.hero,
                    villain: chart.villain,
                    kind: chart.kind,
                    decision,
                })
            })
            .collect::<Result<Vec<_>, TutorError>>()?;

        let defends = spots
            .iter()
            .filter(|s| s.kind == SpotKind::FacingOpen)
            .map(|s| Range::new(format!("{} defend", s.label()), s.decision.continuing().hands().clone()))
            .collect();

        Ok(Catalogue { openings, spots, defends })
    }

    /// Opening range for `position`; the big blind never opens.
    pub fn opening(&self, position: Position) -> Option<&Range> {
        self.openings
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, range)| range)
    }

    pub fn openings(&self) -> impl Iterator<Item = (Position, &Range)> {
        self.openings.iter().map(|(p, r)| (*p, r))
    }

    pub fn spots(&self) -> &[ScenarioSpot] {
        &self.spots
    }

    /// Look a spot up by id (`bb-vs-btn`) or label (`BB vs BTN`).
    pub fn spot(&self, key: &str) -> Option<&ScenarioSpot> {
        self.spots.iter().find(|s| s.matches(key.trim()))
    }

    /// Every named plain range: openings first, then defends.
    pub fn ranges(&self) -> impl Iterator<Item = &Range> {
        self.openings.iter().map(|(_, r)| r).chain(self.defends.iter())
    }

    /// Find a range by name (`BTN open`, `BB vs CO defend`) or, for
    /// openings, by bare position (`BTN`).
    pub fn range(&self, name: &str) -> Option<&Range> {
        let key = name.trim();
        self.openings
            .iter()
            .find(|(p, _)| p.to_string().eq_ignore_ascii_case(key))
            .map(|(_, r)| r)
            .or_else(|| self.ranges().find(|r| r.name().eq_ignore_ascii_case(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training_engine::hand::Hand;

    fn hand(s: &str) -> Hand {
        Hand::parse(s).unwrap()
    }

    #[test]
    fn standard_catalogue_parses() {
        let cat = Catalogue::standard().unwrap();
        assert_eq!(cat.openings().count(), 5);
        assert_eq!(cat.spots().len(), SPOT_CHARTS.len());
        assert!(cat.opening(Position::BB).is_none());
    }

    #[test]
    fn opening_ranges_widen_towards_the_button() {
        let cat = Catalogue::standard().unwrap();
        let pct = |p| cat.opening(p).unwrap().percentage_of_deck();
        assert!(pct(Position::UTG) < pct(Position::MP));
        assert!(pct(Position::MP) < pct(Position::CO));
        assert!(pct(Position::CO) < pct(Position::BTN));
        for (position, range) in cat.openings() {
            assert!(range.contains(hand("AA")), "{position} must open AA");
            assert!(!range.contains(hand("72o")), "{position} must fold 72o");
        }
    }

    #[test]
    fn spots_resolve_by_id_or_label() {
        let cat = Catalogue::standard().unwrap();
        let spot = cat.spot("BB vs BTN").unwrap();
        assert_eq!(spot.id, "bb-vs-btn");
        assert_eq!(cat.spot("bb-vs-btn").unwrap().label(), "BB vs BTN");
        assert_eq!(cat.spot("co-vs-btn-3bet").unwrap().label(), "CO vs BTN 3-bet");
        assert!(cat.spot("UTG vs UTG").is_none());
    }

    #[test]
    fn spot_buckets_follow_precedence() {
        let cat = Catalogue::standard().unwrap();
        let bb = &cat.spot("bb-vs-btn").unwrap().decision;
        // A5s sits in both chart buckets; the 3-bet wins.
        assert_eq!(bb.bucket_for(hand("A5s")), Action::ThreeBet);
        assert_eq!(bb.bucket_for(hand("A8s")), Action::Call);
        assert_eq!(bb.bucket_for(hand("72o")), Action::Fold);

        let utg = &cat.spot("utg-vs-bb-3bet").unwrap().decision;
        assert_eq!(utg.bucket_for(hand("AA")), Action::FourBet);
        assert_eq!(utg.bucket_for(hand("TT")), Action::Call);
        assert_eq!(utg.bucket_for(hand("A5s")), Action::Fold);
    }

    #[test]
    fn ranges_resolve_by_name_or_position() {
        let cat = Catalogue::standard().unwrap();
        assert_eq!(cat.range("btn open").unwrap().name(), "BTN open");
        assert_eq!(cat.range("UTG").unwrap().name(), "UTG open");
        assert!(cat.range("BB").is_none());
        let defend = cat.range("bb vs btn defend").unwrap();
        assert!(defend.contains(hand("A5s")));
        assert!(defend.contains(hand("T9o")));
        assert!(!defend.contains(hand("72o")));
    }

    #[test]
    fn only_facing_open_spots_get_a_defend_range() {
        let cat = Catalogue::standard().unwrap();
        let facing_open = cat.spots().iter().filter(|s| s.kind == SpotKind::FacingOpen).count();
        assert_eq!(cat.ranges().count(), 5 + facing_open);
        assert!(cat.range("CO vs BTN 3-bet defend").is_none());
    }
}
