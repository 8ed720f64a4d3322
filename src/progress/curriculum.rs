//! Declarative curriculum: content units, unlock cascades, achievements.
//!
//! Everything here is plain serde data so a curriculum can ship as JSON and
//! grow without code changes. [`Curriculum::validate`] checks every rule
//! against the declared units before a store will accept it.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::training_engine::models::{DrillConfig, DrillKind};

const DEFAULT_PASS_THRESHOLD: f64 = 80.0;
const STANDARD_CURRICULUM: &str = include_str!("standard_curriculum.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Module,
    Drill,
    Scenario,
}

/// One lockable, completable piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: String,
    pub title: String,
    pub kind: UnitKind,
    #[serde(default)]
    pub group: Option<String>,
    /// Accuracy (percent) a finished session needs to complete the unit.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    #[serde(default)]
    pub initially_unlocked: bool,
    /// Drill that powers this unit, if any.
    #[serde(default)]
    pub drill: Option<DrillKind>,
    #[serde(default)]
    pub focus: Option<String>,
}

fn default_pass_threshold() -> f64 {
    DEFAULT_PASS_THRESHOLD
}

impl UnitSpec {
    /// Session settings for this unit's drill, pass mark included.
    pub fn drill_config(&self) -> Option<DrillConfig> {
        let kind = self.drill?;
        let config = DrillConfig::new(kind).with_threshold(self.pass_threshold);
        Some(match &self.focus {
            Some(focus) => config.with_focus(focus.clone()),
            None => config,
        })
    }
}

/// How completing content unlocks more content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CascadeRule {
    /// Completing `units[i]` unlocks `units[i + 1]`.
    Sequence { units: Vec<String> },
    /// Completing every unit of `group` unlocks `unlocks`.
    AllOfGroup { group: String, unlocks: Vec<String> },
    /// Completing `count` of `units` with a best score of at least
    /// `min_score` unlocks `unlocks`.
    CountAtLeast {
        units: Vec<String>,
        count: usize,
        min_score: f64,
        unlocks: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementCondition {
    /// Session average answer time strictly under `max_avg_ms`.
    FastAverage { max_avg_ms: u64, min_answered: usize },
    /// Every question right in a finished session of at least `min_questions`.
    PerfectSession { min_questions: usize },
    /// Any unit's best streak reaches `min`.
    Streak { min: u32 },
    GroupComplete { group: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRule {
    pub id: String,
    pub title: String,
    pub when: AchievementCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub cascades: Vec<CascadeRule>,
    #[serde(default)]
    pub achievements: Vec<AchievementRule>,
}

impl Curriculum {
    /// The built-in tutor curriculum.
    pub fn standard() -> Result<Self, TutorError> {
        Self::from_json_str(STANDARD_CURRICULUM)
    }

    /// Parse and validate a JSON curriculum.
    pub fn from_json_str(json: &str) -> Result<Self, TutorError> {
        let curriculum: Curriculum =
            serde_json::from_str(json).map_err(|e| TutorError::invalid_config("curriculum", e.to_string()))?;
        curriculum.validate()?;
        Ok(curriculum)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TutorError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            TutorError::invalid_config("curriculum", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn unit(&self, id: &str) -> Option<&UnitSpec> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn units_in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a UnitSpec> + 'a {
        self.units
            .iter()
            .filter(move |u| u.group.as_deref() == Some(group))
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.units_in_group(group).next().is_some()
    }

    /// Validate the curriculum without performing I/O.
    pub fn validate(&self) -> Result<(), TutorError> {
        let mut ids = HashSet::new();
        for unit in &self.units {
            if unit.id.trim().is_empty() {
                return Err(TutorError::invalid_config("units.id", "unit ids must not be empty"));
            }
            if !ids.insert(unit.id.as_str()) {
                return Err(TutorError::invalid_config("units.id", format!("duplicate unit {:?}", unit.id)));
            }
            if !(0.0..=100.0).contains(&unit.pass_threshold) {
                return Err(TutorError::invalid_config(
                    format!("units.{}.pass_threshold", unit.id),
                    format!("{} is not a percentage", unit.pass_threshold),
                ));
            }
        }

        let known = |field: &str, id: &str| -> Result<(), TutorError> {
            if ids.contains(id) {
                Ok(())
            } else {
                Err(TutorError::invalid_config(field, format!("references undeclared unit {id:?}")))
            }
        };
        let group = |field: &str, name: &str| -> Result<(), TutorError> {
            if self.has_group(name) {
                Ok(())
            } else {
                Err(TutorError::invalid_config(field, format!("group {name:?} has no units")))
            }
        };

        for rule in &self.cascades {
            match rule {
                CascadeRule::Sequence { units } => {
                    if units.len() < 2 {
                        return Err(TutorError::invalid_config("cascades.sequence", "a sequence needs two or more units"));
                    }
                    units.iter().try_for_each(|u| known("cascades.sequence", u.as_str()))?;
                }
                CascadeRule::AllOfGroup { group: name, unlocks } => {
                    group("cascades.all_of_group", name.as_str())?;
                    unlocks.iter().try_for_each(|u| known("cascades.all_of_group", u.as_str()))?;
                }
                CascadeRule::CountAtLeast { units, count, min_score, unlocks } => {
                    units.iter().try_for_each(|u| known("cascades.count_at_least", u.as_str()))?;
                    unlocks.iter().try_for_each(|u| known("cascades.count_at_least", u.as_str()))?;
                    if *count == 0 || *count > units.len() {
                        return Err(TutorError::invalid_config(
                            "cascades.count_at_least",
                            format!("count {count} is outside 1..={}", units.len()),
                        ));
                    }
                    if !(0.0..=100.0).contains(min_score) {
                        return Err(TutorError::invalid_config(
                            "cascades.count_at_least",
                            format!("min_score {min_score} is not a percentage"),
                        ));
                    }
                }
            }
        }

        let mut badges = HashSet::new();
        for rule in &self.achievements {
            if !badges.insert(rule.id.as_str()) {
                return Err(TutorError::invalid_config("achievements.id", format!("duplicate achievement {:?}", rule.id)));
            }
            if let AchievementCondition::GroupComplete { group: name } = &rule.when {
                group("achievements.group_complete", name.as_str())?;
            }
        }
        Ok(())
    }
}
