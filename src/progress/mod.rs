//! Learner progress: per-unit records, unlock cascades, achievements.
//!
//! ```text
//! locked --(cascade rule)--> unlocked --(finished session >= threshold)--> completed
//! ```
//!
//! A [`ProgressStore`] owns the persisted [`ProgressDocument`]. Drill sessions
//! only hand it a [`SessionSummary`]; the store decides what improves, what
//! completes, and what that unlocks. Persistence failures never escape as
//! panics: the store keeps working in memory and reports a warning.

pub mod backend;
pub mod curriculum;
pub mod record;

pub use backend::{JsonFileBackend, MemoryBackend, ProgressBackend};
pub use curriculum::{AchievementCondition, AchievementRule, CascadeRule, Curriculum, UnitKind, UnitSpec};
pub use record::{ProgressDocument, ProgressRecord};

use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::TutorError;
use crate::training_engine::drill::SessionSummary;

/// What one recorded attempt changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub unit: String,
    pub newly_completed: Vec<String>,
    pub newly_unlocked: Vec<String>,
    pub new_achievements: Vec<String>,
    /// Set when the change could not be persisted.
    pub warning: Option<String>,
}

impl ProgressUpdate {
    pub fn is_empty(&self) -> bool {
        self.newly_completed.is_empty() && self.newly_unlocked.is_empty() && self.new_achievements.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub completed_count: usize,
    pub total_count: usize,
    pub best_streak: u32,
    pub attempts: u32,
}

pub struct ProgressStore<B: ProgressBackend> {
    curriculum: Curriculum,
    backend: B,
    document: ProgressDocument,
    warnings: Vec<String>,
}

impl<B: ProgressBackend> ProgressStore<B> {
    /// Load progress for `curriculum` from `backend`.
    ///
    /// Only an invalid curriculum is an error. A backend that fails to load,
    /// or returns a document that cannot be decoded, leaves the store on
    /// fresh defaults with a warning in [`take_warnings`](Self::take_warnings).
    pub fn open(curriculum: Curriculum, mut backend: B) -> Result<Self, TutorError> {
        curriculum.validate()?;
        let mut warnings = Vec::new();

        let document = match backend.load() {
            Ok(Some(stored)) => match ProgressDocument::merged(&curriculum, stored) {
                Ok(document) => document,
                Err(err) => {
                    warn!(%err, "stored progress is unreadable; starting from defaults");
                    warnings.push(err.to_string());
                    ProgressDocument::defaults_for(&curriculum)
                }
            },
            Ok(None) => ProgressDocument::defaults_for(&curriculum),
            Err(err) => {
                warn!(%err, "could not load progress; starting from defaults");
                warnings.push(err.to_string());
                ProgressDocument::defaults_for(&curriculum)
            }
        };

        let mut store = ProgressStore {
            curriculum,
            backend,
            document,
            warnings,
        };
        let unlocked = store.reconcile();
        if !unlocked.is_empty() {
            debug!(?unlocked, "reconciled unlocks after load");
        }
        Ok(store)
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn document(&self) -> &ProgressDocument {
        &self.document
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn record(&self, unit: &str) -> Option<&ProgressRecord> {
        self.document.units.get(unit)
    }

    pub fn achievements(&self) -> &BTreeSet<String> {
        &self.document.achievements
    }

    /// Drain the persistence warnings collected so far.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// [`record_attempt_at`](Self::record_attempt_at) stamped with the
    /// current wall-clock time.
    pub fn record_attempt(&mut self, unit: &str, summary: &SessionSummary) -> Result<ProgressUpdate, TutorError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.record_attempt_at(unit, summary, now)
    }

    /// Fold one session into `unit`'s record, then run cascades and
    /// achievements and persist.
    ///
    /// Finished sessions update the best score and may complete the unit if
    /// their accuracy reaches the unit's threshold. Stopped sessions only
    /// count as an attempt and update best streak and time. A locked unit
    /// records stats but cannot complete.
    pub fn record_attempt_at(
        &mut self,
        unit: &str,
        summary: &SessionSummary,
        timestamp_ms: u64,
    ) -> Result<ProgressUpdate, TutorError> {
        let threshold = self
            .curriculum
            .unit(unit)
            .map(|u| u.pass_threshold)
            .ok_or_else(|| TutorError::UnknownUnit(unit.to_string()))?;

        let mut update = ProgressUpdate {
            unit: unit.to_string(),
            ..Default::default()
        };

        let record = self.document.units.entry(unit.to_string()).or_default();
        record.attempts += 1;
        record.last_attempt_timestamp = Some(timestamp_ms);
        record.best_streak = record.best_streak.max(summary.best_streak);
        if summary.answered > 0 {
            record.best_avg_time_ms = Some(match record.best_avg_time_ms {
                Some(best) => best.min(summary.avg_time_ms),
                None => summary.avg_time_ms,
            });
        }

        if summary.finished {
            record.best_score = record.best_score.max(summary.accuracy);
            if !record.completed && summary.accuracy >= threshold {
                if record.unlocked {
                    record.completed = true;
                    update.newly_completed.push(unit.to_string());
                } else {
                    warn!(unit, "passing score on a locked unit; not marking it complete");
                }
            }
        }

        info!(
            unit,
            accuracy = summary.accuracy,
            finished = summary.finished,
            attempts = record.attempts,
            "attempt recorded"
        );

        update.newly_unlocked = self.apply_cascades();
        update.new_achievements = self.award_achievements(Some(summary));
        for id in &update.newly_unlocked {
            info!(unit = %id, "unlocked");
        }
        for id in &update.new_achievements {
            info!(achievement = %id, "achievement earned");
        }

        update.warning = self.persist();
        Ok(update)
    }

    /// `false` for unknown ids, with a warning.
    pub fn is_unlocked(&self, unit: &str) -> bool {
        self.try_is_unlocked(unit).unwrap_or_else(|err| {
            warn!(%err, "treating unknown unit as locked");
            false
        })
    }

    pub fn try_is_unlocked(&self, unit: &str) -> Result<bool, TutorError> {
        self.known_record(unit).map(|r| r.unlocked)
    }

    /// `false` for unknown ids, with a warning.
    pub fn is_completed(&self, unit: &str) -> bool {
        self.try_is_completed(unit).unwrap_or_else(|err| {
            warn!(%err, "treating unknown unit as not completed");
            false
        })
    }

    pub fn try_is_completed(&self, unit: &str) -> Result<bool, TutorError> {
        self.known_record(unit).map(|r| r.completed)
    }

    /// Totals over every unit in `group`. An unknown group is all zeros.
    pub fn stats(&self, group: &str) -> GroupStats {
        let mut stats = GroupStats::default();
        for unit in self.curriculum.units_in_group(group) {
            stats.total_count += 1;
            if let Some(record) = self.document.units.get(&unit.id) {
                stats.completed_count += usize::from(record.completed);
                stats.best_streak = stats.best_streak.max(record.best_streak);
                stats.attempts += record.attempts;
            }
        }
        if stats.total_count == 0 {
            warn!(group, "stats requested for a group with no units");
        }
        stats
    }

    /// Forget all progress and persist the fresh defaults.
    ///
    /// The in-memory reset always happens; the error only reports that the
    /// defaults could not be saved (it is also kept as a warning).
    pub fn reset(&mut self) -> Result<(), TutorError> {
        self.document = ProgressDocument::defaults_for(&self.curriculum);
        self.reconcile();
        info!("progress reset");
        match self.persist() {
            None => Ok(()),
            Some(message) => Err(TutorError::persistence(
                "saving reset progress",
                std::io::Error::new(std::io::ErrorKind::Other, message),
            )),
        }
    }

    fn known_record(&self, unit: &str) -> Result<&ProgressRecord, TutorError> {
        if self.curriculum.unit(unit).is_none() {
            return Err(TutorError::UnknownUnit(unit.to_string()));
        }
        self.document
            .units
            .get(unit)
            .ok_or_else(|| TutorError::UnknownUnit(unit.to_string()))
    }

    /// Bring a freshly loaded or reset document in line with the curriculum.
    fn reconcile(&mut self) -> Vec<String> {
        for unit in &self.curriculum.units {
            let record = self.document.units.entry(unit.id.clone()).or_default();
            if unit.initially_unlocked || record.completed {
                record.unlocked = true;
            }
        }
        let unlocked = self.apply_cascades();
        self.award_achievements(None);
        unlocked
    }

    /// Apply every cascade rule, returning the ids that became unlocked.
    /// Rules only read completion state, so one pass reaches the fixpoint.
    fn apply_cascades(&mut self) -> Vec<String> {
        let mut targets: Vec<&String> = Vec::new();
        let completed = |id: &str| self.document.units.get(id).is_some_and(|r| r.completed);

        for rule in &self.curriculum.cascades {
            match rule {
                CascadeRule::Sequence { units } => {
                    for pair in units.windows(2) {
                        if completed(pair[0].as_str()) {
                            targets.push(&pair[1]);
                        }
                    }
                }
                CascadeRule::AllOfGroup { group, unlocks } => {
                    if self
                        .curriculum
                        .units_in_group(group)
                        .all(|u| completed(u.id.as_str()))
                    {
                        targets.extend(unlocks);
                    }
                }
                CascadeRule::CountAtLeast { units, count, min_score, unlocks } => {
                    let qualifying = units
                        .iter()
                        .filter(|id| {
                            self.document
                                .units
                                .get(id.as_str())
                                .is_some_and(|r| r.completed && r.best_score >= *min_score)
                        })
                        .count();
                    if qualifying >= *count {
                        targets.extend(unlocks);
                    }
                }
            }
        }

        let targets: Vec<String> = targets.into_iter().cloned().collect();
        let mut newly = Vec::new();
        for id in targets {
            let record = self.document.units.entry(id.clone()).or_default();
            if !record.unlocked {
                record.unlocked = true;
                if !newly.contains(&id) {
                    newly.push(id);
                }
            }
        }
        newly
    }

    /// Add every achievement whose condition now holds. Session-based
    /// conditions need `session`; already-earned badges are skipped.
    fn award_achievements(&mut self, session: Option<&SessionSummary>) -> Vec<String> {
        let earned: Vec<String> = self
            .curriculum
            .achievements
            .iter()
            .filter(|rule| !self.document.achievements.contains(&rule.id))
            .filter(|rule| self.condition_holds(&rule.when, session))
            .map(|rule| rule.id.clone())
            .collect();
        self.document.achievements.extend(earned.iter().cloned());
        earned
    }

    fn condition_holds(&self, condition: &AchievementCondition, session: Option<&SessionSummary>) -> bool {
        match condition {
            AchievementCondition::FastAverage { max_avg_ms, min_answered } => session
                .is_some_and(|s| s.answered >= *min_answered && s.avg_time_ms < *max_avg_ms),
            AchievementCondition::PerfectSession { min_questions } => session.is_some_and(|s| {
                s.finished && s.total_questions >= *min_questions && s.correct == s.total_questions
            }),
            AchievementCondition::Streak { min } => {
                self.document.units.values().any(|r| r.best_streak >= *min)
            }
            AchievementCondition::GroupComplete { group } => self
                .curriculum
                .units_in_group(group)
                .all(|u| self.document.units.get(&u.id).is_some_and(|r| r.completed)),
        }
    }

    /// Save the document. Failures are logged, kept as warnings and
    /// returned as a message; they never abort the caller.
    fn persist(&mut self) -> Option<String> {
        let result = self
            .document
            .to_value()
            .and_then(|value| self.backend.save(&value));
        match result {
            Ok(()) => None,
            Err(err) => {
                warn!(%err, "progress not saved; continuing in memory");
                let message = err.to_string();
                self.warnings.push(message.clone());
                Some(message)
            }
        }
    }
}
