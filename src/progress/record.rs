//! Persisted progress shapes and schema-tolerant loading.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TutorError;
use crate::progress::curriculum::Curriculum;

pub const DOCUMENT_VERSION: u32 = 1;

/// Per-unit progress. `completed` and the `best_*` fields only ever improve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressRecord {
    pub unlocked: bool,
    pub completed: bool,
    /// Best accuracy (percent) of a finished session.
    pub best_score: f64,
    pub best_streak: u32,
    /// Lowest session average answer time, in ms.
    pub best_avg_time_ms: Option<u64>,
    pub attempts: u32,
    /// Unix epoch millis.
    pub last_attempt_timestamp: Option<u64>,
}

/// The whole persisted tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressDocument {
    pub version: u32,
    pub units: BTreeMap<String, ProgressRecord>,
    pub achievements: BTreeSet<String>,
}

impl Default for ProgressDocument {
    fn default() -> Self {
        ProgressDocument {
            version: DOCUMENT_VERSION,
            units: BTreeMap::new(),
            achievements: BTreeSet::new(),
        }
    }
}

impl ProgressDocument {
    /// Fresh tree with one default record per curriculum unit.
    pub fn defaults_for(curriculum: &Curriculum) -> Self {
        let units = curriculum
            .units
            .iter()
            .map(|u| {
                let record = ProgressRecord {
                    unlocked: u.initially_unlocked,
                    ..Default::default()
                };
                (u.id.clone(), record)
            })
            .collect();
        ProgressDocument {
            units,
            ..Default::default()
        }
    }

    /// Overlay a stored document on the defaults for `curriculum`. Units and
    /// fields missing from `stored` keep their defaults; units the curriculum
    /// no longer declares are carried along untouched.
    pub fn merged(curriculum: &Curriculum, stored: Value) -> Result<Self, TutorError> {
        let mut base = serde_json::to_value(Self::defaults_for(curriculum))
            .map_err(|e| TutorError::persistence("encoding default progress", e))?;
        deep_merge(&mut base, stored);
        let mut document: ProgressDocument = serde_json::from_value(base)
            .map_err(|e| TutorError::persistence("decoding stored progress", e))?;
        document.version = DOCUMENT_VERSION;
        Ok(document)
    }

    pub fn to_value(&self) -> Result<Value, TutorError> {
        serde_json::to_value(self).map_err(|e| TutorError::persistence("encoding progress", e))
    }
}

/// Recursively merge `overlay` into `base`. Objects merge key by key; any
/// other overlay value replaces what is in `base`.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
