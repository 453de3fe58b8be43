//! Versioned on-disk save record
//!
//! The engine's entire durable state is one record with a section per
//! feature namespace (progression, challenge progress, topic progress),
//! so storage keys cannot collide across features.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::challenges::{DailyQuota, Difficulty};
use crate::progression::ProgressionState;
use crate::topics::SubtopicProgress;

/// Current save format version. Bump on incompatible layout changes.
pub const SAVE_VERSION: u32 = 1;

/// Challenge-progress namespace: completed entry ids plus per-tier quotas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub completed: BTreeSet<String>,
    pub quotas: BTreeMap<Difficulty, DailyQuota>,
}

/// The single persisted record. Readers always observe either the previous
/// or the fully-updated record, never an interleaving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub version: u32,
    pub progression: ProgressionState,
    pub challenges: ChallengeProgress,
    /// Per-topic subtopic completion, keyed by topic id.
    pub topics: BTreeMap<String, SubtopicProgress>,
}

impl SaveRecord {
    /// Fresh record with every achievement seeded and empty progress.
    pub fn seeded() -> Self {
        Self {
            version: SAVE_VERSION,
            progression: ProgressionState::seeded(),
            challenges: ChallengeProgress::default(),
            topics: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_json_roundtrip() {
        let mut record = SaveRecord::seeded();
        record.challenges.completed.insert("py-1".to_string());
        record.challenges.quotas.insert(
            Difficulty::Beginner,
            DailyQuota::new(3, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
        );
        record
            .topics
            .entry("rust-basics".to_string())
            .or_default()
            .completed
            .insert("variables".to_string());

        let json = serde_json::to_string(&record).unwrap();
        let back: SaveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_namespaces_are_disjoint_fields() {
        let record = SaveRecord::seeded();
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("progression"));
        assert!(obj.contains_key("challenges"));
        assert!(obj.contains_key("topics"));
        assert_eq!(value["version"], SAVE_VERSION);
    }
}
