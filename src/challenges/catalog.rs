//! Challenge catalog entries and difficulty tiers
//!
//! Entries are immutable once created. Payloads arriving from the question
//! generator are validated here before they can reach the engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::EngineError;

/// Challenge difficulty tier. Each tier carries its own daily quota.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Get the string ID for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from a stored or generator-provided string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// All tiers, easiest first.
    pub fn all() -> &'static [Difficulty] {
        &[Self::Beginner, Self::Intermediate, Self::Advanced]
    }

    /// Default number of new questions allowed per day for this tier.
    pub fn default_questions_per_day(&self) -> u32 {
        match self {
            Self::Beginner => 3,
            Self::Intermediate => 2,
            Self::Advanced => 1,
        }
    }
}

/// One immutable question record in the challenge bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeCatalogEntry {
    pub id: String,
    pub difficulty: Difficulty,
    /// Opaque question payload (prompt, starter code, expected output...).
    /// The engine never interprets it beyond validation.
    pub payload: Value,
}

impl ChallengeCatalogEntry {
    /// Validate a raw generator payload into a catalog entry.
    ///
    /// Required shape: an object with a non-empty string `id`, a known
    /// `difficulty`, and an object `payload`. Anything else is rejected
    /// before it can reach the engine.
    pub fn from_value(value: Value) -> Result<Self, EngineError> {
        let obj = value
            .as_object()
            .ok_or_else(|| EngineError::MalformedPayload("not a JSON object".to_string()))?;

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                EngineError::MalformedPayload("missing or empty 'id'".to_string())
            })?
            .to_string();

        let difficulty = obj
            .get("difficulty")
            .and_then(Value::as_str)
            .and_then(Difficulty::from_str)
            .ok_or_else(|| {
                EngineError::MalformedPayload("missing or unknown 'difficulty'".to_string())
            })?;

        let payload = obj
            .get("payload")
            .filter(|p| p.is_object())
            .cloned()
            .ok_or_else(|| {
                EngineError::MalformedPayload("missing 'payload' object".to_string())
            })?;

        Ok(Self {
            id,
            difficulty,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_difficulty_str_roundtrip() {
        for d in Difficulty::all() {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(*d));
        }
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_from_value_accepts_wellformed() {
        let entry = ChallengeCatalogEntry::from_value(json!({
            "id": "py-loops-1",
            "difficulty": "beginner",
            "payload": { "prompt": "Print 1 to 10" },
        }))
        .unwrap();
        assert_eq!(entry.id, "py-loops-1");
        assert_eq!(entry.difficulty, Difficulty::Beginner);
    }

    #[test]
    fn test_from_value_rejects_missing_fields() {
        assert!(ChallengeCatalogEntry::from_value(json!("nope")).is_err());
        assert!(ChallengeCatalogEntry::from_value(json!({
            "difficulty": "beginner",
            "payload": {},
        }))
        .is_err());
        assert!(ChallengeCatalogEntry::from_value(json!({
            "id": "",
            "difficulty": "beginner",
            "payload": {},
        }))
        .is_err());
        assert!(ChallengeCatalogEntry::from_value(json!({
            "id": "x",
            "difficulty": "impossible",
            "payload": {},
        }))
        .is_err());
        assert!(ChallengeCatalogEntry::from_value(json!({
            "id": "x",
            "difficulty": "advanced",
            "payload": "not an object",
        }))
        .is_err());
    }
}
