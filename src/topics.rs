//! Topics, subtopics, and the sequential unlock chain
//!
//! A topic's subtopics unlock strictly in order: the subtopic at ordinal
//! `i > 0` stays locked until the one at `i - 1` is completed. Ordinal 0 is
//! never locked. The resolver is pure and safe to call on every render.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// One unit of course content inside a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    pub id: String,
    pub title: String,
}

/// A course topic with its canonical, ordered subtopic list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub subtopics: Vec<Subtopic>,
}

impl Topic {
    /// Ordinal of a subtopic within this topic, if it exists.
    pub fn ordinal_of(&self, subtopic_id: &str) -> Option<usize> {
        self.subtopics.iter().position(|s| s.id == subtopic_id)
    }
}

/// Per-topic completion state. The set only grows; completing the same
/// subtopic twice is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtopicProgress {
    pub completed: BTreeSet<String>,
}

/// Decide whether the subtopic at `ordinal` is locked, given the set of
/// completed subtopic ids. Out-of-range ordinals are caller errors.
pub fn is_locked(
    topic: &Topic,
    ordinal: usize,
    completed: &BTreeSet<String>,
) -> Result<bool, EngineError> {
    if ordinal >= topic.subtopics.len() {
        return Err(EngineError::OrdinalOutOfRange {
            topic: topic.id.clone(),
            ordinal,
            len: topic.subtopics.len(),
        });
    }
    if ordinal == 0 {
        return Ok(false);
    }
    let previous = &topic.subtopics[ordinal - 1];
    Ok(!completed.contains(&previous.id))
}
