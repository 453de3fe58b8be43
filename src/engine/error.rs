//! Engine error taxonomy
//!
//! Every variant is a caller error: reported immediately, never retried,
//! never silently corrected. Storage failures are not represented here —
//! they are tolerated by the engine and logged (see `engine::mod`).

/// Errors returned by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown achievement id: {0}")]
    UnknownAchievement(String),

    #[error("Achievement '{id}' has a {actual} unlock rule; this operation requires {expected}")]
    RuleMismatch {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Unknown topic id: {0}")]
    UnknownTopic(String),

    #[error("Unknown subtopic '{subtopic}' in topic '{topic}'")]
    UnknownSubtopic { topic: String, subtopic: String },

    #[error("Subtopic '{subtopic}' in topic '{topic}' is still locked")]
    SubtopicLocked { topic: String, subtopic: String },

    #[error("Subtopic ordinal {ordinal} out of range for topic '{topic}' ({len} subtopics)")]
    OrdinalOutOfRange {
        topic: String,
        ordinal: usize,
        len: usize,
    },

    #[error("Unknown challenge id: {0}")]
    UnknownChallenge(String),

    #[error("Malformed challenge payload: {0}")]
    MalformedPayload(String),
}
