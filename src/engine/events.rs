//! UI-facing engine events
//!
//! Learner activity reaches the engine as a closed tagged-variant event
//! type with fixed required fields; malformed or unknown payloads never
//! make it past the boundary.

use chrono::NaiveDate;

use crate::challenges::Difficulty;

/// How an `AchievementProgressed` event expresses new progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    /// Add to the current progress value.
    Delta(u32),
    /// Replace the current progress value.
    Absolute(u32),
}

/// One learner event, dispatched by the UI after any external
/// collaborator result has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A subtopic was finished (quiz passed / lesson completed).
    SubtopicCompleted {
        topic_id: String,
        subtopic_id: String,
    },
    /// Direct achievement progress or unlock trigger from the UI.
    AchievementProgressed { id: String, progress: ProgressKind },
    /// The execution collaborator confirmed a challenge solution.
    ChallengeSolved {
        difficulty: Difficulty,
        challenge_id: String,
    },
    /// The app was opened on a (possibly new) calendar day.
    DayOpened { today: NaiveDate },
}
