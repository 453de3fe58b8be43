//! CodeQuest - Progression & Gamification Engine
//!
//! Turns raw learner events (a quiz finished, a subtopic completed, a
//! challenge solved, a day passing) into durable state changes:
//! achievement unlocks, XP/level computation, streak continuation and
//! reset, daily challenge quotas, and the sequential unlock chain between
//! a topic's subtopics.
//!
//! The rendering layer, authentication provider, code-execution backend,
//! and question generator are external collaborators. The engine consumes
//! typed results from them (see [`engine::ExecutionOutcome`]) and exposes
//! immutable snapshots plus a closed event type to the UI:
//!
//! ```ignore
//! let mut engine = ProgressionEngine::new(store, topics, catalog)?;
//!
//! engine.dispatch(EngineEvent::DayOpened { today })?;
//! if let ChallengeOffer::Challenge(entry) = engine.next_challenge(Difficulty::Beginner) {
//!     // ...run the learner's solution through the execution backend...
//!     engine.dispatch(EngineEvent::ChallengeSolved {
//!         difficulty: entry.difficulty,
//!         challenge_id: entry.id,
//!     })?;
//! }
//! ```

pub mod challenges;
pub mod engine;
pub mod progression;
pub mod store;
pub mod topics;

pub use challenges::{ChallengeCatalogEntry, DailyQuota, Difficulty, QuotaStatus};
pub use engine::{
    ChallengeOffer, Clock, EngineError, EngineEvent, ExecutionOutcome, IdentityStatus,
    ProgressKind, ProgressionEngine, SystemClock,
};
pub use progression::{
    AchievementCategory, AchievementDef, AchievementId, AchievementState, AchievementView,
    LearnerStats, ProgressionEvent, ProgressionState, StreakState,
};
pub use store::{JsonFileStore, MemoryStore, SaveRecord, StateStore};
pub use topics::{Subtopic, SubtopicProgress, Topic};
