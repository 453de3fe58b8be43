//! Progression engine - core gamification logic
//!
//! Owns the durable snapshot and turns learner events into state
//! transitions: achievement unlocks, XP/level changes, streak updates,
//! daily quota accounting, and subtopic unlock checks. Every transition is
//! synchronous and pure over the previous snapshot; the result is
//! committed through the state store as one all-or-nothing write.

mod error;
mod events;
mod external;

pub use error::EngineError;
pub use events::{EngineEvent, ProgressKind};
pub use external::{ExecutionOutcome, IdentityStatus};

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};

use crate::challenges::{self, ChallengeCatalogEntry, DailyQuota, Difficulty, QuotaStatus};
use crate::progression::{AchievementDef, AchievementId, ProgressionEvent, ProgressionState, UnlockRule};
use crate::store::{SaveRecord, StateStore};
use crate::topics::{self, SubtopicProgress, Topic};

/// Time source seam. The engine reads calendar days and timestamps through
/// this so day-boundary behavior is testable.
pub trait Clock {
    /// Today's date in the learner's local timezone.
    fn today(&self) -> NaiveDate;
    /// Current UNIX timestamp in milliseconds.
    fn now_ms(&self) -> i64;
}

/// Real wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Result of asking for the next challenge in a tier.
#[derive(Debug, Clone, PartialEq)]
pub enum ChallengeOffer {
    Challenge(ChallengeCatalogEntry),
    /// No new questions allowed today in this tier.
    QuotaExhausted,
    /// Every question of this tier has been completed.
    CatalogExhausted,
}

/// Central engine: dependency-injected state container over the store,
/// the course topics, and the challenge bank.
pub struct ProgressionEngine {
    store: Box<dyn StateStore>,
    clock: Box<dyn Clock>,
    topics: Vec<Topic>,
    catalog: Vec<ChallengeCatalogEntry>,
    record: SaveRecord,
}

impl ProgressionEngine {
    /// Create an engine with the system clock and per-tier default quotas.
    pub fn new(
        store: Box<dyn StateStore>,
        topics: Vec<Topic>,
        catalog: Vec<ChallengeCatalogEntry>,
    ) -> Result<Self> {
        let quotas: Vec<(Difficulty, u32)> = Difficulty::all()
            .iter()
            .map(|d| (*d, d.default_questions_per_day()))
            .collect();
        Self::with_clock(store, Box::new(SystemClock), topics, catalog, &quotas)
    }

    /// Create an engine with an explicit clock and quota configuration.
    ///
    /// Loads the persisted record or seeds a fresh one. Achievements and
    /// quota tiers added since the record was saved are seeded in their
    /// initial state; existing progress is never touched.
    pub fn with_clock(
        store: Box<dyn StateStore>,
        clock: Box<dyn Clock>,
        topics: Vec<Topic>,
        catalog: Vec<ChallengeCatalogEntry>,
        questions_per_day: &[(Difficulty, u32)],
    ) -> Result<Self> {
        let mut record = match store.load()? {
            Some(record) => record,
            None => SaveRecord::seeded(),
        };
        record.progression.seed_missing();

        let today = clock.today();
        for (difficulty, per_day) in questions_per_day {
            record
                .challenges
                .quotas
                .entry(*difficulty)
                .or_insert_with(|| DailyQuota::new(*per_day, today));
        }
        for difficulty in Difficulty::all() {
            record
                .challenges
                .quotas
                .entry(*difficulty)
                .or_insert_with(|| {
                    DailyQuota::new(difficulty.default_questions_per_day(), today)
                });
        }

        Ok(Self {
            store,
            clock,
            topics,
            catalog,
            record,
        })
    }

    // ========================================
    // READ-ONLY VIEWS
    // ========================================

    /// Current progression snapshot (achievements, XP, streak).
    pub fn snapshot(&self) -> &ProgressionState {
        &self.record.progression
    }

    /// Quota state for one difficulty tier.
    pub fn quota(&self, difficulty: Difficulty) -> &DailyQuota {
        self.record
            .challenges
            .quotas
            .get(&difficulty)
            .expect("quotas are seeded for every difficulty")
    }

    /// Completed-challenge id set.
    pub fn completed_challenges(&self) -> &BTreeSet<String> {
        &self.record.challenges.completed
    }

    /// Completion state for a topic (empty if nothing is completed yet).
    pub fn topic_progress(&self, topic_id: &str) -> SubtopicProgress {
        self.record
            .topics
            .get(topic_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the subtopic at `ordinal` is locked. Pure; safe per render.
    pub fn is_subtopic_locked(&self, topic_id: &str, ordinal: usize) -> Result<bool, EngineError> {
        let topic = self
            .topics
            .iter()
            .find(|t| t.id == topic_id)
            .ok_or_else(|| EngineError::UnknownTopic(topic_id.to_string()))?;
        let completed = self
            .record
            .topics
            .get(topic_id)
            .map(|p| &p.completed)
            .cloned()
            .unwrap_or_default();
        topics::is_locked(topic, ordinal, &completed)
    }

    // ========================================
    // DISPATCH
    // ========================================

    /// Apply one learner event.
    ///
    /// On success the new snapshot is committed to the store and the
    /// produced progression events are returned. Caller errors leave the
    /// snapshot untouched. A failed store write is tolerated: the
    /// in-memory snapshot stays authoritative and the next successful
    /// write persists the full record again.
    pub fn dispatch(&mut self, event: EngineEvent) -> Result<Vec<ProgressionEvent>, EngineError> {
        let (next, events) = match event {
            EngineEvent::DayOpened { today } => self.apply_day_opened(today),
            EngineEvent::SubtopicCompleted {
                topic_id,
                subtopic_id,
            } => self.apply_subtopic_completed(&topic_id, &subtopic_id)?,
            EngineEvent::AchievementProgressed { id, progress } => {
                self.apply_achievement_progressed(&id, progress)?
            }
            EngineEvent::ChallengeSolved {
                difficulty,
                challenge_id,
            } => self.apply_challenge_solved(difficulty, &challenge_id)?,
        };

        self.commit(next);
        Ok(events)
    }

    /// Draw the next challenge for a tier, quota permitting.
    ///
    /// The quota gate runs first: when today's quota is exhausted the
    /// selector is never consulted, so a quota-limited learner gets the
    /// quota answer even if the bank is also empty.
    pub fn next_challenge(&mut self, difficulty: Difficulty) -> ChallengeOffer {
        let today = self.clock.today();

        let mut next = self.record.clone();
        if let Some(quota) = next.challenges.quotas.get_mut(&difficulty) {
            *quota = quota.check_and_rollover(today);
        }
        self.commit(next);

        if self.quota(difficulty).status() == QuotaStatus::Exhausted {
            return ChallengeOffer::QuotaExhausted;
        }

        match challenges::selector::next(
            &self.catalog,
            difficulty,
            &self.record.challenges.completed,
        ) {
            Some(entry) => ChallengeOffer::Challenge(entry.clone()),
            None => ChallengeOffer::CatalogExhausted,
        }
    }

    // ========================================
    // TRANSITIONS
    // ========================================

    fn apply_day_opened(&self, today: NaiveDate) -> (SaveRecord, Vec<ProgressionEvent>) {
        let mut next = self.record.clone();

        let (progression, events) = next.progression.advance_streak(today, self.clock.now_ms());
        next.progression = progression;

        // Observe the day boundary on every tier, even if the learner was
        // offline across midnight.
        for quota in next.challenges.quotas.values_mut() {
            *quota = quota.check_and_rollover(today);
        }

        (next, events)
    }

    fn apply_subtopic_completed(
        &self,
        topic_id: &str,
        subtopic_id: &str,
    ) -> Result<(SaveRecord, Vec<ProgressionEvent>), EngineError> {
        let topic = self
            .topics
            .iter()
            .find(|t| t.id == topic_id)
            .ok_or_else(|| EngineError::UnknownTopic(topic_id.to_string()))?;
        let ordinal = topic
            .ordinal_of(subtopic_id)
            .ok_or_else(|| EngineError::UnknownSubtopic {
                topic: topic_id.to_string(),
                subtopic: subtopic_id.to_string(),
            })?;

        let progress = self.topic_progress(topic_id);
        if progress.completed.contains(subtopic_id) {
            // Idempotent completion: nothing to change, nothing to persist.
            return Ok((self.record.clone(), Vec::new()));
        }
        if topics::is_locked(topic, ordinal, &progress.completed)? {
            return Err(EngineError::SubtopicLocked {
                topic: topic_id.to_string(),
                subtopic: subtopic_id.to_string(),
            });
        }

        let mut next = self.record.clone();
        next.topics
            .entry(topic_id.to_string())
            .or_default()
            .completed
            .insert(subtopic_id.to_string());

        let total: u32 = next
            .topics
            .values()
            .map(|p| p.completed.len() as u32)
            .sum();
        let events = Self::bump_milestones(
            &mut next.progression,
            AchievementId::subtopic_milestones(),
            total,
            self.clock.now_ms(),
        );

        Ok((next, events))
    }

    fn apply_achievement_progressed(
        &self,
        id: &str,
        progress: ProgressKind,
    ) -> Result<(SaveRecord, Vec<ProgressionEvent>), EngineError> {
        let def = AchievementDef::lookup(id)
            .ok_or_else(|| EngineError::UnknownAchievement(id.to_string()))?;
        let now = self.clock.now_ms();
        let mut next = self.record.clone();

        let events = match def.rule {
            // A progressed event on a binary achievement is a direct
            // unlock trigger.
            UnlockRule::Binary => {
                let (progression, events) = next.progression.unlock(id, now)?;
                next.progression = progression;
                events
            }
            UnlockRule::Thresholded { .. } => {
                let value = match progress {
                    ProgressKind::Absolute(value) => value,
                    ProgressKind::Delta(delta) => {
                        next.progression.progress_of(id).saturating_add(delta)
                    }
                };
                let (progression, events) = next.progression.update_progress(id, value, now)?;
                next.progression = progression;
                events
            }
        };

        Ok((next, events))
    }

    fn apply_challenge_solved(
        &self,
        difficulty: Difficulty,
        challenge_id: &str,
    ) -> Result<(SaveRecord, Vec<ProgressionEvent>), EngineError> {
        let known = self
            .catalog
            .iter()
            .any(|e| e.id == challenge_id && e.difficulty == difficulty);
        if !known {
            return Err(EngineError::UnknownChallenge(challenge_id.to_string()));
        }

        if self.record.challenges.completed.contains(challenge_id) {
            // Replayed solve: the completed set never shrinks and the
            // quota counter must not move again.
            return Ok((self.record.clone(), Vec::new()));
        }

        let today = self.clock.today();
        let now = self.clock.now_ms();
        let mut next = self.record.clone();

        if let Some(quota) = next.challenges.quotas.get_mut(&difficulty) {
            *quota = quota.check_and_rollover(today).record_completion();
        }
        next.challenges.completed.insert(challenge_id.to_string());

        let total = next.challenges.completed.len() as u32;
        let mut events = Self::bump_milestones(
            &mut next.progression,
            AchievementId::solve_milestones(),
            total,
            now,
        );

        let tier_total = next
            .challenges
            .completed
            .iter()
            .filter(|id| {
                self.catalog
                    .iter()
                    .any(|e| &e.id == *id && e.difficulty == difficulty)
            })
            .count() as u32;
        events.extend(Self::bump_milestones(
            &mut next.progression,
            AchievementId::solver_milestones(difficulty),
            tier_total,
            now,
        ));

        Ok((next, events))
    }

    /// Raise thresholded milestone achievements to `value`. Milestone ids
    /// are catalog-defined and thresholded, so the update cannot fail.
    fn bump_milestones(
        progression: &mut ProgressionState,
        ids: &[AchievementId],
        value: u32,
        now_ms: i64,
    ) -> Vec<ProgressionEvent> {
        let mut events = Vec::new();
        for id in ids {
            if let Ok((state, ev)) = progression.update_progress(id.as_str(), value, now_ms) {
                *progression = state;
                events.extend(ev);
            }
        }
        events
    }

    /// Commit a new record and persist it. Storage failures are logged and
    /// tolerated; the in-memory record stays authoritative for the
    /// session, and the next successful save rewrites the full snapshot.
    fn commit(&mut self, next: SaveRecord) {
        if next == self.record {
            return;
        }
        self.record = next;
        if let Err(e) = self.store.save(&self.record) {
            tracing::warn!("Failed to persist progression state: {e:#}");
        } else {
            tracing::debug!(
                total_xp = self.record.progression.total_xp,
                streak = self.record.progression.streak.streak,
                "Progression state persisted"
            );
        }
    }
}
