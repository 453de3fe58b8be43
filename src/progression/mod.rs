//! Learner progression state and its pure transitions
//!
//! `ProgressionState` is the engine-owned aggregate: achievement unlock
//! state, total XP, and the daily streak. All mutators take the current
//! snapshot and return a new one together with the events produced; the
//! engine commits the result and the UI only ever reads snapshots.

mod achievements;
mod levels;
mod streaks;

pub use achievements::{
    ACHIEVEMENTS, AchievementCategory, AchievementDef, AchievementId, AchievementState,
    AchievementView, UnlockRule,
};
pub use levels::{LearnerStats, XP_PER_LEVEL, level_for_xp, title_for_level};
pub use streaks::StreakState;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// Events produced by progression transitions, for the UI layer to react
/// to (toasts, confetti, streak banners).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressionEvent {
    AchievementUnlocked {
        id: String,
        xp_reward: u32,
        unlocked_at: i64,
    },
    XpAwarded {
        amount: u32,
        total_xp: u32,
    },
    LevelUp {
        old_level: u32,
        new_level: u32,
        new_title: &'static str,
    },
    StreakExtended {
        days: u32,
    },
}

/// Process-wide progression aggregate. Owned exclusively by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    /// Unlock/progress state per achievement, keyed by string ID.
    pub achievements: BTreeMap<String, AchievementState>,
    pub total_xp: u32,
    #[serde(flatten)]
    pub streak: StreakState,
}

impl ProgressionState {
    /// Fresh state with every achievement seeded locked at zero progress.
    pub fn seeded() -> Self {
        let achievements = AchievementId::all()
            .iter()
            .map(|id| (id.as_str().to_string(), AchievementState::default()))
            .collect();
        Self {
            achievements,
            total_xp: 0,
            streak: StreakState::default(),
        }
    }

    /// Seed state entries for achievements added after this state was
    /// persisted. Existing entries are left untouched.
    pub fn seed_missing(&mut self) {
        for id in AchievementId::all() {
            self.achievements
                .entry(id.as_str().to_string())
                .or_default();
        }
    }

    /// Derived level; never stored, so it cannot drift from `total_xp`.
    pub fn level(&self) -> u32 {
        level_for_xp(self.total_xp)
    }

    /// Derived XP/level view for the UI.
    pub fn stats(&self) -> LearnerStats {
        LearnerStats::new(self.total_xp)
    }

    /// Definition + state pairs for every achievement, catalog order.
    pub fn achievement_views(&self) -> Vec<AchievementView> {
        ACHIEVEMENTS
            .iter()
            .map(|def| AchievementView {
                def,
                state: self
                    .achievements
                    .get(def.id.as_str())
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Number of unlocked achievements.
    pub fn unlocked_count(&self) -> usize {
        self.achievements
            .values()
            .filter(|s| s.is_unlocked())
            .count()
    }

    /// Current progress value for an achievement (0 for unknown ids).
    pub fn progress_of(&self, id: &str) -> u32 {
        self.achievements.get(id).map(|s| s.progress).unwrap_or(0)
    }

    /// Unlock a binary-rule achievement.
    ///
    /// No-op if already unlocked. Unknown ids and thresholded achievements
    /// are caller errors. On the transition the XP reward is paid in the
    /// same state change that sets `unlocked_at`.
    pub fn unlock(
        &self,
        id: &str,
        now_ms: i64,
    ) -> Result<(ProgressionState, Vec<ProgressionEvent>), EngineError> {
        let def = AchievementDef::lookup(id)
            .ok_or_else(|| EngineError::UnknownAchievement(id.to_string()))?;
        if !matches!(def.rule, UnlockRule::Binary) {
            return Err(EngineError::RuleMismatch {
                id: id.to_string(),
                expected: "binary",
                actual: def.rule.kind(),
            });
        }

        if self.progress_state(id).is_unlocked() {
            return Ok((self.clone(), Vec::new()));
        }

        let mut next = self.clone();
        let mut events = Vec::new();
        next.pay_unlock(def, now_ms, &mut events);
        Ok((next, events))
    }

    /// Record progress on a thresholded-rule achievement.
    ///
    /// `new_progress` is clamped to the target. The unlock triggers when
    /// the clamped progress reaches the target (or exceeds zero for
    /// achievements without one); XP and progress change together in one
    /// transition. Progress on an already-unlocked achievement is still
    /// recorded for display, but the reward is never paid twice.
    pub fn update_progress(
        &self,
        id: &str,
        new_progress: u32,
        now_ms: i64,
    ) -> Result<(ProgressionState, Vec<ProgressionEvent>), EngineError> {
        let def = AchievementDef::lookup(id)
            .ok_or_else(|| EngineError::UnknownAchievement(id.to_string()))?;
        let UnlockRule::Thresholded { target } = def.rule else {
            return Err(EngineError::RuleMismatch {
                id: id.to_string(),
                expected: "thresholded",
                actual: def.rule.kind(),
            });
        };

        let clamped = match target {
            Some(t) => new_progress.min(t),
            None => new_progress,
        };

        let mut next = self.clone();
        let mut events = Vec::new();
        let already_unlocked = {
            let entry = next.achievements.entry(id.to_string()).or_default();
            let already = entry.is_unlocked();
            entry.progress = clamped;
            already
        };

        let triggers = match target {
            Some(t) => clamped >= t,
            None => clamped > 0,
        };
        if triggers && !already_unlocked {
            next.pay_unlock(def, now_ms, &mut events);
        }

        Ok((next, events))
    }

    /// Apply the day's streak activity; emits `StreakExtended` plus any
    /// streak-milestone achievement events. Idempotent within one day.
    pub fn advance_streak(
        &self,
        today: chrono::NaiveDate,
        now_ms: i64,
    ) -> (ProgressionState, Vec<ProgressionEvent>) {
        let advanced = self.streak.advance(today);
        if advanced == self.streak {
            return (self.clone(), Vec::new());
        }

        let days = advanced.streak;
        let mut next = self.clone();
        next.streak = advanced;
        let mut events = vec![ProgressionEvent::StreakExtended { days }];

        // Milestone progress keeps the high-water mark so a reset never
        // regresses an achievement.
        for id in AchievementId::streak_milestones() {
            if days > next.progress_of(id.as_str()) {
                // Milestone ids are all thresholded; the update cannot fail.
                if let Ok((state, ev)) = next.update_progress(id.as_str(), days, now_ms) {
                    next = state;
                    events.extend(ev);
                }
            }
        }

        (next, events)
    }

    fn progress_state(&self, id: &str) -> AchievementState {
        self.achievements.get(id).cloned().unwrap_or_default()
    }

    /// Set `unlocked_at` and pay the XP reward in one transition.
    fn pay_unlock(
        &mut self,
        def: &'static AchievementDef,
        now_ms: i64,
        events: &mut Vec<ProgressionEvent>,
    ) {
        let entry = self
            .achievements
            .entry(def.id.as_str().to_string())
            .or_default();
        entry.unlocked_at = Some(now_ms);

        let old_level = self.level();
        self.total_xp += def.xp_reward;
        events.push(ProgressionEvent::AchievementUnlocked {
            id: def.id.as_str().to_string(),
            xp_reward: def.xp_reward,
            unlocked_at: now_ms,
        });
        events.push(ProgressionEvent::XpAwarded {
            amount: def.xp_reward,
            total_xp: self.total_xp,
        });

        let new_level = self.level();
        if new_level > old_level {
            events.push(ProgressionEvent::LevelUp {
                old_level,
                new_level,
                new_title: title_for_level(new_level),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_seeded_state_is_all_locked() {
        let state = ProgressionState::seeded();
        assert_eq!(state.achievements.len(), AchievementId::all().len());
        assert_eq!(state.unlocked_count(), 0);
        assert_eq!(state.total_xp, 0);
        assert_eq!(state.level(), 1);
    }

    #[test]
    fn test_unlock_pays_reward_at_most_once() {
        let state = ProgressionState::seeded();
        let id = AchievementId::ProfileShared.as_str();
        let reward = AchievementDef::get(AchievementId::ProfileShared).xp_reward;

        let (state, events) = state.unlock(id, NOW).unwrap();
        assert_eq!(state.total_xp, reward);
        assert!(state.achievements[id].is_unlocked());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, ProgressionEvent::AchievementUnlocked { .. }))
        );

        // Second unlock is a no-op: same XP, no events.
        let (state, events) = state.unlock(id, NOW + 1).unwrap();
        assert_eq!(state.total_xp, reward);
        assert_eq!(state.achievements[id].unlocked_at, Some(NOW));
        assert!(events.is_empty());
    }

    #[test]
    fn test_unlock_unknown_id_is_error() {
        let state = ProgressionState::seeded();
        assert!(matches!(
            state.unlock("bogus", NOW),
            Err(EngineError::UnknownAchievement(_))
        ));
    }

    #[test]
    fn test_unlock_rejects_thresholded() {
        let state = ProgressionState::seeded();
        let err = state
            .unlock(AchievementId::FirstSolve.as_str(), NOW)
            .unwrap_err();
        assert!(matches!(err, EngineError::RuleMismatch { .. }));
    }

    #[test]
    fn test_update_progress_rejects_binary() {
        let state = ProgressionState::seeded();
        let err = state
            .update_progress(AchievementId::ProfileShared.as_str(), 1, NOW)
            .unwrap_err();
        assert!(matches!(err, EngineError::RuleMismatch { .. }));
    }

    #[test]
    fn test_progress_clamps_and_unlocks_at_target() {
        let state = ProgressionState::seeded();
        let id = AchievementId::SubtopicFive.as_str();

        let (state, events) = state.update_progress(id, 3, NOW).unwrap();
        assert_eq!(state.progress_of(id), 3);
        assert!(events.is_empty());
        assert!(!state.achievements[id].is_unlocked());

        // Clamped to the target of 5, which also triggers the unlock.
        let (state, events) = state.update_progress(id, 99, NOW).unwrap();
        assert_eq!(state.progress_of(id), 5);
        assert!(state.achievements[id].is_unlocked());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, ProgressionEvent::AchievementUnlocked { .. }))
        );
    }

    #[test]
    fn test_monotonic_xp_and_unlock_over_progress_sequence() {
        let id = AchievementId::SolveTwentyFive.as_str();
        let mut state = ProgressionState::seeded();
        let mut last_xp = 0;
        let mut seen_unlocked = false;
        for progress in [1, 5, 5, 12, 25, 25, 30] {
            let (next, _) = state.update_progress(id, progress, NOW).unwrap();
            assert!(next.total_xp >= last_xp, "XP must never decrease");
            if seen_unlocked {
                assert!(next.achievements[id].is_unlocked(), "unlock is monotonic");
            }
            seen_unlocked |= next.achievements[id].is_unlocked();
            last_xp = next.total_xp;
            state = next;
        }
        assert!(seen_unlocked);
    }

    #[test]
    fn test_no_target_unlocks_on_any_progress() {
        let state = ProgressionState::seeded();
        let id = AchievementId::PerfectQuiz.as_str();

        let (state, events) = state.update_progress(id, 0, NOW).unwrap();
        assert!(!state.achievements[id].is_unlocked());
        assert!(events.is_empty());

        let (state, _) = state.update_progress(id, 1, NOW).unwrap();
        assert!(state.achievements[id].is_unlocked());
    }

    #[test]
    fn test_reward_paid_once_even_after_more_progress() {
        let state = ProgressionState::seeded();
        let id = AchievementId::FirstSolve.as_str();
        let reward = AchievementDef::get(AchievementId::FirstSolve).xp_reward;

        let (state, _) = state.update_progress(id, 1, NOW).unwrap();
        assert_eq!(state.total_xp, reward);
        let (state, events) = state.update_progress(id, 1, NOW + 5).unwrap();
        assert_eq!(state.total_xp, reward);
        assert!(events.is_empty());
        // unlocked_at never changes after the first transition
        assert_eq!(state.achievements[id].unlocked_at, Some(NOW));
    }

    #[test]
    fn test_level_up_event_emitted() {
        // StreakStarter (30) + SolveTwentyFive (100) crosses the level-2
        // boundary at 100 XP.
        let state = ProgressionState::seeded();
        let (state, _) = state
            .update_progress(AchievementId::StreakStarter.as_str(), 3, NOW)
            .unwrap();
        assert_eq!(state.level(), 1);
        let (state, events) = state
            .update_progress(AchievementId::SolveTwentyFive.as_str(), 25, NOW)
            .unwrap();
        assert_eq!(state.level(), 2);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, ProgressionEvent::LevelUp { new_level: 2, .. }))
        );
    }

    #[test]
    fn test_advance_streak_feeds_milestones() {
        let mut state = ProgressionState::seeded();
        let start = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        for offset in 0..3 {
            let (next, _) = state.advance_streak(start + chrono::Days::new(offset), NOW);
            state = next;
        }
        assert_eq!(state.streak.streak, 3);
        assert!(
            state.achievements[AchievementId::StreakStarter.as_str()].is_unlocked(),
            "3-day streak unlocks StreakStarter"
        );

        // Same-day repeat changes nothing.
        let (next, events) = state.advance_streak(start + chrono::Days::new(2), NOW);
        assert_eq!(next, state);
        assert!(events.is_empty());
    }

    #[test]
    fn test_streak_reset_keeps_milestone_progress() {
        let mut state = ProgressionState::seeded();
        let start = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        for offset in 0..4 {
            let (next, _) = state.advance_streak(start + chrono::Days::new(offset), NOW);
            state = next;
        }
        let week_progress = state.progress_of(AchievementId::WeekStreak.as_str());
        assert_eq!(week_progress, 4);

        // Gap of three days resets the streak but not the high-water mark.
        let (state, _) = state.advance_streak(start + chrono::Days::new(7), NOW);
        assert_eq!(state.streak.streak, 1);
        assert_eq!(
            state.progress_of(AchievementId::WeekStreak.as_str()),
            week_progress
        );
    }
}
