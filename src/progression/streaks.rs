//! Daily streak rules
//!
//! Pure calendar-date logic deciding whether activity today extends,
//! resets, or leaves a learner's consecutive-day streak unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Consecutive-activity streak state.
///
/// `streak` counts consecutive calendar days with at least one qualifying
/// activity; `last_active_date` is the most recent such day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub streak: u32,
    pub last_active_date: Option<NaiveDate>,
}

impl StreakState {
    /// Apply one "day opened" activity for `today` and return the new state.
    ///
    /// Rules, evaluated in order:
    /// 1. First ever activity starts the streak at 1.
    /// 2. A repeat call on the same day is a no-op (safety net against
    ///    double-counting; callers should still fire at most once per day).
    /// 3. Activity the day after the last one extends the streak.
    /// 4. Anything else (a gap of two or more days, or a last-active date
    ///    in the future from clock skew) resets the streak to 1.
    ///
    /// No side effects; the caller persists the returned value.
    pub fn advance(&self, today: NaiveDate) -> StreakState {
        let Some(last) = self.last_active_date else {
            return StreakState {
                streak: 1,
                last_active_date: Some(today),
            };
        };

        if last == today {
            return self.clone();
        }

        let streak = if last.succ_opt() == Some(today) {
            self.streak + 1
        } else {
            1
        };

        StreakState {
            streak,
            last_active_date: Some(today),
        }
    }

    /// Whether the streak is still alive as of `today` (activity today or
    /// yesterday). Used by views only; `advance` is the source of truth.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        let Some(last) = self.last_active_date else {
            return false;
        };
        let days_since = (today - last).num_days();
        (0..=1).contains(&days_since)
    }
}
