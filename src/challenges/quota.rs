//! Daily challenge quota
//!
//! Each difficulty tier allows a fixed number of new questions per day.
//! The counter resets exactly once per calendar-date transition, detected
//! by comparing the stored reset date against "today" in the learner's
//! local timezone.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-tier quota state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuota {
    pub questions_per_day: u32,
    pub completed_today: u32,
    pub last_reset_date: NaiveDate,
}

/// Whether the tier can still issue a new question today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaStatus {
    Available { remaining: u32 },
    Exhausted,
}

impl DailyQuota {
    pub fn new(questions_per_day: u32, today: NaiveDate) -> Self {
        Self {
            questions_per_day,
            completed_today: 0,
            last_reset_date: today,
        }
    }

    /// Observe the day boundary: reset the counter when the stored date is
    /// not `today`. Must run before any read/write of `completed_today` in
    /// a session, so an offline midnight crossing is still caught.
    pub fn check_and_rollover(&self, today: NaiveDate) -> DailyQuota {
        if self.last_reset_date != today {
            DailyQuota {
                questions_per_day: self.questions_per_day,
                completed_today: 0,
                last_reset_date: today,
            }
        } else {
            self.clone()
        }
    }

    /// Questions still allowed today.
    pub fn remaining(&self) -> u32 {
        self.questions_per_day.saturating_sub(self.completed_today)
    }

    pub fn status(&self) -> QuotaStatus {
        match self.remaining() {
            0 => QuotaStatus::Exhausted,
            remaining => QuotaStatus::Available { remaining },
        }
    }

    /// Count one completed question. Saturates at the daily cap, so a
    /// double submission is a no-op rather than an error.
    pub fn record_completion(&self) -> DailyQuota {
        DailyQuota {
            completed_today: (self.completed_today + 1).min(self.questions_per_day),
            ..self.clone()
        }
    }
}
