//! XP and level derivation
//!
//! The level is always recomputed from total XP; it is never stored
//! separately where it could drift.

/// XP required per level.
pub const XP_PER_LEVEL: u32 = 100;

/// Derive the level for a given total XP. Level 1 starts at 0 XP.
pub fn level_for_xp(total_xp: u32) -> u32 {
    total_xp / XP_PER_LEVEL + 1
}

/// Display title for a level band.
pub fn title_for_level(level: u32) -> &'static str {
    match level {
        1..=2 => "Novice",
        3..=5 => "Apprentice",
        6..=9 => "Coder",
        10..=14 => "Hacker",
        15..=19 => "Engineer",
        20..=29 => "Architect",
        _ => "Legend",
    }
}

/// Learner XP view derived from a snapshot, for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerStats {
    pub total_xp: u32,
    pub level: u32,
    pub title: &'static str,
    /// XP accumulated inside the current level.
    pub xp_into_level: u32,
}

impl LearnerStats {
    pub fn new(total_xp: u32) -> Self {
        let level = level_for_xp(total_xp);
        Self {
            total_xp,
            level,
            title: title_for_level(level),
            xp_into_level: total_xp % XP_PER_LEVEL,
        }
    }

    /// Progress toward the next level (0.0 - 1.0).
    pub fn progress_to_next(&self) -> f32 {
        self.xp_into_level as f32 / XP_PER_LEVEL as f32
    }
}
