//! Achievement catalog and unlock state
//!
//! All achievements are defined here with their unlock rules and XP
//! rewards. Definitions are static and never change at runtime; the
//! mutable unlock/progress state lives in `ProgressionState`.

use serde::{Deserialize, Serialize};

use crate::challenges::Difficulty;

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    // Beginner
    FirstSubtopic,
    SubtopicFive,
    FirstSolve,
    StreakStarter,

    // Intermediate
    SubtopicTwenty,
    SolveTwentyFive,
    BeginnerSolver,
    IntermediateSolver,
    WeekStreak,

    // Advanced
    SubtopicFifty,
    CenturySolver,
    AdvancedSolver,
    MonthStreak,

    // Social
    ProfileShared,
    FriendInvited,

    // Special
    NightOwl,
    EarlyBird,
    PerfectQuiz,
}

impl AchievementId {
    /// Get the string ID for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstSubtopic => "first_subtopic",
            Self::SubtopicFive => "subtopic_five",
            Self::FirstSolve => "first_solve",
            Self::StreakStarter => "streak_starter",
            Self::SubtopicTwenty => "subtopic_twenty",
            Self::SolveTwentyFive => "solve_twenty_five",
            Self::BeginnerSolver => "beginner_solver",
            Self::IntermediateSolver => "intermediate_solver",
            Self::WeekStreak => "week_streak",
            Self::SubtopicFifty => "subtopic_fifty",
            Self::CenturySolver => "century_solver",
            Self::AdvancedSolver => "advanced_solver",
            Self::MonthStreak => "month_streak",
            Self::ProfileShared => "profile_shared",
            Self::FriendInvited => "friend_invited",
            Self::NightOwl => "night_owl",
            Self::EarlyBird => "early_bird",
            Self::PerfectQuiz => "perfect_quiz",
        }
    }

    /// Parse from a stored string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first_subtopic" => Some(Self::FirstSubtopic),
            "subtopic_five" => Some(Self::SubtopicFive),
            "first_solve" => Some(Self::FirstSolve),
            "streak_starter" => Some(Self::StreakStarter),
            "subtopic_twenty" => Some(Self::SubtopicTwenty),
            "solve_twenty_five" => Some(Self::SolveTwentyFive),
            "beginner_solver" => Some(Self::BeginnerSolver),
            "intermediate_solver" => Some(Self::IntermediateSolver),
            "week_streak" => Some(Self::WeekStreak),
            "subtopic_fifty" => Some(Self::SubtopicFifty),
            "century_solver" => Some(Self::CenturySolver),
            "advanced_solver" => Some(Self::AdvancedSolver),
            "month_streak" => Some(Self::MonthStreak),
            "profile_shared" => Some(Self::ProfileShared),
            "friend_invited" => Some(Self::FriendInvited),
            "night_owl" => Some(Self::NightOwl),
            "early_bird" => Some(Self::EarlyBird),
            "perfect_quiz" => Some(Self::PerfectQuiz),
            _ => None,
        }
    }

    /// Get all achievement IDs
    pub fn all() -> &'static [AchievementId] {
        &[
            Self::FirstSubtopic,
            Self::SubtopicFive,
            Self::FirstSolve,
            Self::StreakStarter,
            Self::SubtopicTwenty,
            Self::SolveTwentyFive,
            Self::BeginnerSolver,
            Self::IntermediateSolver,
            Self::WeekStreak,
            Self::SubtopicFifty,
            Self::CenturySolver,
            Self::AdvancedSolver,
            Self::MonthStreak,
            Self::ProfileShared,
            Self::FriendInvited,
            Self::NightOwl,
            Self::EarlyBird,
            Self::PerfectQuiz,
        ]
    }

    /// Streak-milestone achievements, fed from the streak tracker.
    pub fn streak_milestones() -> &'static [AchievementId] {
        &[Self::StreakStarter, Self::WeekStreak, Self::MonthStreak]
    }

    /// Milestones fed from the total count of completed subtopics.
    pub fn subtopic_milestones() -> &'static [AchievementId] {
        &[Self::FirstSubtopic, Self::SubtopicFive, Self::SubtopicTwenty, Self::SubtopicFifty]
    }

    /// Milestones fed from the total count of solved challenges.
    pub fn solve_milestones() -> &'static [AchievementId] {
        &[Self::FirstSolve, Self::SolveTwentyFive, Self::CenturySolver]
    }

    /// Milestones fed from the per-difficulty solved counts.
    pub fn solver_milestones(difficulty: Difficulty) -> &'static [AchievementId] {
        match difficulty {
            Difficulty::Beginner => &[Self::BeginnerSolver],
            Difficulty::Intermediate => &[Self::IntermediateSolver],
            Difficulty::Advanced => &[Self::AdvancedSolver],
        }
    }
}

/// Achievement category for grouping in UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementCategory {
    Beginner,
    Intermediate,
    Advanced,
    Social,
    Special,
}

impl AchievementCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Social => "Social",
            Self::Special => "Special",
        }
    }
}

/// How an achievement unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockRule {
    /// Done/not-done; unlocked by a direct trigger.
    Binary,
    /// Numeric progress toward a target. Without a target, any progress
    /// above zero unlocks.
    Thresholded { target: Option<u32> },
}

impl UnlockRule {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Thresholded { .. } => "thresholded",
        }
    }
}

/// Achievement definition with all metadata
#[derive(Debug, Clone)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub rule: UnlockRule,
    pub xp_reward: u32,
    pub hidden: bool,
}

/// All achievement definitions
pub static ACHIEVEMENTS: &[AchievementDef] = &[
    // === BEGINNER ===
    AchievementDef {
        id: AchievementId::FirstSubtopic,
        name: "First Steps",
        description: "Complete your first lesson",
        icon: "🎯",
        category: AchievementCategory::Beginner,
        rule: UnlockRule::Thresholded { target: Some(1) },
        xp_reward: 10,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::SubtopicFive,
        name: "Warming Up",
        description: "Complete 5 lessons",
        icon: "📈",
        category: AchievementCategory::Beginner,
        rule: UnlockRule::Thresholded { target: Some(5) },
        xp_reward: 25,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::FirstSolve,
        name: "Problem Solver",
        description: "Solve your first daily challenge",
        icon: "💡",
        category: AchievementCategory::Beginner,
        rule: UnlockRule::Thresholded { target: Some(1) },
        xp_reward: 15,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::StreakStarter,
        name: "On Fire",
        description: "Maintain a 3-day streak",
        icon: "🔥",
        category: AchievementCategory::Beginner,
        rule: UnlockRule::Thresholded { target: Some(3) },
        xp_reward: 30,
        hidden: false,
    },
    // === INTERMEDIATE ===
    AchievementDef {
        id: AchievementId::SubtopicTwenty,
        name: "Dedicated Learner",
        description: "Complete 20 lessons",
        icon: "📚",
        category: AchievementCategory::Intermediate,
        rule: UnlockRule::Thresholded { target: Some(20) },
        xp_reward: 75,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::SolveTwentyFive,
        name: "Grinder",
        description: "Solve 25 daily challenges",
        icon: "⚙️",
        category: AchievementCategory::Intermediate,
        rule: UnlockRule::Thresholded { target: Some(25) },
        xp_reward: 100,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::BeginnerSolver,
        name: "Basics Down",
        description: "Solve 10 beginner challenges",
        icon: "🌱",
        category: AchievementCategory::Intermediate,
        rule: UnlockRule::Thresholded { target: Some(10) },
        xp_reward: 50,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::IntermediateSolver,
        name: "Climbing",
        description: "Solve 10 intermediate challenges",
        icon: "🧗",
        category: AchievementCategory::Intermediate,
        rule: UnlockRule::Thresholded { target: Some(10) },
        xp_reward: 75,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::WeekStreak,
        name: "Week Warrior",
        description: "Maintain a 7-day streak",
        icon: "📅",
        category: AchievementCategory::Intermediate,
        rule: UnlockRule::Thresholded { target: Some(7) },
        xp_reward: 75,
        hidden: false,
    },
    // === ADVANCED ===
    AchievementDef {
        id: AchievementId::SubtopicFifty,
        name: "Course Crusher",
        description: "Complete 50 lessons",
        icon: "💪",
        category: AchievementCategory::Advanced,
        rule: UnlockRule::Thresholded { target: Some(50) },
        xp_reward: 150,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::CenturySolver,
        name: "Century",
        description: "Solve 100 daily challenges",
        icon: "💯",
        category: AchievementCategory::Advanced,
        rule: UnlockRule::Thresholded { target: Some(100) },
        xp_reward: 250,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::AdvancedSolver,
        name: "Deep End",
        description: "Solve 10 advanced challenges",
        icon: "🏔️",
        category: AchievementCategory::Advanced,
        rule: UnlockRule::Thresholded { target: Some(10) },
        xp_reward: 125,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::MonthStreak,
        name: "Monthly Master",
        description: "Maintain a 30-day streak",
        icon: "👑",
        category: AchievementCategory::Advanced,
        rule: UnlockRule::Thresholded { target: Some(30) },
        xp_reward: 300,
        hidden: false,
    },
    // === SOCIAL ===
    AchievementDef {
        id: AchievementId::ProfileShared,
        name: "Show and Tell",
        description: "Share your profile",
        icon: "📣",
        category: AchievementCategory::Social,
        rule: UnlockRule::Binary,
        xp_reward: 20,
        hidden: false,
    },
    AchievementDef {
        id: AchievementId::FriendInvited,
        name: "Recruiter",
        description: "Invite a friend",
        icon: "🤝",
        category: AchievementCategory::Social,
        rule: UnlockRule::Binary,
        xp_reward: 25,
        hidden: false,
    },
    // === SPECIAL ===
    AchievementDef {
        id: AchievementId::NightOwl,
        name: "Night Owl",
        description: "Study between midnight and 5 AM",
        icon: "🦉",
        category: AchievementCategory::Special,
        rule: UnlockRule::Binary,
        xp_reward: 15,
        hidden: true,
    },
    AchievementDef {
        id: AchievementId::EarlyBird,
        name: "Early Bird",
        description: "Study between 5 AM and 7 AM",
        icon: "🐦",
        category: AchievementCategory::Special,
        rule: UnlockRule::Binary,
        xp_reward: 15,
        hidden: true,
    },
    AchievementDef {
        id: AchievementId::PerfectQuiz,
        name: "Flawless",
        description: "Finish a quiz with a perfect score",
        icon: "✨",
        category: AchievementCategory::Special,
        rule: UnlockRule::Thresholded { target: None },
        xp_reward: 40,
        hidden: false,
    },
];

impl AchievementDef {
    /// Get achievement definition by ID
    pub fn get(id: AchievementId) -> &'static AchievementDef {
        ACHIEVEMENTS
            .iter()
            .find(|a| a.id == id)
            .expect("All achievements should be defined")
    }

    /// Look up a definition by its string ID.
    pub fn lookup(id: &str) -> Option<&'static AchievementDef> {
        AchievementId::from_str(id).map(Self::get)
    }

    /// Get total number of achievements
    pub fn total_count() -> usize {
        ACHIEVEMENTS.len()
    }

    /// Get total possible XP from all achievements
    pub fn total_xp() -> u32 {
        ACHIEVEMENTS.iter().map(|a| a.xp_reward).sum()
    }
}

/// Mutable unlock state for one achievement.
///
/// Seeded locked/zero-progress at first run; mutated only by the engine's
/// `unlock`/`update_progress` transitions; never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementState {
    pub progress: u32,
    /// Set exactly once, at the transition to unlocked.
    pub unlocked_at: Option<i64>,
}

impl AchievementState {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// Definition + state pair handed to the UI layer.
#[derive(Debug, Clone)]
pub struct AchievementView {
    pub def: &'static AchievementDef,
    pub state: AchievementState,
}

impl AchievementView {
    /// Hidden achievements stay redacted in listings until unlocked.
    pub fn revealed(&self) -> bool {
        !self.def.hidden || self.state.is_unlocked()
    }

    /// Progress fraction toward the unlock target (0.0 - 1.0).
    pub fn progress_percent(&self) -> f32 {
        if self.state.is_unlocked() {
            return 1.0;
        }
        match self.def.rule {
            UnlockRule::Binary | UnlockRule::Thresholded { target: None } => 0.0,
            UnlockRule::Thresholded { target: Some(t) } => {
                (self.state.progress as f32 / t as f32).min(1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ids_have_definitions() {
        for id in AchievementId::all() {
            let def = AchievementDef::get(*id);
            assert_eq!(def.id, *id);
            assert!(def.xp_reward > 0);
        }
        assert_eq!(AchievementId::all().len(), ACHIEVEMENTS.len());
    }

    #[test]
    fn test_all_ids_unique() {
        let mut ids: Vec<_> = AchievementId::all().iter().map(|id| id.as_str()).collect();
        ids.sort();
        let count = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), count, "All achievement IDs should be unique");
    }

    #[test]
    fn test_str_roundtrip() {
        for id in AchievementId::all() {
            assert_eq!(AchievementId::from_str(id.as_str()), Some(*id));
        }
        assert_eq!(AchievementId::from_str("no_such_thing"), None);
    }

    #[test]
    fn test_thresholded_targets_positive() {
        for def in ACHIEVEMENTS {
            if let UnlockRule::Thresholded { target: Some(t) } = def.rule {
                assert!(t > 0, "{} has a zero target", def.id.as_str());
            }
        }
    }

    #[test]
    fn test_view_redaction() {
        let hidden = AchievementView {
            def: AchievementDef::get(AchievementId::NightOwl),
            state: AchievementState::default(),
        };
        assert!(!hidden.revealed());

        let unlocked = AchievementView {
            def: AchievementDef::get(AchievementId::NightOwl),
            state: AchievementState {
                progress: 0,
                unlocked_at: Some(1),
            },
        };
        assert!(unlocked.revealed());
        assert!((unlocked.progress_percent() - 1.0).abs() < f32::EPSILON);
    }
}
