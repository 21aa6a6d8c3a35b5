//! Static achievement catalog.
//!
//! Unlocking is a one-way transition recorded on the user record. Each
//! predicate is checked independently on every recorded session, so
//! several achievements can unlock from the same session; an id already
//! present is never re-evaluated.

use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::{AchievementGrant, UserRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstSession,
    TaskMaster,
    FocusExpert,
    EarlyBird,
    NightOwl,
    Consistency,
    ProductivityGuru,
}

impl AchievementId {
    pub fn all() -> [AchievementId; 7] {
        [
            AchievementId::FirstSession,
            AchievementId::TaskMaster,
            AchievementId::FocusExpert,
            AchievementId::EarlyBird,
            AchievementId::NightOwl,
            AchievementId::Consistency,
            AchievementId::ProductivityGuru,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            AchievementId::FirstSession => "First Step",
            AchievementId::TaskMaster => "Task Master",
            AchievementId::FocusExpert => "Focus Expert",
            AchievementId::EarlyBird => "Early Bird",
            AchievementId::NightOwl => "Night Owl",
            AchievementId::Consistency => "Consistency",
            AchievementId::ProductivityGuru => "Productivity Guru",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AchievementId::FirstSession => "Complete your first focus session",
            AchievementId::TaskMaster => "Complete 10 tasks",
            AchievementId::FocusExpert => "Complete 25 focus sessions",
            AchievementId::EarlyBird => "Start a session before 8 AM",
            AchievementId::NightOwl => "Complete a session after 10 PM",
            AchievementId::Consistency => "Complete sessions for 7 days in a row",
            AchievementId::ProductivityGuru => "Reach level 20",
        }
    }
}

/// Predicates see the record after the session's counters are updated
/// but before the level-up loop runs.
fn satisfied(id: AchievementId, record: &UserRecord, local_hour: u32) -> bool {
    match id {
        AchievementId::FirstSession => record.total_sessions == 1,
        AchievementId::TaskMaster => record.tasks_completed >= 10,
        AchievementId::FocusExpert => record.total_sessions >= 25,
        AchievementId::EarlyBird => local_hour < 8,
        AchievementId::NightOwl => local_hour >= 22,
        AchievementId::Consistency => record.streak >= 7,
        AchievementId::ProductivityGuru => record.level >= 20,
    }
}

/// Unlock every newly satisfied achievement, stamping it with `now`.
/// Returns the ids unlocked by this evaluation.
pub(super) fn evaluate(record: &mut UserRecord, now: DateTime<Local>) -> Vec<AchievementId> {
    let hour = now.hour();
    let mut unlocked = Vec::new();
    for id in AchievementId::all() {
        if record.achievements.contains_key(&id) {
            continue;
        }
        if satisfied(id, record, hour) {
            record.achievements.insert(
                id,
                AchievementGrant {
                    unlocked_at: now.with_timezone(&Utc),
                },
            );
            unlocked.push(id);
        }
    }
    unlocked
}
