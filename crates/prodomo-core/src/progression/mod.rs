//! Per-user progression: experience, levels, streaks, achievements.
//!
//! The level threshold is `level * 100` experience. The level-up loop
//! increments the level first and then subtracts the pre-increment
//! level's threshold, and repeats while the new threshold is still met -
//! one large gain can advance several levels. This ordering is load-
//! bearing for the progression curve of existing user documents; do not
//! "simplify" the subtraction.
//!
//! The streak counts consecutive calendar days with at least one
//! recorded session and is re-evaluated only on the first session of
//! each new day.

mod achievements;

pub use achievements::AchievementId;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::{self, data_dir};
use crate::timer::Phase;

const USER_DATA_FILE: &str = "user_data.json";

const WORK_XP: u64 = 25;
const BREAK_XP: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementGrant {
    pub unlocked_at: DateTime<Utc>,
}

/// Persistent per-user record.
///
/// Older documents may predate some fields; they default in on load the
/// same way the record is backfilled on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub total_sessions: u64,
    /// Minutes of completed work phases.
    #[serde(default)]
    pub total_work_time: u64,
    /// Minutes of completed break phases.
    #[serde(default)]
    pub total_break_time: u64,
    #[serde(default = "default_level")]
    pub level: u32,
    pub experience: u64,
    #[serde(default)]
    pub last_session_date: Option<NaiveDate>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub tasks_completed: u64,
    /// Narrative pacing counter, bumped once per level gained. Never
    /// read by core logic.
    #[serde(default)]
    pub story_progress: u32,
    #[serde(default)]
    pub achievements: BTreeMap<AchievementId, AchievementGrant>,
}

fn default_level() -> u32 {
    1
}

impl UserRecord {
    fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            total_sessions: 0,
            total_work_time: 0,
            total_break_time: 0,
            level: 1,
            experience: 0,
            last_session_date: None,
            streak: 0,
            tasks_completed: 0,
            story_progress: 0,
            achievements: BTreeMap::new(),
        }
    }

    /// Experience still needed to reach the next level.
    pub fn xp_to_next_level(&self) -> u64 {
        (u64::from(self.level) * 100).saturating_sub(self.experience)
    }
}

/// What one `record_session` call did, for event emission.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub kind: Phase,
    pub levels_gained: u32,
    pub unlocked: Vec<AchievementId>,
    pub level: u32,
    pub experience: u64,
    pub streak: u32,
}

/// Read-only view for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionSnapshot {
    pub username: String,
    pub level: u32,
    pub experience: u64,
    pub xp_to_next_level: u64,
    pub streak: u32,
    pub total_sessions: u64,
    pub total_work_time: u64,
    pub total_break_time: u64,
    pub tasks_completed: u64,
    pub achievements: BTreeMap<AchievementId, AchievementGrant>,
}

/// Whole-document store mapping username to its record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserData {
    users: BTreeMap<String, UserRecord>,
}

impl UserData {
    fn path() -> Result<PathBuf, StorageError> {
        Ok(data_dir()?.join(USER_DATA_FILE))
    }

    /// Load from the data directory, falling back to an empty document
    /// when the file is missing or unreadable.
    pub fn load() -> Result<Self, StorageError> {
        Ok(Self::load_from(&Self::path()?))
    }

    pub fn load_from(path: &Path) -> Self {
        storage::read_document(path)
    }

    /// Whole-document rewrite.
    pub fn save(&self) -> Result<(), StorageError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StorageError> {
        storage::write_document(path, self)
    }

    // ── Operations ───────────────────────────────────────────────────

    pub fn user(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    /// Fetch a user's record, creating a fresh one on first use.
    pub fn get_or_create(&mut self, username: &str) -> &UserRecord {
        self.users
            .entry(username.to_string())
            .or_insert_with(|| UserRecord::new(Utc::now()))
    }

    /// Record a completed phase for a user at the current local time.
    pub fn record_session(
        &mut self,
        username: &str,
        kind: Phase,
        duration_min: u32,
    ) -> SessionOutcome {
        self.record_session_at(username, kind, duration_min, Local::now())
    }

    /// Clock-injectable variant of [`record_session`](Self::record_session).
    pub fn record_session_at(
        &mut self,
        username: &str,
        kind: Phase,
        duration_min: u32,
        now: DateTime<Local>,
    ) -> SessionOutcome {
        let user = self
            .users
            .entry(username.to_string())
            .or_insert_with(|| UserRecord::new(now.with_timezone(&Utc)));

        user.total_sessions += 1;

        // Streak logic runs at most once per day boundary crossing.
        let today = now.date_naive();
        if user.last_session_date != Some(today) {
            match user.last_session_date {
                Some(last) if (today - last).num_days() == 1 => user.streak += 1,
                _ => user.streak = 1,
            }
            user.last_session_date = Some(today);
        }

        if kind == Phase::Work {
            user.total_work_time += u64::from(duration_min);
            user.experience += WORK_XP;
        } else {
            user.total_break_time += u64::from(duration_min);
            user.experience += BREAK_XP;
        }

        // Achievements see the pre-level-up record.
        let unlocked = achievements::evaluate(user, now);

        let mut levels_gained = 0;
        while user.experience >= u64::from(user.level) * 100 {
            user.level += 1;
            user.experience -= (u64::from(user.level) - 1) * 100;
            user.story_progress += 1;
            levels_gained += 1;
        }

        SessionOutcome {
            kind,
            levels_gained,
            unlocked,
            level: user.level,
            experience: user.experience,
            streak: user.streak,
        }
    }

    /// Bump the completed-task counter. Awards no experience; the
    /// task-related achievement is picked up by the next recorded
    /// session.
    pub fn record_tasks_completed(&mut self, username: &str, count: u64) {
        let user = self
            .users
            .entry(username.to_string())
            .or_insert_with(|| UserRecord::new(Utc::now()));
        user.tasks_completed += count;
    }

    pub fn snapshot(&self, username: &str) -> Option<ProgressionSnapshot> {
        self.users.get(username).map(|user| ProgressionSnapshot {
            username: username.to_string(),
            level: user.level,
            experience: user.experience,
            xp_to_next_level: user.xp_to_next_level(),
            streak: user.streak,
            total_sessions: user.total_sessions,
            total_work_time: user.total_work_time,
            total_break_time: user.total_break_time,
            tasks_completed: user.tasks_completed,
            achievements: user.achievements.clone(),
        })
    }
}
