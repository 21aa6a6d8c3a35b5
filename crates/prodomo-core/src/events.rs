use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progression::AchievementId;
use crate::tasks::Task;
use crate::timer::Phase;

/// Every observable state change produces an Event.
///
/// The core never prints; the UI layer consumes the event stream and
/// renders it however it likes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Phase ended early; no completion credit is given.
    TimerStopped {
        phase: Phase,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// One-second display cadence while a phase runs.
    Tick {
        phase: Phase,
        remaining_secs: u64,
        progress: f64,
    },
    /// A completed phase was credited to the user record.
    SessionRecorded {
        kind: Phase,
        level: u32,
        experience: u64,
        streak: u32,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u32,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        id: AchievementId,
        name: String,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        id: u32,
        name: String,
        at: DateTime<Utc>,
    },
    /// Display-only: the user asked to see the active task list.
    TasksView {
        tasks: Vec<Task>,
        at: DateTime<Utc>,
    },
    /// Display-only: the user asked for the in-session key help.
    HelpView {
        at: DateTime<Utc>,
    },
}
