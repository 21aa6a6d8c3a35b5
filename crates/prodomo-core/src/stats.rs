//! Derived session statistics.
//!
//! Independent bookkeeping for display: totals plus daily and weekly
//! buckets and a productivity score. The progression engine never reads
//! this document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::{self, data_dir};

const STATS_FILE: &str = "stats.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodStats {
    pub sessions: u64,
    /// Minutes.
    pub time: u64,
    pub tasks_completed: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_sessions: u64,
    /// Minutes across all phases.
    pub total_time: u64,
    pub tasks_completed: u64,
    /// Keyed by `YYYY-MM-DD`.
    pub daily_stats: BTreeMap<String, PeriodStats>,
    /// Keyed by `YYYY-Www` (Monday-based week number).
    pub weekly_stats: BTreeMap<String, PeriodStats>,
    pub productivity_score: u32,
}

impl Statistics {
    fn path() -> Result<PathBuf, StorageError> {
        Ok(data_dir()?.join(STATS_FILE))
    }

    pub fn load() -> Result<Self, StorageError> {
        Ok(Self::load_from(&Self::path()?))
    }

    pub fn load_from(path: &Path) -> Self {
        storage::read_document(path)
    }

    pub fn save(&self) -> Result<(), StorageError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StorageError> {
        storage::write_document(path, self)
    }

    // ── Operations ───────────────────────────────────────────────────

    pub fn record_session(&mut self, duration_min: u32) {
        self.record_session_at(duration_min, Local::now());
    }

    pub fn record_session_at(&mut self, duration_min: u32, now: DateTime<Local>) {
        let minutes = u64::from(duration_min);
        self.total_sessions += 1;
        self.total_time += minutes;

        let daily = self.daily_stats.entry(day_key(now)).or_default();
        daily.sessions += 1;
        daily.time += minutes;

        let weekly = self.weekly_stats.entry(week_key(now)).or_default();
        weekly.sessions += 1;
        weekly.time += minutes;

        self.recompute_score();
    }

    pub fn record_task_completed(&mut self) {
        self.record_task_completed_at(Local::now());
    }

    pub fn record_task_completed_at(&mut self, now: DateTime<Local>) {
        self.tasks_completed += 1;
        self.daily_stats.entry(day_key(now)).or_default().tasks_completed += 1;
        self.weekly_stats.entry(week_key(now)).or_default().tasks_completed += 1;
        self.recompute_score();
    }

    /// `round((task_completion_rate + time_efficiency) / 2)` where the
    /// completion rate is tasks per session and efficiency compares the
    /// accumulated time against a 25-minute nominal session.
    fn recompute_score(&mut self) {
        if self.total_sessions == 0 {
            self.productivity_score = 0;
            return;
        }
        let sessions = self.total_sessions as f64;
        let task_completion_rate = self.tasks_completed as f64 / sessions * 100.0;
        let time_efficiency = (self.total_time as f64 / (sessions * 25.0) * 100.0).min(100.0);
        self.productivity_score = ((task_completion_rate + time_efficiency) / 2.0).round() as u32;
    }
}

fn day_key(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d").to_string()
}

fn week_key(now: DateTime<Local>) -> String {
    now.format("%Y-W%W").to_string()
}
