//! Per-user task lists with completion state.
//!
//! Tasks are kept in insertion order and identified by a 1-based integer
//! id assigned as `current count + 1`. Ids are never reassigned after a
//! deletion, so gaps can appear and a task added after a delete can
//! collide with a previously used ordinal. This mirrors the historical
//! on-disk data and is kept for id stability of existing documents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::{self, data_dir};

const TASKS_FILE: &str = "tasks.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub name: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Whole-document store mapping username to its ordered task list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskBook {
    users: BTreeMap<String, Vec<Task>>,
}

impl TaskBook {
    fn path() -> Result<PathBuf, StorageError> {
        Ok(data_dir()?.join(TASKS_FILE))
    }

    /// Load from the data directory, falling back to an empty book when
    /// the file is missing or unreadable.
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

    pub fn tasks(&self, username: &str) -> &[Task] {
        self.users.get(username).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add a task for a user. The id is the current list length + 1.
    pub fn add(&mut self, username: &str, name: &str) -> Task {
        let list = self.users.entry(username.to_string()).or_default();
        let task = Task {
            id: list.len() as u32 + 1,
            name: name.to_string(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        list.push(task.clone());
        task
    }

    /// Mark the first task with the given id as completed.
    /// Returns false when no such task exists.
    pub fn complete(&mut self, username: &str, id: u32) -> bool {
        if let Some(list) = self.users.get_mut(username) {
            for task in list.iter_mut() {
                if task.id == id {
                    task.completed = true;
                    task.completed_at = Some(Utc::now());
                    return true;
                }
            }
        }
        false
    }

    /// Remove the task with the given id. Succeeds even when the id is
    /// absent, matching the lenient delete of the menu flow.
    pub fn delete(&mut self, username: &str, id: u32) -> bool {
        if let Some(list) = self.users.get_mut(username) {
            list.retain(|t| t.id != id);
        }
        true
    }

    /// Incomplete tasks in insertion order.
    pub fn active(&self, username: &str) -> Vec<&Task> {
        self.tasks(username).iter().filter(|t| !t.completed).collect()
    }

    /// Completed tasks in insertion order.
    pub fn completed(&self, username: &str) -> Vec<&Task> {
        self.tasks(username).iter().filter(|t| t.completed).collect()
    }
}
