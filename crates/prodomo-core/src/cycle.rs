//! Session cycle orchestration.
//!
//! Runs an unbounded sequence of work/break cycles for one user. Each
//! cycle is one work phase followed by a short break, with every Nth
//! break promoted to a long break per the configured cadence. The caller
//! decides between cycles whether to continue.
//!
//! Commands arrive on an async channel, decoupled from any physical
//! input device. A single task owns the timer and selects between the
//! next queued command and the one-second tick, command branch first, so
//! a `stop` always lands before the next countdown decrement.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{sleep, Duration};

use crate::error::StorageError;
use crate::events::Event;
use crate::progression::{ProgressionSnapshot, UserData};
use crate::stats::Statistics;
use crate::storage::Config;
use crate::tasks::{Task, TaskBook};
use crate::timer::{Phase, SessionTimer, TimerStatus};

/// Discrete command delivered during an active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Pause,
    Resume,
    /// End the current phase without completion credit; the cycle moves
    /// on to the next phase.
    Stop,
    /// Stop the timer and leave the cycle entirely.
    Quit,
    ShowTasks,
    ShowHelp,
    /// 1-based index into the active-task snapshot taken at phase start.
    CompleteTask(usize),
}

/// How a full cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Work and break phases have run; ask the user about another round.
    Finished,
    /// The user quit mid-cycle.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseEnd {
    Completed,
    Stopped,
    Quit,
}

/// Drives timers through phases for one user and forwards completed
/// phases to progression and statistics.
pub struct SessionCycle {
    config: Config,
    username: String,
    session_counter: u64,
    users: UserData,
    tasks: TaskBook,
    stats: Statistics,
    events: UnboundedSender<Event>,
}

impl SessionCycle {
    /// The configuration is a snapshot: edits on disk only affect
    /// cycles constructed afterwards.
    pub fn new(
        config: Config,
        username: impl Into<String>,
        users: UserData,
        tasks: TaskBook,
        stats: Statistics,
        events: UnboundedSender<Event>,
    ) -> Self {
        let username = username.into();
        let mut users = users;
        users.get_or_create(&username);
        Self {
            config,
            username,
            session_counter: 0,
            users,
            tasks,
            stats,
            events,
        }
    }

    // ── Queries for the UI layer ─────────────────────────────────────

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn session_counter(&self) -> u64 {
        self.session_counter
    }

    pub fn active_tasks(&self) -> Vec<&Task> {
        self.tasks.active(&self.username)
    }

    pub fn snapshot(&self) -> Option<ProgressionSnapshot> {
        self.users.snapshot(&self.username)
    }

    /// Which break follows the given work session.
    pub fn break_kind(session_counter: u64, sessions_before_long_break: u32) -> Phase {
        if session_counter % u64::from(sessions_before_long_break.max(1)) == 0 {
            Phase::LongBreak
        } else {
            Phase::ShortBreak
        }
    }

    /// Whole-document rewrite of everything the cycle mutates. Called by
    /// the UI layer at cycle boundaries.
    pub fn save_all(&self) -> Result<(), StorageError> {
        self.users.save()?;
        self.tasks.save()?;
        self.stats.save()?;
        Ok(())
    }

    // ── Cycle driving ────────────────────────────────────────────────

    /// Run one work phase and its break. Stopped phases earn no credit;
    /// `Quit` aborts immediately.
    pub async fn run_cycle(
        &mut self,
        commands: &mut UnboundedReceiver<SessionCommand>,
    ) -> CycleOutcome {
        self.session_counter += 1;

        match self.run_phase(Phase::Work, commands).await {
            PhaseEnd::Quit => return CycleOutcome::Quit,
            PhaseEnd::Completed => self.report_completion(Phase::Work),
            PhaseEnd::Stopped => {}
        }

        let break_phase =
            Self::break_kind(self.session_counter, self.config.sessions_before_long_break);
        match self.run_phase(break_phase, commands).await {
            PhaseEnd::Quit => CycleOutcome::Quit,
            PhaseEnd::Completed => {
                self.report_completion(break_phase);
                CycleOutcome::Finished
            }
            PhaseEnd::Stopped => CycleOutcome::Finished,
        }
    }

    async fn run_phase(
        &mut self,
        phase: Phase,
        commands: &mut UnboundedReceiver<SessionCommand>,
    ) -> PhaseEnd {
        let mut timer = SessionTimer::new(phase, self.config.duration_secs(phase));
        // Task indices refer to this snapshot for the whole phase.
        let task_snapshot: Vec<u32> = self.active_tasks().iter().map(|t| t.id).collect();

        log::debug!("phase {phase} started ({}s)", timer.duration_secs());
        self.emit(timer.start());

        while !timer.is_finished() {
            tokio::select! {
                biased;
                cmd = commands.recv() => {
                    let Some(cmd) = cmd else {
                        // Command source is gone; nothing can ever
                        // unpause or stop us again, so leave cleanly.
                        self.emit(timer.stop());
                        return PhaseEnd::Quit;
                    };
                    match cmd {
                        SessionCommand::Pause => self.emit(timer.pause()),
                        SessionCommand::Resume => self.emit(timer.resume()),
                        SessionCommand::Stop => self.emit(timer.stop()),
                        SessionCommand::Quit => {
                            self.emit(timer.stop());
                            return PhaseEnd::Quit;
                        }
                        SessionCommand::ShowTasks => {
                            let tasks: Vec<Task> =
                                self.active_tasks().into_iter().cloned().collect();
                            self.send(Event::TasksView { tasks, at: chrono::Utc::now() });
                        }
                        SessionCommand::ShowHelp => {
                            self.send(Event::HelpView { at: chrono::Utc::now() });
                        }
                        SessionCommand::CompleteTask(index) => {
                            self.complete_indexed_task(&task_snapshot, index);
                        }
                    }
                }
                _ = sleep(Duration::from_secs(1)), if timer.status() == TimerStatus::Running => {
                    match timer.tick() {
                        Some(done) => self.send(done),
                        None => self.send(Event::Tick {
                            phase,
                            remaining_secs: timer.remaining_secs(),
                            progress: timer.progress(),
                        }),
                    }
                }
            }
        }

        match timer.status() {
            TimerStatus::Completed => PhaseEnd::Completed,
            _ => PhaseEnd::Stopped,
        }
    }

    /// Credit a completed phase to the user record and statistics.
    fn report_completion(&mut self, phase: Phase) {
        let duration_min = self.config.duration_min(phase);
        let outcome = self.users.record_session(&self.username, phase, duration_min);
        self.stats.record_session(duration_min);
        log::debug!(
            "recorded {phase} for {}: level {} xp {}",
            self.username,
            outcome.level,
            outcome.experience
        );

        let at = chrono::Utc::now();
        self.send(Event::SessionRecorded {
            kind: phase,
            level: outcome.level,
            experience: outcome.experience,
            streak: outcome.streak,
            at,
        });
        for id in outcome.unlocked {
            self.send(Event::AchievementUnlocked {
                id,
                name: id.name().to_string(),
                at,
            });
        }
        if outcome.levels_gained > 0 {
            self.send(Event::LevelUp {
                level: outcome.level,
                at,
            });
        }
    }

    /// Bounds-checked completion against the phase-start snapshot.
    fn complete_indexed_task(&mut self, snapshot: &[u32], index: usize) {
        let Some(&id) = index.checked_sub(1).and_then(|i| snapshot.get(i)) else {
            return;
        };
        let Some(name) = self
            .tasks
            .tasks(&self.username)
            .iter()
            .find(|t| t.id == id && !t.completed)
            .map(|t| t.name.clone())
        else {
            return;
        };
        if self.tasks.complete(&self.username, id) {
            self.users.record_tasks_completed(&self.username, 1);
            self.stats.record_task_completed();
            self.send(Event::TaskCompleted {
                id,
                name,
                at: chrono::Utc::now(),
            });
        }
    }

    fn emit(&self, event: Option<Event>) {
        if let Some(event) = event {
            self.send(event);
        }
    }

    fn send(&self, event: Event) {
        // The UI may have gone away; the cycle keeps running regardless.
        let _ = self.events.send(event);
    }
}
