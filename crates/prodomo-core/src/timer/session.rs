//! Countdown state machine for a single phase.
//!
//! The timer has no internal thread - the caller is responsible for
//! calling `tick()` once per elapsed second. One instance covers exactly
//! one phase; `Completed` and `Stopped` are terminal and the driver
//! constructs a fresh timer for the next phase.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!         Running -> Completed   (remaining reaches 0)
//!         Running | Paused -> Stopped
//! ```
//!
//! Commands issued in a state where they do not apply are no-ops and
//! return `None` instead of an error.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::Phase;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Stopped,
    Completed,
}

/// Countdown timer for one phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimer {
    phase: Phase,
    /// Total duration fixed at construction, even if configuration
    /// changes mid-phase.
    duration_secs: u64,
    remaining_secs: u64,
    status: TimerStatus,
}

impl SessionTimer {
    pub fn new(phase: Phase, duration_secs: u64) -> Self {
        Self {
            phase,
            duration_secs,
            remaining_secs: duration_secs,
            status: TimerStatus::Idle,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// 0.0 .. 1.0 progress within the phase.
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.duration_secs as f64)
    }

    /// Terminal states accept no further commands or ticks.
    pub fn is_finished(&self) -> bool {
        matches!(self.status, TimerStatus::Stopped | TimerStatus::Completed)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.status {
            TimerStatus::Idle => {
                self.status = TimerStatus::Running;
                Some(Event::TimerStarted {
                    phase: self.phase,
                    duration_secs: self.duration_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.status {
            TimerStatus::Running => {
                self.status = TimerStatus::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.status {
            TimerStatus::Paused => {
                self.status = TimerStatus::Running;
                Some(Event::TimerResumed {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Discards remaining time. No completion event is ever emitted for
    /// a stopped phase.
    pub fn stop(&mut self) -> Option<Event> {
        match self.status {
            TimerStatus::Running | TimerStatus::Paused => {
                self.status = TimerStatus::Stopped;
                Some(Event::TimerStopped {
                    phase: self.phase,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Consume one second of wall-clock time. Returns the completion
    /// event when the countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.status = TimerStatus::Completed;
            return Some(Event::TimerCompleted {
                phase: self.phase,
                at: Utc::now(),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pause_resume() {
        let mut timer = SessionTimer::new(Phase::Work, 60);
        assert_eq!(timer.status(), TimerStatus::Idle);

        assert!(timer.start().is_some());
        assert_eq!(timer.status(), TimerStatus::Running);

        assert!(timer.pause().is_some());
        assert_eq!(timer.status(), TimerStatus::Paused);

        assert!(timer.resume().is_some());
        assert_eq!(timer.status(), TimerStatus::Running);
    }

    #[test]
    fn pause_freezes_remaining() {
        let mut timer = SessionTimer::new(Phase::Work, 60);
        timer.start();
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 58);

        timer.pause();
        for _ in 0..10 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.remaining_secs(), 58);

        timer.resume();
        timer.tick();
        assert_eq!(timer.remaining_secs(), 57);
    }

    #[test]
    fn countdown_completes_at_zero() {
        let mut timer = SessionTimer::new(Phase::ShortBreak, 3);
        timer.start();
        assert!(timer.tick().is_none());
        assert!(timer.tick().is_none());
        let done = timer.tick();
        assert!(matches!(done, Some(Event::TimerCompleted { phase: Phase::ShortBreak, .. })));
        assert_eq!(timer.status(), TimerStatus::Completed);

        // Terminal: further ticks are inert.
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn stop_suppresses_completion() {
        let mut timer = SessionTimer::new(Phase::Work, 5);
        timer.start();
        timer.tick();
        assert!(timer.stop().is_some());
        assert_eq!(timer.status(), TimerStatus::Stopped);
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_secs(), 4);
    }

    #[test]
    fn stop_from_paused() {
        let mut timer = SessionTimer::new(Phase::Work, 5);
        timer.start();
        timer.pause();
        assert!(timer.stop().is_some());
        assert_eq!(timer.status(), TimerStatus::Stopped);
    }

    #[test]
    fn invalid_transitions_are_noops() {
        let mut timer = SessionTimer::new(Phase::Work, 5);
        assert!(timer.pause().is_none());
        assert!(timer.resume().is_none());
        assert!(timer.stop().is_none());

        timer.start();
        assert!(timer.start().is_none());
        assert!(timer.resume().is_none());

        timer.stop();
        assert!(timer.pause().is_none());
        assert!(timer.resume().is_none());
        assert!(timer.stop().is_none());
    }

    #[test]
    fn progress_fraction() {
        let mut timer = SessionTimer::new(Phase::Work, 10);
        assert_eq!(timer.progress(), 0.0);
        timer.start();
        for _ in 0..5 {
            timer.tick();
        }
        assert!((timer.progress() - 0.5).abs() < f64::EPSILON);
    }
}
