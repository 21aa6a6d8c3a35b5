//! Integration tests for the session cycle controller.
//!
//! These run under a paused tokio clock, so the one-second tick cadence
//! elapses instantly and whole phases complete in microseconds.

use prodomo_core::cycle::{CycleOutcome, SessionCommand, SessionCycle};
use prodomo_core::events::Event;
use prodomo_core::progression::UserData;
use prodomo_core::stats::Statistics;
use prodomo_core::storage::Config;
use prodomo_core::tasks::TaskBook;
use prodomo_core::timer::Phase;
use tokio::sync::mpsc;

fn minute_config() -> Config {
    let mut cfg = Config::default();
    cfg.work_duration = 1;
    cfg.short_break_duration = 1;
    cfg.long_break_duration = 1;
    cfg.sessions_before_long_break = 4;
    cfg
}

struct Harness {
    cycle: SessionCycle,
    commands: mpsc::UnboundedSender<SessionCommand>,
    command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    events: mpsc::UnboundedReceiver<Event>,
}

fn harness(tasks: TaskBook) -> Harness {
    let (event_tx, events) = mpsc::unbounded_channel();
    let (commands, command_rx) = mpsc::unbounded_channel();
    let cycle = SessionCycle::new(
        minute_config(),
        "alice",
        UserData::default(),
        tasks,
        Statistics::default(),
        event_tx,
    );
    Harness {
        cycle,
        commands,
        command_rx,
        events,
    }
}

fn drain(events: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = events.try_recv() {
        out.push(ev);
    }
    out
}

#[tokio::test(start_paused = true)]
async fn full_cycle_credits_work_and_break() {
    let mut h = harness(TaskBook::default());
    let outcome = h.cycle.run_cycle(&mut h.command_rx).await;
    assert_eq!(outcome, CycleOutcome::Finished);

    let snap = h.cycle.snapshot().unwrap();
    assert_eq!(snap.total_sessions, 2);
    assert_eq!(snap.total_work_time, 1);
    assert_eq!(snap.total_break_time, 1);
    assert_eq!(snap.experience, 30);

    let events = drain(&mut h.events);
    let completed: Vec<Phase> = events
        .iter()
        .filter_map(|e| match e {
            Event::TimerCompleted { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![Phase::Work, Phase::ShortBreak]);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::SessionRecorded { kind: Phase::Work, .. })));
}

#[tokio::test(start_paused = true)]
async fn quit_aborts_without_credit() {
    let mut h = harness(TaskBook::default());
    h.commands.send(SessionCommand::Quit).unwrap();
    let outcome = h.cycle.run_cycle(&mut h.command_rx).await;
    assert_eq!(outcome, CycleOutcome::Quit);

    let snap = h.cycle.snapshot().unwrap();
    assert_eq!(snap.total_sessions, 0);
    assert_eq!(snap.experience, 0);
}

#[tokio::test(start_paused = true)]
async fn stopped_work_phase_earns_nothing_but_break_still_runs() {
    let mut h = harness(TaskBook::default());
    h.commands.send(SessionCommand::Stop).unwrap();
    let outcome = h.cycle.run_cycle(&mut h.command_rx).await;
    assert_eq!(outcome, CycleOutcome::Finished);

    let snap = h.cycle.snapshot().unwrap();
    // Only the break was credited.
    assert_eq!(snap.total_sessions, 1);
    assert_eq!(snap.total_work_time, 0);
    assert_eq!(snap.total_break_time, 1);
    assert_eq!(snap.experience, 5);
}

#[tokio::test(start_paused = true)]
async fn queued_quit_carries_into_break_phase() {
    let mut h = harness(TaskBook::default());
    h.commands.send(SessionCommand::Stop).unwrap();
    h.commands.send(SessionCommand::Quit).unwrap();
    let outcome = h.cycle.run_cycle(&mut h.command_rx).await;
    assert_eq!(outcome, CycleOutcome::Quit);
    assert_eq!(h.cycle.snapshot().unwrap().total_sessions, 0);
}

#[tokio::test(start_paused = true)]
async fn pause_resume_round_trip_still_completes() {
    let mut h = harness(TaskBook::default());
    h.commands.send(SessionCommand::Pause).unwrap();
    h.commands.send(SessionCommand::Resume).unwrap();
    let outcome = h.cycle.run_cycle(&mut h.command_rx).await;
    assert_eq!(outcome, CycleOutcome::Finished);
    assert_eq!(h.cycle.snapshot().unwrap().total_sessions, 2);

    let events = drain(&mut h.events);
    assert!(events.iter().any(|e| matches!(e, Event::TimerPaused { .. })));
    assert!(events.iter().any(|e| matches!(e, Event::TimerResumed { .. })));
}

#[tokio::test(start_paused = true)]
async fn complete_task_by_snapshot_index() {
    let mut tasks = TaskBook::default();
    tasks.add("alice", "Write report");
    tasks.add("alice", "Read book");

    let mut h = harness(tasks);
    h.commands.send(SessionCommand::CompleteTask(2)).unwrap();
    // Out of bounds: silently ignored.
    h.commands.send(SessionCommand::CompleteTask(9)).unwrap();
    h.cycle.run_cycle(&mut h.command_rx).await;

    let snap = h.cycle.snapshot().unwrap();
    assert_eq!(snap.tasks_completed, 1);
    assert_eq!(h.cycle.active_tasks().len(), 1);
    assert_eq!(h.cycle.active_tasks()[0].name, "Write report");

    let events = drain(&mut h.events);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TaskCompleted { id: 2, .. })));
}

#[tokio::test(start_paused = true)]
async fn fourth_cycle_takes_a_long_break() {
    let mut h = harness(TaskBook::default());
    let mut break_phases = Vec::new();
    for _ in 0..4 {
        let outcome = h.cycle.run_cycle(&mut h.command_rx).await;
        assert_eq!(outcome, CycleOutcome::Finished);
        for ev in drain(&mut h.events) {
            if let Event::TimerStarted { phase, .. } = ev {
                if phase.is_break() {
                    break_phases.push(phase);
                }
            }
        }
    }
    assert_eq!(
        break_phases,
        vec![
            Phase::ShortBreak,
            Phase::ShortBreak,
            Phase::ShortBreak,
            Phase::LongBreak
        ]
    );
    assert_eq!(h.cycle.session_counter(), 4);
}

#[tokio::test(start_paused = true)]
async fn dropped_command_source_ends_the_cycle() {
    let mut h = harness(TaskBook::default());
    drop(h.commands);
    let outcome = h.cycle.run_cycle(&mut h.command_rx).await;
    assert_eq!(outcome, CycleOutcome::Quit);
}
