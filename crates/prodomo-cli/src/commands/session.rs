//! Interactive session loop.
//!
//! The command source is line-based stdin: `p` pause, `r` resume, `s`
//! stop the phase, `q` quit, `t` show tasks, `h` help, `1`..`9` complete
//! the Nth active task. Lines that parse as commands go to the cycle;
//! everything else is kept for the continue prompt between cycles.

use std::io::{BufRead, Write};

use clap::Subcommand;
use prodomo_core::cycle::{CycleOutcome, SessionCommand, SessionCycle};
use prodomo_core::events::Event;
use prodomo_core::progression::UserData;
use prodomo_core::stats::Statistics;
use prodomo_core::storage::Config;
use prodomo_core::tasks::{Task, TaskBook};
use tokio::sync::mpsc;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run work/break cycles until you stop
    Run {
        /// Username to track progress for
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run { user } => run_session(user),
    }
}

fn parse_command(line: &str) -> Option<SessionCommand> {
    match line {
        "p" => Some(SessionCommand::Pause),
        "r" => Some(SessionCommand::Resume),
        "s" => Some(SessionCommand::Stop),
        "q" => Some(SessionCommand::Quit),
        "t" => Some(SessionCommand::ShowTasks),
        "h" => Some(SessionCommand::ShowHelp),
        _ => line
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=9).contains(n))
            .map(SessionCommand::CompleteTask),
    }
}

fn run_session(user: String) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let users = UserData::load()?;
    let tasks = TaskBook::load()?;
    let stats = Statistics::load()?;
    log::debug!("documents loaded, starting session loop for {user}");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();

        // Single stdin consumer: session commands go to the cycle,
        // anything else feeds the continue prompt.
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let trimmed = line.trim().to_lowercase();
                match parse_command(&trimmed) {
                    Some(cmd) => {
                        if cmd_tx.send(cmd).is_err() {
                            break;
                        }
                    }
                    None => {
                        if line_tx.send(trimmed).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let renderer = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                render(&event);
            }
        });

        let mut cycle = SessionCycle::new(config, user, users, tasks, stats, event_tx);
        print_help();

        loop {
            let outcome = cycle.run_cycle(&mut cmd_rx).await;
            cycle.save_all()?;
            if outcome == CycleOutcome::Quit {
                break;
            }
            if !ask_to_continue(&mut line_rx, &mut cmd_rx).await {
                break;
            }
        }

        if let Some(snap) = cycle.snapshot() {
            println!();
            println!("Session over. Level {} with {} XP.", snap.level, snap.experience);
            println!(
                "Totals: {} sessions, {} work minutes, {} day streak.",
                snap.total_sessions, snap.total_work_time, snap.streak
            );
        }
        drop(cycle);
        let _ = renderer.await;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

async fn ask_to_continue(
    lines: &mut mpsc::UnboundedReceiver<String>,
    commands: &mut mpsc::UnboundedReceiver<SessionCommand>,
) -> bool {
    // Drop anything typed mid-phase that wasn't consumed.
    while lines.try_recv().is_ok() {}
    while commands.try_recv().is_ok() {}
    print!("\nContinue with another session? (y/n): ");
    let _ = std::io::stdout().flush();
    loop {
        tokio::select! {
            line = lines.recv() => return matches!(line.as_deref(), Some("y")),
            cmd = commands.recv() => match cmd {
                // `q` still quits at the prompt; other keys are noise.
                Some(SessionCommand::Quit) | None => return false,
                _ => continue,
            },
        }
    }
}

fn print_help() {
    println!("Session commands:");
    println!("  p pause   r resume   s stop phase   q quit");
    println!("  t show tasks   h help   1-9 complete the Nth active task");
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("\nNo active tasks.");
        return;
    }
    println!("\nActive tasks:");
    for (index, task) in tasks.iter().enumerate() {
        println!("  {}. {} (id {})", index + 1, task.name, task.id);
    }
}

fn render(event: &Event) {
    match event {
        Event::TimerStarted { phase, duration_secs, .. } => {
            println!(
                "\n{} session started ({:02}:{:02})",
                phase,
                duration_secs / 60,
                duration_secs % 60
            );
        }
        Event::Tick { remaining_secs, progress, .. } => {
            let filled = (30.0 * progress) as usize;
            print!(
                "\r[{}{}] {:02}:{:02} ",
                "#".repeat(filled),
                "-".repeat(30 - filled),
                remaining_secs / 60,
                remaining_secs % 60
            );
            let _ = std::io::stdout().flush();
        }
        Event::TimerPaused { .. } => println!("\nTimer paused"),
        Event::TimerResumed { .. } => println!("\nTimer resumed"),
        Event::TimerStopped { phase, .. } => println!("\n{phase} stopped"),
        Event::TimerCompleted { phase, .. } => {
            if phase.is_break() {
                println!("\nBreak over. Ready to focus again.");
            } else {
                println!("\nFocus session completed. Time to rest.");
            }
        }
        Event::SessionRecorded { level, experience, streak, .. } => {
            println!("Level {level} | {experience} XP | {streak} day streak");
        }
        Event::LevelUp { level, .. } => println!("Level up! You reached level {level}."),
        Event::AchievementUnlocked { name, .. } => {
            println!("Achievement unlocked: {name}");
        }
        Event::TaskCompleted { name, .. } => println!("\nTask completed: {name}"),
        Event::TasksView { tasks, .. } => print_tasks(tasks),
        Event::HelpView { .. } => print_help(),
    }
}
