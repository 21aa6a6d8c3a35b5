use clap::Subcommand;
use prodomo_core::stats::Statistics;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Overall statistics
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-day statistics
    Daily,
    /// Per-week statistics
    Weekly,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let stats = Statistics::load()?;
    match action {
        StatsAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Total sessions:  {}", stats.total_sessions);
                println!("Total time:      {} minutes", stats.total_time);
                println!("Tasks completed: {}", stats.tasks_completed);
                println!("Productivity:    {}%", stats.productivity_score);
            }
        }
        StatsAction::Daily => {
            for (date, day) in stats.daily_stats.iter().rev() {
                println!(
                    "{date}: {} sessions, {} minutes, {} tasks",
                    day.sessions, day.time, day.tasks_completed
                );
            }
        }
        StatsAction::Weekly => {
            for (week, entry) in stats.weekly_stats.iter().rev() {
                println!(
                    "{week}: {} sessions, {} minutes, {} tasks",
                    entry.sessions, entry.time, entry.tasks_completed
                );
            }
        }
    }
    Ok(())
}
