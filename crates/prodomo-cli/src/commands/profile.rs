use clap::Subcommand;
use prodomo_core::progression::UserData;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show level, experience, streak and achievements
    Show {
        #[arg(long)]
        user: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProfileAction::Show { user, json } => {
            let data = UserData::load()?;
            let Some(snap) = data.snapshot(&user) else {
                println!("No profile for '{user}' yet. Run a session first.");
                return Ok(());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&snap)?);
                return Ok(());
            }
            println!("{}", snap.username);
            println!("Level:      {}", snap.level);
            println!(
                "Experience: {} ({} XP to next level)",
                snap.experience, snap.xp_to_next_level
            );
            println!("Streak:     {} days", snap.streak);
            println!(
                "Sessions:   {} ({} work min, {} break min)",
                snap.total_sessions, snap.total_work_time, snap.total_break_time
            );
            println!("Tasks done: {}", snap.tasks_completed);
            if !snap.achievements.is_empty() {
                println!("Achievements:");
                for (id, grant) in &snap.achievements {
                    println!(
                        "  {} - {} (unlocked {})",
                        id.name(),
                        id.description(),
                        grant.unlocked_at.format("%Y-%m-%d")
                    );
                }
            }
        }
    }
    Ok(())
}
