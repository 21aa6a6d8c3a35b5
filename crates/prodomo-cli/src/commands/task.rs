use clap::Subcommand;
use prodomo_core::tasks::TaskBook;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        name: String,
        #[arg(long)]
        user: String,
    },
    /// List tasks
    List {
        #[arg(long)]
        user: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Only incomplete tasks
        #[arg(long)]
        active: bool,
    },
    /// Mark a task as completed
    Done {
        id: u32,
        #[arg(long)]
        user: String,
    },
    /// Delete a task
    Delete {
        id: u32,
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut book = TaskBook::load()?;
    match action {
        TaskAction::Add { name, user } => {
            let task = book.add(&user, &name);
            println!("Added task {}: {}", task.id, task.name);
            book.save()?;
        }
        TaskAction::List { user, json, active } => {
            let tasks = if active {
                book.active(&user)
            } else {
                book.tasks(&user).iter().collect()
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks. Add some to get started.");
            } else {
                for task in tasks {
                    let mark = if task.completed { "x" } else { " " };
                    println!("[{mark}] {}. {}", task.id, task.name);
                }
            }
        }
        TaskAction::Done { id, user } => {
            if book.complete(&user, id) {
                println!("Task {id} marked as completed");
                book.save()?;
            } else {
                println!("Task {id} not found");
            }
        }
        TaskAction::Delete { id, user } => {
            book.delete(&user, id);
            println!("Task {id} deleted");
            book.save()?;
        }
    }
    Ok(())
}
