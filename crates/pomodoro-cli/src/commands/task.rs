//! Task management commands for CLI.

use std::error::Error;

use clap::Subcommand;
use pomodoro_core::{CoreError, Outcome, TaskInput};

use crate::common::{print_outcome, Context, Engine};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task; it becomes current if no task is
    Add {
        /// Task name
        name: String,
        /// Estimated pomodoros
        #[arg(long, default_value = "1")]
        estimate: String,
    },
    /// List tasks, newest first
    List,
    /// Make a task current
    Select {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub fn run(ctx: &Context, action: TaskAction) -> Result<(), Box<dyn Error>> {
    match action {
        TaskAction::Add { name, estimate } => mutate(ctx, |engine| {
            engine
                .add_task(&TaskInput { name, estimate })
                .map_err(CoreError::from)
        }),
        TaskAction::List => {
            let engine = ctx.reader()?;
            println!("{}", serde_json::to_string_pretty(&engine.snapshot().tasks)?);
            Ok(())
        }
        TaskAction::Select { id } => mutate(ctx, |engine| Ok(engine.select_task(&id))),
        TaskAction::Delete { id } => mutate(ctx, |engine| Ok(engine.delete_task(&id))),
    }
}

fn mutate(
    ctx: &Context,
    command: impl FnOnce(&mut Engine) -> Result<Outcome, CoreError>,
) -> Result<(), Box<dyn Error>> {
    let mut engine = ctx.engine()?;
    let outcome = command(&mut engine)?;
    print_outcome(&engine, &outcome)
}
