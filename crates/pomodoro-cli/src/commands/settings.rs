use std::error::Error;

use clap::Subcommand;
use pomodoro_core::SettingsInput;

use crate::common::{print_outcome, Context};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Replace settings; omitted fields keep their current value.
    /// Changing settings restarts the current interval at its new length.
    Set {
        /// Work interval in minutes
        #[arg(long)]
        pomodoro: Option<String>,
        /// Short break in minutes
        #[arg(long)]
        short: Option<String>,
        /// Long break in minutes
        #[arg(long)]
        long: Option<String>,
        /// Work intervals between long breaks
        #[arg(long)]
        every: Option<String>,
        /// Start the next interval automatically
        #[arg(long)]
        auto_start: Option<bool>,
    },
}

pub fn run(ctx: &Context, action: SettingsAction) -> Result<(), Box<dyn Error>> {
    match action {
        SettingsAction::Show => {
            let engine = ctx.reader()?;
            println!("{}", serde_json::to_string_pretty(&engine.state().settings)?);
            Ok(())
        }
        SettingsAction::Set {
            pomodoro,
            short,
            long,
            every,
            auto_start,
        } => {
            let mut engine = ctx.engine()?;
            let mut input = SettingsInput::from(&engine.state().settings);
            if let Some(v) = pomodoro {
                input.pomodoro_minutes = v;
            }
            if let Some(v) = short {
                input.short_break_minutes = v;
            }
            if let Some(v) = long {
                input.long_break_minutes = v;
            }
            if let Some(v) = every {
                input.long_break_every = v;
            }
            if let Some(v) = auto_start {
                input.auto_start_next = v;
            }
            let outcome = engine.apply_settings(&input);
            print_outcome(&engine, &outcome)
        }
    }
}
