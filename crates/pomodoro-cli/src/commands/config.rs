use std::error::Error;

use clap::Subcommand;
use pomodoro_core::{ConfigError, CoreError};

use crate::common::Context;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "storage.backend", "log.filter")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole configuration
    Show,
    /// Print the data directory in use
    Path,
}

pub fn run(ctx: &Context, action: ConfigAction) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Get { key } => match ctx.config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(CoreError::from(ConfigError::UnknownKey(key)).into()),
        },
        ConfigAction::Set { key, value } => {
            let mut config = ctx.config.clone();
            config.set(&key, &value).map_err(CoreError::from)?;
            config.save_to(&ctx.dir).map_err(CoreError::from)?;
            println!("ok");
        }
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(&ctx.config)?);
        }
        ConfigAction::Path => println!("{}", ctx.dir.display()),
    }
    Ok(())
}
