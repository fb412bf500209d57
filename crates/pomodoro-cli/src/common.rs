//! Shared plumbing for CLI commands: data dir, config, engine, output.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use pomodoro_core::error::Result;
use pomodoro_core::storage::data_dir;
use pomodoro_core::{
    Config, ConfigError, CycleEngine, Outcome, PersistenceError, StateSlot, SystemClock,
};
use serde_json::json;
use tracing::{debug, warn};

/// File in the data dir that marks a foreground `run` as the owner of the
/// state record.
pub const RUN_LOCK: &str = "run.lock";

pub type Engine = CycleEngine<Box<dyn StateSlot>, SystemClock>;

pub struct Context {
    pub dir: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn open(dir: Option<PathBuf>) -> Result<Self> {
        let dir = match dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)
                    .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
                dir
            }
            None => data_dir()?,
        };
        let config = Config::load_from(&dir)?;
        Ok(Self { dir, config })
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(RUN_LOCK)
    }

    /// Load the engine for a command that mutates state.
    ///
    /// Refused while a foreground `run` holds the lock, since its next tick
    /// would overwrite the change.
    pub fn engine(&self) -> Result<Engine> {
        let lock = self.lock_path();
        if lock.exists() {
            return Err(lock_held(&lock).into());
        }
        self.load()
    }

    /// Load the engine for display only.
    pub fn reader(&self) -> Result<Engine> {
        self.load()
    }

    /// Take the run lock, then load the engine it protects.
    pub fn lock_run(&self) -> Result<(RunLock, Engine)> {
        let lock = RunLock::acquire(self.lock_path())?;
        Ok((lock, self.load()?))
    }

    fn load(&self) -> Result<Engine> {
        let slot = self.config.open_slot(&self.dir)?;
        debug!(slot = %slot.describe(), "loading state");
        let engine = CycleEngine::load(slot, SystemClock);
        if engine.store().load_report().rolled_over {
            debug!("new day: daily counters reset");
        }
        Ok(engine)
    }
}

fn lock_held(path: &Path) -> PersistenceError {
    PersistenceError::Unavailable(format!(
        "state is owned by a running `pomodoro run` (remove {} if it is stale)",
        path.display()
    ))
}

/// Exclusive marker for the foreground driver; removed on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    fn acquire(path: PathBuf) -> Result<Self, PersistenceError> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Err(lock_held(&path)),
            Err(e) => {
                return Err(PersistenceError::Unavailable(format!(
                    "{}: {e}",
                    path.display()
                )))
            }
        };
        let lock = Self { path };
        writeln!(file, "{}", std::process::id()).map_err(|e| {
            PersistenceError::Unavailable(format!("{}: {e}", lock.path.display()))
        })?;
        debug!(path = %lock.path.display(), "run lock taken");
        Ok(lock)
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove run lock");
        }
    }
}

/// Print the command's events and the resulting snapshot as one JSON
/// document. Persistence warnings go to stderr.
pub fn print_outcome(engine: &Engine, outcome: &Outcome) -> Result<(), Box<dyn Error>> {
    for warning in &outcome.warnings {
        eprintln!("warning: state not saved: {warning}");
    }
    let doc = json!({
        "events": outcome.events,
        "snapshot": engine.snapshot(),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
