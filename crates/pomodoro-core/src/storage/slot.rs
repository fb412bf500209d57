//! Durable key-value slot holding the serialized [`AppState`](crate::state::AppState).

use crate::error::PersistenceError;

/// Fixed key the state record is stored under.
pub const STATE_KEY: &str = "pomodoro_state_v1";

/// One durable record. Implementations store the raw JSON text; parsing and
/// normalization belong to [`StateStore`](super::StateStore).
pub trait StateSlot {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the stored record.
    fn write(&mut self, contents: &str) -> Result<(), PersistenceError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

impl<T: StateSlot + ?Sized> StateSlot for Box<T> {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        (**self).read()
    }

    fn write(&mut self, contents: &str) -> Result<(), PersistenceError> {
        (**self).write(contents)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// In-process slot. Keeps every successful write and can be told to refuse
/// them.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Option<String>,
    history: Vec<String>,
    fail_writes: bool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.history.len()
    }

    /// Every successful write, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl StateSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Unavailable(
                "memory slot is refusing writes".into(),
            ));
        }
        self.contents = Some(contents.to_string());
        self.history.push(contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
