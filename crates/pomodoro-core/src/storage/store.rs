//! Owner of the canonical [`AppState`] and its persistence.
//!
//! `load` never fails: a missing, unreadable or corrupt record falls back to
//! a fresh default state, and a record from an earlier day is rolled over.
//! `save` writes the whole state through to the slot.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::slot::StateSlot;
use crate::error::PersistenceError;
use crate::state::AppState;
use crate::view::Snapshot;

/// Where the loaded state came from.
#[derive(Debug)]
pub enum LoadSource {
    /// Nothing was stored.
    Fresh,
    /// A stored record was parsed.
    Restored,
    /// A stored record could not be parsed; defaults were used.
    Corrupt { reason: String },
    /// The slot could not be read; defaults were used.
    Unreadable(PersistenceError),
}

#[derive(Debug)]
pub struct LoadReport {
    pub source: LoadSource,
    /// Daily counters were reset because the stored date was stale.
    pub rolled_over: bool,
    /// Schema version found in the record (0 when absent).
    pub stored_version: Option<u32>,
}

pub struct StateStore<S> {
    slot: S,
    state: AppState,
    report: LoadReport,
}

impl<S: StateSlot> StateStore<S> {
    /// Read the persisted record, normalizing it for `today`.
    pub fn load(slot: S, today: NaiveDate) -> Self {
        let (state, report) = match slot.read() {
            Ok(None) => (
                AppState::fresh(today),
                LoadReport {
                    source: LoadSource::Fresh,
                    rolled_over: false,
                    stored_version: None,
                },
            ),
            Ok(Some(raw)) => match serde_json::from_str::<AppState>(&raw) {
                Ok(mut state) => {
                    let stored_version = state.schema_version;
                    state.normalize();
                    let rolled_over = state.roll_over(today);
                    if rolled_over {
                        debug!(%today, "day rollover: daily counters reset");
                    }
                    (
                        state,
                        LoadReport {
                            source: LoadSource::Restored,
                            rolled_over,
                            stored_version: Some(stored_version),
                        },
                    )
                }
                Err(e) => {
                    warn!(
                        slot = %slot.describe(),
                        error = %e,
                        "stored state is corrupt, starting fresh"
                    );
                    (
                        AppState::fresh(today),
                        LoadReport {
                            source: LoadSource::Corrupt {
                                reason: e.to_string(),
                            },
                            rolled_over: false,
                            stored_version: None,
                        },
                    )
                }
            },
            Err(e) => {
                warn!(
                    slot = %slot.describe(),
                    error = %e,
                    "stored state is unreadable, starting fresh"
                );
                (
                    AppState::fresh(today),
                    LoadReport {
                        source: LoadSource::Unreadable(e),
                        rolled_over: false,
                        stored_version: None,
                    },
                )
            }
        };
        Self {
            slot,
            state,
            report,
        }
    }

    /// Serialize the entire state as pretty-printed JSON and write it.
    ///
    /// # Errors
    /// Returns the slot's error; the in-memory state is unaffected.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&self.state)?;
        self.slot.write(&json).inspect_err(|e| {
            warn!(slot = %self.slot.describe(), error = %e, "failed to persist state");
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Swap in a whole new state (used by reset).
    pub fn replace(&mut self, state: AppState) {
        self.state = state;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.state)
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }
}
