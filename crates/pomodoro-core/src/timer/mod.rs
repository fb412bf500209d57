mod cycle;
mod engine;
mod input;
mod mode;

pub use cycle::{complete_interval, next_mode, Completion};
pub use engine::{CycleEngine, Outcome};
pub use input::{SettingsInput, TaskInput};
pub use mode::Mode;
