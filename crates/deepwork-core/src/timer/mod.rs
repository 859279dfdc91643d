mod clock;
mod controller;
mod engine;
mod mode;
mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{TimerController, TimerUpdate};
pub use engine::{EngineOptions, ResetPolicy, TimerEngine};
pub use mode::TimerMode;
pub use state::{TimerState, TimerStatus};
