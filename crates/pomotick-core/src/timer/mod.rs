mod engine;
mod mode;
mod policy;
mod ticker;

pub use engine::{TimerEngine, TimerState};
pub use mode::Mode;
pub use policy::{next_step, NextStep};
pub use ticker::{IntervalTicker, ManualTicker, TickSource};
