//! Host collaborators: time source, schedulers and input signals
//!
//! The assessment and the refresh rate monitor never touch the terminal or
//! the system clock directly. Everything they need from the host is injected
//! through the traits in this module.

mod clock;
mod input;
mod scheduler;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use input::{InputSignal, Key, PointerButton};
pub use scheduler::{DelayScheduler, FrameHandle, FrameLoop, FrameScheduler, TimerHandle, TimerQueue};
