//! Lane admission: the fixed lane pool, message lifecycle and the tick loop
//! that moves messages from the wait list into lanes.
//!
//! # Architecture
//!
//! Every tick, in order:
//! 1. New text is drained from the [`IntakeQueue`](crate::intake::IntakeQueue)
//!    onto the tail of the wait list
//! 2. Active messages advance; those past their exit threshold retire
//! 3. Retired messages have their visual removed and their lane released
//! 4. Waiting messages are admitted head first while lanes are free
//!
//! Retiring before admitting lets a lane freed this tick be reused in the
//! same tick.

mod lanes;
mod message;
mod scheduler;
mod tick;

pub use lanes::{LaneId, LanePool};
pub use message::{MessageRecord, MessageState, preview};
pub use scheduler::AdmissionScheduler;
pub use tick::{TickConfig, TickReport, TickState};
