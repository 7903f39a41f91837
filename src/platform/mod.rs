//! Platform abstraction layer
//!
//! Browser glue stays in `main.rs`; this module holds the parts of it that
//! can be reasoned about (and tested) without a browser:
//! - Input edge detection and touch debouncing
//! - Deferred tasks that must not outlive the run that scheduled them

pub mod input;
pub mod timers;

pub use input::{Action, InputState, Pulses};
pub use timers::{Deferred, Scheduler, Scope};
