//! Firmware tasks
//!
//! The plan runner is awaited directly from `main`. Drives busy-wait, so
//! the only await points are the pauses between moves and the stop button.

pub mod plan;

pub use plan::{release_coils, run_plan, RELEASED_PATTERN};
