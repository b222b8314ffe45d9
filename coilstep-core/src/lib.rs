//! Board-agnostic core logic for the two-coil stepper sequencer
//!
//! This crate contains all sequencing logic that does not depend on
//! specific hardware implementations:
//!
//! - Phase pattern tables and step modes
//! - Blocking sequencer over two [`coilstep_hal::Port`]s
//! - Step cursor for timer-driven operation
//! - Drive plan configuration and its parser
//! - Integer helpers

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod math;
pub mod pattern;
pub mod sequencer;

pub use pattern::{StepMode, StepPattern};
pub use sequencer::{DriveError, DriveReport, DriveRequest, Sequencer, StepCursor, StepDirection};
