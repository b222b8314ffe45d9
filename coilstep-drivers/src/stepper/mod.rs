//! Stepper driver implementations

pub mod pbl3717;

pub use pbl3717::{decode, encode, CoilDrive, CoilPair, CurrentLevel};
