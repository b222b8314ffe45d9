//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in coilstep-hal for the sequencer's hardware:
//!
//! - Ports (GPIO pin groups)
//! - Stepper coil drivers (PBL3717 line encoding)

#![no_std]
#![deny(unsafe_code)]

pub mod port;
pub mod stepper;
