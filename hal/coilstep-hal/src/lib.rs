//! Coilstep Hardware Abstraction Layer
//!
//! This crate defines the byte-wide port abstraction the sequencer writes
//! coil patterns through. Chip-specific code implements [`Port`] over real
//! registers or GPIO pins; host tests use the recording port from the
//! `mock` feature.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (coilstep-firmware, etc.)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  coilstep-core (sequencer)              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  coilstep-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │   coilstep-   │       │  mock::       │
//! │   drivers     │       │  RecordingPort│
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`port::Port`] - Byte-wide output port (direction + data)
//! - [`DelayNs`] - Blocking delay, re-exported from `embedded-hal`

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "mock")]
pub mod mock;
pub mod port;

// Re-export key traits at crate root for convenience
pub use embedded_hal::delay::DelayNs;
pub use port::{DirectionMask, Port, PortDirection};
