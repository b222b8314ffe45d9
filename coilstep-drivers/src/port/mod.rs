//! Port implementations
//!
//! - GPIO: eight (or fewer) `embedded-hal` output pins acting as one port

pub mod gpio;

pub use gpio::PinPort;
