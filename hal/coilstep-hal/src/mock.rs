//! Recording port and delay for host-side testing
//!
//! Enabled with the `mock` feature. The recording port keeps every byte
//! written to it so tests can compare whole sequences; the delay only
//! accumulates the time it was asked to wait.

use heapless::Vec;

use embedded_hal::delay::DelayNs;

use crate::port::{DirectionMask, Port, PortDirection};

/// Port that records every write
///
/// Holds at most `N` bytes. Writes past capacity still update
/// [`Port::output`] and set the overflow flag.
#[derive(Debug, Default)]
pub struct RecordingPort<const N: usize> {
    mask: Option<DirectionMask>,
    direction_changes: u8,
    writes: Vec<u8, N>,
    last: u8,
    overflowed: bool,
}

impl<const N: usize> RecordingPort<N> {
    /// Create a port that has not been configured yet
    pub fn new() -> Self {
        Self {
            mask: None,
            direction_changes: 0,
            writes: Vec::new(),
            last: 0,
            overflowed: false,
        }
    }

    /// Bytes written so far, oldest first
    pub fn writes(&self) -> &[u8] {
        &self.writes
    }

    /// Current per-line direction, `None` before the port is configured
    pub fn mask(&self) -> Option<DirectionMask> {
        self.mask
    }

    /// Current whole-port direction, `None` if unconfigured or mixed
    pub fn direction(&self) -> Option<PortDirection> {
        self.mask.and_then(DirectionMask::uniform)
    }

    /// Number of direction changes
    pub fn direction_changes(&self) -> u8 {
        self.direction_changes
    }

    /// True if more than `N` bytes were written
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Forget recorded writes, keeping the direction
    pub fn clear(&mut self) {
        self.writes.clear();
        self.overflowed = false;
    }
}

impl<const N: usize> Port for RecordingPort<N> {
    fn set_direction_mask(&mut self, mask: DirectionMask) {
        self.mask = Some(mask);
        self.direction_changes = self.direction_changes.saturating_add(1);
    }

    fn write(&mut self, value: u8) {
        self.last = value;
        if self.writes.push(value).is_err() {
            self.overflowed = true;
        }
    }

    fn output(&self) -> u8 {
        self.last
    }
}

/// Delay that returns immediately and accounts for the requested time
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MockDelay {
    total_ns: u64,
    calls: u32,
}

impl MockDelay {
    /// Create a delay with nothing accounted
    pub const fn new() -> Self {
        Self {
            total_ns: 0,
            calls: 0,
        }
    }

    /// Sum of all requested delays in nanoseconds
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }

    /// Sum of all requested delays in microseconds
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }

    /// Number of delay requests
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }

    // Overridden so one request counts as one call regardless of size
    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
        self.calls += 1;
    }
}
