//! GPIO-backed port
//!
//! Builds a byte-wide [`Port`] out of individual output pins, for boards
//! where the coil driver lines are not on one hardware port register.
//! Bit k of every written byte drives `pins[k]`.

use core::convert::Infallible;

use coilstep_hal::{DirectionMask, Port};
use embedded_hal::digital::{OutputPin, PinState};

/// Port made of up to eight output pins
///
/// Lines configured as outputs drive the latched byte. Lines configured as
/// inputs hold their idle level; writes to them are latched and applied
/// once the line becomes an output.
pub struct PinPort<P, const N: usize> {
    pins: [P; N],
    mask: DirectionMask,
    idle: u8,
    latch: u8,
}

impl<P: OutputPin<Error = Infallible>, const N: usize> PinPort<P, N> {
    const FITS_IN_BYTE: () = assert!(N <= 8, "a port has at most 8 lines");

    /// Create a port over `pins`, starting as input with all pins low
    pub fn new(pins: [P; N]) -> Self {
        Self::with_idle(pins, 0)
    }

    /// Create a port over `pins`, starting as input with bit k of `idle`
    /// on pin k
    ///
    /// The latch starts at `idle` too, so configuring the port as output
    /// before the first write keeps the pins where they are.
    pub fn with_idle(pins: [P; N], idle: u8) -> Self {
        let () = Self::FITS_IN_BYTE;

        let mut port = Self {
            pins,
            mask: DirectionMask::new(),
            idle,
            latch: idle,
        };
        port.refresh();
        port
    }

    /// Current per-line direction
    pub fn direction_mask(&self) -> DirectionMask {
        self.mask
    }

    /// Give back the pins
    pub fn release(self) -> [P; N] {
        self.pins
    }

    fn refresh(&mut self) {
        let outputs = self.mask.bits();
        let value = (self.latch & outputs) | (self.idle & !outputs);
        for (line, pin) in self.pins.iter_mut().enumerate() {
            let state = PinState::from(value & (1 << line) != 0);
            match pin.set_state(state) {
                Ok(()) => {}
                Err(never) => match never {},
            }
        }
    }
}

impl<P: OutputPin<Error = Infallible>, const N: usize> Port for PinPort<P, N> {
    fn set_direction_mask(&mut self, mask: DirectionMask) {
        self.mask = mask;
        self.refresh();
    }

    fn write(&mut self, value: u8) {
        self.latch = value;
        if self.mask.bits() != 0 {
            self.refresh();
        }
    }

    fn output(&self) -> u8 {
        self.latch
    }
}
