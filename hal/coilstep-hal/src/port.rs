//! Byte-wide port abstractions
//!
//! A port is eight output lines written together, plus a data-direction
//! setting. Implementations handle the actual register or pin access.

/// Direction of a whole port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PortDirection {
    /// All lines are inputs
    Input = 0x00,
    /// All lines are outputs
    Output = 0xFF,
}

impl PortDirection {
    /// Data-direction register value for this direction
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Byte-wide output port
///
/// Writes always succeed; there is no error channel.
pub trait Port {
    /// Configure each line from a data-direction byte
    fn set_direction_mask(&mut self, mask: DirectionMask);

    /// Configure all lines of the port
    fn set_direction(&mut self, direction: PortDirection) {
        self.set_direction_mask(DirectionMask::from(direction));
    }

    /// Write a byte to the port, bit k driving line k
    fn write(&mut self, value: u8);

    /// Last byte written to the port
    fn output(&self) -> u8;
}

impl<P: Port + ?Sized> Port for &mut P {
    fn set_direction_mask(&mut self, mask: DirectionMask) {
        (**self).set_direction_mask(mask);
    }

    fn set_direction(&mut self, direction: PortDirection) {
        (**self).set_direction(direction);
    }

    fn write(&mut self, value: u8) {
        (**self).write(value);
    }

    fn output(&self) -> u8 {
        (**self).output()
    }
}

/// Per-line data-direction byte
///
/// Bit k set means line k is an output. Line numbers of 8 and above do
/// not exist on a byte-wide port and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectionMask(u8);

impl DirectionMask {
    /// All lines inputs
    pub const fn new() -> Self {
        Self(0)
    }

    /// Raw register value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Make a single line an output
    pub fn set_output(&mut self, line: u8) {
        if line < 8 {
            self.0 |= 1 << line;
        }
    }

    /// Make a single line an input
    pub fn set_input(&mut self, line: u8) {
        if line < 8 {
            self.0 &= !(1 << line);
        }
    }

    /// Check whether a line is configured as an output
    pub fn is_output(self, line: u8) -> bool {
        line < 8 && self.0 & (1 << line) != 0
    }

    /// Whole-port direction, if every line agrees
    pub fn uniform(self) -> Option<PortDirection> {
        match self.0 {
            0x00 => Some(PortDirection::Input),
            0xFF => Some(PortDirection::Output),
            _ => None,
        }
    }
}

impl From<PortDirection> for DirectionMask {
    fn from(direction: PortDirection) -> Self {
        Self(direction.bits())
    }
}
