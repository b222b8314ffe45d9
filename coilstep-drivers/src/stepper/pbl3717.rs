//! PBL3717 coil driver line encoding
//!
//! One PBL3717 drives one coil of a bipolar stepper through three inputs:
//! PHASE selects the current direction through the coil, I0 and I1 select
//! the current level. Two drivers share one port:
//!
//! | Bit | Line |
//! |-----|------|
//! | 0 | PHASE A |
//! | 1 | I0 A |
//! | 2 | I1 A |
//! | 3 | PHASE B |
//! | 4 | I0 B |
//! | 5 | I1 B |
//!
//! Current level truth table (H = 1):
//!
//! | I0 | I1 | Current |
//! |----|----|---------|
//! | H | H | none |
//! | L | H | low |
//! | H | L | medium |
//! | L | L | high |

/// Coil A lines start at bit 0
const COIL_A_SHIFT: u8 = 0;
/// Coil B lines start at bit 3
const COIL_B_SHIFT: u8 = 3;
/// PHASE, I0, I1
const COIL_MASK: u8 = 0b111;

const PHASE_BIT: u8 = 1 << 0;
const I0_BIT: u8 = 1 << 1;
const I1_BIT: u8 = 1 << 2;

/// Coil current selected by I0/I1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentLevel {
    /// I0 = H, I1 = H
    Off,
    /// I0 = L, I1 = H
    Low,
    /// I0 = H, I1 = L
    Medium,
    /// I0 = L, I1 = L
    High,
}

impl CurrentLevel {
    fn from_inputs(i0: bool, i1: bool) -> Self {
        match (i0, i1) {
            (true, true) => CurrentLevel::Off,
            (false, true) => CurrentLevel::Low,
            (true, false) => CurrentLevel::Medium,
            (false, false) => CurrentLevel::High,
        }
    }

    /// (I0, I1) input levels selecting this current
    const fn inputs(self) -> (bool, bool) {
        match self {
            CurrentLevel::Off => (true, true),
            CurrentLevel::Low => (false, true),
            CurrentLevel::Medium => (true, false),
            CurrentLevel::High => (false, false),
        }
    }
}

/// State of one driver's three inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoilDrive {
    /// PHASE input level
    pub phase: bool,
    /// Current through the coil
    pub current: CurrentLevel,
}

impl CoilDrive {
    /// Decode the three lowest bits (PHASE, I0, I1)
    pub fn from_bits(bits: u8) -> Self {
        Self {
            phase: bits & PHASE_BIT != 0,
            current: CurrentLevel::from_inputs(bits & I0_BIT != 0, bits & I1_BIT != 0),
        }
    }

    /// Encode into the three lowest bits
    pub const fn bits(self) -> u8 {
        let (i0, i1) = self.current.inputs();
        let mut bits = 0;
        if self.phase {
            bits |= PHASE_BIT;
        }
        if i0 {
            bits |= I0_BIT;
        }
        if i1 {
            bits |= I1_BIT;
        }
        bits
    }

    /// True if any current flows
    pub fn is_energized(self) -> bool {
        self.current != CurrentLevel::Off
    }
}

/// Both drivers sharing a port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoilPair {
    /// Driver on bits 0-2
    pub a: CoilDrive,
    /// Driver on bits 3-5
    pub b: CoilDrive,
}

impl CoilPair {
    /// Both drivers with no current through either coil
    pub const RELEASED: Self = Self {
        a: CoilDrive {
            phase: false,
            current: CurrentLevel::Off,
        },
        b: CoilDrive {
            phase: false,
            current: CurrentLevel::Off,
        },
    };
}

/// Decode a port byte; bits 6 and 7 are not connected and ignored
pub fn decode(value: u8) -> CoilPair {
    CoilPair {
        a: CoilDrive::from_bits((value >> COIL_A_SHIFT) & COIL_MASK),
        b: CoilDrive::from_bits((value >> COIL_B_SHIFT) & COIL_MASK),
    }
}

/// Encode a coil pair into a port byte
pub const fn encode(pair: CoilPair) -> u8 {
    (pair.a.bits() << COIL_A_SHIFT) | (pair.b.bits() << COIL_B_SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coilstep_core::pattern::{FULL_STEP, QUARTER_STEP};

    #[test]
    fn test_truth_table() {
        assert_eq!(CoilDrive::from_bits(0b110).current, CurrentLevel::Off);
        assert_eq!(CoilDrive::from_bits(0b100).current, CurrentLevel::Low);
        assert_eq!(CoilDrive::from_bits(0b010).current, CurrentLevel::Medium);
        assert_eq!(CoilDrive::from_bits(0b000).current, CurrentLevel::High);
        assert!(CoilDrive::from_bits(0b001).phase);
    }

    #[test]
    fn test_full_step_is_two_phase_on() {
        let phases: heapless::Vec<(bool, bool), 4> = FULL_STEP
            .iter()
            .map(|&v| {
                let pair = decode(v);
                assert_eq!(pair.a.current, CurrentLevel::High);
                assert_eq!(pair.b.current, CurrentLevel::High);
                (pair.a.phase, pair.b.phase)
            })
            .collect();

        // Gray-code walk of the two phase lines
        assert_eq!(phases, [(true, true), (false, true), (false, false), (true, false)]);
    }

    #[test]
    fn test_quarter_step_entries() {
        // 0x0D: A low current, B high current
        let pair = decode(0x0D);
        assert_eq!(pair.a, CoilDrive { phase: true, current: CurrentLevel::Low });
        assert_eq!(pair.b, CoilDrive { phase: true, current: CurrentLevel::High });

        // 0x38: A high current, B off
        let pair = decode(0x38);
        assert_eq!(pair.a.current, CurrentLevel::High);
        assert!(!pair.b.is_energized());

        // Every entry keeps at least one coil energized
        for &v in QUARTER_STEP.iter() {
            let pair = decode(v);
            assert!(pair.a.is_energized() || pair.b.is_energized(), "{:#04x}", v);
        }
    }

    #[test]
    fn test_encode_matches_tables() {
        for &v in FULL_STEP.iter().chain(QUARTER_STEP.iter()) {
            assert_eq!(encode(decode(v)), v);
        }
    }

    #[test]
    fn test_unconnected_bits_ignored() {
        assert_eq!(decode(0xC9), decode(0x09));
        assert_eq!(encode(decode(0xFF)), 0x3F);
    }

    #[test]
    fn test_released_pattern() {
        const RELEASED: u8 = encode(CoilPair::RELEASED);
        assert_eq!(RELEASED, 0x36);
        assert!(!decode(RELEASED).a.is_energized());
        assert!(!decode(RELEASED).b.is_energized());
    }
}
