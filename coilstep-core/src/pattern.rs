//! Coil phase pattern tables
//!
//! Each byte energizes both coils of a bipolar stepper at once, using the
//! six-line wiring of two PBL3717-style drivers (phase, I0, I1 per coil).
//! Walking a whole table once moves the motor by one mechanical step.

use core::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full-step (wave) sequence, one 1.8° step per traversal
pub const FULL_STEP: [u8; 4] = [0x09, 0x08, 0x00, 0x01];

/// Quarter-step sequence with graded coil currents
pub const QUARTER_STEP: [u8; 16] = [
    0x0D, 0x0F, 0x0C, 0x0A, 0x28, 0x38, 0x20, 0x10, 0x04, 0x06, 0x05, 0x03, 0x21, 0x31, 0x29,
    0x19,
];

/// Shortest delay between writes the full-step table was observed to run at
pub const FULL_STEP_MIN_US: u32 = 950;
/// Longest delay between full-step writes that still produced motion
pub const FULL_STEP_MAX_US: u32 = 5_000_000;
/// Shortest delay between quarter-step writes
pub const QUARTER_STEP_MIN_US: u32 = 100;
/// Longest delay between quarter-step writes
pub const QUARTER_STEP_MAX_US: u32 = 45_000;

/// Immutable phase table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPattern(&'static [u8]);

impl StepPattern {
    /// The 4-entry full-step table
    pub const FULL: StepPattern = StepPattern(&FULL_STEP);

    /// The 16-entry quarter-step table
    pub const QUARTER: StepPattern = StepPattern(&QUARTER_STEP);

    /// Number of entries in one traversal
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for the built-in tables
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entry at `index`, `None` past the end
    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Last valid index
    pub const fn last_index(&self) -> usize {
        self.0.len() - 1
    }

    /// Table contents
    pub const fn as_slice(&self) -> &'static [u8] {
        self.0
    }
}

/// Stepping resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepMode {
    /// 4-entry wave sequence
    Full,
    /// Not implemented, drives report it instead of writing
    Half,
    /// 16-entry sequence
    Quarter,
}

impl StepMode {
    /// Phase table for this mode, `None` when the mode has no table
    pub const fn pattern(self) -> Option<StepPattern> {
        match self {
            StepMode::Full => Some(StepPattern::FULL),
            StepMode::Half => None,
            StepMode::Quarter => Some(StepPattern::QUARTER),
        }
    }

    /// Check whether drives in this mode produce output
    pub const fn is_implemented(self) -> bool {
        self.pattern().is_some()
    }

    /// Delay range between writes the motor is known to follow
    ///
    /// Informational only: the sequencer does not enforce it.
    pub const fn rated_speed_us(self) -> Option<RangeInclusive<u32>> {
        match self {
            StepMode::Full => Some(FULL_STEP_MIN_US..=FULL_STEP_MAX_US),
            StepMode::Half => None,
            StepMode::Quarter => Some(QUARTER_STEP_MIN_US..=QUARTER_STEP_MAX_US),
        }
    }

    /// Name as used in plan files
    pub const fn as_str(self) -> &'static str {
        match self {
            StepMode::Full => "full",
            StepMode::Half => "half",
            StepMode::Quarter => "quarter",
        }
    }

    /// Parse a plan file name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "full" => Some(StepMode::Full),
            "half" => Some(StepMode::Half),
            "quarter" => Some(StepMode::Quarter),
            _ => None,
        }
    }
}

impl TryFrom<u8> for StepMode {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(StepMode::Full),
            1 => Ok(StepMode::Half),
            2 => Ok(StepMode::Quarter),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables() {
        assert_eq!(StepPattern::FULL.len(), 4);
        assert_eq!(StepPattern::QUARTER.len(), 16);
        assert_eq!(StepPattern::FULL.last_index(), 3);
        assert_eq!(StepPattern::QUARTER.get(4), Some(0x28));
        assert_eq!(StepPattern::QUARTER.get(16), None);
    }

    #[test]
    fn test_mode_patterns() {
        assert_eq!(StepMode::Full.pattern(), Some(StepPattern::FULL));
        assert_eq!(StepMode::Quarter.pattern(), Some(StepPattern::QUARTER));
        assert_eq!(StepMode::Half.pattern(), None);
        assert!(!StepMode::Half.is_implemented());
    }

    #[test]
    fn test_rated_speeds() {
        assert_eq!(StepMode::Full.rated_speed_us(), Some(950..=5_000_000));
        assert_eq!(StepMode::Quarter.rated_speed_us(), Some(100..=45_000));
        assert_eq!(StepMode::Half.rated_speed_us(), None);
    }

    #[test]
    fn test_raw_modes() {
        assert_eq!(StepMode::try_from(0), Ok(StepMode::Full));
        assert_eq!(StepMode::try_from(1), Ok(StepMode::Half));
        assert_eq!(StepMode::try_from(2), Ok(StepMode::Quarter));
        assert_eq!(StepMode::try_from(3), Err(3));
    }

    #[test]
    fn test_names() {
        for mode in [StepMode::Full, StepMode::Half, StepMode::Quarter] {
            assert_eq!(StepMode::from_name(mode.as_str()), Some(mode));
        }
        assert_eq!(StepMode::from_name("eighth"), None);
    }
}
