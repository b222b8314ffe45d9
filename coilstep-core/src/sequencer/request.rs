//! Drive request parameters

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::interpolate;
use crate::pattern::StepMode;

/// How the two ports walk the phase table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepDirection {
    /// Both ports walk first to last entry
    Forward,
    /// Both ports walk last to first entry
    Reverse,
    /// Port A walks forward while port B walks backward
    TurnRight,
    /// Port A walks backward while port B walks forward
    TurnLeft,
}

impl StepDirection {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            StepDirection::Forward => StepDirection::Reverse,
            StepDirection::Reverse => StepDirection::Forward,
            StepDirection::TurnRight => StepDirection::TurnLeft,
            StepDirection::TurnLeft => StepDirection::TurnRight,
        }
    }

    /// Whether port A walks the table backward
    pub(crate) fn a_descends(self) -> bool {
        matches!(self, StepDirection::Reverse | StepDirection::TurnLeft)
    }

    /// Whether port B walks the table backward
    pub(crate) fn b_descends(self) -> bool {
        matches!(self, StepDirection::Reverse | StepDirection::TurnRight)
    }

    /// Name as used in plan files
    pub const fn as_str(self) -> &'static str {
        match self {
            StepDirection::Forward => "forward",
            StepDirection::Reverse => "reverse",
            StepDirection::TurnRight => "turn_right",
            StepDirection::TurnLeft => "turn_left",
        }
    }

    /// Parse a plan file name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "forward" => Some(StepDirection::Forward),
            "reverse" => Some(StepDirection::Reverse),
            "turn_right" => Some(StepDirection::TurnRight),
            "turn_left" => Some(StepDirection::TurnLeft),
            _ => None,
        }
    }
}

impl TryFrom<u8> for StepDirection {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(StepDirection::Forward),
            1 => Ok(StepDirection::Reverse),
            2 => Ok(StepDirection::TurnRight),
            3 => Ok(StepDirection::TurnLeft),
            other => Err(other),
        }
    }
}

/// Parameters for one drive
///
/// `step_count` counts whole table traversals, not port writes.
/// `speed_us` is applied after every write and is a caller contract:
/// see [`StepMode::rated_speed_us`] for the range known to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveRequest {
    /// Stepping resolution
    pub mode: StepMode,
    /// Number of table traversals
    pub step_count: u16,
    /// Walk direction
    pub direction: StepDirection,
    /// Delay after each write, in microseconds
    pub speed_us: u32,
}

impl DriveRequest {
    /// Create a new request
    pub const fn new(
        mode: StepMode,
        step_count: u16,
        direction: StepDirection,
        speed_us: u32,
    ) -> Self {
        Self {
            mode,
            step_count,
            direction,
            speed_us,
        }
    }

    /// Full-step request
    pub const fn full(step_count: u16, direction: StepDirection, speed_us: u32) -> Self {
        Self::new(StepMode::Full, step_count, direction, speed_us)
    }

    /// Quarter-step request
    pub const fn quarter(step_count: u16, direction: StepDirection, speed_us: u32) -> Self {
        Self::new(StepMode::Quarter, step_count, direction, speed_us)
    }

    /// Set the delay from a percentage of the mode's rated range
    ///
    /// 0% is the slowest rated delay, 100% the fastest. Modes without a
    /// rated range keep their current delay.
    pub fn with_speed_percent(mut self, percent: u8) -> Self {
        if let Some(range) = self.mode.rated_speed_us() {
            let percent = u32::from(percent.min(100));
            self.speed_us = interpolate(percent, 0, 100, *range.end(), *range.start());
        }
        self
    }

    /// Check the delay against the mode's rated range
    pub fn is_within_rated_speed(&self) -> bool {
        self.mode
            .rated_speed_us()
            .is_some_and(|range| range.contains(&self.speed_us))
    }

    /// Number of write pairs the drive will perform
    pub fn total_writes(&self) -> u32 {
        match self.mode.pattern() {
            Some(pattern) => u32::from(self.step_count) * pattern.len() as u32,
            None => 0,
        }
    }

    /// Time the drive keeps the caller busy, ignoring write overhead
    pub fn estimated_duration_us(&self) -> u64 {
        u64::from(self.total_writes()) * u64::from(self.speed_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(StepDirection::Forward.opposite(), StepDirection::Reverse);
        assert_eq!(StepDirection::TurnLeft.opposite(), StepDirection::TurnRight);
        for dir in [
            StepDirection::Forward,
            StepDirection::Reverse,
            StepDirection::TurnRight,
            StepDirection::TurnLeft,
        ] {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(StepDirection::from_name(dir.as_str()), Some(dir));
        }
    }

    #[test]
    fn test_walk_orientation() {
        assert!(!StepDirection::Forward.a_descends());
        assert!(!StepDirection::Forward.b_descends());
        assert!(StepDirection::Reverse.a_descends());
        assert!(StepDirection::Reverse.b_descends());
        assert!(!StepDirection::TurnRight.a_descends());
        assert!(StepDirection::TurnRight.b_descends());
        assert!(StepDirection::TurnLeft.a_descends());
        assert!(!StepDirection::TurnLeft.b_descends());
    }

    #[test]
    fn test_raw_directions() {
        assert_eq!(StepDirection::try_from(2), Ok(StepDirection::TurnRight));
        assert_eq!(StepDirection::try_from(4), Err(4));
    }

    #[test]
    fn test_speed_percent() {
        let req = DriveRequest::quarter(1, StepDirection::Forward, 0);
        assert_eq!(req.with_speed_percent(0).speed_us, 45_000);
        assert_eq!(req.with_speed_percent(100).speed_us, 100);
        assert_eq!(req.with_speed_percent(250).speed_us, 100);

        let req = DriveRequest::full(1, StepDirection::Forward, 0);
        assert_eq!(req.with_speed_percent(100).speed_us, 950);

        // No rated range, delay untouched
        let req = DriveRequest::new(StepMode::Half, 1, StepDirection::Forward, 1234);
        assert_eq!(req.with_speed_percent(50).speed_us, 1234);
    }

    #[test]
    fn test_rated_speed_check() {
        assert!(DriveRequest::full(1, StepDirection::Forward, 950).is_within_rated_speed());
        assert!(!DriveRequest::full(1, StepDirection::Forward, 949).is_within_rated_speed());
        assert!(DriveRequest::quarter(1, StepDirection::Forward, 45_000).is_within_rated_speed());
        assert!(!DriveRequest::quarter(1, StepDirection::Forward, 45_001).is_within_rated_speed());
        assert!(!DriveRequest::new(StepMode::Half, 1, StepDirection::Forward, 1000)
            .is_within_rated_speed());
    }

    #[test]
    fn test_duration_estimate() {
        let req = DriveRequest::full(50, StepDirection::Forward, 1000);
        assert_eq!(req.total_writes(), 200);
        assert_eq!(req.estimated_duration_us(), 200_000);

        let req = DriveRequest::quarter(3, StepDirection::TurnLeft, 100);
        assert_eq!(req.total_writes(), 48);

        let req = DriveRequest::new(StepMode::Half, 50, StepDirection::Forward, 1000);
        assert_eq!(req.estimated_duration_us(), 0);
    }
}
