//! Stepper sequencer
//!
//! Drives a two-coil stepper by writing phase table entries to two ports,
//! one port per coil driver pair, with a blocking delay after each write.
//!
//! # Usage
//!
//! ```ignore
//! let mut seq = Sequencer::new(port_a, port_b, delay);
//! seq.init();
//!
//! // 50 full steps forward, 2ms between writes
//! let report = seq.drive(&DriveRequest::full(50, StepDirection::Forward, 2_000))?;
//! ```
//!
//! A drive occupies the caller until it finishes. Nothing is remembered
//! between drives: two identical requests produce identical output.

pub mod cursor;
pub mod request;

use core::fmt;

use coilstep_hal::{DelayNs, Port, PortDirection};

use crate::pattern::StepMode;

pub use cursor::{PhaseStep, StepCursor};
pub use request::{DriveRequest, StepDirection};

/// Reasons a drive produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveError {
    /// The mode exists but has no phase table
    NotImplemented(StepMode),
    /// Raw mode value outside the known set
    UnknownMode(u8),
    /// Raw direction value outside the known set
    UnknownDirection(u8),
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::NotImplemented(mode) => {
                write!(f, "{} stepping is not implemented", mode.as_str())
            }
            DriveError::UnknownMode(raw) => write!(f, "unknown step mode {}", raw),
            DriveError::UnknownDirection(raw) => write!(f, "unknown step direction {}", raw),
        }
    }
}

/// Summary of a finished drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveReport {
    /// Table traversals walked to the end
    pub traversals: u16,
    /// Write pairs performed
    pub writes: u32,
    /// Drive stopped early on request
    pub cancelled: bool,
}

/// Blocking two-port stepper sequencer
///
/// Owns both coil ports and the delay for as long as it exists, so no
/// other code can write the ports in the middle of a drive.
pub struct Sequencer<A, B, D> {
    port_a: A,
    port_b: B,
    delay: D,
}

impl<A: Port, B: Port, D: DelayNs> Sequencer<A, B, D> {
    /// Create a sequencer from two ports and a delay provider
    pub fn new(port_a: A, port_b: B, delay: D) -> Self {
        Self {
            port_a,
            port_b,
            delay,
        }
    }

    /// Configure both ports as outputs
    pub fn init(&mut self) {
        self.port_a.set_direction(PortDirection::Output);
        self.port_b.set_direction(PortDirection::Output);
    }

    /// Port A (first coil driver pair)
    pub fn port_a(&self) -> &A {
        &self.port_a
    }

    /// Port B (second coil driver pair)
    pub fn port_b(&self) -> &B {
        &self.port_b
    }

    /// Both ports, for writing a hold or idle pattern between drives
    pub fn ports_mut(&mut self) -> (&mut A, &mut B) {
        (&mut self.port_a, &mut self.port_b)
    }

    /// Delay provider
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Give back the ports and delay
    pub fn release(self) -> (A, B, D) {
        (self.port_a, self.port_b, self.delay)
    }

    /// Run a drive to completion
    ///
    /// Blocks for roughly [`DriveRequest::estimated_duration_us`].
    pub fn drive(&mut self, request: &DriveRequest) -> Result<DriveReport, DriveError> {
        self.drive_until(request, || false)
    }

    /// Run a drive, checking `cancel` before every write
    ///
    /// When `cancel` returns true the drive stops without writing further
    /// and the report is marked cancelled. Only fully walked traversals
    /// count in [`DriveReport::traversals`].
    pub fn drive_until<F>(
        &mut self,
        request: &DriveRequest,
        mut cancel: F,
    ) -> Result<DriveReport, DriveError>
    where
        F: FnMut() -> bool,
    {
        let Some(mut cursor) = StepCursor::new(request) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("drive ignored: {} stepping is not implemented", request.mode);
            return Err(DriveError::NotImplemented(request.mode));
        };

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "drive start: mode={} dir={} traversals={} speed={}us",
            request.mode,
            request.direction,
            request.step_count,
            request.speed_us
        );

        let mut report = DriveReport::default();

        while !cursor.is_finished() {
            if cancel() {
                report.cancelled = true;
                break;
            }
            if cursor.apply(&mut self.port_a, &mut self.port_b).is_none() {
                break;
            }
            report.writes += 1;
            self.delay.delay_us(request.speed_us);
        }

        report.traversals = request.step_count - cursor.remaining_traversals();

        #[cfg(feature = "defmt")]
        log_report(&report);

        Ok(report)
    }

    /// Run a drive from raw mode and direction values
    ///
    /// Unknown values are reported without touching the ports.
    pub fn drive_raw(
        &mut self,
        mode: u8,
        step_count: u16,
        direction: u8,
        speed_us: u32,
    ) -> Result<DriveReport, DriveError> {
        let mode = StepMode::try_from(mode).map_err(DriveError::UnknownMode)?;
        let direction = StepDirection::try_from(direction).map_err(DriveError::UnknownDirection)?;
        self.drive(&DriveRequest::new(mode, step_count, direction, speed_us))
    }
}

#[cfg(feature = "defmt")]
fn log_report(report: &DriveReport) {
    if report.cancelled {
        defmt::info!(
            "drive cancelled after {} writes ({} traversals)",
            report.writes,
            report.traversals
        );
    } else {
        defmt::debug!("drive done: {} writes", report.writes);
    }
}
