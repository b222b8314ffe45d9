//! Step cursor
//!
//! The cursor is the whole sequencing state of a drive: the table, the
//! walk direction, how many traversals are left and where the walk is
//! inside the current traversal. Each call to [`Iterator::next`] yields one
//! pair of port values.
//!
//! The blocking [`Sequencer`](super::Sequencer) walks a cursor with a
//! busy-wait between writes. For timer-driven operation, keep a cursor
//! around and call [`StepCursor::apply`] from the periodic callback:
//!
//! ```ignore
//! let mut cursor = StepCursor::new(&request).ok_or(DriveError::NotImplemented(request.mode))?;
//!
//! // In periodic timer interrupt (period = request.speed_us):
//! if cursor.apply(&mut port_a, &mut port_b).is_none() {
//!     timer.stop();
//! }
//! ```

use core::iter::FusedIterator;

use coilstep_hal::Port;

use super::request::{DriveRequest, StepDirection};
use crate::pattern::StepPattern;

/// One pair of port values and the table indices they came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseStep {
    /// Table index used for port A
    pub index_a: usize,
    /// Table index used for port B
    pub index_b: usize,
    /// Value for port A
    pub a: u8,
    /// Value for port B
    pub b: u8,
}

/// Position of a drive within its phase table
#[derive(Debug, Clone)]
pub struct StepCursor {
    pattern: StepPattern,
    direction: StepDirection,
    /// Traversals not yet finished, including the current one
    remaining: u16,
    /// Writes done in the current traversal (0..pattern.len())
    position: usize,
}

impl StepCursor {
    /// Create a cursor for a request
    ///
    /// Returns `None` when the request's mode has no phase table.
    pub fn new(request: &DriveRequest) -> Option<Self> {
        let pattern = request.mode.pattern()?;
        Some(Self::with_pattern(pattern, request.direction, request.step_count))
    }

    /// Create a cursor over an explicit table
    pub fn with_pattern(pattern: StepPattern, direction: StepDirection, traversals: u16) -> Self {
        Self {
            pattern,
            direction,
            remaining: traversals,
            position: 0,
        }
    }

    /// Table being walked
    pub fn pattern(&self) -> StepPattern {
        self.pattern
    }

    /// Walk direction
    pub fn direction(&self) -> StepDirection {
        self.direction
    }

    /// Traversals not yet finished, including a partly walked one
    pub fn remaining_traversals(&self) -> u16 {
        self.remaining
    }

    /// Writes already done in the current traversal
    pub fn position(&self) -> usize {
        self.position
    }

    /// True once every traversal has been walked
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Write pairs left until the cursor is finished
    pub fn remaining_writes(&self) -> u32 {
        if self.remaining == 0 {
            return 0;
        }
        u32::from(self.remaining) * self.pattern.len() as u32 - self.position as u32
    }

    /// Write the next pair to the ports
    ///
    /// Returns the step written, or `None` (without touching the ports)
    /// when the cursor is finished.
    pub fn apply<A: Port, B: Port>(&mut self, port_a: &mut A, port_b: &mut B) -> Option<PhaseStep> {
        let step = self.next()?;
        port_a.write(step.a);
        port_b.write(step.b);
        Some(step)
    }

    fn index(&self, descending: bool) -> usize {
        if descending {
            self.pattern.last_index() - self.position
        } else {
            self.position
        }
    }
}

impl Iterator for StepCursor {
    type Item = PhaseStep;

    fn next(&mut self) -> Option<PhaseStep> {
        if self.remaining == 0 {
            return None;
        }

        let index_a = self.index(self.direction.a_descends());
        let index_b = self.index(self.direction.b_descends());
        let table = self.pattern.as_slice();
        let step = PhaseStep {
            index_a,
            index_b,
            a: table[index_a],
            b: table[index_b],
        };

        self.position += 1;
        if self.position == self.pattern.len() {
            self.position = 0;
            self.remaining -= 1;
        }

        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining_writes() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for StepCursor {}

impl FusedIterator for StepCursor {}
