//! Drive plan types
//!
//! A drive plan is an ordered list of named moves, each one drive request
//! followed by an idle pause. Firmware walks the plan once, or forever when
//! `repeat` is set.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencer::DriveRequest;

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum moves per plan
pub const MAX_MOVES: usize = 8;

/// One named drive in a plan
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanMove {
    /// Label from the `[move.<label>]` header
    pub label: String<MAX_LABEL_LEN>,
    /// Drive to run
    pub request: DriveRequest,
    /// Idle time after the drive, in milliseconds
    pub pause_ms: u32,
}

/// Ordered set of moves
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrivePlan {
    /// Start over after the last move
    pub repeat: bool,
    /// Moves in file order
    pub moves: Vec<PlanMove, MAX_MOVES>,
}

impl DrivePlan {
    /// Create an empty, non-repeating plan
    pub fn new() -> Self {
        Self {
            repeat: false,
            moves: Vec::new(),
        }
    }

    /// Find a move by label
    pub fn find_move(&self, label: &str) -> Option<&PlanMove> {
        self.moves.iter().find(|m| m.label.as_str() == label)
    }

    /// Check whether every move has a phase table to walk
    pub fn all_implemented(&self) -> bool {
        self.moves.iter().all(|m| m.request.mode.is_implemented())
    }

    /// Time one pass over the plan takes, drives plus pauses
    pub fn pass_duration_us(&self) -> u64 {
        self.moves
            .iter()
            .map(|m| m.request.estimated_duration_us() + u64::from(m.pause_ms) * 1_000)
            .sum()
    }
}
