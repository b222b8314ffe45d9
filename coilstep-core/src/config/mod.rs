//! Configuration types
//!
//! Drive plans and the plan file parser. Plans are written as a small
//! TOML subset so they can be compiled into firmware and read without an
//! allocator.

pub mod toml;
pub mod types;

pub use self::toml::{parse_plan, ParseError};
pub use types::*;
