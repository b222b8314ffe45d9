//! Simple TOML parser for drive plans
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! plan files. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - `[plan]` and `[move.<label>]` section headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Arrays and inline tables
//! - Dotted keys outside section headers
//!
//! ```toml
//! [plan]
//! repeat = true
//!
//! [move.open]
//! mode = "quarter"
//! direction = "forward"
//! steps = 50
//! speed_us = 2000      # or speed_pct = 0..100
//! pause_ms = 500
//! ```

use core::fmt;

use heapless::String as HString;

use super::types::{DrivePlan, PlanMove, MAX_LABEL_LEN};
use crate::pattern::StepMode;
use crate::sequencer::{DriveRequest, StepDirection};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Value of the wrong type or out of range
    InvalidValue,
    /// Key not valid in its section
    UnknownKey,
    /// More moves than a plan can hold
    TooManyItems,
    /// Move label longer than [`MAX_LABEL_LEN`]
    LabelTooLong,
    /// A move lacks mode, direction, steps or a speed
    MissingField,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::InvalidSection => "invalid section header",
            ParseError::InvalidValue => "invalid value",
            ParseError::UnknownKey => "unknown key",
            ParseError::TooManyItems => "too many moves",
            ParseError::LabelTooLong => "move label too long",
            ParseError::MissingField => "move is missing a required field",
        };
        f.write_str(msg)
    }
}

/// Current parsing context
#[derive(Debug)]
enum Section {
    Root,
    Plan,
    Move(PendingMove),
}

/// Move fields seen so far
#[derive(Debug, Default)]
struct PendingMove {
    label: HString<MAX_LABEL_LEN>,
    mode: Option<StepMode>,
    direction: Option<StepDirection>,
    steps: Option<u16>,
    speed_us: Option<u32>,
    speed_pct: Option<u8>,
    pause_ms: u32,
}

impl PendingMove {
    fn finish(self) -> Result<PlanMove, ParseError> {
        let mode = self.mode.ok_or(ParseError::MissingField)?;
        let direction = self.direction.ok_or(ParseError::MissingField)?;
        let steps = self.steps.ok_or(ParseError::MissingField)?;

        let request = match (self.speed_us, self.speed_pct) {
            (Some(us), None) => DriveRequest::new(mode, steps, direction, us),
            (None, Some(pct)) => {
                DriveRequest::new(mode, steps, direction, 0).with_speed_percent(pct)
            }
            (Some(_), Some(_)) => return Err(ParseError::InvalidValue),
            (None, None) => return Err(ParseError::MissingField),
        };

        Ok(PlanMove {
            label: self.label,
            request,
            pause_ms: self.pause_ms,
        })
    }
}

/// Parse a plan file
pub fn parse_plan(input: &str) -> Result<DrivePlan, ParseError> {
    let mut plan = DrivePlan::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            let next = parse_section_header(&line[1..line.len() - 1])?;
            save_section(core::mem::replace(&mut section, next), &mut plan)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(&mut section, &mut plan, key, value)?;
    }

    save_section(section, &mut plan)?;
    Ok(plan)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();

    if header == "plan" {
        return Ok(Section::Plan);
    }

    let label = header
        .strip_prefix("move.")
        .map(str::trim)
        .ok_or(ParseError::InvalidSection)?;
    if label.is_empty() || label.contains('.') {
        return Err(ParseError::InvalidSection);
    }

    let label = HString::try_from(label).map_err(|_| ParseError::LabelTooLong)?;
    Ok(Section::Move(PendingMove {
        label,
        ..PendingMove::default()
    }))
}

fn save_section(section: Section, plan: &mut DrivePlan) -> Result<(), ParseError> {
    if let Section::Move(pending) = section {
        if plan.find_move(pending.label.as_str()).is_some() {
            return Err(ParseError::InvalidSection);
        }
        let m = pending.finish()?;
        plan.moves.push(m).map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(())
}

fn apply_value(
    section: &mut Section,
    plan: &mut DrivePlan,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match section {
        Section::Root => Err(ParseError::UnknownKey),
        Section::Plan => match key {
            "repeat" => {
                plan.repeat = parse_bool(value)?;
                Ok(())
            }
            _ => Err(ParseError::UnknownKey),
        },
        Section::Move(pending) => {
            match key {
                "mode" => {
                    let mode = StepMode::from_name(parse_string(value));
                    pending.mode = Some(mode.ok_or(ParseError::InvalidValue)?);
                }
                "direction" => {
                    let direction = StepDirection::from_name(parse_string(value));
                    pending.direction = Some(direction.ok_or(ParseError::InvalidValue)?);
                }
                "steps" => pending.steps = Some(parse_int(value)?),
                "speed_us" => pending.speed_us = Some(parse_int(value)?),
                "speed_pct" => {
                    let pct: u8 = parse_int(value)?;
                    if pct > 100 {
                        return Err(ParseError::InvalidValue);
                    }
                    pending.speed_pct = Some(pct);
                }
                "pause_ms" => pending.pause_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
            Ok(())
        }
    }
}

/// Split a `key = value` line, dropping any trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value.trim());

    (!key.is_empty() && !value.is_empty()).then_some((key, value))
}

/// Cut a value at the first `#` outside double quotes
fn strip_comment(value: &str) -> &str {
    let mut quoted = false;
    for (pos, c) in value.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '#' if !quoted => return value[..pos].trim_end(),
            _ => {}
        }
    }
    value
}

/// Unquote a string value; bare words pass through
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse an integer, accepting `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: HString<24> = HString::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"
# Curtain demo
[plan]
repeat = true

[move.open]
mode = "quarter"
direction = "forward"
steps = 50
speed_us = 2_000   # fast enough
pause_ms = 500

[move.close]
mode = "full"
direction = "reverse"
steps = 12
speed_pct = 100
"#;

    #[test]
    fn test_parse_plan() {
        let plan = parse_plan(PLAN).unwrap();
        assert!(plan.repeat);
        assert_eq!(plan.moves.len(), 2);

        let open = &plan.moves[0];
        assert_eq!(open.label.as_str(), "open");
        assert_eq!(
            open.request,
            DriveRequest::quarter(50, StepDirection::Forward, 2000)
        );
        assert_eq!(open.pause_ms, 500);

        let close = plan.find_move("close").unwrap();
        assert_eq!(close.request, DriveRequest::full(12, StepDirection::Reverse, 950));
        assert_eq!(close.pause_ms, 0);
    }

    #[test]
    fn test_keys_in_any_order() {
        let plan = parse_plan(
            "[move.x]\nspeed_pct = 0\nsteps = 1\ndirection = turn_left\nmode = quarter\n",
        )
        .unwrap();
        let expected = DriveRequest::quarter(1, StepDirection::TurnLeft, 45_000);
        assert_eq!(plan.moves[0].request, expected);
        assert!(!plan.repeat);
    }

    #[test]
    fn test_half_mode_is_parsed() {
        let half = "[move.h]\nmode = \"half\"\ndirection = \"forward\"\nsteps = 3\n\
                    speed_us = 1000\n";
        let plan = parse_plan(half).unwrap();
        assert_eq!(plan.moves[0].request.mode, StepMode::Half);
        assert!(!plan.all_implemented());
    }

    #[test]
    fn test_missing_fields() {
        let no_speed = "[move.a]\nmode = \"full\"\ndirection = \"forward\"\nsteps = 1\n";
        assert_eq!(parse_plan(no_speed), Err(ParseError::MissingField));

        let no_mode = "[move.a]\ndirection = \"forward\"\nsteps = 1\nspeed_us = 1000\n";
        assert_eq!(parse_plan(no_mode), Err(ParseError::MissingField));
    }

    #[test]
    fn test_conflicting_speeds() {
        let both = "[move.a]\nmode = \"full\"\ndirection = \"forward\"\nsteps = 1\n\
                    speed_us = 1000\nspeed_pct = 5\n";
        assert_eq!(parse_plan(both), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse_plan("[move.a]\nmode = \"eighth\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_plan("[move.a]\nsteps = 70000\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_plan("[move.a]\nspeed_pct = 101\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_plan("[plan]\nrepeat = yes\n"), Err(ParseError::InvalidValue));
        assert_eq!(parse_plan("[plan]\nrepeat\n"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_unknown_keys_and_sections() {
        assert_eq!(parse_plan("steps = 1\n"), Err(ParseError::UnknownKey));
        assert_eq!(parse_plan("[plan]\nloop = true\n"), Err(ParseError::UnknownKey));
        assert_eq!(parse_plan("[move.a]\nturns = 2\n"), Err(ParseError::UnknownKey));
        assert_eq!(parse_plan("[stepper]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_plan("[move.]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_plan("[move.a.b]\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_label_limits() {
        assert_eq!(
            parse_plan("[move.a_label_that_is_too_long]\n"),
            Err(ParseError::LabelTooLong)
        );

        let dup = "[move.a]\nmode = full\ndirection = forward\nsteps = 1\nspeed_us = 1000\n\
                   [move.a]\nmode = full\ndirection = forward\nsteps = 1\nspeed_us = 1000\n";
        assert_eq!(parse_plan(dup), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_too_many_moves() {
        let mut input: HString<1024> = HString::new();
        for i in 0..9 {
            core::fmt::write(
                &mut input,
                format_args!(
                    "[move.m{}]\nmode = full\ndirection = forward\nsteps = 1\nspeed_us = 1000\n",
                    i
                ),
            )
            .unwrap();
        }
        assert_eq!(parse_plan(&input), Err(ParseError::TooManyItems));
    }

    #[test]
    fn test_pass_duration() {
        let plan = parse_plan(PLAN).unwrap();
        // open: 50 * 16 * 2000us + 500ms, close: 12 * 4 * 950us
        assert_eq!(plan.pass_duration_us(), 1_600_000 + 500_000 + 45_600);
    }

    #[test]
    fn test_empty_input() {
        let plan = parse_plan("").unwrap();
        assert!(plan.moves.is_empty());
        assert_eq!(plan.pass_duration_us(), 0);
    }

    #[test]
    fn test_comment_stripping_respects_quotes() {
        assert_eq!(parse_key_value("label = \"a#b\" # note"), Some(("label", "\"a#b\"")));
        assert_eq!(parse_key_value("x = \"a\" # \"b\" # c"), Some(("x", "\"a\"")));
        assert_eq!(parse_key_value("steps = 5 # five"), Some(("steps", "5")));
        assert_eq!(parse_key_value("steps = # none"), None);
    }

    #[test]
    fn test_hash_inside_quoted_value() {
        let plan = "[move.a]\nmode = \"full\" # \"quarter\" later\n\
                    direction = \"turn#left\" # typo\nsteps = 1\nspeed_us = 1000\n";
        assert_eq!(parse_plan(plan), Err(ParseError::InvalidValue));

        let plan = "[move.a]\nmode = \"full\" # \"quarter\" later\n\
                    direction = \"turn_left\" # \"#\"\nsteps = 1\nspeed_us = 1000\n";
        let m = &parse_plan(plan).unwrap().moves[0];
        assert_eq!(m.request.mode, StepMode::Full);
        assert_eq!(m.request.direction, StepDirection::TurnLeft);
    }
}
