//! Drive plan loading
//!
//! The plan is compiled in from plan.toml and parsed with the core's
//! no_std parser. build.rs has already checked it, so a parse failure here
//! means the parser and the build script disagree.

use defmt::*;

use coilstep_core::config::{parse_plan, DrivePlan, ParseError};

/// Parse the embedded plan and log what it contains
pub fn load_plan(source: &str) -> Result<DrivePlan, ParseError> {
    let plan = parse_plan(source)?;
    log_plan_summary(&plan);
    Ok(plan)
}

fn log_plan_summary(plan: &DrivePlan) {
    info!(
        "Drive plan: {} moves, repeat={}, ~{} ms per pass",
        plan.moves.len(),
        plan.repeat,
        plan.pass_duration_us() / 1_000
    );

    for m in plan.moves.iter() {
        let req = &m.request;
        debug!(
            "  [move.{}] {} {} x{} @ {} us, pause {} ms",
            m.label.as_str(),
            req.mode.as_str(),
            req.direction.as_str(),
            req.step_count,
            req.speed_us,
            m.pause_ms
        );
        if !req.mode.is_implemented() {
            warn!("  [move.{}] mode has no phase table, it will be skipped", m.label.as_str());
        } else if !req.is_within_rated_speed() {
            warn!("  [move.{}] speed outside rated range", m.label.as_str());
        }
    }
}
