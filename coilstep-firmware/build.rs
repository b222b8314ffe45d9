//! Build script for coilstep-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates plan.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use coilstep_core::config::{parse_plan, DrivePlan};
use coilstep_core::{StepDirection, StepMode};
use serde::Deserialize;

/// A `[move.*]` table as serde sees it
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMove {
    mode: StepMode,
    direction: StepDirection,
    steps: u16,
    speed_us: Option<u32>,
    speed_pct: Option<u8>,
    #[serde(default)]
    pause_ms: u32,
}

fn main() {
    setup_linker();
    validate_plan();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate plan.toml at compile time
fn validate_plan() {
    println!("cargo:rerun-if-changed=plan.toml");

    let plan_path = Path::new("plan.toml");

    if !plan_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: plan.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware compiles in a plan.toml drive plan.                ║\n\
            ║  Please create one in the coilstep-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(plan_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read plan.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax
    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail("Invalid TOML syntax in plan.toml", &[e.to_string()]),
    };

    // Semantics, with the same parser the firmware runs
    let plan = match parse_plan(&content) {
        Ok(plan) => plan,
        Err(e) => fail("Drive plan rejected by parser", &[e.to_string()]),
    };

    let errors = cross_check(&value, &plan);
    if !errors.is_empty() {
        fail("Invalid move configuration", &errors);
    }

    for m in plan.moves.iter() {
        if !m.request.mode.is_implemented() {
            println!(
                "cargo:warning=[move.{}] uses mode '{}', which drives nothing",
                m.label,
                m.request.mode.as_str()
            );
        } else if !m.request.is_within_rated_speed() {
            println!(
                "cargo:warning=[move.{}] speed_us = {} is outside the rated range for '{}'",
                m.label,
                m.request.speed_us,
                m.request.mode.as_str()
            );
        }
    }

    println!(
        "cargo:warning=plan.toml validated successfully ({} moves)",
        plan.moves.len()
    );
}

/// Compare the firmware parser's view of every move against a serde decode
fn cross_check(value: &toml::Value, plan: &DrivePlan) -> Vec<String> {
    let mut errors = Vec::new();

    let moves = match value.get("move") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[move] must be a table of [move.<label>] sections".to_string());
            return errors;
        }
        None => {
            errors.push("Missing [move.*] section - at least one move is required".to_string());
            return errors;
        }
    };

    if moves.len() != plan.moves.len() {
        errors.push(format!(
            "parser found {} moves, toml found {}",
            plan.moves.len(),
            moves.len()
        ));
    }

    for (label, table) in moves {
        let raw: RawMove = match table.clone().try_into() {
            Ok(raw) => raw,
            Err(e) => {
                errors.push(format!("[move.{}] {}", label, e));
                continue;
            }
        };

        let Some(parsed) = plan.find_move(label) else {
            errors.push(format!("[move.{}] missing from parsed plan", label));
            continue;
        };

        let req = &parsed.request;
        if req.mode != raw.mode {
            errors.push(format!("[move.{}] mode mismatch", label));
        }
        if req.direction != raw.direction {
            errors.push(format!("[move.{}] direction mismatch", label));
        }
        if req.step_count != raw.steps {
            errors.push(format!("[move.{}] steps mismatch", label));
        }
        if parsed.pause_ms != raw.pause_ms {
            errors.push(format!("[move.{}] pause_ms mismatch", label));
        }
        match (raw.speed_us, raw.speed_pct) {
            (Some(us), None) if us != req.speed_us => {
                errors.push(format!("[move.{}] speed_us mismatch", label));
            }
            (None, Some(pct)) if pct > 100 => {
                errors.push(format!("[move.{}] speed_pct must be 0-100", label));
            }
            _ => {}
        }
    }

    errors
}

/// Panic with a boxed error report
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .flat_map(|e| e.lines())
            .map(|line| {
                let truncated = if line.len() > 62 {
                    format!("{}...", &line[..59])
                } else {
                    line.to_string()
                };
                format!("║  • {:<62} ║", truncated)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}
