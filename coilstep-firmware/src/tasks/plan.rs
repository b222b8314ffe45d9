//! Drive plan runner
//!
//! Walks the plan's moves in order. The stop button is sampled before every
//! pattern write; a press releases both coils and parks the runner until the
//! button is pressed again, then the plan starts over from its first move.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use coilstep_core::config::DrivePlan;
use coilstep_drivers::stepper::{decode, encode, CoilPair};
use coilstep_hal::Port;

use crate::BoardSequencer;

/// Button bounce settle time
const DEBOUNCE_MS: u64 = 20;

/// Port byte with I0 = I1 = H on both drivers, no current through either coil
pub const RELEASED_PATTERN: u8 = encode(CoilPair::RELEASED);

/// Write the no-current pattern to both ports
pub fn release_coils(sequencer: &mut BoardSequencer) {
    let (a, b) = sequencer.ports_mut();
    a.write(RELEASED_PATTERN);
    b.write(RELEASED_PATTERN);
}

/// Run the plan once, or forever if it repeats
pub async fn run_plan(sequencer: &mut BoardSequencer, plan: &DrivePlan, stop: &mut Input<'static>) {
    info!("Plan runner started");

    'pass: loop {
        for m in plan.moves.iter() {
            let label = m.label.as_str();

            match sequencer.drive_until(&m.request, || stop.is_low()) {
                Ok(report) if report.cancelled => {
                    warn!(
                        "[move.{}] stopped after {} traversals ({} writes)",
                        label, report.traversals, report.writes
                    );
                    release_coils(sequencer);
                    wait_for_restart(stop).await;
                    info!("Restarting plan");
                    continue 'pass;
                }
                Ok(report) => {
                    debug!("[move.{}] done: {} traversals", label, report.traversals);
                    debug!(
                        "  holding A={} B={}",
                        decode(sequencer.port_a().output()),
                        decode(sequencer.port_b().output())
                    );
                }
                Err(e) => {
                    warn!("[move.{}] skipped: {}", label, e);
                }
            }

            if m.pause_ms > 0 {
                Timer::after_millis(u64::from(m.pause_ms)).await;
            }
        }

        if !plan.repeat {
            break;
        }
    }

    release_coils(sequencer);
    info!("Drive plan finished");

    loop {
        Timer::after_secs(60).await;
    }
}

/// Wait for the stop button to be let go and pressed again
async fn wait_for_restart(stop: &mut Input<'static>) {
    stop.wait_for_high().await;
    Timer::after_millis(DEBOUNCE_MS).await;
    info!("Stopped; press the button again to restart");

    stop.wait_for_low().await;
    Timer::after_millis(DEBOUNCE_MS).await;
    stop.wait_for_high().await;
    Timer::after_millis(DEBOUNCE_MS).await;
}
