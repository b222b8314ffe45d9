//! Coilstep - Two-coil stepper sequencer firmware
//!
//! Main firmware binary for RP2040 boards driving a bipolar stepper through
//! two PBL3717-style driver pairs. Each driver pair hangs off a six-line
//! port; the phase table is walked with a busy-wait between writes.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use coilstep_core::Sequencer;
use coilstep_drivers::port::PinPort;

mod config;
mod tasks;

/// Drive plan compiled into the firmware
/// Edit plan.toml and rebuild to change it
const EMBEDDED_PLAN: &str = include_str!("../plan.toml");

/// Lines per coil port: PHASE, I0, I1 for each of two drivers
pub const PORT_LINES: usize = 6;

/// One coil port made of RP2040 GPIO outputs
pub type CoilPort = PinPort<Output<'static>, PORT_LINES>;

/// Sequencer as wired on the board
pub type BoardSequencer = Sequencer<CoilPort, CoilPort, Delay>;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Coilstep firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let plan = match config::load_plan(EMBEDDED_PLAN) {
        Ok(plan) => plan,
        Err(e) => {
            error!("Drive plan rejected: {}", e);
            loop {
                Timer::after_secs(60).await;
            }
        }
    };

    // Port A: GP2..GP7, port B: GP8..GP13, bit k on the k-th pin.
    // Pins come up at the no-current pattern: PHASE low, I0/I1 high.
    let port_a = PinPort::with_idle(
        [
            Output::new(p.PIN_2, Level::Low),
            Output::new(p.PIN_3, Level::High),
            Output::new(p.PIN_4, Level::High),
            Output::new(p.PIN_5, Level::Low),
            Output::new(p.PIN_6, Level::High),
            Output::new(p.PIN_7, Level::High),
        ],
        tasks::RELEASED_PATTERN,
    );
    let port_b = PinPort::with_idle(
        [
            Output::new(p.PIN_8, Level::Low),
            Output::new(p.PIN_9, Level::High),
            Output::new(p.PIN_10, Level::High),
            Output::new(p.PIN_11, Level::Low),
            Output::new(p.PIN_12, Level::High),
            Output::new(p.PIN_13, Level::High),
        ],
        tasks::RELEASED_PATTERN,
    );

    // Stop button to ground
    let mut stop = Input::new(p.PIN_14, Pull::Up);

    let mut sequencer: BoardSequencer = Sequencer::new(port_a, port_b, Delay);
    // Latched while the ports are still inputs, driven by init
    tasks::release_coils(&mut sequencer);
    sequencer.init();
    info!("Ports configured as outputs, coils released");

    tasks::run_plan(&mut sequencer, &plan, &mut stop).await;
}
