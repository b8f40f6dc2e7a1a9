//! ESP32-C3 track-power channel controller.
//!
//! This is the main entry point for the physical hardware controller.
//! It runs a 1kHz control loop that:
//! - Polls the overload protection state machine
//! - Reports power-state changes (including overload trips and retries)
//! - Prints the smoothed track current periodically
//!
//! # Hardware Setup
//!
//! Defaults match an Arduino motor shield wired to the dev board:
//! - GPIO3 → enable (PWM), GPIO12 → direction, GPIO9 → brake
//! - GPIO0 → current sense (ADC1 channel 0)
//!
//! # Build
//!
//! ```bash
//! cargo build --features esp32 --bin esp32_main
//! ```

use rs_trackpower::hal::esp32::{Esp32ChannelIo, Esp32Clock};
use rs_trackpower::{ChannelConfig, PowerChannel};
use std::thread;
use std::time::Duration;

/// Main loop interval in milliseconds
const LOOP_INTERVAL_MS: u64 = 1;

/// Status print interval in loop ticks (every 5000 ticks = 5s at 1kHz)
const STATUS_INTERVAL: u32 = 5000;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();

    println!();
    println!("================================");
    println!("  rs-trackpower Channel Driver");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = ChannelConfig::default()
        .with_name("MAIN")
        .with_pins(3, 12, 9, 0)
        .with_scale(488, 1000) // 12-bit ADC over 3.3V, 1.65V/A sense
        .with_current_trip_ma(2000);

    // =========================================================================
    // Initialize Channel (GPIO3/12/9, ADC on GPIO0)
    // =========================================================================
    let io = Esp32ChannelIo::new(config.sense_pin)?;
    let clock = Esp32Clock::new();

    let monitor = |name: &str, on: bool| {
        println!("Track power {}: {}", name, if on { "ON" } else { "OFF" });
    };

    let mut channel = PowerChannel::with_monitor(io, clock, config, monitor);
    channel.setup();
    println!("[OK] Channel initialized (GPIO3/12/9, sense GPIO0)");

    let idle_ma = channel.capture_baseline();
    println!("[OK] Baseline current: {}mA", idle_ma);

    channel.power(true, true);

    println!();
    println!("Starting control loop (1kHz)...");
    println!();

    let mut status_tick_counter: u32 = 0;

    // =========================================================================
    // Main Control Loop (1kHz)
    // =========================================================================
    loop {
        // ---------------------------------------------------------------------
        // Overload protection
        // ---------------------------------------------------------------------
        channel.check_overload();

        // ---------------------------------------------------------------------
        // Periodic status
        // ---------------------------------------------------------------------
        status_tick_counter += 1;
        if status_tick_counter >= STATUS_INTERVAL {
            status_tick_counter = 0;
            let state = channel.state();
            println!(
                "Current: {}mA  power={} tripped={}",
                state.current_ma, state.enabled, state.tripped
            );
        }

        // Sleep until next tick
        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
