//! # rs-trackpower
//!
//! A track-power output channel driver for model-railroad command stations,
//! with overload trip/retry protection.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for pin I/O, current sensing, and timing
//! - **Overload protection**: Smoothed current sensing with automatic trip and
//!   retry after a cool-down
//! - **Programming-track support**: A lower current ceiling while a decoder is
//!   being programmed, with a configurable grace window
//! - **Host notifications**: Power-change callbacks for the surrounding
//!   command-station logic
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and notification abstractions
//! - `config` - Per-channel pin roles, calibration, and thresholds
//! - `channel` - The power channel controller and protection state machine
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_trackpower::{ChannelConfig, PowerChannel};
//! use rs_trackpower::hal::{MockChannelIo, MockClock};
//!
//! // Create a channel with mock hardware
//! let config = ChannelConfig::default().with_name("MAIN");
//! let mut channel = PowerChannel::new(MockChannelIo::new(), MockClock::new(), config);
//!
//! // Bring the output up
//! channel.setup();
//! channel.power(true, false);
//! assert!(channel.status());
//!
//! // Poll the protection state machine from your main loop
//! channel.clock_mut().advance(1);
//! channel.check_overload();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Power channel controller and overload protection state machine.
pub mod channel;
/// Per-channel configuration: pin roles, calibration, and thresholds.
pub mod config;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Core traits for hardware abstraction and host notification.
pub mod traits;

// Re-exports for convenience
pub use channel::{ChannelState, PowerChannel};
pub use config::{name_string, ChannelConfig, NameString, MAX_NAME};
pub use traits::{ChannelIo, Clock, NullMonitor, PinId, PowerMonitor};
