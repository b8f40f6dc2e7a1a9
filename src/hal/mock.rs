//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware and notification
//! traits, enabling development and testing on desktop without a motor
//! board attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockChannelIo`] | [`ChannelIo`] | Records pin modes, levels, and writes |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//! | [`MockMonitor`] | [`PowerMonitor`] | Captures power-change notifications |
//!
//! # Example
//!
//! ```rust
//! use rs_trackpower::{ChannelConfig, PowerChannel};
//! use rs_trackpower::hal::{MockChannelIo, MockClock};
//!
//! let mut channel = PowerChannel::new(
//!     MockChannelIo::new(),
//!     MockClock::new(),
//!     ChannelConfig::default(),
//! );
//! channel.setup();
//! channel.power(true, false);
//!
//! // Verify through the mock
//! let enable = channel.config().enable_pin;
//! assert!(channel.io().level(enable));
//! ```
//!
//! [`ChannelIo`]: crate::traits::ChannelIo
//! [`Clock`]: crate::traits::Clock
//! [`PowerMonitor`]: crate::traits::PowerMonitor

use crate::traits::{ChannelIo, Clock, PinId, PowerMonitor};

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock pin I/O for testing.
///
/// Records pin direction configuration and every digital write, and serves
/// analog reads from a queue or a fixed value. Use the inspection helpers
/// to verify state after test operations.
///
/// # Example
///
/// ```rust
/// use rs_trackpower::hal::MockChannelIo;
/// use rs_trackpower::traits::ChannelIo;
///
/// let mut io = MockChannelIo::new();
/// io.set_output(3);
/// io.write_digital(3, true);
///
/// assert!(io.is_output(3));
/// assert!(io.level(3));
/// assert_eq!(io.writes, vec![(3, true)]);
///
/// // Analog samples come from the queue first, then the fixed value
/// io.set_analog(100);
/// io.queue_analog(&[400, 300]);
/// assert_eq!(io.read_analog(0), 400);
/// assert_eq!(io.read_analog(0), 300);
/// assert_eq!(io.read_analog(0), 100);
/// ```
#[derive(Debug, Default)]
pub struct MockChannelIo {
    outputs: Vec<PinId>,
    inputs: Vec<PinId>,
    levels: Vec<(PinId, bool)>,
    /// Value returned by `read_analog` when the queue is empty.
    pub analog_value: u16,
    analog_queue: Vec<u16>,
    /// Every digital write in call order (pin, level).
    pub writes: Vec<(PinId, bool)>,
}

impl MockChannelIo {
    /// Creates a new mock with no configured pins and a zero analog reading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fixed analog reading
    pub fn set_analog(&mut self, value: u16) {
        self.analog_value = value;
    }

    /// Queue analog samples to be returned before the fixed value (FIFO)
    pub fn queue_analog(&mut self, samples: &[u16]) {
        self.analog_queue.extend_from_slice(samples);
    }

    /// Whether the pin was last configured as an output
    pub fn is_output(&self, pin: PinId) -> bool {
        self.outputs.contains(&pin)
    }

    /// Whether the pin was last configured as an input
    pub fn is_input(&self, pin: PinId) -> bool {
        self.inputs.contains(&pin)
    }

    /// Last written level of a pin (false if never written)
    pub fn level(&self, pin: PinId) -> bool {
        self.levels
            .iter()
            .find(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
            .unwrap_or(false)
    }
}

impl ChannelIo for MockChannelIo {
    fn set_output(&mut self, pin: PinId) {
        self.inputs.retain(|p| *p != pin);
        if !self.outputs.contains(&pin) {
            self.outputs.push(pin);
        }
    }

    fn set_input(&mut self, pin: PinId) {
        self.outputs.retain(|p| *p != pin);
        if !self.inputs.contains(&pin) {
            self.inputs.push(pin);
        }
    }

    fn write_digital(&mut self, pin: PinId, high: bool) {
        self.writes.push((pin, high));
        if let Some(entry) = self.levels.iter_mut().find(|(p, _)| *p == pin) {
            entry.1 = high;
        } else {
            self.levels.push((pin, high));
        }
    }

    fn read_digital(&self, pin: PinId) -> bool {
        self.level(pin)
    }

    fn read_analog(&mut self, _pin: PinId) -> u16 {
        if self.analog_queue.is_empty() {
            self.analog_value
        } else {
            self.analog_queue.remove(0)
        }
    }
}

/// Mock clock for testing.
///
/// Provides a controllable time source for testing time-dependent behavior.
///
/// # Example
///
/// ```rust
/// use rs_trackpower::hal::MockClock;
/// use rs_trackpower::traits::Clock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Debug)]
pub struct MockClock {
    current_ms: u64,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self { current_ms: 0 }
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&mut self, ms: u64) {
        self.current_ms += ms;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms
    }
}

// ============================================================================
// Notification Mocks
// ============================================================================

/// Mock power monitor for testing.
///
/// Records every power-change notification in call order.
///
/// # Example
///
/// ```rust
/// use rs_trackpower::hal::MockMonitor;
/// use rs_trackpower::traits::PowerMonitor;
///
/// let mut monitor = MockMonitor::new();
/// monitor.power_changed("MAIN", true);
/// monitor.power_changed("MAIN", false);
///
/// assert_eq!(monitor.events.len(), 2);
/// assert_eq!(monitor.last_change(), Some(("MAIN", false)));
/// ```
#[derive(Debug, Default)]
pub struct MockMonitor {
    /// Notifications received, in call order (channel name, power state).
    pub events: Vec<(String, bool)>,
}

impl MockMonitor {
    /// Creates a new monitor with no recorded events.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent notification, if any
    pub fn last_change(&self) -> Option<(&str, bool)> {
        self.events.last().map(|(name, on)| (name.as_str(), *on))
    }
}

impl PowerMonitor for MockMonitor {
    fn power_changed(&mut self, name: &str, on: bool) {
        self.events.push((name.into(), on));
    }
}

// ============================================================================
// Tests
// ============================================================================
