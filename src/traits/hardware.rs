//! Hardware abstraction traits for pin I/O, current sensing, and timing.
//!
//! This module defines the hardware seam that allows rs-trackpower to
//! drive a real motor board on ESP32 while remaining fully testable on
//! desktop.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`ChannelIo`] | Pin-level digital I/O and analog current sense |
//! | [`Clock`] | Monotonic millisecond time source for `no_std` environments |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations from
//! [`crate::hal::mock`]. For ESP32 hardware, use the implementations from
//! `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_trackpower::traits::ChannelIo;
//! use rs_trackpower::hal::MockChannelIo;
//!
//! let mut io = MockChannelIo::new();
//! io.set_output(3);
//! io.write_digital(3, true);
//! assert!(io.read_digital(3));
//! ```

/// Hardware pin identifier.
///
/// Matches the flat numbering used by the board's pin map. Which numbers are
/// valid is a property of the [`ChannelIo`] implementation, not of this crate.
pub type PinId = u8;

/// Pin-level hardware I/O for one output channel.
///
/// Abstracts the digital lines (enable, signal, cutout) and the analog
/// current-sense input of a motor board channel. All operations are
/// infallible at this layer: a board whose pin writes can fail should
/// handle that below this seam.
///
/// # Implementation Notes
///
/// - `read_digital` must return the real pin level, not a cached value.
///   The channel uses it as ground truth for "is the output energized".
/// - `read_analog` returns one instantaneous sample; smoothing happens
///   in the channel, not here.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_trackpower::traits::{ChannelIo, PinId};
///
/// struct MyBoard { /* register handles */ }
///
/// impl ChannelIo for MyBoard {
///     fn set_output(&mut self, pin: PinId) { /* direction register */ }
///     fn set_input(&mut self, pin: PinId) { /* direction register */ }
///     fn write_digital(&mut self, pin: PinId, high: bool) { /* port write */ }
///     fn read_digital(&self, pin: PinId) -> bool { /* port read */ true }
///     fn read_analog(&mut self, pin: PinId) -> u16 { /* ADC read */ 0 }
/// }
/// ```
pub trait ChannelIo {
    /// Configure a pin as a digital output.
    fn set_output(&mut self, pin: PinId);

    /// Configure a pin as an input.
    fn set_input(&mut self, pin: PinId);

    /// Drive a digital output pin high or low.
    fn write_digital(&mut self, pin: PinId, high: bool);

    /// Read the current level of a pin.
    fn read_digital(&self, pin: PinId) -> bool;

    /// Read one raw analog sample from a pin.
    ///
    /// No averaging. The range depends on the board's ADC resolution.
    fn read_analog(&mut self, pin: PinId) -> u16;
}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds for overload timing. On desktop,
/// this can wrap `std::time::Instant`. On embedded, use a hardware timer.
///
/// # Example
///
/// ```rust
/// use rs_trackpower::traits::Clock;
/// use rs_trackpower::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestIo {
        last_mode: Option<(PinId, bool)>, // (pin, is_output)
        last_write: Option<(PinId, bool)>,
        level: bool,
        analog: u16,
    }

    impl TestIo {
        fn new() -> Self {
            Self {
                last_mode: None,
                last_write: None,
                level: false,
                analog: 0,
            }
        }
    }

    impl ChannelIo for TestIo {
        fn set_output(&mut self, pin: PinId) {
            self.last_mode = Some((pin, true));
        }

        fn set_input(&mut self, pin: PinId) {
            self.last_mode = Some((pin, false));
        }

        fn write_digital(&mut self, pin: PinId, high: bool) {
            self.last_write = Some((pin, high));
            self.level = high;
        }

        fn read_digital(&self, _pin: PinId) -> bool {
            self.level
        }

        fn read_analog(&mut self, _pin: PinId) -> u16 {
            self.analog
        }
    }

    #[test]
    fn channel_io_direction_calls() {
        let mut io = TestIo::new();
        io.set_output(7);
        assert_eq!(io.last_mode, Some((7, true)));

        io.set_input(2);
        assert_eq!(io.last_mode, Some((2, false)));
    }

    #[test]
    fn channel_io_write_read_roundtrip() {
        let mut io = TestIo::new();
        io.write_digital(5, true);
        assert_eq!(io.last_write, Some((5, true)));
        assert!(io.read_digital(5));

        io.write_digital(5, false);
        assert!(!io.read_digital(5));
    }

    #[test]
    fn channel_io_analog_sample() {
        let mut io = TestIo::new();
        io.analog = 512;
        assert_eq!(io.read_analog(0), 512);
    }
}
