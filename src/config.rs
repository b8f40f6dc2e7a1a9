//! Static configuration for a track-power channel.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_trackpower::config::ChannelConfig;
//!
//! // Arduino motor shield defaults
//! let config = ChannelConfig::default();
//!
//! // Or customize for a programming track
//! let config = ChannelConfig::default()
//!     .with_name("PROG")
//!     .with_pins(11, 13, 8, 1)
//!     .with_current_trip_ma(2000)
//!     .with_prog_trip_time_ms(100);
//! ```

use heapless::String as HString;

/// Maximum length for channel names
pub const MAX_NAME: usize = 64;

/// Type alias for channel name strings
pub type NameString = HString<MAX_NAME>;

/// Create a NameString from a &str, truncating if too long
pub fn name_string(s: &str) -> NameString {
    let mut hs = NameString::new();
    // Take only what fits
    let take = s.len().min(MAX_NAME);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, _)| *i < take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Channel Config
// ============================================================================

/// Configuration for one track-power output channel.
///
/// Immutable once the channel is constructed. Calibration defaults match the
/// Arduino motor shield: 10-bit ADC over 5 V with a 1.65 V/A sense output,
/// which works out to roughly 2.99 mA per count.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelConfig {
    /// Channel name, reported in power-change notifications
    pub name: NameString,
    /// Pin driving the H-bridge enable line
    pub enable_pin: u8,
    /// Pin driving the direction/signal line
    pub signal_a_pin: u8,
    /// Pin driving the cutout (brake) line
    pub signal_b_pin: u8,
    /// Analog input wired to the current sense output
    pub sense_pin: u8,
    /// Numerator of the raw-to-milliamps conversion
    pub scale_factor: u16,
    /// Denominator of the raw-to-milliamps conversion
    pub scale_divisor: u16,
    /// Overcurrent trip threshold in milliamps
    pub current_trip_ma: u16,
    /// How long after entering programming mode the lower trip threshold
    /// applies, in milliseconds (0 = always while in programming mode)
    pub prog_trip_time_ms: u32,
    /// Preamble bit count used in programming mode
    pub prog_preambles: u8,
    /// Preamble bit count used in normal operation
    pub main_preambles: u8,
    /// Minimum interval between current samples in milliseconds
    pub sample_interval_ms: u32,
    /// Exponential smoothing factor applied to raw samples (0.0 to 1.0)
    pub smoothing: f32,
    /// Cool-down before a tripped channel retries power, in milliseconds
    pub retry_ms: u32,
    /// Trip threshold in milliamps while current limiting is active
    pub prog_trip_ma: u16,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: name_string("MAIN"),
            enable_pin: 3,
            signal_a_pin: 12,
            signal_b_pin: 9,
            sense_pin: 0,
            scale_factor: 299,
            scale_divisor: 100,
            current_trip_ma: 2000,
            prog_trip_time_ms: 100,
            prog_preambles: 22,
            main_preambles: 16,
            sample_interval_ms: 1,
            smoothing: 0.01,
            retry_ms: 10_000,
            prog_trip_ma: 250,
        }
    }
}

impl ChannelConfig {
    /// Set the channel name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name_string(name);
        self
    }

    /// Set the enable, signal-A, signal-B, and sense pins
    pub fn with_pins(mut self, enable: u8, signal_a: u8, signal_b: u8, sense: u8) -> Self {
        self.enable_pin = enable;
        self.signal_a_pin = signal_a;
        self.signal_b_pin = signal_b;
        self.sense_pin = sense;
        self
    }

    /// Set the raw-to-milliamps calibration factor and divisor
    pub fn with_scale(mut self, factor: u16, divisor: u16) -> Self {
        self.scale_factor = factor;
        self.scale_divisor = divisor;
        self
    }

    /// Set the overcurrent trip threshold
    pub fn with_current_trip_ma(mut self, ma: u16) -> Self {
        self.current_trip_ma = ma;
        self
    }

    /// Set the programming-mode grace window duration
    pub fn with_prog_trip_time_ms(mut self, ms: u32) -> Self {
        self.prog_trip_time_ms = ms;
        self
    }

    /// Set the programming and main preamble counts
    pub fn with_preambles(mut self, prog: u8, main: u8) -> Self {
        self.prog_preambles = prog;
        self.main_preambles = main;
        self
    }

    /// Set the minimum current sampling interval
    pub fn with_sample_interval_ms(mut self, ms: u32) -> Self {
        self.sample_interval_ms = ms;
        self
    }

    /// Set the exponential smoothing factor
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    /// Set the overload retry cool-down
    pub fn with_retry_ms(mut self, ms: u32) -> Self {
        self.retry_ms = ms;
        self
    }

    /// Set the current-limiting trip threshold
    pub fn with_prog_trip_ma(mut self, ma: u16) -> Self {
        self.prog_trip_ma = ma;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
