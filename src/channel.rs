//! Track-power channel controller with overload protection.
//!
//! This module provides [`PowerChannel`], the central component that drives
//! one motor-board output: the enable line, the direction/signal line, the
//! cutout line, and the analog current sense.
//!
//! # Overview
//!
//! The power channel:
//! - Energizes and de-energizes the track output
//! - Smooths the current-sense reading and converts it to milliamps
//! - Trips the output on overcurrent and retries after a cool-down
//! - Applies a lower current ceiling while a programming track is active
//! - Notifies the host of every announced power change
//!
//! # Example
//!
//! ```rust
//! use rs_trackpower::{ChannelConfig, PowerChannel};
//! use rs_trackpower::hal::{MockChannelIo, MockClock};
//!
//! let config = ChannelConfig::default();
//! let mut channel = PowerChannel::new(MockChannelIo::new(), MockClock::new(), config);
//!
//! channel.setup();
//! channel.power(true, false);
//! assert!(channel.status());
//!
//! // Main loop - poll the protection state machine
//! channel.clock_mut().advance(2);
//! channel.check_overload();
//! assert!(!channel.is_tripped());
//! ```
//!
//! # Overload Handling
//!
//! `check_overload()` must be polled from the control loop. When the smoothed
//! current exceeds the trip threshold it cuts power, announces the change,
//! and retries automatically once the current has fallen and the cool-down
//! has elapsed:
//!
//! ```rust
//! use rs_trackpower::{ChannelConfig, PowerChannel};
//! use rs_trackpower::hal::{MockChannelIo, MockClock, MockMonitor};
//!
//! let config = ChannelConfig::default().with_current_trip_ma(1000);
//! let mut channel = PowerChannel::with_monitor(
//!     MockChannelIo::new(),
//!     MockClock::new(),
//!     config,
//!     MockMonitor::new(),
//! );
//! channel.setup();
//! channel.power(true, false);
//!
//! // A dead short: full-scale sense reading every sample
//! channel.io_mut().set_analog(1023);
//! for _ in 0..600 {
//!     channel.clock_mut().advance(1);
//!     channel.check_overload();
//! }
//!
//! assert!(channel.is_tripped());
//! assert!(!channel.status());
//! assert_eq!(channel.monitor().events.last().map(|(_, on)| *on), Some(false));
//! ```

use crate::config::ChannelConfig;
use crate::traits::{ChannelIo, Clock, NullMonitor, PowerMonitor};

/// One track-power output channel.
///
/// Owns its pin roles and calibration (via [`ChannelConfig`]) and the
/// injected hardware I/O, clock, and power monitor. All timing is derived
/// from the clock on each call; the channel never blocks or sleeps.
///
/// # Type Parameters
///
/// - `IO`: Hardware pin I/O ([`ChannelIo`] trait)
/// - `C`: Monotonic time source ([`Clock`] trait)
/// - `N`: Power-change receiver ([`PowerMonitor`] trait, defaults to
///   [`NullMonitor`])
///
/// # Thread Safety
///
/// The channel is not thread-safe; it expects exactly one caller polling it
/// cooperatively, the way the command station's main loop runs each board.
pub struct PowerChannel<IO: ChannelIo, C: Clock, N: PowerMonitor = NullMonitor> {
    config: ChannelConfig,
    io: IO,
    clock: C,
    monitor: N,
    enabled: bool,
    in_prog_mode: bool,
    tripped: bool,
    smoothed_raw: f32,
    last_sample_ms: u64,
    last_trip_ms: u64,
    prog_armed_ms: u64,
    base_current_ma: u16,
}

impl<IO: ChannelIo, C: Clock> PowerChannel<IO, C> {
    /// Create a channel without a power monitor.
    pub fn new(io: IO, clock: C, config: ChannelConfig) -> Self {
        Self::with_monitor(io, clock, config, NullMonitor)
    }
}

impl<IO: ChannelIo, C: Clock, N: PowerMonitor> PowerChannel<IO, C, N> {
    /// Create a channel that reports power changes to `monitor`.
    pub fn with_monitor(io: IO, clock: C, config: ChannelConfig, monitor: N) -> Self {
        Self {
            config,
            io,
            clock,
            monitor,
            enabled: false,
            in_prog_mode: false,
            tripped: false,
            smoothed_raw: 0.0,
            last_sample_ms: 0,
            last_trip_ms: 0,
            prog_armed_ms: 0,
            base_current_ma: 0,
        }
    }

    /// Configure pin directions and return the channel to a de-energized,
    /// untripped state.
    ///
    /// Idempotent; safe to call again at any point.
    pub fn setup(&mut self) {
        self.io.set_output(self.config.enable_pin);
        self.io.write_digital(self.config.enable_pin, false);

        self.io.set_output(self.config.signal_a_pin);
        self.io.write_digital(self.config.signal_a_pin, false);

        self.io.set_output(self.config.signal_b_pin);
        self.io.write_digital(self.config.signal_b_pin, false);

        self.io.set_input(self.config.sense_pin);

        self.enabled = false;
        self.tripped = false;
    }

    /// Channel name, as reported in power-change notifications.
    #[inline]
    pub fn name(&self) -> &str {
        self.config.name.as_str()
    }

    /// Energize or de-energize the track output.
    ///
    /// While in programming mode, every power transition re-arms the
    /// limited-current grace window, so each power-up restarts the window.
    /// If `announce` is true the monitor is invoked with `(name, on)`.
    /// Does not change the tripped flag.
    pub fn power(&mut self, on: bool, announce: bool) {
        if self.in_prog_mode {
            self.prog_armed_ms = self.clock.now_ms();
        }

        self.io.write_digital(self.config.enable_pin, on);
        self.enabled = on;

        if announce {
            self.monitor.power_changed(self.config.name.as_str(), on);
        }
    }

    /// Enter or leave programming mode.
    ///
    /// Programming mode only changes which trip threshold and preamble count
    /// apply. Entering it arms the limited-current grace window.
    pub fn set_programming_mode(&mut self, on: bool) {
        if on && !self.in_prog_mode {
            self.prog_armed_ms = self.clock.now_ms();
        }
        self.in_prog_mode = on;
    }

    /// Write the direction value to the signal line.
    pub fn drive_signal(&mut self, direction: bool) {
        self.io.write_digital(self.config.signal_a_pin, direction);
    }

    /// Open or close the RailCom cutout window on the cutout line.
    pub fn set_cutout(&mut self, on: bool) {
        self.io.write_digital(self.config.signal_b_pin, on);
    }

    /// Physically read the enable pin.
    ///
    /// Ground truth for "is the output energized", independent of the cached
    /// [`is_enabled`](Self::is_enabled) flag.
    pub fn status(&self) -> bool {
        self.io.read_digital(self.config.enable_pin)
    }

    /// Preamble bit count for the active mode.
    pub fn preamble_count(&self) -> u8 {
        if self.in_prog_mode {
            self.config.prog_preambles
        } else {
            self.config.main_preambles
        }
    }

    // ========================================================================
    // Current Sensing
    // ========================================================================

    /// One instantaneous raw sample from the sense pin. No averaging.
    pub fn read_raw_current(&mut self) -> u16 {
        self.io.read_analog(self.config.sense_pin)
    }

    /// Convert a raw sense reading to milliamps.
    ///
    /// `raw * scale_factor / scale_divisor`, with the product widened to
    /// `u32` so it cannot overflow before the division. Truncating.
    pub fn current_from_raw(&self, raw: u16) -> u16 {
        (u32::from(raw) * u32::from(self.config.scale_factor)
            / u32::from(self.config.scale_divisor)) as u16
    }

    /// Read the sense pin and convert to milliamps.
    pub fn current_ma(&mut self) -> u16 {
        let raw = self.read_raw_current();
        self.current_from_raw(raw)
    }

    /// Milliamp value of the smoothed reading from the last sampling tick.
    pub fn smoothed_current_ma(&self) -> u16 {
        self.current_from_raw(self.smoothed_raw as u16)
    }

    /// Snapshot the present current reading as the zero-offset baseline.
    ///
    /// Returns the captured value; it stays available via
    /// [`baseline`](Self::baseline) until the next capture.
    pub fn capture_baseline(&mut self) -> u16 {
        self.base_current_ma = self.current_ma();
        self.base_current_ma
    }

    /// The baseline captured by [`capture_baseline`](Self::capture_baseline).
    pub fn baseline(&self) -> u16 {
        self.base_current_ma
    }

    // ========================================================================
    // Overload Protection
    // ========================================================================

    /// Poll the overload protection state machine.
    ///
    /// Call frequently from the control loop; non-blocking. At most one
    /// current sample is taken per sampling interval. On a sampling tick the
    /// smoothed reading is updated and compared against the effective trip
    /// threshold: an enabled channel above the threshold is cut off and
    /// marked tripped; a tripped channel below the threshold is re-energized
    /// once the retry cool-down has elapsed. Both transitions announce
    /// through the monitor.
    pub fn check_overload(&mut self) {
        let now = self.clock.now_ms();

        // Sampling gate: at most one smoothing update per interval.
        if now.saturating_sub(self.last_sample_ms) < u64::from(self.config.sample_interval_ms) {
            return;
        }
        self.last_sample_ms = now;

        let raw = self.io.read_analog(self.config.sense_pin);
        let alpha = self.config.smoothing;
        self.smoothed_raw = f32::from(raw) * alpha + self.smoothed_raw * (1.0 - alpha);
        let current = self.current_from_raw(self.smoothed_raw as u16);

        let current_trip = if self.is_current_limiting() {
            self.config.prog_trip_ma
        } else {
            self.config.current_trip_ma
        };

        if current > current_trip && self.status() {
            self.power(false, true);
            self.tripped = true;
            self.last_trip_ms = now;
        } else if current < current_trip
            && self.tripped
            && now.saturating_sub(self.last_trip_ms) > u64::from(self.config.retry_ms)
        {
            self.power(true, true);
            self.tripped = false;
        }
    }

    /// Whether the lower programming-track current ceiling applies.
    ///
    /// True while programming mode is active and the grace window since the
    /// last arm (mode entry or power transition) has not elapsed. A window
    /// of 0 means "always limit while in programming mode".
    pub fn is_current_limiting(&self) -> bool {
        if !self.in_prog_mode {
            return false;
        }
        let window = self.config.prog_trip_time_ms;
        window == 0
            || self.clock.now_ms().saturating_sub(self.prog_armed_ms) < u64::from(window)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Last commanded enable state (source of truth for "is power on").
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the channel is currently tripped on overcurrent.
    #[inline]
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Whether programming mode is active.
    #[inline]
    pub fn in_programming_mode(&self) -> bool {
        self.in_prog_mode
    }

    /// The channel configuration.
    #[inline]
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Borrow the hardware I/O.
    #[inline]
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Mutably borrow the hardware I/O.
    #[inline]
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Mutably borrow the clock.
    #[inline]
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Borrow the power monitor.
    #[inline]
    pub fn monitor(&self) -> &N {
        &self.monitor
    }

    /// Get the current state for UI/API
    pub fn state(&self) -> ChannelState {
        ChannelState {
            enabled: self.enabled,
            tripped: self.tripped,
            programming_mode: self.in_prog_mode,
            current_ma: self.smoothed_current_ma(),
            base_current_ma: self.base_current_ma,
        }
    }
}

/// State snapshot for UI/API.
///
/// Contains the channel state a host renders or publishes upstream.
/// Implements `serde::Serialize` when the `serde` feature is enabled.
///
/// # Example
///
/// ```rust
/// use rs_trackpower::{ChannelConfig, PowerChannel};
/// use rs_trackpower::hal::{MockChannelIo, MockClock};
///
/// let channel = PowerChannel::new(MockChannelIo::new(), MockClock::new(), ChannelConfig::default());
///
/// let state = channel.state();
/// assert!(!state.enabled);
/// assert!(!state.tripped);
/// assert_eq!(state.current_ma, 0);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelState {
    /// Last commanded power state.
    pub enabled: bool,
    /// Whether the channel is tripped on overcurrent.
    pub tripped: bool,
    /// Whether programming mode is active.
    pub programming_mode: bool,
    /// Smoothed current reading in milliamps.
    pub current_ma: u16,
    /// Captured baseline current in milliamps.
    pub base_current_ma: u16,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            enabled: false,
            tripped: false,
            programming_mode: false,
            current_ma: 0,
            base_current_ma: 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockChannelIo, MockClock};

    fn channel() -> PowerChannel<MockChannelIo, MockClock> {
        PowerChannel::new(MockChannelIo::new(), MockClock::new(), ChannelConfig::default())
    }

    // =========================================================================
    // Setup Tests
    // =========================================================================

    #[test]
    fn setup_configures_pins() {
        let mut ch = channel();
        ch.setup();

        let cfg = ch.config().clone();
        assert!(ch.io().is_output(cfg.enable_pin));
        assert!(ch.io().is_output(cfg.signal_a_pin));
        assert!(ch.io().is_output(cfg.signal_b_pin));
        assert!(ch.io().is_input(cfg.sense_pin));

        assert!(!ch.io().level(cfg.enable_pin));
        assert!(!ch.io().level(cfg.signal_a_pin));
        assert!(!ch.io().level(cfg.signal_b_pin));
    }

    #[test]
    fn setup_clears_trip_and_power() {
        let mut ch = channel();
        ch.setup();
        ch.power(true, false);
        assert!(ch.is_enabled());

        ch.setup();
        assert!(!ch.is_enabled());
        assert!(!ch.is_tripped());
        assert!(!ch.status());
    }

    // =========================================================================
    // Power & Signal Tests
    // =========================================================================

    #[test]
    fn power_drives_enable_pin() {
        let mut ch = channel();
        ch.setup();

        ch.power(true, false);
        assert!(ch.is_enabled());
        assert!(ch.status());

        ch.power(false, false);
        assert!(!ch.is_enabled());
        assert!(!ch.status());
    }

    #[test]
    fn drive_signal_writes_signal_a() {
        let mut ch = channel();
        ch.setup();
        let pin = ch.config().signal_a_pin;

        ch.drive_signal(true);
        assert!(ch.io().level(pin));

        ch.drive_signal(false);
        assert!(!ch.io().level(pin));
    }

    #[test]
    fn set_cutout_writes_signal_b() {
        let mut ch = channel();
        ch.setup();
        let pin = ch.config().signal_b_pin;

        ch.set_cutout(true);
        assert!(ch.io().level(pin));

        ch.set_cutout(false);
        assert!(!ch.io().level(pin));
    }

    #[test]
    fn preamble_count_follows_mode() {
        let mut ch = channel();
        assert_eq!(ch.preamble_count(), ch.config().main_preambles);

        ch.set_programming_mode(true);
        assert_eq!(ch.preamble_count(), ch.config().prog_preambles);

        ch.set_programming_mode(false);
        assert_eq!(ch.preamble_count(), ch.config().main_preambles);
    }

    // =========================================================================
    // Current Sensing Tests
    // =========================================================================

    #[test]
    fn conversion_widens_before_division() {
        let config = ChannelConfig::default().with_scale(60_000, 1000);
        let ch = PowerChannel::new(MockChannelIo::new(), MockClock::new(), config);
        // 1000 * 60000 does not fit u16; the product must widen before
        // the division brings it back into range.
        assert_eq!(ch.current_from_raw(1000), 60_000);
    }

    #[test]
    fn conversion_truncates() {
        let config = ChannelConfig::default().with_scale(10, 3);
        let ch = PowerChannel::new(MockChannelIo::new(), MockClock::new(), config);
        assert_eq!(ch.current_from_raw(5), 16); // 50 / 3 = 16.67 -> 16
    }

    #[test]
    fn current_ma_reads_and_converts() {
        let config = ChannelConfig::default().with_scale(488, 100);
        let mut ch = PowerChannel::new(MockChannelIo::new(), MockClock::new(), config);
        ch.io_mut().set_analog(100);
        assert_eq!(ch.current_ma(), 488);
    }

    #[test]
    fn baseline_capture_and_hold() {
        let mut ch = channel();
        ch.io_mut().set_analog(50);

        let captured = ch.capture_baseline();
        assert_eq!(captured, ch.current_from_raw(50));
        assert_eq!(ch.baseline(), captured);

        // Baseline holds while the live reading moves
        ch.io_mut().set_analog(200);
        assert_eq!(ch.baseline(), captured);
    }

    // =========================================================================
    // Programming Mode Tests
    // =========================================================================

    #[test]
    fn limiting_inactive_outside_prog_mode() {
        let ch = channel();
        assert!(!ch.is_current_limiting());
    }

    #[test]
    fn limiting_window_rearms_on_power() {
        let config = ChannelConfig::default().with_prog_trip_time_ms(100);
        let mut ch =
            PowerChannel::new(MockChannelIo::new(), MockClock::new(), config);
        ch.setup();
        ch.set_programming_mode(true);

        // Run the window out
        ch.clock_mut().advance(150);
        assert!(!ch.is_current_limiting());

        // Any power transition restarts the grace period
        ch.power(true, false);
        assert!(ch.is_current_limiting());
        ch.clock_mut().advance(99);
        assert!(ch.is_current_limiting());
        ch.clock_mut().advance(2);
        assert!(!ch.is_current_limiting());
    }

    #[test]
    fn state_snapshot() {
        let mut ch = channel();
        ch.setup();
        ch.power(true, false);
        ch.set_programming_mode(true);

        let state = ch.state();
        assert!(state.enabled);
        assert!(!state.tripped);
        assert!(state.programming_mode);
        assert_eq!(state.current_ma, 0);
    }
}
