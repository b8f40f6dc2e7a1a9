//! ESP32 hardware implementations.
//!
//! Wires the [`ChannelIo`] and [`Clock`] traits to ESP-IDF GPIO, ADC,
//! and timer services. Requires the `esp32` feature.
//!
//! [`ChannelIo`]: crate::traits::ChannelIo
//! [`Clock`]: crate::traits::Clock

pub mod clock;
pub mod io;

pub use clock::*;
pub use io::*;
