//! Trait definitions for hardware abstraction and host notification.
//!
//! This module defines the seams that allow rs-trackpower to:
//! - Run on different hardware (ESP32, desktop mock)
//! - Notify the surrounding command station of power changes
//!
//! # Submodules
//!
//! - `hardware`: Pin I/O, analog current sense, clock
//! - `notify`: Power-change callback capability
//!
//! # Hardware Abstraction
//!
//! The key traits are:
//!
//! - [`ChannelIo`]: Digital pin control and analog current sense
//! - [`Clock`]: Time source for `no_std` environments
//! - [`PowerMonitor`]: Power-change notifications to the host

pub mod hardware;
pub mod notify;

pub use hardware::*;
pub use notify::*;
