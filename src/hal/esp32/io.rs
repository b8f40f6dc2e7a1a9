//! Motor-board pin I/O via ESP-IDF GPIO and ADC.
//!
//! The channel addresses its pins by runtime number (they come from
//! [`ChannelConfig`]), so this implementation talks to the ESP-IDF C API
//! directly rather than through the type-per-pin drivers: `gpio_set_direction`
//! and `gpio_set_level` accept any pin number at runtime.
//!
//! # Wiring
//!
//! On the ESP32-C3, ADC1 covers GPIO0-GPIO4; the sense pin must be one of
//! those. Output pins are configured in input/output mode so the enable
//! line can be read back as ground truth for the channel's status check.
//!
//! # Calibration
//!
//! Raw readings are 12-bit (0-4095) at 11 dB attenuation. The raw-to-mA
//! factor depends on the board's sense resistor; see [`ChannelConfig`].
//!
//! [`ChannelConfig`]: crate::config::ChannelConfig

use crate::traits::{ChannelIo, PinId};
use esp_idf_hal::sys;

/// ESP32 pin I/O for one motor-board channel.
///
/// # Example
///
/// ```ignore
/// use rs_trackpower::hal::esp32::{Esp32ChannelIo, Esp32Clock};
/// use rs_trackpower::{ChannelConfig, PowerChannel};
///
/// let config = ChannelConfig::default().with_pins(3, 12, 9, 0);
/// let io = Esp32ChannelIo::new(config.sense_pin)?;
/// let mut channel = PowerChannel::new(io, Esp32Clock::new(), config);
/// channel.setup();
/// ```
pub struct Esp32ChannelIo;

impl Esp32ChannelIo {
    /// Creates the pin I/O and configures ADC attenuation for the sense pin.
    ///
    /// # Errors
    ///
    /// Returns an error if the sense pin is not an ADC1 pin or the ADC
    /// configuration is rejected.
    pub fn new(sense_pin: PinId) -> anyhow::Result<Self> {
        let channel = adc1_channel(sense_pin)
            .ok_or_else(|| anyhow::anyhow!("pin {} is not on ADC1", sense_pin))?;

        // 11 dB attenuation for the full supply-referred sense range
        let err =
            unsafe { sys::adc1_config_channel_atten(channel, sys::adc_atten_t_ADC_ATTEN_DB_11) };
        if err != sys::ESP_OK {
            return Err(anyhow::anyhow!("ADC config for pin {} failed: {}", sense_pin, err));
        }

        Ok(Self)
    }
}

/// ADC1 channel for a GPIO number (ESP32-C3: GPIO0-GPIO4).
fn adc1_channel(pin: PinId) -> Option<sys::adc1_channel_t> {
    if pin <= 4 {
        Some(pin as sys::adc1_channel_t)
    } else {
        None
    }
}

impl ChannelIo for Esp32ChannelIo {
    fn set_output(&mut self, pin: PinId) {
        // Input/output mode keeps the level readable for the status check
        let _ = unsafe {
            sys::gpio_set_direction(pin as i32, sys::gpio_mode_t_GPIO_MODE_INPUT_OUTPUT)
        };
    }

    fn set_input(&mut self, pin: PinId) {
        let _ = unsafe { sys::gpio_set_direction(pin as i32, sys::gpio_mode_t_GPIO_MODE_INPUT) };
    }

    fn write_digital(&mut self, pin: PinId, high: bool) {
        let _ = unsafe { sys::gpio_set_level(pin as i32, u32::from(high)) };
    }

    fn read_digital(&self, pin: PinId) -> bool {
        unsafe { sys::gpio_get_level(pin as i32) != 0 }
    }

    fn read_analog(&mut self, pin: PinId) -> u16 {
        match adc1_channel(pin) {
            Some(channel) => {
                let raw = unsafe { sys::adc1_get_raw(channel) };
                raw.max(0) as u16
            }
            None => 0,
        }
    }
}
