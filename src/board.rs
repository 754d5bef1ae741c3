use anyhow::Result;
use log::{info, warn};
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

use crate::battery::BatteryMonitor;
use crate::color::{self, Brightness, PixelState};
use crate::config::BoardConfig;
use crate::dotstar::DotStar;
use crate::platform::{LineMode, Platform};
use crate::power_link::LinkState;
use crate::tone::Tone;

/// TinyPICO board helper: the on-board DotStar, battery sensing and a tone
/// output, all driven through one [`Platform`].
///
/// The board owns its platform and every line listed in its
/// [`BoardConfig`]. Nothing here is synchronised; share it behind a mutex
/// if more than one thread needs it.
pub struct TinyPico<P: Platform> {
    platform: P,
    config: BoardConfig,
    dotstar: DotStar,
    battery: BatteryMonitor,
    tone: Tone,
}

impl<P: Platform> TinyPico<P> {
    pub fn new(platform: P) -> Result<Self> {
        Self::with_config(platform, BoardConfig::default())
    }

    /// Configure the power, charge and voltage lines and leave the DotStar
    /// switched off. Fails on a config the battery maths cannot use.
    pub fn with_config(mut platform: P, config: BoardConfig) -> Result<Self> {
        config.validate()?;
        platform.set_mode(config.dotstar_power, LineMode::Output)?;
        platform.set_mode(config.battery_charge, LineMode::Input)?;
        platform.set_mode(config.battery_voltage, LineMode::Input)?;

        let mut dotstar = DotStar::new(&config);
        dotstar.set_power(&mut platform, false)?;

        info!(
            "TinyPICO ready: DotStar power/data/clock GPIO {}/{}/{}, battery charge/sense GPIO {}/{}",
            config.dotstar_power,
            config.dotstar_data,
            config.dotstar_clock,
            config.battery_charge,
            config.battery_voltage
        );

        Ok(Self {
            battery: BatteryMonitor::new(&config),
            tone: Tone::new(config.tone_channel, config.tone_resolution_bits),
            platform,
            config,
            dotstar,
        })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    // DotStar

    /// Switch DotStar power. When off, data and clock are pulled-down inputs.
    pub fn set_power(&mut self, enable: bool) -> Result<()> {
        self.dotstar.set_power(&mut self.platform, enable)
    }

    pub fn link_state(&self) -> LinkState {
        self.dotstar.link_state()
    }

    pub fn set_brightness(&mut self, level: u8) {
        self.dotstar.set_brightness(level);
    }

    pub fn brightness(&self) -> Brightness {
        self.dotstar.brightness()
    }

    pub fn pixel(&self) -> PixelState {
        self.dotstar.pixel()
    }

    pub fn set_pixel_color(&mut self, r: u8, g: u8, b: u8) -> Result<()> {
        self.dotstar.set_pixel_color(&mut self.platform, r, g, b)
    }

    pub fn set_pixel_color_packed(&mut self, packed: u32) -> Result<()> {
        self.dotstar.set_pixel_color_packed(&mut self.platform, packed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.dotstar.clear(&mut self.platform)
    }

    pub fn show(&mut self) -> Result<()> {
        self.dotstar.show(&mut self.platform)
    }

    /// Advance the colour wheel on every call.
    pub fn cycle_color(&mut self) -> Result<bool> {
        self.cycle_color_every(0)
    }

    /// Advance the colour wheel if `interval_ms` passed since the last step.
    pub fn cycle_color_every(&mut self, interval_ms: u64) -> Result<bool> {
        self.dotstar.cycle_color(&mut self.platform, interval_ms)
    }

    /// Pack channels into `0x00RRGGBB`.
    pub fn color(&self, r: u8, g: u8, b: u8) -> u32 {
        color::pack(r, g, b)
    }

    // Battery

    /// Rough battery voltage, refreshed at most once per `voltage_refresh_ms`.
    pub fn battery_voltage(&mut self) -> Result<f32> {
        self.battery.voltage(&mut self.platform)
    }

    pub fn is_charging(&mut self) -> Result<bool> {
        self.battery.is_charging(&mut self.platform)
    }

    // Tone

    pub fn tone(&mut self, pin: u8, freq_hz: u32) -> Result<()> {
        self.tone.play(&mut self.platform, pin, freq_hz)
    }

    pub fn no_tone(&mut self, pin: u8) -> Result<()> {
        self.tone.stop(&mut self.platform, pin)
    }
}

impl<P: Platform> Drop for TinyPico<P> {
    fn drop(&mut self) {
        if let Err(e) = self.dotstar.release(&mut self.platform) {
            warn!("Failed to power down DotStar: {:?}", e);
        }
    }
}

/// Lets the board act as a one-pixel `smart-leds` strip. Only the first
/// colour is used; an empty iterator turns the pixel off.
impl<P: Platform> SmartLedsWrite for TinyPico<P> {
    type Error = anyhow::Error;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let rgb: RGB8 = iterator.into_iter().next().map(Into::into).unwrap_or_default();
        self.set_pixel_color(rgb.r, rgb.g, rgb.b)
    }
}
