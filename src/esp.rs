//! [`Platform`](crate::Platform) on ESP-IDF.
//!
//! GPIO and LEDC go straight to the IDF drivers by pin number, the battery
//! sense pin through the one-shot ADC driver with line-fitting calibration.

use anyhow::{bail, Result};
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::{AdcChannelConfig, Calibration};
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{Gpio35, Pin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_sys as sys;
use log::{debug, info};

use crate::platform::{
    BatteryAdc, DelayNs, GpioLines, LineMode, MonotonicClock, PinSet, PinState, ToneGenerator,
};

type BatteryChannel = AdcChannelDriver<'static, Gpio35, AdcDriver<'static, ADC1>>;

const LEDC_MODE: sys::ledc_mode_t = sys::ledc_mode_t_LEDC_HIGH_SPEED_MODE;
const LEDC_TIMER: sys::ledc_timer_t = sys::ledc_timer_t_LEDC_TIMER_0;

fn check(err: sys::esp_err_t, what: &str) -> Result<()> {
    if err != sys::ESP_OK {
        bail!("{} failed, ESP error code: {}", what, err);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct ToneAttachment {
    pin: u8,
    channel: sys::ledc_channel_t,
    resolution_bits: u8,
}

pub struct EspPlatform {
    battery_pin: u8,
    adc_parts: Option<(ADC1, Gpio35)>,
    battery_channel: Option<BatteryChannel>,
    tone: Option<ToneAttachment>,
    /// Pins already switched from their boot function to plain GPIO.
    reset_pins: PinSet,
}

impl EspPlatform {
    /// Takes the ADC unit and sense pin the battery divider is wired to.
    pub fn new(adc: ADC1, battery_pin: Gpio35) -> Result<Self> {
        Ok(Self {
            battery_pin: battery_pin.pin() as u8,
            adc_parts: Some((adc, battery_pin)),
            battery_channel: None,
            tone: None,
            reset_pins: PinSet::new(),
        })
    }
}

impl GpioLines for EspPlatform {
    fn set_mode(&mut self, pin: u8, mode: LineMode) -> Result<()> {
        let gpio = i32::from(pin);
        // GPIO 12..15 boot as JTAG; the reset routes the pad to the GPIO matrix
        if !self.reset_pins.contains(pin) {
            check(unsafe { sys::gpio_reset_pin(gpio) }, "gpio_reset_pin")?;
            self.reset_pins.insert(pin);
        }
        let direction = match mode {
            LineMode::Output => sys::gpio_mode_t_GPIO_MODE_OUTPUT,
            LineMode::Input | LineMode::InputPullDown => sys::gpio_mode_t_GPIO_MODE_INPUT,
        };
        check(unsafe { sys::gpio_set_direction(gpio, direction) }, "gpio_set_direction")?;
        // GPIO 34..39 are input only and have no internal pulls to touch
        match mode {
            LineMode::InputPullDown => check(
                unsafe { sys::gpio_set_pull_mode(gpio, sys::gpio_pull_mode_t_GPIO_PULLDOWN_ONLY) },
                "gpio_set_pull_mode",
            ),
            LineMode::Output => check(
                unsafe { sys::gpio_set_pull_mode(gpio, sys::gpio_pull_mode_t_GPIO_FLOATING) },
                "gpio_set_pull_mode",
            ),
            LineMode::Input => Ok(()),
        }
    }

    fn write(&mut self, pin: u8, level: PinState) -> Result<()> {
        let level = u32::from(level == PinState::High);
        check(unsafe { sys::gpio_set_level(i32::from(pin), level) }, "gpio_set_level")
    }

    fn read(&mut self, pin: u8) -> Result<PinState> {
        let level = unsafe { sys::gpio_get_level(i32::from(pin)) };
        Ok(PinState::from(level != 0))
    }
}

impl MonotonicClock for EspPlatform {
    fn millis(&self) -> u64 {
        let micros = unsafe { sys::esp_timer_get_time() };
        u64::try_from(micros / 1000).unwrap_or_default()
    }
}

impl DelayNs for EspPlatform {
    fn delay_ns(&mut self, ns: u32) {
        Ets::delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        Ets::delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}

impl BatteryAdc for EspPlatform {
    fn characterize(&mut self) -> Result<()> {
        if self.battery_channel.is_some() {
            return Ok(());
        }
        let Some((adc, pin)) = self.adc_parts.as_mut() else {
            bail!("Battery ADC peripherals are gone");
        };
        let config = AdcChannelConfig {
            attenuation: DB_11,
            calibration: Calibration::Line,
            ..Default::default()
        };
        // SAFETY: the clones are the only live handles once the originals are
        // dropped below; on failure they are dropped and the originals kept.
        let driver = AdcDriver::new(unsafe { adc.clone_unchecked() })?;
        let channel = AdcChannelDriver::new(driver, unsafe { pin.clone_unchecked() }, &config)?;
        self.adc_parts = None;
        self.battery_channel = Some(channel);
        info!("Battery ADC calibrated on GPIO {}", self.battery_pin);
        Ok(())
    }

    fn read_millivolts(&mut self, pin: u8) -> Result<u32> {
        if pin != self.battery_pin {
            bail!("GPIO {} is not wired to the battery ADC", pin);
        }
        let Some(channel) = self.battery_channel.as_mut() else {
            bail!("Battery ADC read before calibration");
        };
        Ok(u32::from(channel.read()?))
    }
}

impl ToneGenerator for EspPlatform {
    fn attach(&mut self, pin: u8, freq_hz: u32, resolution_bits: u8, channel: u8) -> Result<()> {
        let timer_cfg = sys::ledc_timer_config_t {
            speed_mode: LEDC_MODE,
            duty_resolution: sys::ledc_timer_bit_t::from(resolution_bits),
            timer_num: LEDC_TIMER,
            // the timer refuses 0 Hz, silence is handled by the duty cycle
            freq_hz: freq_hz.max(1),
            ..Default::default()
        };
        check(unsafe { sys::ledc_timer_config(&timer_cfg) }, "ledc_timer_config")?;

        let channel = sys::ledc_channel_t::from(channel);
        let channel_cfg = sys::ledc_channel_config_t {
            gpio_num: i32::from(pin),
            speed_mode: LEDC_MODE,
            channel,
            intr_type: sys::ledc_intr_type_t_LEDC_INTR_DISABLE,
            timer_sel: LEDC_TIMER,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        check(unsafe { sys::ledc_channel_config(&channel_cfg) }, "ledc_channel_config")?;

        self.tone = Some(ToneAttachment { pin, channel, resolution_bits });
        debug!("LEDC channel {} on GPIO {} at {} Hz", channel, pin, freq_hz);
        Ok(())
    }

    fn write_tone(&mut self, pin: u8, freq_hz: u32) -> Result<()> {
        let Some(tone) = self.tone.filter(|tone| tone.pin == pin) else {
            bail!("No tone channel attached to GPIO {}", pin);
        };
        let duty = if freq_hz == 0 {
            0
        } else {
            check(unsafe { sys::ledc_set_freq(LEDC_MODE, LEDC_TIMER, freq_hz) }, "ledc_set_freq")?;
            1u32 << tone.resolution_bits.saturating_sub(1)
        };
        check(unsafe { sys::ledc_set_duty(LEDC_MODE, tone.channel, duty) }, "ledc_set_duty")?;
        check(unsafe { sys::ledc_update_duty(LEDC_MODE, tone.channel) }, "ledc_update_duty")
    }
}
