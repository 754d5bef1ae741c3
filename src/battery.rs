use anyhow::{ensure, Result};
use log::debug;

use crate::config::BoardConfig;
use crate::platform::{BatteryAdc, GpioLines, MonotonicClock, PinState};
use crate::rate_limit::RateLimiter;

/// LiPo charger status and a rough battery voltage estimate.
///
/// The voltage is sampled through a resistor divider and cached; a new
/// sample is taken at most once per `voltage_refresh_ms`.
#[derive(Debug)]
pub struct BatteryMonitor {
    config: BoardConfig,
    refresh: RateLimiter,
    characterized: bool,
    last_voltage: f32,
}

impl BatteryMonitor {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            config: config.clone(),
            refresh: RateLimiter::new(),
            characterized: false,
            last_voltage: 0.0,
        }
    }

    /// Battery voltage in volts, from cache when sampled recently.
    pub fn voltage<IO>(&mut self, io: &mut IO) -> Result<f32>
    where
        IO: BatteryAdc + MonotonicClock,
    {
        let now = io.millis();
        if !self.refresh.is_due(now, self.config.voltage_refresh_ms) {
            return Ok(self.last_voltage);
        }
        if !self.characterized {
            io.characterize()?;
            self.characterized = true;
        }
        let sense_mv = io.read_millivolts(self.config.battery_voltage)?;
        let battery_mv = self.config.divided_to_battery_mv(sense_mv)?;
        self.last_voltage = battery_mv as f32 / 1000.0;
        self.refresh.mark(now);
        debug!("Battery sense {} mV -> {:.3} V", sense_mv, self.last_voltage);
        Ok(self.last_voltage)
    }

    /// `true` only when every sample of the charge line reads low.
    pub fn is_charging<IO: GpioLines>(&self, io: &mut IO) -> Result<bool> {
        ensure!(self.config.charge_samples > 0, "charge_samples must be at least 1");
        let mut high_samples = 0usize;
        for _ in 0..self.config.charge_samples {
            if io.read(self.config.battery_charge)? == PinState::High {
                high_samples += 1;
            }
        }
        Ok(high_samples == 0)
    }
}
