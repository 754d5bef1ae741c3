use anyhow::{ensure, Result};

/// GPIO wiring and timing constants of the board.
///
/// `Default` is the TinyPICO layout. Other ESP32 boards with a DotStar on
/// arbitrary pins can build their own value and hand it to
/// [`TinyPico::with_config`](crate::TinyPico::with_config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Active-low power enable for the DotStar.
    pub dotstar_power: u8,
    pub dotstar_data: u8,
    pub dotstar_clock: u8,
    /// Charger status output, low while charging.
    pub battery_charge: u8,
    /// Battery voltage sense behind the resistor divider.
    pub battery_voltage: u8,
    /// Divider resistor between battery and sense pin (kOhm).
    pub divider_upper: u32,
    /// Divider resistor between sense pin and ground (kOhm).
    pub divider_lower: u32,
    pub voltage_refresh_ms: u64,
    pub charge_samples: usize,
    /// Wait after powering the DotStar before the first frame.
    pub settle_ms: u32,
    /// Gap after every byte clocked out.
    pub byte_gap_ms: u32,
    pub tone_channel: u8,
    pub tone_resolution_bits: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            dotstar_power: 13,
            dotstar_data: 2,
            dotstar_clock: 12,
            battery_charge: 34,
            battery_voltage: 35,
            divider_upper: 442,
            divider_lower: 160,
            voltage_refresh_ms: 1_000,
            charge_samples: 10,
            settle_ms: 10,
            byte_gap_ms: 1,
            tone_channel: 0,
            tone_resolution_bits: 8,
        }
    }
}

impl BoardConfig {
    /// Reject values the battery maths cannot work with.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.divider_lower > 0, "divider_lower must be non-zero");
        ensure!(self.charge_samples > 0, "charge_samples must be at least 1");
        Ok(())
    }

    /// Convert millivolts seen on the sense pin into battery millivolts.
    pub fn divided_to_battery_mv(&self, sense_mv: u32) -> Result<u32> {
        ensure!(self.divider_lower > 0, "divider_lower must be non-zero");
        let total = u64::from(self.divider_lower) + u64::from(self.divider_upper);
        let battery_mv = u64::from(sense_mv) * total / u64::from(self.divider_lower);
        Ok(u32::try_from(battery_mv).unwrap_or(u32::MAX))
    }
}
