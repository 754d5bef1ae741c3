//! Recording platform used by the unit tests.

use std::collections::{HashMap, VecDeque};

use anyhow::{bail, Result};

use crate::platform::{
    BatteryAdc, DelayNs, GpioLines, LineMode, MonotonicClock, PinState, ToneGenerator,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Mode(u8, LineMode),
    Write(u8, PinState),
    Read(u8),
    DelayMs(u32),
    Characterize,
    AdcRead(u8),
    Attach { pin: u8, freq_hz: u32, resolution_bits: u8, channel: u8 },
    Tone { pin: u8, freq_hz: u32 },
}

#[derive(Debug, Default)]
pub(crate) struct SimPlatform {
    pub now_ms: u64,
    pub events: Vec<Event>,
    pub modes: HashMap<u8, LineMode>,
    pub levels: HashMap<u8, PinState>,
    /// Queued levels returned by `read`, per pin. An empty queue reads high.
    pub inputs: HashMap<u8, VecDeque<PinState>>,
    pub adc_mv: u32,
    pub fail_writes: bool,
    pub fail_adc: bool,
    pub fail_characterize: bool,
}

impl SimPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn queue_reads(&mut self, pin: u8, levels: &[PinState]) {
        self.inputs.entry(pin).or_default().extend(levels.iter().copied());
    }

    pub fn mode(&self, pin: u8) -> Option<LineMode> {
        self.modes.get(&pin).copied()
    }

    pub fn level(&self, pin: u8) -> Option<PinState> {
        self.levels.get(&pin).copied()
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events.iter().filter(|event| *event == wanted).count()
    }

    pub fn adc_reads(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::AdcRead(_)))
            .count()
    }

    /// Reassemble the bytes clocked out on `data`, sampling it on every rising
    /// edge of `clock`, most significant bit first.
    pub fn clocked_bytes(&self, data: u8, clock: u8) -> Vec<u8> {
        let mut data_level = PinState::Low;
        let mut bits = Vec::new();
        for event in &self.events {
            match event {
                Event::Write(pin, level) if *pin == data => data_level = *level,
                Event::Write(pin, PinState::High) if *pin == clock => {
                    bits.push(data_level == PinState::High);
                }
                _ => {}
            }
        }
        bits.chunks(8)
            .map(|chunk| chunk.iter().fold(0u8, |byte, bit| (byte << 1) | u8::from(*bit)))
            .collect()
    }
}

impl GpioLines for SimPlatform {
    fn set_mode(&mut self, pin: u8, mode: LineMode) -> Result<()> {
        self.modes.insert(pin, mode);
        self.events.push(Event::Mode(pin, mode));
        Ok(())
    }

    fn write(&mut self, pin: u8, level: PinState) -> Result<()> {
        if self.fail_writes {
            bail!("simulated write failure on GPIO {}", pin);
        }
        self.levels.insert(pin, level);
        self.events.push(Event::Write(pin, level));
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<PinState> {
        self.events.push(Event::Read(pin));
        let level = self
            .inputs
            .get_mut(&pin)
            .and_then(VecDeque::pop_front)
            .unwrap_or(PinState::High);
        Ok(level)
    }
}

impl MonotonicClock for SimPlatform {
    fn millis(&self) -> u64 {
        self.now_ms
    }
}

impl DelayNs for SimPlatform {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.events.push(Event::DelayMs(ms));
    }
}

impl BatteryAdc for SimPlatform {
    fn characterize(&mut self) -> Result<()> {
        self.events.push(Event::Characterize);
        if self.fail_characterize {
            bail!("simulated ADC calibration failure");
        }
        Ok(())
    }

    fn read_millivolts(&mut self, pin: u8) -> Result<u32> {
        self.events.push(Event::AdcRead(pin));
        if self.fail_adc {
            bail!("simulated ADC read failure on GPIO {}", pin);
        }
        Ok(self.adc_mv)
    }
}

impl ToneGenerator for SimPlatform {
    fn attach(&mut self, pin: u8, freq_hz: u32, resolution_bits: u8, channel: u8) -> Result<()> {
        self.events.push(Event::Attach { pin, freq_hz, resolution_bits, channel });
        Ok(())
    }

    fn write_tone(&mut self, pin: u8, freq_hz: u32) -> Result<()> {
        self.events.push(Event::Tone { pin, freq_hz });
        Ok(())
    }
}
