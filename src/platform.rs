//! Hardware seams the board driver talks through.
//!
//! Pins are addressed by their GPIO number, the way the ESP32 pin matrix
//! numbers them. Levels reuse [`PinState`] from `embedded-hal` and blocking
//! waits use its [`DelayNs`].

use anyhow::Result;
pub use embedded_hal::delay::DelayNs;
pub use embedded_hal::digital::PinState;

/// Electrical configuration of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    Output,
    Input,
    InputPullDown,
}

/// Set of GPIO numbers, for platforms that set a pin up once on first use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinSet(u64);

impl PinSet {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Pins past 63 are never recorded.
    pub const fn contains(&self, pin: u8) -> bool {
        pin < 64 && self.0 & (1 << pin) != 0
    }

    pub fn insert(&mut self, pin: u8) {
        if pin < 64 {
            self.0 |= 1 << pin;
        }
    }
}

/// Digital I/O on numbered lines.
pub trait GpioLines {
    fn set_mode(&mut self, pin: u8, mode: LineMode) -> Result<()>;
    fn write(&mut self, pin: u8, level: PinState) -> Result<()>;
    fn read(&mut self, pin: u8) -> Result<PinState>;
}

/// Monotonic millisecond clock, counting from boot.
pub trait MonotonicClock {
    fn millis(&self) -> u64;
}

/// Calibrated analog sensing.
pub trait BatteryAdc {
    /// One-time characterisation of the converter, called before the first read.
    fn characterize(&mut self) -> Result<()>;
    /// Calibrated reading of `pin` in millivolts.
    fn read_millivolts(&mut self, pin: u8) -> Result<u32>;
}

/// PWM tone output.
pub trait ToneGenerator {
    fn attach(&mut self, pin: u8, freq_hz: u32, resolution_bits: u8, channel: u8) -> Result<()>;
    /// Change the tone on an attached pin. Zero silences it.
    fn write_tone(&mut self, pin: u8, freq_hz: u32) -> Result<()>;
}

/// Everything a [`TinyPico`](crate::TinyPico) needs from the chip.
pub trait Platform: GpioLines + MonotonicClock + BatteryAdc + ToneGenerator + DelayNs {}

impl<T> Platform for T where T: GpioLines + MonotonicClock + BatteryAdc + ToneGenerator + DelayNs {}
