use anyhow::Result;

use crate::platform::{DelayNs, GpioLines, PinState};

/// Software SPI, mode 0, most significant bit first.
///
/// Every bit sets the data line and then pulses the clock high and low.
/// A short pause follows each byte for the receiver's timing margin.
#[derive(Debug, Clone, Copy)]
pub struct SoftSpi {
    data: u8,
    clock: u8,
    byte_gap_ms: u32,
}

impl SoftSpi {
    pub const fn new(data: u8, clock: u8, byte_gap_ms: u32) -> Self {
        Self { data, clock, byte_gap_ms }
    }

    pub fn write_byte<IO: GpioLines + DelayNs>(&self, io: &mut IO, byte: u8) -> Result<()> {
        for bit in (0..8u32).rev() {
            io.write(self.data, PinState::from((byte >> bit) & 1 != 0))?;
            io.write(self.clock, PinState::High)?;
            io.write(self.clock, PinState::Low)?;
        }
        io.delay_ms(self.byte_gap_ms);
        Ok(())
    }

    pub fn write<IO: GpioLines + DelayNs>(&self, io: &mut IO, bytes: &[u8]) -> Result<()> {
        bytes.iter().try_for_each(|&byte| self.write_byte(io, byte))
    }
}
