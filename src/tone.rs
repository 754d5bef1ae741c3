use anyhow::Result;
use log::info;

use crate::platform::{GpioLines, LineMode, ToneGenerator};

/// Square-wave tones on one PWM channel, attached on first use.
#[derive(Debug)]
pub struct Tone {
    channel: u8,
    resolution_bits: u8,
    attached: bool,
}

impl Tone {
    pub const fn new(channel: u8, resolution_bits: u8) -> Self {
        Self {
            channel,
            resolution_bits,
            attached: false,
        }
    }

    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn play<IO>(&mut self, io: &mut IO, pin: u8, freq_hz: u32) -> Result<()>
    where
        IO: GpioLines + ToneGenerator,
    {
        if !self.attached {
            io.set_mode(pin, LineMode::Output)?;
            io.attach(pin, freq_hz, self.resolution_bits, self.channel)?;
            self.attached = true;
            info!("Tone channel {} attached to GPIO {}", self.channel, pin);
        }
        io.write_tone(pin, freq_hz)
    }

    /// Silence and detach. Does nothing when no tone was started.
    pub fn stop<IO>(&mut self, io: &mut IO, pin: u8) -> Result<()>
    where
        IO: GpioLines + ToneGenerator,
    {
        if !self.attached {
            return Ok(());
        }
        io.write_tone(pin, 0)?;
        io.set_mode(pin, LineMode::InputPullDown)?;
        self.attached = false;
        info!("Tone channel {} released GPIO {}", self.channel, pin);
        Ok(())
    }
}
