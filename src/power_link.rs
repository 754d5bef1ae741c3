use anyhow::Result;
use log::debug;

use crate::platform::{DelayNs, GpioLines, LineMode, PinState};

/// Whether the DotStar is powered with its data and clock lines driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkState {
    #[default]
    Uninitialized,
    Linked,
}

/// Power gate and signal lines of the DotStar.
///
/// The power enable is active low. While unpowered, data and clock are
/// pulled-down inputs so the host never feeds current into the LED.
#[derive(Debug)]
pub struct PowerLink {
    power: u8,
    data: u8,
    clock: u8,
    state: LinkState,
}

impl PowerLink {
    pub const fn new(power: u8, data: u8, clock: u8) -> Self {
        Self {
            power,
            data,
            clock,
            state: LinkState::Uninitialized,
        }
    }

    pub const fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_linked(&self) -> bool {
        self.state == LinkState::Linked
    }

    /// Switch LED power. Turning it off also drops the link, so the next
    /// frame goes through [`ensure_linked`](Self::ensure_linked) again.
    pub fn set_power<IO: GpioLines>(&mut self, io: &mut IO, enable: bool) -> Result<()> {
        io.write(self.power, PinState::from(!enable))?;
        let mode = if enable { LineMode::Output } else { LineMode::InputPullDown };
        io.set_mode(self.data, mode)?;
        io.set_mode(self.clock, mode)?;
        if !enable {
            self.state = LinkState::Uninitialized;
        }
        debug!("DotStar power {}", if enable { "on" } else { "off" });
        Ok(())
    }

    /// Power up and idle both lines low, once, then wait `settle_ms`.
    pub fn ensure_linked<IO: GpioLines + DelayNs>(&mut self, io: &mut IO, settle_ms: u32) -> Result<()> {
        if self.is_linked() {
            return Ok(());
        }
        self.set_power(io, true)?;
        io.write(self.data, PinState::Low)?;
        io.write(self.clock, PinState::Low)?;
        io.delay_ms(settle_ms);
        self.state = LinkState::Linked;
        debug!("DotStar link up on data GPIO {} / clock GPIO {}", self.data, self.clock);
        Ok(())
    }

    /// Power down and forget the link.
    pub fn release<IO: GpioLines>(&mut self, io: &mut IO) -> Result<()> {
        self.set_power(io, false)
    }
}
