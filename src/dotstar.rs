//! Single APA102 ("DotStar") pixel driven over bit-banged lines.
//!
//! A frame for the one-pixel chain is nine bytes:
//!
//! | bytes | content                                   |
//! |-------|-------------------------------------------|
//! | 0..4  | start frame, all zero                     |
//! | 4     | `0xFF`, per-pixel brightness field at max |
//! | 5..8  | blue, green, red after global brightness  |
//! | 8     | end frame, `0xFF`                         |
//!
//! The chip's own 5-bit brightness is left at maximum; dimming is done by
//! pre-scaling the colour bytes instead.

use anyhow::Result;
use log::debug;

use crate::bitbang::SoftSpi;
use crate::color::{self, Brightness, PixelState};
use crate::config::BoardConfig;
use crate::platform::{DelayNs, GpioLines, MonotonicClock};
use crate::power_link::{LinkState, PowerLink};
use crate::rate_limit::RateLimiter;

pub const FRAME_LEN: usize = 9;

const START_FRAME: [u8; 4] = [0x00; 4];
const PIXEL_HEADER: u8 = 0xFF;
const END_FRAME: u8 = 0xFF;

#[derive(Debug)]
pub struct DotStar {
    link: PowerLink,
    spi: SoftSpi,
    settle_ms: u32,
    pixel: PixelState,
    brightness: Brightness,
    wheel_phase: u8,
    rotation: RateLimiter,
}

impl DotStar {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            link: PowerLink::new(config.dotstar_power, config.dotstar_data, config.dotstar_clock),
            spi: SoftSpi::new(config.dotstar_data, config.dotstar_clock, config.byte_gap_ms),
            settle_ms: config.settle_ms,
            pixel: PixelState::OFF,
            brightness: Brightness::default(),
            wheel_phase: 0,
            rotation: RateLimiter::new(),
        }
    }

    pub fn set_power<IO: GpioLines>(&mut self, io: &mut IO, enable: bool) -> Result<()> {
        self.link.set_power(io, enable)
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Global brightness for the following frames, 0 (off) to 255 (raw colours).
    pub fn set_brightness(&mut self, level: u8) {
        self.brightness = Brightness::from_level(level);
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn pixel(&self) -> PixelState {
        self.pixel
    }

    pub fn wheel_phase(&self) -> u8 {
        self.wheel_phase
    }

    /// Store the colour and show it straight away.
    pub fn set_pixel_color<IO>(&mut self, io: &mut IO, r: u8, g: u8, b: u8) -> Result<()>
    where
        IO: GpioLines + DelayNs,
    {
        self.pixel = PixelState::from_rgb(r, g, b);
        self.show(io)
    }

    /// Same as [`set_pixel_color`](Self::set_pixel_color) for a `0x00RRGGBB` value.
    pub fn set_pixel_color_packed<IO>(&mut self, io: &mut IO, packed: u32) -> Result<()>
    where
        IO: GpioLines + DelayNs,
    {
        self.pixel = color::unpack(packed).into();
        self.show(io)
    }

    pub fn clear<IO: GpioLines + DelayNs>(&mut self, io: &mut IO) -> Result<()> {
        self.pixel = PixelState::OFF;
        self.show(io)
    }

    /// The frame [`show`](Self::show) would clock out right now.
    pub fn frame(&self) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&START_FRAME);
        frame[4] = PIXEL_HEADER;
        for (slot, channel) in frame[5..8].iter_mut().zip(self.pixel.wire_order()) {
            *slot = self.brightness.scale(channel);
        }
        frame[8] = END_FRAME;
        frame
    }

    /// Send the current pixel, bringing the link up first if needed.
    pub fn show<IO: GpioLines + DelayNs>(&mut self, io: &mut IO) -> Result<()> {
        self.link.ensure_linked(io, self.settle_ms)?;
        self.spi.write(io, &self.frame())
    }

    /// Step the colour wheel by one when at least `interval_ms` passed since
    /// the previous step. Returns whether a step happened.
    pub fn cycle_color<IO>(&mut self, io: &mut IO, interval_ms: u64) -> Result<bool>
    where
        IO: GpioLines + DelayNs + MonotonicClock,
    {
        let now = io.millis();
        if !self.rotation.is_due(now, interval_ms) {
            return Ok(false);
        }
        let phase = self.wheel_phase.wrapping_add(1);
        let rgb = color::wheel(phase);
        self.set_pixel_color(io, rgb.r, rgb.g, rgb.b)?;
        self.wheel_phase = phase;
        self.rotation.mark(now);
        Ok(true)
    }

    /// Power the LED down. The next frame re-initialises the link.
    pub fn release<IO: GpioLines>(&mut self, io: &mut IO) -> Result<()> {
        debug!("Releasing DotStar");
        self.link.release(io)
    }
}
