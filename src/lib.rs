//! Helper driver for the TinyPICO ESP32 board.
//!
//! - the on-board APA102 ("DotStar") RGB LED, bit-banged on two GPIOs with
//!   its own power switch
//! - battery voltage and charger status
//! - simple square-wave tones on any pin
//!
//! The driver talks to the chip only through the traits in [`platform`], so
//! it runs against the ESP-IDF ([`esp`], feature `esp`) or anything else
//! that can toggle pins.

pub mod battery;
pub mod bitbang;
pub mod board;
pub mod color;
pub mod config;
pub mod dotstar;
#[cfg(feature = "esp")]
pub mod esp;
pub mod platform;
pub mod power_link;
pub mod rate_limit;
pub mod tone;

#[cfg(test)]
mod sim;

pub use board::TinyPico;
pub use color::{Brightness, PixelState};
pub use config::BoardConfig;
pub use platform::{BatteryAdc, GpioLines, LineMode, MonotonicClock, Platform, ToneGenerator};
pub use power_link::LinkState;
pub use rgb::RGB8; // RGB8 came from the `rgb` crate
