//! Colour helpers: packed 24-bit colours, the hue wheel and brightness scaling.

use rgb::RGB8;

/// Pack separate channels into `0x00RRGGBB`.
pub const fn pack(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split `0x00RRGGBB` into its channels. The top byte is ignored.
pub const fn unpack(packed: u32) -> RGB8 {
    RGB8 {
        r: (packed >> 16) as u8,
        g: (packed >> 8) as u8,
        b: packed as u8,
    }
}

/// Map a wheel phase to a fully saturated colour.
///
/// A full turn of 256 phases sweeps red → green → blue → red, moving each
/// channel by at most 3 per step.
pub fn wheel(phase: u8) -> RGB8 {
    let pos = 255 - phase;
    if pos < 85 {
        RGB8::new(255 - pos * 3, 0, pos * 3)
    } else if pos < 170 {
        let q = pos - 85;
        RGB8::new(0, q * 3, 255 - q * 3)
    } else {
        let q = pos - 170;
        RGB8::new(q * 3, 255 - q * 3, 0)
    }
}

/// Global brightness as stored by the driver: the requested level plus one,
/// wrapping.
///
/// The offset turns scaling into a single 8x8 multiply that keeps the high
/// byte. Stored 0 (requested 255) is a bypass that sends colours untouched,
/// stored 1 (requested 0) is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness(u8);

impl Brightness {
    pub const BYPASS: Self = Self(0);

    pub const fn from_level(level: u8) -> Self {
        Self(level.wrapping_add(1))
    }

    pub const fn stored(self) -> u8 {
        self.0
    }

    pub const fn is_bypass(self) -> bool {
        self.0 == Self::BYPASS.0
    }

    pub const fn scale(self, channel: u8) -> u8 {
        if self.is_bypass() {
            channel
        } else {
            ((channel as u16 * self.0 as u16) >> 8) as u8
        }
    }
}

impl Default for Brightness {
    /// Half brightness, the level a freshly powered board starts at.
    fn default() -> Self {
        Self(128)
    }
}

/// The single pixel, held in wire order: blue, green, red.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelState {
    bgr: [u8; 3],
}

impl PixelState {
    pub const OFF: Self = Self { bgr: [0; 3] };

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { bgr: [b, g, r] }
    }

    pub const fn wire_order(&self) -> [u8; 3] {
        self.bgr
    }

    pub const fn rgb(&self) -> RGB8 {
        let [b, g, r] = self.bgr;
        RGB8 { r, g, b }
    }
}

impl From<RGB8> for PixelState {
    fn from(color: RGB8) -> Self {
        Self::from_rgb(color.r, color.g, color.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack(0x12, 0x34, 0x56), 0x0012_3456);
        assert_eq!(pack(255, 0, 0), 0x00FF_0000);
        assert_eq!(pack(0, 0, 255), 0x0000_00FF);
    }

    #[test]
    fn test_unpack_inverts_pack() {
        for &(r, g, b) in &[(0, 0, 0), (255, 255, 255), (1, 2, 3), (200, 17, 99), (255, 0, 128)] {
            assert_eq!(unpack(pack(r, g, b)), RGB8::new(r, g, b));
        }
    }

    #[test]
    fn test_unpack_ignores_top_byte() {
        assert_eq!(unpack(0xAB12_3456), RGB8::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_brightness_stores_level_plus_one() {
        for level in 0..=255u8 {
            let stored = Brightness::from_level(level).stored();
            assert_eq!(stored, level.wrapping_add(1));
            assert_eq!(stored == 0, level == 255);
        }
    }

    #[test]
    fn test_bypass_sends_raw_values() {
        let full = Brightness::from_level(255);
        assert_eq!(full, Brightness::BYPASS);
        assert!(full.is_bypass());
        for channel in 0..=255u8 {
            assert_eq!(full.scale(channel), channel);
        }
    }

    #[test]
    fn test_level_zero_is_off() {
        let off = Brightness::from_level(0);
        assert_eq!(off.stored(), 1);
        for channel in 0..=255u8 {
            assert_eq!(off.scale(channel), 0);
        }
    }

    #[test]
    fn test_half_brightness_scaling() {
        let half = Brightness::from_level(128);
        assert_eq!(half.scale(255), 128);
        assert_eq!(half.scale(100), 50);
        assert_eq!(Brightness::default().scale(255), 127);
    }

    #[test]
    fn test_wheel_boundaries() {
        assert_eq!(wheel(255), RGB8::new(255, 0, 0));
        // pos 84, last step of the red to blue segment
        assert_eq!(wheel(171), RGB8::new(3, 0, 252));
        // pos 85 starts the blue to green segment
        assert_eq!(wheel(170), RGB8::new(0, 0, 255));
        assert_eq!(wheel(85), RGB8::new(0, 255, 0));
        assert_eq!(wheel(1), RGB8::new(252, 3, 0));
        assert_eq!(wheel(0), wheel(255));
    }

    #[test]
    fn test_wheel_is_continuous() {
        let step = |a: u8, b: u8| (i16::from(a) - i16::from(b)).abs();
        for phase in 0..=255u8 {
            let here = wheel(phase);
            let next = wheel(phase.wrapping_add(1));
            assert!(step(here.r, next.r) <= 3, "red jumps at phase {}", phase);
            assert!(step(here.g, next.g) <= 3, "green jumps at phase {}", phase);
            assert!(step(here.b, next.b) <= 3, "blue jumps at phase {}", phase);
        }
    }

    #[test]
    fn test_pixel_wire_order() {
        let pixel = PixelState::from_rgb(1, 2, 3);
        assert_eq!(pixel.wire_order(), [3, 2, 1]);
        assert_eq!(pixel.rgb(), RGB8::new(1, 2, 3));
        assert_eq!(PixelState::from(unpack(0x0001_0203)), pixel);
        assert_eq!(PixelState::default(), PixelState::OFF);
    }
}
