//! Packed truecolor values and the two-color palette a render uses.

use std::fmt;
use std::str::FromStr;

/// A pixel value packed as `0xRRGGBB`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Packs three channels.
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Rgb((u32::from(red) << 16) | (u32::from(green) << 8) | u32::from(blue))
    }

    /// Red channel.
    pub fn red(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green channel.
    pub fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue channel.
    pub fn blue(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

const NAMED: [(&str, u32); 8] = [
    ("black", 0x00_0000),
    ("white", 0xFF_FFFF),
    ("red", 0xFF_0000),
    ("yellow", 0xFF_FF00),
    ("orange", 0xFF_A500),
    ("blue", 0x00_00FF),
    ("green", 0x00_FF00),
    ("purple", 0x6A_0DAD),
];

impl FromStr for Rgb {
    type Err = String;

    /// Accepts a color name, `#RRGGBB`, or `0xRRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if let Some(&(_, value)) = NAMED.iter().find(|(name, _)| *name == lower) {
            return Ok(Rgb(value));
        }

        let hex = if lower.starts_with('#') {
            &lower[1..]
        } else if lower.starts_with("0x") {
            &lower[2..]
        } else {
            return Err(format!("Unknown color '{}'", s));
        };

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Color '{}' must have exactly six hex digits", s));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|_| format!("Could not parse color '{}'", s))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// The two flat colors of a render: one for points that never escaped,
/// one for everything else.  Fixed for the duration of a render.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Color of points presumed to be in the set.
    pub inside: Rgb,
    /// Color of points that escaped.
    pub outside: Rgb,
}

impl Palette {
    /// Constructor.
    pub fn new(inside: Rgb, outside: Rgb) -> Self {
        Palette { inside, outside }
    }

    /// Picks a color for an escape count under the given bound.
    #[inline]
    pub fn color(&self, iterations: usize, limit: usize) -> Rgb {
        if iterations == limit {
            self.inside
        } else {
            self.outside
        }
    }
}

impl Default for Palette {
    /// Black set on a white background.
    fn default() -> Self {
        Palette::new(Rgb(0x00_0000), Rgb(0xFF_FFFF))
    }
}
