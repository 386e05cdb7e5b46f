//! Hex color parsing and formatting.
//!
//! Accepted inputs (leading `#` optional, case-insensitive):
//!   `#rgb`      -> shorthand, expanded per channel
//!   `#rrggbb`   -> canonical
//!   `#rrggbbaa` -> with alpha
//! Output is always lowercase with a leading `#`.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color length {len} in '{input}'")]
    InvalidLength { input: String, len: usize },
    #[error("invalid hex digit in '{input}'")]
    InvalidDigit { input: String },
}

/// Serialized width of a hex color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HexWidth {
    /// `#rrggbb`
    Rgb,
    /// `#rrggbbaa`
    Rgba,
}

/// 8-bit RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex string, returning the color and the width it should be written back in.
    pub fn parse(input: &str) -> Result<(Self, HexWidth), ColorError> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits).as_bytes();

        let bad_digit = || ColorError::InvalidDigit {
            input: input.to_string(),
        };
        let mut nibbles = [0u8; 8];
        if digits.len() > nibbles.len() {
            return Err(ColorError::InvalidLength {
                input: input.to_string(),
                len: digits.len(),
            });
        }
        for (slot, &c) in nibbles.iter_mut().zip(digits) {
            *slot = hex_nibble(c).ok_or_else(bad_digit)?;
        }

        match digits.len() {
            3 => Ok((
                Self::rgb(
                    nibbles[0] * 17,
                    nibbles[1] * 17,
                    nibbles[2] * 17,
                ),
                HexWidth::Rgb,
            )),
            6 => Ok((
                Self::rgb(
                    nibbles[0] << 4 | nibbles[1],
                    nibbles[2] << 4 | nibbles[3],
                    nibbles[4] << 4 | nibbles[5],
                ),
                HexWidth::Rgb,
            )),
            8 => Ok((
                Self {
                    r: nibbles[0] << 4 | nibbles[1],
                    g: nibbles[2] << 4 | nibbles[3],
                    b: nibbles[4] << 4 | nibbles[5],
                    a: nibbles[6] << 4 | nibbles[7],
                },
                HexWidth::Rgba,
            )),
            len => Err(ColorError::InvalidLength {
                input: input.to_string(),
                len,
            }),
        }
    }

    /// Channels as f32 in 0..=255 space.
    #[inline]
    pub fn channels(self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, self.a as f32]
    }

    /// Round and clamp 0..=255 channels back into a color.
    #[inline]
    pub fn from_channels(c: [f32; 4]) -> Self {
        let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Self {
            r: q(c[0]),
            g: q(c[1]),
            b: q(c[2]),
            a: q(c[3]),
        }
    }

    pub fn to_hex(self, width: HexWidth) -> String {
        match width {
            HexWidth::Rgb => format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
            HexWidth::Rgba => format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            ),
        }
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            f.write_str(&self.to_hex(HexWidth::Rgb))
        } else {
            f.write_str(&self.to_hex(HexWidth::Rgba))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_widths() {
        assert_eq!(
            Rgba8::parse("#FF8000").unwrap(),
            (Rgba8::rgb(255, 128, 0), HexWidth::Rgb)
        );
        assert_eq!(
            Rgba8::parse("#f80").unwrap(),
            (Rgba8::rgb(255, 136, 0), HexWidth::Rgb)
        );
        let (c, w) = Rgba8::parse("00000080").unwrap();
        assert_eq!(c.a, 128);
        assert_eq!(w, HexWidth::Rgba);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Rgba8::parse("#12345"),
            Err(ColorError::InvalidLength { len: 5, .. })
        ));
        assert!(matches!(
            Rgba8::parse("#12345g"),
            Err(ColorError::InvalidDigit { .. })
        ));
        assert!(Rgba8::parse("#123456789").is_err());
    }

    #[test]
    fn formats_lowercase() {
        let (c, w) = Rgba8::parse("#ABCDEF").unwrap();
        assert_eq!(c.to_hex(w), "#abcdef");
    }
}
