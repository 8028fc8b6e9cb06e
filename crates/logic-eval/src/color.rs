//! `#RRGGBB` colors and the HSL math behind `Color.saturate`.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("`{value}` is not a #RRGGBB color")]
    InvalidHex { value: String },
}

/// Opaque RGB color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB`. The leading `#` is optional.
    pub fn from_hex(value: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex {
            value: value.to_string(),
        };
        let digits = value.strip_prefix('#').unwrap_or(value);
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&digits[i..=i]).map(|c| c * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;
        if delta == 0.0 {
            return Hsl { h: 0.0, s: 0.0, l };
        }
        let s = delta / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        Hsl { h, s, l }
    }
}

impl Hsl {
    pub fn to_rgb(self) -> Rgb {
        let c = (1.0 - (2.0 * self.l - 1.0).abs()) * self.s;
        let h = self.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.l - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r), channel(g), channel(b))
    }
}

/// Scale the HSL saturation of `hex` by `factor`, clamped to `[0, 1]`.
pub fn saturate(hex: &str, factor: f64) -> Result<String, ColorError> {
    let mut hsl = Rgb::from_hex(hex)?.to_hsl();
    hsl.s = (hsl.s * factor).clamp(0.0, 1.0);
    Ok(hsl.to_rgb().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_long_and_short_forms() {
        assert_eq!(Rgb::from_hex("#ff8000"), Ok(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("f80"), Ok(Rgb::new(255, 136, 0)));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn hsl_of_primaries() {
        let red = Rgb::new(255, 0, 0).to_hsl();
        assert_eq!((red.h, red.s, red.l), (0.0, 1.0, 0.5));
        let blue = Rgb::new(0, 0, 255).to_hsl();
        assert_eq!(blue.h, 240.0);
        let grey = Rgb::new(128, 128, 128).to_hsl();
        assert_eq!(grey.s, 0.0);
    }

    #[test]
    fn hsl_converts_back() {
        for color in [
            Rgb::new(255, 0, 0),
            Rgb::new(51, 102, 153),
            Rgb::new(250, 250, 10),
            Rgb::new(0, 0, 0),
            Rgb::new(255, 255, 255),
        ] {
            assert_eq!(color.to_hsl().to_rgb(), color);
        }
    }

    #[test]
    fn saturate_scales_and_clamps() {
        assert_eq!(saturate("#ff0000", 0.0).unwrap(), "#808080");
        assert_eq!(saturate("#ff0000", 1.0).unwrap(), "#ff0000");
        assert_eq!(saturate("#ff0000", 4.0).unwrap(), "#ff0000");
        assert_eq!(saturate("#808080", 2.0).unwrap(), "#808080");
        assert_eq!(
            saturate("nope", 1.0),
            Err(ColorError::InvalidHex {
                value: "nope".to_string()
            })
        );
    }
}
