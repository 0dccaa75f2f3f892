//! Byte-quantized RGBA color with RGB/hex/HSL views and CSS theme-token
//! export.
//!
//! The `[u8; 4]` channel tuple is the single source of truth: every other
//! representation is computed on read and quantized (rounded, then clamped
//! to 0..=255) on write. Numeric setters silently ignore non-finite input
//! and keep the previous state; only hex parsing can fail.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use thiserror::Error;

use crate::math::{clamp, wrap_in_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("hex color needs at least {min} digits, got {len}")]
    TooShort { min: usize, len: usize },
    #[error("invalid hex digit in color string")]
    InvalidDigit,
}

/// Round to the nearest integer and clamp into 0..=255. `None` for
/// non-finite input, which setters treat as "keep the previous state".
fn quantify(value: f32) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    Some(clamp(0.0, value.round(), 255.0) as u8)
}

fn hex_value(digit: u8) -> Result<u8, ParseColorError> {
    (digit as char)
        .to_digit(16)
        .map(|value| value as u8)
        .ok_or(ParseColorError::InvalidDigit)
}

/// Decode `digits` into bytes, taking `step` digits per byte. With step 1
/// each digit is duplicated (`a` becomes `aa`), the shorthand expansion rule.
fn hex_to_bytes(digits: &[u8], step: usize) -> Result<Vec<u8>, ParseColorError> {
    let mut bytes = Vec::with_capacity(4);
    let mut offset = 0;
    while offset + step <= digits.len() {
        let byte = if step == 1 {
            hex_value(digits[offset])? * 17
        } else {
            hex_value(digits[offset])? * 16 + hex_value(digits[offset + 1])?
        };
        bytes.push(byte);
        offset += step;
    }
    Ok(bytes)
}

/// Convert an RGB triple to `[hue, saturation, lightness]`, hue in degrees
/// `[0, 360)`, saturation and lightness as fractions `[0, 1]`.
#[allow(clippy::float_cmp)]
pub fn rgb_to_hsl(rgb: [u8; 3]) -> [f32; 3] {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    if max == min {
        // achromatic: gray, black or white
        return [0.0, 0.0, lightness];
    }
    let delta = max - min;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let hue = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    [hue * 60.0, saturation, lightness]
}

/// Convert `[hue, saturation, lightness]` to an RGB triple. The hue is
/// wrapped into `[0, 360)`, saturation and lightness are clamped to `[0, 1]`.
pub fn hsl_to_rgb(hsl: [f32; 3]) -> [u8; 3] {
    let hue = wrap_in_range(hsl[0], 0.0, 360.0);
    let saturation = clamp(0.0, hsl[1], 1.0);
    let lightness = clamp(0.0, hsl[2], 1.0);

    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = lightness - chroma / 2.0;

    let (r, g, b) = if hue < 60.0 {
        (chroma, x, 0.0)
    } else if hue < 120.0 {
        (x, chroma, 0.0)
    } else if hue < 180.0 {
        (0.0, chroma, x)
    } else if hue < 240.0 {
        (0.0, x, chroma)
    } else if hue < 300.0 {
        (x, 0.0, chroma)
    } else {
        (chroma, 0.0, x)
    };

    fn scale(component: f32, m: f32) -> u8 {
        clamp(0.0, ((component + m) * 255.0).round(), 255.0) as u8
    }
    [scale(r, m), scale(g, m), scale(b, m)]
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Color {
    rgba: [u8; 4],
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color::from_bytes([0, 0, 0, 255]);
    pub const WHITE: Color = Color::from_bytes([255; 4]);

    /// Opaque black.
    pub const fn new() -> Self {
        Self::BLACK
    }

    pub const fn from_bytes(rgba: [u8; 4]) -> Self {
        Color { rgba }
    }

    /// `0xRRGGBBAA`.
    pub const fn from_u32(value: u32) -> Self {
        Self::from_bytes(value.to_be_bytes())
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.rgba
    }

    pub fn from_rgb(rgb: [f32; 3]) -> Color {
        let mut color = Color::new();
        color.set_rgb(rgb);
        color
    }

    pub fn from_rgba(rgba: [f32; 4]) -> Color {
        let mut color = Color::new();
        color.set_rgba(rgba);
        color
    }

    pub fn from_hex(value: &str) -> Result<Color, ParseColorError> {
        let mut color = Color::new();
        color.set_hex(value)?;
        Ok(color)
    }

    pub fn from_hexa(value: &str) -> Result<Color, ParseColorError> {
        let mut color = Color::new();
        color.set_hexa(value)?;
        Ok(color)
    }

    pub fn from_hsl(hsl: [f32; 3]) -> Color {
        let mut color = Color::new();
        color.set_hsl(hsl);
        color
    }

    pub fn from_hsla(hsla: [f32; 4]) -> Color {
        let mut color = Color::new();
        color.set_hsla(hsla);
        color
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.rgba[0], self.rgba[1], self.rgba[2]]
    }

    pub fn rgba(&self) -> [u8; 4] {
        self.rgba
    }

    /// `#rrggbb`, lowercase.
    pub fn hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            self.rgba[0], self.rgba[1], self.rgba[2]
        )
    }

    /// `#rrggbbaa`, lowercase.
    pub fn hexa(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            self.rgba[0], self.rgba[1], self.rgba[2], self.rgba[3]
        )
    }

    pub fn hsl(&self) -> [f32; 3] {
        rgb_to_hsl(self.rgb())
    }

    pub fn hsla(&self) -> [f32; 4] {
        let [hue, saturation, lightness] = rgb_to_hsl(self.rgb());
        [hue, saturation, lightness, self.rgba[3] as f32 / 255.0]
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        self.rgba[3] as f32 / 255.0
    }

    pub fn alpha_byte(&self) -> u8 {
        self.rgba[3]
    }

    /// Set from an RGB triple; alpha becomes 255. Channels are quantized.
    pub fn set_rgb(&mut self, rgb: [f32; 3]) -> &mut Self {
        if let (Some(r), Some(g), Some(b)) = (quantify(rgb[0]), quantify(rgb[1]), quantify(rgb[2]))
        {
            self.rgba = [r, g, b, 255];
        }
        self
    }

    pub fn set_rgba(&mut self, rgba: [f32; 4]) -> &mut Self {
        if let (Some(r), Some(g), Some(b), Some(a)) = (
            quantify(rgba[0]),
            quantify(rgba[1]),
            quantify(rgba[2]),
            quantify(rgba[3]),
        ) {
            self.rgba = [r, g, b, a];
        }
        self
    }

    /// Set from a hex string: `#rgb` or `#rrggbb`, `#` optional, 4 and
    /// 5 digit strings read as shorthand, longer strings truncated to 6
    /// digits. Alpha becomes 255.
    pub fn set_hex(&mut self, value: &str) -> Result<&mut Self, ParseColorError> {
        let digits = value.strip_prefix('#').unwrap_or(value).as_bytes();
        if digits.len() < 3 {
            return Err(ParseColorError::TooShort {
                min: 3,
                len: digits.len(),
            });
        }
        let digits = &digits[..digits.len().min(6)];
        let step = if digits.len() < 6 { 1 } else { 2 };
        let bytes = hex_to_bytes(digits, step)?;
        self.rgba = [bytes[0], bytes[1], bytes[2], 255];
        Ok(self)
    }

    /// Set from a hex string with alpha: `#rgba` or `#rrggbbaa`, `#`
    /// optional, 5 to 7 digit strings read as shorthand, longer strings
    /// truncated to 8 digits.
    pub fn set_hexa(&mut self, value: &str) -> Result<&mut Self, ParseColorError> {
        let digits = value.strip_prefix('#').unwrap_or(value).as_bytes();
        if digits.len() < 4 {
            return Err(ParseColorError::TooShort {
                min: 4,
                len: digits.len(),
            });
        }
        let digits = &digits[..digits.len().min(8)];
        let step = if digits.len() < 8 { 1 } else { 2 };
        let bytes = hex_to_bytes(digits, step)?;
        self.rgba = [bytes[0], bytes[1], bytes[2], bytes[3]];
        Ok(self)
    }

    /// Set from `[hue, saturation, lightness]`; alpha becomes 255.
    pub fn set_hsl(&mut self, hsl: [f32; 3]) -> &mut Self {
        if hsl.iter().all(|value| value.is_finite()) {
            let [r, g, b] = hsl_to_rgb(hsl);
            self.rgba = [r, g, b, 255];
        }
        self
    }

    /// Set from `[hue, saturation, lightness, alpha]`, alpha a fraction in
    /// `[0, 1]`.
    pub fn set_hsla(&mut self, hsla: [f32; 4]) -> &mut Self {
        if hsla.iter().all(|value| value.is_finite()) {
            if let Some(alpha) = quantify(hsla[3] * 255.0) {
                let [r, g, b] = hsl_to_rgb([hsla[0], hsla[1], hsla[2]]);
                self.rgba = [r, g, b, alpha];
            }
        }
        self
    }

    /// Set the alpha channel from a fraction in `[0, 1]`.
    pub fn set_alpha(&mut self, value: f32) -> &mut Self {
        if let Some(alpha) = quantify(value * 255.0) {
            self.rgba[3] = alpha;
        }
        self
    }

    pub fn set_alpha_byte(&mut self, value: f32) -> &mut Self {
        if let Some(alpha) = quantify(value) {
            self.rgba[3] = alpha;
        }
        self
    }

    /// Midpoint lightness below 0.5, computed in byte space so the
    /// boundary is exact: `(128, 128, 128)` is not dark.
    pub fn is_dark(&self) -> bool {
        let [r, g, b] = self.rgb();
        let max = r.max(g).max(b) as u16;
        let min = r.min(g).min(b) as u16;
        max + min < 255
    }

    /// CSS custom properties for theming: the base color, a readable text
    /// color, and 15 approximate-alpha variants built by suffixing the hex
    /// value with `10`, `20`, .. `f0`.
    pub fn tokens(&self) -> BTreeMap<String, String> {
        let hex = self.hex();
        let mut tokens = BTreeMap::new();
        tokens.insert(
            "--theme-text".to_string(),
            if self.is_dark() { "#fff" } else { "#000" }.to_string(),
        );
        for digit in 1..16u32 {
            tokens.insert(
                format!("--theme-a{:x}", digit),
                format!("{}{:x}0", hex, digit),
            );
        }
        tokens.insert("--theme".to_string(), hex);
        tokens
    }
}

impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self::from_bytes(value)
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // lossless form
        f.write_str(&self.hexa())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// 3 and 6 digit strings parse opaque, 4 and 8 digit strings carry
    /// alpha.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        match digits.len() {
            4 | 8 => Color::from_hexa(s),
            _ => Color::from_hex(s),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hexa())
    }
}

struct ColorVisitor;
impl<'de> Visitor<'de> for ColorVisitor {
    type Value = Color;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("hexadecimal color string or [u8; 4]")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse()
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(v), &"hexadecimal color"))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        const EXPECT: &str = "a color as [u8; 4]";

        Ok(Color::from_bytes([
            seq.next_element()?
                .ok_or_else(|| de::Error::invalid_length(0, &EXPECT))?,
            seq.next_element()?
                .ok_or_else(|| de::Error::invalid_length(1, &EXPECT))?,
            seq.next_element()?
                .ok_or_else(|| de::Error::invalid_length(2, &EXPECT))?,
            seq.next_element()?
                .ok_or_else(|| de::Error::invalid_length(3, &EXPECT))?,
        ]))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ColorVisitor)
    }
}
