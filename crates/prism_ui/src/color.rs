//! Color model shared by every component of a picker.
//!
//! A [`Color`] stores hue/saturation/value plus alpha and derives RGB and
//! color temperature on demand. Writes always go through [`Color::set`], which
//! clamps to the channel's declared range.

use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

/// Lowest temperature the kelvin conversion can represent
pub const KELVIN_MIN: f32 = 2000.0;
/// Highest temperature the kelvin conversion can represent
pub const KELVIN_MAX: f32 = 40000.0;
/// Binary search resolution when deriving a temperature from RGB
const KELVIN_EPSILON: f32 = 0.4;

/// A single numeric dimension of a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Hue,
    Saturation,
    #[default]
    Value,
    Red,
    Green,
    Blue,
    Alpha,
    Kelvin,
}

impl Channel {
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Hue => "hue",
            Channel::Saturation => "saturation",
            Channel::Value => "value",
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
            Channel::Alpha => "alpha",
            Channel::Kelvin => "kelvin",
        }
    }

    /// The range a [`Color`] accepts for this channel.
    pub fn range(&self) -> ChannelRange {
        match self {
            Channel::Hue => ChannelRange::linear(0.0, 360.0),
            Channel::Saturation | Channel::Value => ChannelRange::linear(0.0, 100.0),
            Channel::Red | Channel::Green | Channel::Blue => ChannelRange::linear(0.0, 255.0),
            Channel::Alpha => ChannelRange::linear(0.0, 1.0),
            Channel::Kelvin => ChannelRange::logarithmic(KELVIN_MIN, KELVIN_MAX),
        }
    }

    /// How a value of this channel is shown next to its component.
    pub fn default_rounding(&self) -> Rounding {
        match self {
            Channel::Kelvin => Rounding::Ceil,
            _ => Rounding::Round,
        }
    }
}

/// How positions along a track map onto a channel range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    /// Equal track distances cover equal ratios; requires `min > 0`.
    Logarithmic,
}

/// Inclusive numeric range of a channel plus its track scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRange {
    pub min: f32,
    pub max: f32,
    pub scale: Scale,
}

impl ChannelRange {
    pub const fn linear(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            scale: Scale::Linear,
        }
    }

    pub const fn logarithmic(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            scale: Scale::Logarithmic,
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Position of `value` along the range, in `[0, 1]`.
    pub fn to_ratio(&self, value: f32) -> f32 {
        let value = self.clamp(value);
        let ratio = match self.scale {
            Scale::Linear => (value - self.min) / (self.max - self.min),
            Scale::Logarithmic => {
                let (min, max) = (self.min as f64, self.max as f64);
                ((value as f64 / min).ln() / (max / min).ln()) as f32
            }
        };
        ratio.clamp(0.0, 1.0)
    }

    /// Value at `ratio` along the range. Ratios outside `[0, 1]` are clamped.
    pub fn from_ratio(&self, ratio: f32) -> f32 {
        let ratio = ratio.clamp(0.0, 1.0);
        let value = match self.scale {
            Scale::Linear => self.min + ratio * (self.max - self.min),
            Scale::Logarithmic => {
                let (min, max) = (self.min as f64, self.max as f64);
                (min * (max / min).powf(ratio as f64)) as f32
            }
        };
        self.clamp(value)
    }
}

/// Display rounding applied to a channel's numeric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    #[default]
    Round,
    Ceil,
    Floor,
    /// Show the value unrounded
    #[serde(alias = "none")]
    Exact,
}

impl Rounding {
    pub fn apply(&self, value: f32) -> f32 {
        match self {
            Rounding::Round => value.round(),
            Rounding::Ceil => value.ceil(),
            Rounding::Floor => value.floor(),
            Rounding::Exact => value,
        }
    }
}

/// A mutable color with named channels and a position in its [`ColorSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    index: usize,
    /// Hue in degrees
    h: f32,
    /// Saturation, 0-100
    s: f32,
    /// Value/brightness, 0-100
    v: f32,
    /// Alpha, 0-1
    a: f32,
    /// Last temperature written, kept until another channel changes
    kelvin: Option<f32>,
}

impl Default for Color {
    fn default() -> Self {
        Self::from_hsva(0.0, 0.0, 100.0, 1.0)
    }
}

impl Color {
    /// Create a color from hue (degrees), saturation and value (0-100) and
    /// alpha (0-1). Inputs are clamped.
    pub fn from_hsva(h: f32, s: f32, v: f32, a: f32) -> Self {
        let mut color = Self {
            index: 0,
            h: 0.0,
            s: 0.0,
            v: 0.0,
            a: 1.0,
            kelvin: None,
        };
        color.set(Channel::Hue, h);
        color.set(Channel::Saturation, s);
        color.set(Channel::Value, v);
        color.set(Channel::Alpha, a);
        color
    }

    /// Create a color from 0-255 RGB components.
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        let (h, s, v) = rgb_to_hsv(r, g, b);
        Self::from_hsva(h, s, v, 1.0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(ColorParseError::Digit(hex.to_string()));
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return Err(ColorParseError::Length(hex.to_string())),
        };
        let byte = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| ColorParseError::Digit(hex.to_string()))
        };
        let mut color = Self::from_rgb(byte(0)? as f32, byte(2)? as f32, byte(4)? as f32);
        if expanded.len() == 8 {
            color.set(Channel::Alpha, byte(6)? as f32 / 255.0);
        }
        Ok(color)
    }

    /// Position of this color in its collection
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn hsva(&self) -> (f32, f32, f32, f32) {
        (self.h, self.s, self.v, self.a)
    }

    /// RGB components in 0-255.
    pub fn rgb(&self) -> (f32, f32, f32) {
        let (r, g, b) = hsv_to_rgb(self.h, self.s / 100.0, self.v / 100.0);
        (r * 255.0, g * 255.0, b * 255.0)
    }

    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.rgb();
        format!(
            "#{:02x}{:02x}{:02x}",
            r.round() as u8,
            g.round() as u8,
            b.round() as u8
        )
    }

    /// Read a channel.
    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Hue => self.h,
            Channel::Saturation => self.s,
            Channel::Value => self.v,
            Channel::Alpha => self.a,
            Channel::Red => self.rgb().0,
            Channel::Green => self.rgb().1,
            Channel::Blue => self.rgb().2,
            Channel::Kelvin => self.kelvin.unwrap_or_else(|| {
                let (r, _, b) = self.rgb();
                rgb_to_kelvin(r, b)
            }),
        }
    }

    /// Write a channel, clamping to its range.
    ///
    /// Non-finite values are dropped and leave the color unchanged. Returns
    /// whether the color was written.
    pub fn set(&mut self, channel: Channel, value: f32) -> bool {
        if !value.is_finite() {
            log::trace!("Color: ignoring non-finite {} = {}", channel.name(), value);
            return false;
        }
        let value = channel.range().clamp(value);
        match channel {
            Channel::Hue => self.h = value,
            Channel::Saturation => self.s = value,
            Channel::Value => self.v = value,
            Channel::Alpha => {
                self.a = value;
                // Alpha does not move the temperature.
                return true;
            }
            Channel::Red | Channel::Green | Channel::Blue => {
                let (mut r, mut g, mut b) = self.rgb();
                match channel {
                    Channel::Red => r = value,
                    Channel::Green => g = value,
                    _ => b = value,
                }
                self.set_hsv_from_rgb(r, g, b);
            }
            Channel::Kelvin => {
                let (r, g, b) = kelvin_to_rgb(value);
                self.set_hsv_from_rgb(r, g, b);
                self.kelvin = Some(value);
                return true;
            }
        }
        self.kelvin = None;
        true
    }

    fn set_hsv_from_rgb(&mut self, r: f32, g: f32, b: f32) {
        let (h, s, v) = rgb_to_hsv(r, g, b);
        // Grey has no hue; keep the previous one so the wheel handle stays put.
        if s > 0.0 {
            self.h = h;
        }
        self.s = s;
        self.v = v;
    }
}

/// Ordered collection of colors with one active entry.
#[derive(Debug, Clone, Default)]
pub struct ColorSet {
    colors: Vec<Color>,
    active: usize,
}

impl ColorSet {
    pub fn new(colors: Vec<Color>) -> Self {
        let mut set = Self { colors, active: 0 };
        set.reindex();
        set
    }

    fn reindex(&mut self) {
        for (i, color) in self.colors.iter_mut().enumerate() {
            color.index = i;
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Append a color, returning its index.
    pub fn push(&mut self, mut color: Color) -> usize {
        let index = self.colors.len();
        color.index = index;
        self.colors.push(color);
        index
    }

    pub fn get(&self, index: usize) -> Option<&Color> {
        self.colors.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Color> {
        self.colors.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Make another color active. Out-of-range indices are refused.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.colors.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// The color a component targets: `requested` when it is in bounds,
    /// otherwise the active color. `None` only for an empty set.
    pub fn resolve_active(&self, requested: Option<usize>) -> Option<usize> {
        match requested {
            Some(index) if index < self.colors.len() => Some(index),
            _ if self.active < self.colors.len() => Some(self.active),
            _ => None,
        }
    }
}

/// Convert HSV to RGB.
///
/// `h` is in degrees, `s` and `v` in 0.0-1.0. Returns components in 0.0-1.0.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Convert 0-255 RGB to hue (degrees), saturation and value (0-100).
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let (r, g, b) = (r / 255.0, g / 255.0, b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta <= f32::EPSILON {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max <= 0.0 { 0.0 } else { delta / max };

    (h, s * 100.0, max * 100.0)
}

/// Approximate the RGB color (0-255) of a black body at `kelvin`.
pub fn kelvin_to_rgb(kelvin: f32) -> (f32, f32, f32) {
    let temp = kelvin.clamp(KELVIN_MIN, KELVIN_MAX) / 100.0;
    let (r, g, b) = if temp < 66.0 {
        let g = temp - 2.0;
        let green = -155.254_86 - 0.445_969_5 * g + 104.492_16 * g.ln();
        let blue = if temp < 20.0 {
            0.0
        } else {
            let b = temp - 10.0;
            -254.769_35 + 0.827_409_6 * b + 115.679_94 * b.ln()
        };
        (255.0, green, blue)
    } else {
        let r = temp - 55.0;
        let g = temp - 50.0;
        (
            351.976_9 + 0.114_206_45 * r - 40.253_662 * r.ln(),
            325.449_4 + 0.079_434_57 * g - 28.085_297 * g.ln(),
            255.0,
        )
    };
    (r.clamp(0.0, 255.0), g.clamp(0.0, 255.0), b.clamp(0.0, 255.0))
}

/// Estimate a color temperature from the red and blue components.
pub fn rgb_to_kelvin(r: f32, b: f32) -> f32 {
    if r <= 0.0 {
        return KELVIN_MAX;
    }
    let target = b / r;
    let (mut low, mut high) = (KELVIN_MIN, KELVIN_MAX);
    let mut temp = (low + high) * 0.5;
    while high - low > KELVIN_EPSILON {
        temp = (low + high) * 0.5;
        let (tr, _, tb) = kelvin_to_rgb(temp);
        if tb / tr >= target {
            high = temp;
        } else {
            low = temp;
        }
    }
    temp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clamps_to_range() {
        let mut color = Color::default();
        color.set(Channel::Saturation, 140.0);
        assert_eq!(color.get(Channel::Saturation), 100.0);
        color.set(Channel::Alpha, -2.0);
        assert_eq!(color.get(Channel::Alpha), 0.0);
        color.set(Channel::Kelvin, 90_000.0);
        assert_eq!(color.get(Channel::Kelvin), KELVIN_MAX);
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let mut color = Color::from_hsva(120.0, 50.0, 50.0, 1.0);
        assert!(!color.set(Channel::Hue, f32::NAN));
        assert!(!color.set(Channel::Value, f32::INFINITY));
        assert_eq!(color.hsva(), (120.0, 50.0, 50.0, 1.0));
    }

    #[test]
    fn test_rgb_channel_round_trip() {
        let mut color = Color::from_rgb(10.0, 200.0, 30.0);
        color.set(Channel::Red, 128.0);
        let (r, g, b) = color.rgb();
        assert!((r - 128.0).abs() < 0.01);
        assert!((g - 200.0).abs() < 0.01);
        assert!((b - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_kelvin_is_remembered_until_other_write() {
        let mut color = Color::default();
        color.set(Channel::Kelvin, 5321.5);
        assert_eq!(color.get(Channel::Kelvin), 5321.5);
        color.set(Channel::Alpha, 0.5);
        assert_eq!(color.get(Channel::Kelvin), 5321.5);
        color.set(Channel::Value, 50.0);
        // Derived from the red/blue ratio now, which dimming preserves.
        assert!((color.get(Channel::Kelvin) - 5321.5).abs() < 5.0);
    }

    #[test]
    fn test_derived_kelvin_is_close() {
        let (r, g, b) = kelvin_to_rgb(4000.0);
        let color = Color::from_rgb(r, g, b);
        assert!((color.get(Channel::Kelvin) - 4000.0).abs() < 50.0);
    }

    #[test]
    fn test_hex_parse() {
        let color = Color::from_hex("#ff0000").unwrap();
        assert_eq!(color.to_hex(), "#ff0000");
        assert_eq!(color.get(Channel::Hue), 0.0);

        let short = Color::from_hex("#0f0").unwrap();
        assert_eq!(short.to_hex(), "#00ff00");

        let with_alpha = Color::from_hex("#0000ff80").unwrap();
        assert!((with_alpha.get(Channel::Alpha) - 128.0 / 255.0).abs() < 0.001);

        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_log_range_ratio() {
        let range = ChannelRange::logarithmic(1000.0, 10000.0);
        assert!((range.to_ratio(3162.2776) - 0.5).abs() < 0.0001);
        assert!((range.from_ratio(0.5) - 3162.2776).abs() < 0.01);
        assert_eq!(range.from_ratio(2.0), 10000.0);
        assert_eq!(range.to_ratio(10.0), 0.0);
    }

    #[test]
    fn test_rounding_policy() {
        assert_eq!(Rounding::Round.apply(127.5), 128.0);
        assert_eq!(Rounding::Ceil.apply(4000.1), 4001.0);
        assert_eq!(Rounding::Floor.apply(4000.9), 4000.0);
        assert_eq!(Rounding::Exact.apply(1.25), 1.25);
        assert_eq!(Channel::Kelvin.default_rounding(), Rounding::Ceil);
        assert_eq!(Channel::Hue.default_rounding(), Rounding::Round);
    }

    #[test]
    fn test_color_set_resolve_active() {
        let mut set = ColorSet::new(vec![Color::default(), Color::default()]);
        assert_eq!(set.get(1).map(Color::index), Some(1));
        assert_eq!(set.resolve_active(Some(1)), Some(1));
        assert_eq!(set.resolve_active(Some(5)), Some(0));
        assert!(set.set_active(1));
        assert!(!set.set_active(2));
        assert_eq!(set.resolve_active(None), Some(1));
        assert_eq!(set.push(Color::default()), 2);
        assert_eq!(ColorSet::default().resolve_active(None), None);
    }
}
