// SPDX-License-Identifier: MIT
//
// tinct color model — HSV on the unit interval.
//
// A `Color` stores hue, saturation and value as `f64` fractions. Hue is a
// fraction of one full turn (0.0 = red, 1/3 = green, 2/3 = blue) and wraps
// on every operation; saturation and value are kept within 0.0–1.0.
//
// Conversion pipeline:
//
//   #rrggbb ↔ RGB8 ↔ HSV (this type) ↔ derivations (shift, tint, lerp…)
//
// Colors are values: every operation returns a new `Color`. Nothing in this
// module allocates except the hex and display views.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ColorError, Result};

/// Analogous neighbours sit one twelfth of a turn either side.
const ANALOGOUS_OFFSETS: [f64; 2] = [-1.0 / 12.0, 1.0 / 12.0];

/// Triadic partners at one and two thirds of a turn.
const TRIADIC_OFFSETS: [f64; 2] = [1.0 / 3.0, 2.0 / 3.0];

/// Tetradic (square) partners at quarter turns.
const TETRADIC_OFFSETS: [f64; 3] = [0.25, 0.5, 0.75];

/// Saturations below this are treated as grey.
const ACHROMATIC_EPSILON: f64 = 1e-9;

// ─── Color ───────────────────────────────────────────────────────────────────

/// An immutable color in HSV space.
///
/// # Examples
///
/// ```
/// use tinct_color::Color;
///
/// let teal = Color::from_rgb(0, 128, 128);
/// let warm = teal.hue_shift(0.5);
/// let pale = warm.tint(0.4);
/// assert_eq!(teal.hex(), "008080");
/// assert_eq!(pale.hsv().0, warm.hsv().0);
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Color {
    h: f64,
    s: f64,
    v: f64,
}

impl Color {
    // ─── Constructors ────────────────────────────────────────────────────

    /// Create a color from HSV components.
    ///
    /// `h` is wrapped onto one turn and never rejected; `s` and `v` must lie
    /// in 0.0–1.0.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::OutOfRange`] if `s` or `v` is outside 0.0–1.0
    /// or not a number.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Result<Self> {
        check_unit("saturation", s)?;
        check_unit("value", v)?;
        Ok(Self { h: wrap_hue(h), s, v })
    }

    /// Create a color from 8-bit RGB channels.
    #[must_use]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (h, s, v) = rgb_to_hsv(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        );
        Self { h, s, v }
    }

    /// Create a color from a six-digit hex string, with or without `#`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHex`] for anything other than exactly six
    /// hex digits.
    pub fn from_hex(s: &str) -> Result<Self> {
        let [r, g, b] = parse_hex(s).ok_or_else(|| ColorError::InvalidHex(s.to_string()))?;
        Ok(Self::from_rgb(r, g, b))
    }

    /// Pure black.
    pub const BLACK: Self = Self { h: 0.0, s: 0.0, v: 0.0 };

    /// Pure white.
    pub const WHITE: Self = Self { h: 0.0, s: 0.0, v: 1.0 };

    // ─── Views ───────────────────────────────────────────────────────────

    /// Hue as a fraction of a turn, in [0, 1).
    #[inline]
    #[must_use]
    pub const fn hue(self) -> f64 {
        self.h
    }

    /// Saturation, 0.0–1.0.
    #[inline]
    #[must_use]
    pub const fn sat(self) -> f64 {
        self.s
    }

    /// Value (brightness), 0.0–1.0.
    #[inline]
    #[must_use]
    pub const fn val(self) -> f64 {
        self.v
    }

    /// All three components as `(h, s, v)`.
    #[inline]
    #[must_use]
    pub const fn hsv(self) -> (f64, f64, f64) {
        (self.h, self.s, self.v)
    }

    /// Whether this color carries no hue (grey, black, white).
    #[inline]
    #[must_use]
    pub fn is_achromatic(self) -> bool {
        self.s < ACHROMATIC_EPSILON
    }

    /// 8-bit RGB channels, rounded to nearest.
    #[must_use]
    pub fn rgb(self) -> [u8; 3] {
        let (r, g, b) = hsv_to_rgb(self.h, self.s, self.v);
        [to_u8(r), to_u8(g), to_u8(b)]
    }

    /// Lowercase `rrggbb` without a leading `#`.
    ///
    /// This is the form the `HEX` template property emits. Use the
    /// `Display` impl for the `#rrggbb` form.
    #[must_use]
    pub fn hex(self) -> String {
        let [r, g, b] = self.rgb();
        format!("{r:02x}{g:02x}{b:02x}")
    }

    /// CMYK percentages `[c, m, y, k]`, each 0–100.
    #[must_use]
    pub fn cmyk(self) -> [u8; 4] {
        let [r, g, b] = self.rgb();
        if (r, g, b) == (0, 0, 0) {
            return [0, 0, 0, 100];
        }
        let c = 1.0 - f64::from(r) / 255.0;
        let m = 1.0 - f64::from(g) / 255.0;
        let y = 1.0 - f64::from(b) / 255.0;
        let k = c.min(m).min(y);
        let pct = |x: f64| ((x - k) / (1.0 - k) * 100.0).round().clamp(0.0, 100.0) as u8;
        [pct(c), pct(m), pct(y), (k * 100.0).round().clamp(0.0, 100.0) as u8]
    }

    // ─── Hue Rotations ───────────────────────────────────────────────────

    /// Rotate the hue by `delta` turns (wraps).
    #[inline]
    #[must_use]
    pub fn hue_shift(self, delta: f64) -> Self {
        Self {
            h: wrap_hue(self.h + delta),
            ..self
        }
    }

    /// The opposite hue, half a turn away.
    #[inline]
    #[must_use]
    pub fn complementary(self) -> Self {
        self.hue_shift(0.5)
    }

    /// One of the two analogous neighbours: `-1/12` for even `index`,
    /// `+1/12` for odd.
    #[must_use]
    pub fn analogous(self, index: f64) -> Self {
        self.hue_shift(ANALOGOUS_OFFSETS[pick(index, ANALOGOUS_OFFSETS.len())])
    }

    /// One of the two triadic partners (`1/3`, `2/3`), chosen by `index mod 2`.
    #[must_use]
    pub fn triadic(self, index: f64) -> Self {
        self.hue_shift(TRIADIC_OFFSETS[pick(index, TRIADIC_OFFSETS.len())])
    }

    /// One of the three tetradic partners (`1/4`, `1/2`, `3/4`), chosen by
    /// `index mod 3`.
    #[must_use]
    pub fn tetradic(self, index: f64) -> Self {
        self.hue_shift(TETRADIC_OFFSETS[pick(index, TETRADIC_OFFSETS.len())])
    }

    // ─── Tint / Shade ────────────────────────────────────────────────────

    /// Move saturation and value toward 1.0 by fraction `t` (clamped 0–1).
    ///
    /// Greys have no hue to saturate, so an achromatic color keeps zero
    /// saturation and only brightens: black tinted fully becomes white.
    #[must_use]
    pub fn tint(self, t: f64) -> Self {
        let t = unit(t);
        let s = if self.is_achromatic() {
            self.s
        } else {
            (1.0 - self.s).mul_add(t, self.s)
        };
        Self {
            s: unit(s),
            v: unit((1.0 - self.v).mul_add(t, self.v)),
            ..self
        }
    }

    /// Scale value toward 0.0 by fraction `t` (clamped 0–1).
    #[must_use]
    pub fn shade(self, t: f64) -> Self {
        Self {
            v: unit(self.v * (1.0 - unit(t))),
            ..self
        }
    }

    // ─── Channel Setters ─────────────────────────────────────────────────

    /// Replace the hue (wrapped).
    #[inline]
    #[must_use]
    pub fn set_hue(self, h: f64) -> Self {
        Self { h: wrap_hue(h), ..self }
    }

    /// Replace the saturation (clamped to 0.0–1.0).
    #[inline]
    #[must_use]
    pub fn set_sat(self, s: f64) -> Self {
        Self { s: unit(s), ..self }
    }

    /// Replace the value (clamped to 0.0–1.0).
    #[inline]
    #[must_use]
    pub fn set_val(self, v: f64) -> Self {
        Self { v: unit(v), ..self }
    }

    // ─── Interpolation ───────────────────────────────────────────────────

    /// Interpolate toward the HSV target `(h, s, v)` by `pos` (clamped 0–1).
    ///
    /// Hue travels the shorter way around the wheel; saturation and value
    /// move linearly. Target `s` and `v` are clamped to 0.0–1.0.
    #[must_use]
    pub fn lerp(self, h: f64, s: f64, v: f64, pos: f64) -> Self {
        let pos = unit(pos);
        let delta = (h - self.h + 1.5).rem_euclid(1.0) - 0.5;
        Self {
            h: wrap_hue(delta.mul_add(pos, self.h)),
            s: unit((unit(s) - self.s).mul_add(pos, self.s)),
            v: unit((unit(v) - self.v).mul_add(pos, self.v)),
        }
    }

    /// Interpolate toward another color. See [`lerp`](Self::lerp).
    #[must_use]
    pub fn lerp_target(self, target: &Self, pos: f64) -> Self {
        self.lerp(target.h, target.s, target.v, pos)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Color(h={:.4}, s={:.4}, v={:.4} → #{})",
            self.h,
            self.s,
            self.v,
            self.hex()
        )
    }
}

impl fmt::Display for Color {
    /// `#rrggbb`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Default for Color {
    /// Black.
    fn default() -> Self {
        Self::BLACK
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Conversion Functions ────────────────────────────────────────────────────

/// Wrap a hue onto [0, 1).
#[inline]
fn wrap_hue(h: f64) -> f64 {
    if !h.is_finite() {
        return 0.0;
    }
    let h = h.rem_euclid(1.0);
    // rem_euclid can round tiny negatives up to exactly 1.0.
    if h >= 1.0 { 0.0 } else { h }
}

/// Clamp to the unit interval; NaN becomes 0.
#[inline]
fn unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

fn check_unit(channel: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ColorError::OutOfRange { channel, value })
    }
}

/// Select an offset slot from a possibly fractional or negative index.
#[inline]
fn pick(index: f64, len: usize) -> usize {
    let slot = index.rem_euclid(len as f64) as usize;
    slot.min(len - 1)
}

/// RGB (0–1 each) to HSV (0–1 each), hexcone model.
fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if (max - min).abs() < f64::EPSILON {
        return (0.0, 0.0, v);
    }
    let span = max - min;
    let s = span / max;
    let rc = (max - r) / span;
    let gc = (max - g) / span;
    let bc = (max - b) / span;
    let h = if (r - max).abs() < f64::EPSILON {
        bc - gc
    } else if (g - max).abs() < f64::EPSILON {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    (wrap_hue(h / 6.0), s, v)
}

/// HSV (0–1 each) to RGB (0–1 each) via the six-sector formula.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s < ACHROMATIC_EPSILON {
        return (v, v, v);
    }
    let scaled = h * 6.0;
    let sector = scaled.floor();
    let f = scaled - sector;
    let p = v * (1.0 - s);
    let q = v * s.mul_add(-f, 1.0);
    let t = v * s.mul_add(-(1.0 - f), 1.0);
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Convert a float (0.0–1.0) to a u8 (0–255), rounding to nearest.
#[inline]
fn to_u8(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

fn parse_hex(s: &str) -> Option<[u8; 3]> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([byte(0)?, byte(2)?, byte(4)?])
}

// ─── Tests ───────────────────────────────────────────────────────────────────
