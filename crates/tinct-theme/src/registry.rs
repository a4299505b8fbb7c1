//! Function and property tables for the template expression language.
//!
//! A template writes `r, g, b.NAME(args)` to call a function on a color and
//! `r, g, b.NAME` to read a property. Both tables are closed enums: the set
//! of names, their order, arities and argument rules are fixed at compile
//! time and shared by every render.

use std::ops::RangeInclusive;

use tinct_color::Color;

use crate::error::ArgError;

// ---------------------------------------------------------------------------
// Function
// ---------------------------------------------------------------------------

/// A color-to-color function callable from a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// `HUE_SHIFT(delta)` — rotate hue by `delta` turns.
    HueShift,
    /// `LERP(h, s, v, pos)` — interpolate toward an HSV target.
    Lerp,
    /// `TINT(t)` — toward full saturation and value.
    Tint,
    /// `SHADE(t)` — toward black.
    Shade,
    /// `COMPLEMENTARY()` — half a turn away.
    Complementary,
    /// `TRIADIC(i)` — `i mod 2` picks 1/3 or 2/3 turn.
    Triadic,
    /// `TETRADIC(i)` — `i mod 3` picks 1/4, 1/2 or 3/4 turn.
    Tetradic,
    /// `ANALOGOUS(i)` — `i mod 2` picks -1/12 or +1/12 turn.
    Analogous,
    /// `HUE(h)` — set hue.
    Hue,
    /// `SAT(s)` — set saturation.
    Sat,
    /// `VAL(v)` — set value.
    Val,
}

impl Function {
    /// Every function, in the order the engine tries them.
    pub const ALL: [Self; 11] = [
        Self::HueShift,
        Self::Lerp,
        Self::Tint,
        Self::Shade,
        Self::Complementary,
        Self::Triadic,
        Self::Tetradic,
        Self::Analogous,
        Self::Hue,
        Self::Sat,
        Self::Val,
    ];

    /// Template spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HueShift => "HUE_SHIFT",
            Self::Lerp => "LERP",
            Self::Tint => "TINT",
            Self::Shade => "SHADE",
            Self::Complementary => "COMPLEMENTARY",
            Self::Triadic => "TRIADIC",
            Self::Tetradic => "TETRADIC",
            Self::Analogous => "ANALOGOUS",
            Self::Hue => "HUE",
            Self::Sat => "SAT",
            Self::Val => "VAL",
        }
    }

    /// Accepted argument counts.
    ///
    /// Harmony functions take an optional index that defaults to 0.
    /// `COMPLEMENTARY` tolerates (and ignores) one for symmetry.
    #[must_use]
    pub const fn arity(self) -> RangeInclusive<usize> {
        match self {
            Self::Lerp => 4..=4,
            Self::Complementary | Self::Triadic | Self::Tetradic | Self::Analogous => 0..=1,
            Self::HueShift | Self::Tint | Self::Shade | Self::Hue | Self::Sat | Self::Val => 1..=1,
        }
    }

    /// Look up a function by its exact template name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|f| f.name() == name).copied()
    }

    /// Evaluate on `color` with already-parsed numeric arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::Arity`] if `args` has the wrong length.
    pub fn apply(self, color: Color, args: &[f64]) -> Result<Color, ArgError> {
        let arity = self.arity();
        if !arity.contains(&args.len()) {
            let expected = if arity.start() == arity.end() {
                arity.start().to_string()
            } else {
                format!("{}–{}", arity.start(), arity.end())
            };
            return Err(ArgError::Arity {
                name: self.name(),
                expected,
                got: args.len(),
            });
        }
        let arg = |i: usize| args.get(i).copied().unwrap_or(0.0);

        Ok(match self {
            Self::HueShift => color.hue_shift(arg(0)),
            Self::Lerp => color.lerp(arg(0), arg(1), arg(2), arg(3)),
            Self::Tint => color.tint(arg(0)),
            Self::Shade => color.shade(arg(0)),
            Self::Complementary => color.complementary(),
            Self::Triadic => color.triadic(arg(0)),
            Self::Tetradic => color.tetradic(arg(0)),
            Self::Analogous => color.analogous(arg(0)),
            Self::Hue => color.set_hue(arg(0)),
            Self::Sat => color.set_sat(arg(0)),
            Self::Val => color.set_val(arg(0)),
        })
    }
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// A derived string view of a color readable from a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// `HEX` — `rrggbb`, lowercase, no `#`.
    Hex,
    /// `CMYK` — `cmyk(c%, m%, y%, k%)`. Never re-read as a color literal.
    Cmyk,
}

impl Property {
    /// Every property, in the order the engine tries them.
    pub const ALL: [Self; 2] = [Self::Hex, Self::Cmyk];

    /// Template spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hex => "HEX",
            Self::Cmyk => "CMYK",
        }
    }

    /// Look up a property by its exact template name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|p| p.name() == name).copied()
    }

    /// Render the property for `color`.
    #[must_use]
    pub fn apply(self, color: Color) -> String {
        match self {
            Self::Hex => color.hex(),
            Self::Cmyk => {
                let [c, m, y, k] = color.cmyk();
                format!("cmyk({c}%, {m}%, {y}%, {k}%)")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Parse a comma-separated number list. Blank entries are skipped, so
/// `""` is zero arguments and a trailing comma is harmless.
///
/// # Errors
///
/// Returns [`ArgError::NotANumber`] for any entry that is not a finite
/// decimal number.
pub fn parse_args(s: &str) -> Result<Vec<f64>, ArgError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .ok_or_else(|| ArgError::NotANumber(part.to_string()))
        })
        .collect()
}

/// Parse an `r, g, b` triple into a color.
///
/// # Errors
///
/// Returns [`ArgError::Channel`] unless there are exactly three integer
/// channels in 0–255.
pub fn parse_triple(s: &str) -> Result<Color, ArgError> {
    let channels = s
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<u8>()
                .map_err(|_| ArgError::Channel(part.to_string()))
        })
        .collect::<Result<Vec<u8>, ArgError>>()?;
    match channels[..] {
        [r, g, b] => Ok(Color::from_rgb(r, g, b)),
        _ => Err(ArgError::Channel(s.to_string())),
    }
}

/// Format a color the way templates write it: `r, g, b`.
#[must_use]
pub fn format_triple(color: Color) -> String {
    let [r, g, b] = color.rgb();
    format!("{r}, {g}, {b}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
