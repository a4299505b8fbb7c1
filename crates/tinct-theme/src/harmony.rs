//! Harmony sets — the fixed hue relationships around each palette color.
//!
//! For every base color we derive the same six families the template
//! functions expose, so a designer can preview what `TRIADIC(1)` or
//! `TINT(0.4)` will produce before writing a template.

use std::collections::BTreeMap;

use serde::Serialize;
use tinct_color::Color;

use crate::palette::Palette;

/// Tints and shades are sampled at `i / TINT_STEPS` for `i` in `1..TINT_STEPS`.
pub const TINT_STEPS: u32 = 5;

/// A family of colors derived from one base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarmonyKind {
    Complementary,
    Analogous,
    Triadic,
    Tetradic,
    Tints,
    Shades,
}

impl HarmonyKind {
    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Complementary => "Complementary",
            Self::Analogous => "Analogous",
            Self::Triadic => "Triadic",
            Self::Tetradic => "Tetradic",
            Self::Tints => "Tints",
            Self::Shades => "Shades",
        }
    }

    /// All kinds in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Complementary,
            Self::Analogous,
            Self::Triadic,
            Self::Tetradic,
            Self::Tints,
            Self::Shades,
        ]
    }

    /// Derive this family from `base`.
    #[must_use]
    pub fn generate(self, base: Color) -> Vec<Color> {
        let steps = || (1..TINT_STEPS).map(|i| f64::from(i) / f64::from(TINT_STEPS));
        match self {
            Self::Complementary => vec![base.complementary()],
            Self::Analogous => (0..2).map(|i| base.analogous(f64::from(i))).collect(),
            Self::Triadic => (0..2).map(|i| base.triadic(f64::from(i))).collect(),
            Self::Tetradic => (0..3).map(|i| base.tetradic(f64::from(i))).collect(),
            Self::Tints => steps().map(|t| base.tint(t)).collect(),
            Self::Shades => steps().map(|t| base.shade(t)).collect(),
        }
    }
}

/// Every harmony family for one base color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Harmonies {
    pub base: Color,
    #[serde(rename = "Complementary")]
    pub complementary: Vec<Color>,
    #[serde(rename = "Analogous")]
    pub analogous: Vec<Color>,
    #[serde(rename = "Triadic")]
    pub triadic: Vec<Color>,
    #[serde(rename = "Tetradic")]
    pub tetradic: Vec<Color>,
    #[serde(rename = "Tints")]
    pub tints: Vec<Color>,
    #[serde(rename = "Shades")]
    pub shades: Vec<Color>,
}

impl Harmonies {
    #[must_use]
    pub fn of(base: Color) -> Self {
        Self {
            base,
            complementary: HarmonyKind::Complementary.generate(base),
            analogous: HarmonyKind::Analogous.generate(base),
            triadic: HarmonyKind::Triadic.generate(base),
            tetradic: HarmonyKind::Tetradic.generate(base),
            tints: HarmonyKind::Tints.generate(base),
            shades: HarmonyKind::Shades.generate(base),
        }
    }

    /// The families paired with their kind, in display order.
    #[must_use]
    pub fn families(&self) -> [(HarmonyKind, &[Color]); 6] {
        [
            (HarmonyKind::Complementary, self.complementary.as_slice()),
            (HarmonyKind::Analogous, self.analogous.as_slice()),
            (HarmonyKind::Triadic, self.triadic.as_slice()),
            (HarmonyKind::Tetradic, self.tetradic.as_slice()),
            (HarmonyKind::Tints, self.tints.as_slice()),
            (HarmonyKind::Shades, self.shades.as_slice()),
        ]
    }
}

/// Harmonies for every key and role of a palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteHarmonies {
    #[serde(rename = "Colors")]
    pub keys: Vec<Harmonies>,
    #[serde(rename = "Roles")]
    pub roles: BTreeMap<String, Harmonies>,
}

impl PaletteHarmonies {
    #[must_use]
    pub fn of(palette: &Palette) -> Self {
        Self {
            keys: palette.keys().iter().copied().map(Harmonies::of).collect(),
            roles: palette
                .roles()
                .map(|(name, color)| (name.to_string(), Harmonies::of(color)))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
