//! Palette — the colors a template can reference.
//!
//! A palette bundles three read-only lookups:
//!
//! - keys: an ordered color list, addressed as `KEY(0)`, `KEY(1)`, …
//! - roles: named colors (`ROLE(accent)`), matched case-sensitively
//! - variables: plain strings for `NAME.REPLACE`
//!
//! It is built once per render run from the JSON an extractor produces
//! (`{"Colors": [...], "Roles": {...}}`) and shared freely afterwards.

use std::collections::BTreeMap;

use serde::Deserialize;
use tinct_color::Color;

use crate::error::PaletteError;
use crate::variables::Variables;

/// Raw palette document as written by the extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteSource {
    /// Ordered hex colors, `KEY(0..)`.
    #[serde(rename = "Colors")]
    pub colors: Vec<String>,
    /// Role name → hex color.
    #[serde(rename = "Roles")]
    pub roles: BTreeMap<String, String>,
}

/// An immutable set of colors and variables for rendering.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    keys: Vec<Color>,
    roles: BTreeMap<String, Color>,
    variables: Variables,
}

impl Palette {
    /// Build from already-parsed colors.
    #[must_use]
    pub fn new(keys: Vec<Color>, roles: BTreeMap<String, Color>) -> Self {
        Self {
            keys,
            roles,
            variables: Variables::new(),
        }
    }

    /// Parse every hex color in `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Key`] or [`PaletteError::Role`] for the first
    /// malformed color.
    pub fn from_source(source: &PaletteSource) -> Result<Self, PaletteError> {
        let keys = source
            .colors
            .iter()
            .enumerate()
            .map(|(index, hex)| {
                Color::from_hex(hex).map_err(|source| PaletteError::Key { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let roles = source
            .roles
            .iter()
            .map(|(role, hex)| {
                Color::from_hex(hex)
                    .map(|color| (role.clone(), color))
                    .map_err(|source| PaletteError::Role {
                        role: role.clone(),
                        source,
                    })
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(Self::new(keys, roles))
    }

    /// Parse a palette JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::Json`] if the document is malformed or lacks
    /// `Colors`/`Roles`, otherwise as [`from_source`](Self::from_source).
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        let source: PaletteSource = serde_json::from_str(json)?;
        Self::from_source(&source)
    }

    /// Attach template variables.
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    // ── Lookups ───────────────────────────────────────────────

    /// The color at position `index`, if any.
    #[must_use]
    pub fn resolve_key(&self, index: usize) -> Option<Color> {
        self.keys.get(index).copied()
    }

    /// The color bound to `role` (exact, case-sensitive).
    #[must_use]
    pub fn resolve_role(&self, role: &str) -> Option<Color> {
        self.roles.get(role).copied()
    }

    /// The value of variable `name` (case-insensitive).
    #[must_use]
    pub fn resolve_variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name)
    }

    // ── Accessors ─────────────────────────────────────────────

    #[must_use]
    pub fn keys(&self) -> &[Color] {
        &self.keys
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, Color)> {
        self.roles.iter().map(|(name, color)| (name.as_str(), *color))
    }

    #[must_use]
    pub const fn variables(&self) -> &Variables {
        &self.variables
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
