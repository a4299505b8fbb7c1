//! Error types for palettes and template rendering.
//!
//! Three tiers, from softest to hardest:
//!
//! - Unresolved `KEY`/`ROLE` lookups are not errors at all; the text stays.
//! - [`ArgError`] covers one malformed construct. The engine logs it and
//!   leaves that occurrence untouched.
//! - [`RenderError`] aborts one document. [`PaletteError`] aborts palette
//!   construction.

use thiserror::Error;
use tinct_color::ColorError;

/// A matched expression whose arguments could not be evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgError {
    /// An argument is not a finite number.
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// An RGB channel is not an integer in 0–255.
    #[error("'{0}' is not an 8-bit channel (0–255)")]
    Channel(String),

    /// Wrong number of arguments for a function.
    #[error("{name} takes {expected} argument(s), got {got}")]
    Arity {
        name: &'static str,
        expected: String,
        got: usize,
    },
}

/// A document could not be rendered to a fixed point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Rewriting was still producing substitutions after the pass limit.
    #[error("template did not reach a fixed point within {limit} rewriting passes")]
    NonTermination {
        limit: usize,
        /// The text as it stood after the last pass.
        text: String,
    },

    /// The variable names could not be compiled into a matcher.
    #[error("variable names could not be compiled: {0}")]
    Variables(String),
}

/// A palette could not be built from its source.
#[derive(Error, Debug)]
pub enum PaletteError {
    /// A color in `Colors` is malformed.
    #[error("Colors[{index}]: {source}")]
    Key {
        index: usize,
        #[source]
        source: ColorError,
    },

    /// A color in `Roles` is malformed.
    #[error("Roles.{role}: {source}")]
    Role {
        role: String,
        #[source]
        source: ColorError,
    },

    /// The palette document is not valid JSON or lacks a required field.
    #[error("palette JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
