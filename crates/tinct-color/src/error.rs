// SPDX-License-Identifier: MIT
//
// Color construction errors.

use thiserror::Error;

/// A color could not be constructed from its textual or numeric form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    /// The string is not a six-digit hex color (`rrggbb`, optional `#`).
    #[error("invalid hex color '{0}': expected six hex digits (#rrggbb)")]
    InvalidHex(String),

    /// A saturation or value component fell outside 0.0–1.0 (or was NaN).
    #[error("{channel} component {value} is outside 0.0–1.0")]
    OutOfRange {
        /// Which channel was rejected (`"saturation"` or `"value"`).
        channel: &'static str,
        /// The offending value.
        value: f64,
    },
}

pub type Result<T> = std::result::Result<T, ColorError>;
