//! # tinct-color — HSV color model
//!
//! A small, immutable hue/saturation/value color type with conversions to
//! 8-bit RGB and hex text, plus the derivation catalog used by palette
//! templates: hue shifts, harmonies, tint/shade and interpolation.
//!
//! Every component lives on the unit interval. Hue is a fraction of a full
//! turn and always wraps; saturation and value are bounded to 0.0–1.0.
//!
//! ```
//! use tinct_color::Color;
//!
//! let red = Color::from_hex("#ff0000").unwrap();
//! assert_eq!(red.complementary().hex(), "00ffff");
//! assert_eq!(red.shade(1.0).rgb(), [0, 0, 0]);
//! ```

// Single-char math variables are standard in color science.
#![allow(clippy::many_single_char_names)]
// Channel conversions between f64 and u8 are clamped before casting.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

pub mod color;
pub mod error;

pub use color::Color;
pub use error::ColorError;
