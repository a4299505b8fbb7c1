//! # tinct-theme — palette templates
//!
//! Applies a color palette to text templates through a small embedded
//! expression language.
//!
//! # Architecture
//!
//! ```text
//! Colors/Roles JSON + "a=b;c=d" variables
//!     │
//!     ▼
//! palette.rs:   immutable keys / roles / variables
//!     │
//!     ▼
//! registry.rs:  function + property tables (TINT, HEX, …)
//!     │
//!     ▼
//! engine.rs:    variable pre-pass, then rewrite passes to a fixed point
//!     │
//!     ▼
//! batch.rs:     many documents in parallel, failures isolated
//! ```
//!
//! `harmony.rs` derives preview sets (complementary, triadic, tints, …)
//! for every palette color.
//!
//! ```
//! use tinct_theme::{Palette, RewriteEngine};
//!
//! let palette = Palette::from_json(r##"{"Colors": ["#ff0000"], "Roles": {}}"##).unwrap();
//! let out = RewriteEngine::default()
//!     .render("fg = #KEY(0).COMPLEMENTARY().HEX", &palette)
//!     .unwrap();
//! assert_eq!(out, "fg = #00ffff");
//! ```

pub mod batch;
pub mod engine;
pub mod error;
pub mod harmony;
pub mod palette;
pub mod registry;
pub mod variables;

pub use batch::{Document, Outcome, render_batch};
pub use engine::{EngineConfig, Rendering, RewriteEngine, Skipped, render};
pub use error::{ArgError, PaletteError, RenderError};
pub use harmony::{Harmonies, HarmonyKind, PaletteHarmonies};
pub use palette::{Palette, PaletteSource};
pub use registry::{Function, Property};
pub use tinct_color::Color;
pub use variables::Variables;
