//! Batch rendering — many documents against one shared palette.
//!
//! Documents are independent: each render reads the palette and owns its
//! own text, so they run in parallel without locking. A failure in one
//! document is recorded in its [`Outcome`] and never stops the others.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::engine::{Rendering, RewriteEngine};
use crate::error::RenderError;
use crate::palette::Palette;

/// One template to render, identified by a caller-chosen name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// The result of rendering one [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub name: String,
    pub result: Result<Rendering, RenderError>,
}

impl Outcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Render every document, preserving input order in the output.
#[must_use]
pub fn render_batch(engine: &RewriteEngine, palette: &Palette, documents: Vec<Document>) -> Vec<Outcome> {
    let outcomes: Vec<Outcome> = documents
        .into_par_iter()
        .map(|doc| {
            let result = engine.render_report(&doc.text, palette, palette.variables());
            if let Err(err) = &result {
                warn!(document = %doc.name, %err, "render failed");
            }
            Outcome {
                name: doc.name,
                result,
            }
        })
        .collect();
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(documents = outcomes.len(), failed, "batch rendered");
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::variables::Variables;

    fn palette() -> Palette {
        Palette::from_json(r##"{"Colors": ["#ff0000"], "Roles": {"bg": "#000000"}}"##)
            .unwrap()
            .with_variables(Variables::parse("name=night"))
    }

    #[test]
    fn renders_in_order() {
        let docs = (0..32)
            .map(|i| Document::new(format!("doc{i}"), format!("{i}: KEY(0).HEX name.REPLACE")))
            .collect();
        let outcomes = render_batch(&RewriteEngine::default(), &palette(), docs);
        assert_eq!(outcomes.len(), 32);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.name, format!("doc{i}"));
            let text = &outcome.result.as_ref().unwrap().text;
            assert_eq!(text, &format!("{i}: ff0000 night"));
        }
    }

    #[test]
    fn failures_are_isolated() {
        let engine = RewriteEngine::new(EngineConfig { max_passes: 1 });
        let docs = vec![
            Document::new("chain", "KEY(0).TINT(0.5).HEX"),
            Document::new("plain", "ROLE(bg)"),
            Document::new("broken", "1, 2, 3.SHADE(?)"),
        ];
        let outcomes = render_batch(&engine, &palette(), docs);
        assert!(matches!(
            outcomes[0].result,
            Err(RenderError::NonTermination { limit: 1, .. })
        ));
        assert_eq!(outcomes[1].result.as_ref().unwrap().text, "0, 0, 0");
        let broken = outcomes[2].result.as_ref().unwrap();
        assert_eq!(broken.text, "1, 2, 3.SHADE(?)");
        assert_eq!(broken.skipped.len(), 1);
    }
}
