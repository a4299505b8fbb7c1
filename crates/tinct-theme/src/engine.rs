//! Template rewriting — the fixed-point evaluator for color expressions.
//!
//! A template is ordinary text with color expressions embedded in it:
//!
//! ```text
//! background: KEY(0).SHADE(0.4).HEX;
//! accent:     ROLE(accent).TRIADIC(1);
//! title:      theme.REPLACE
//! ```
//!
//! Rendering runs in two stages:
//!
//! ```text
//! template
//!     │
//!     ▼
//! variable pre-pass:  NAME.REPLACE → value   (once, never rescanned)
//!     │
//!     ▼
//! rewrite passes:     functions → properties → ROLE → KEY
//!     │               (repeat until a pass changes nothing)
//!     ▼
//! rendered text
//! ```
//!
//! Every rule rewrites its match into plain text, and that text is valid
//! input for the next rule. `KEY(0)` becomes `255, 0, 0`, which the next
//! pass sees as a literal and can feed to `.TINT(0.2)`, whose output then
//! feeds `.HEX`. Chains resolve one link per rule application, purely by
//! re-matching the text.
//!
//! Lookups that miss (`KEY(9)` on a three-color palette, an unknown role)
//! are left as written. A construct with bad arguments (`300, 0, 0.HEX`,
//! `1, 2, 3.TINT(x)`) is left as written and reported in
//! [`Rendering::skipped`]. Only a template that keeps rewriting past the
//! pass limit fails the render.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{ArgError, RenderError, Result};
use crate::palette::Palette;
use crate::registry::{Function, Property, format_triple, parse_args, parse_triple};
use crate::variables::Variables;

/// Default bound on rewriting passes per document.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// An `r, g, b` literal. Channel ranges are checked at evaluation time.
/// Only spaces and tabs may follow a comma: a literal never spans lines.
const TRIPLE: &str = r"\b([0-9]+,[ \t]*[0-9]+,[ \t]*[0-9]+)";

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum RuleKind {
    Function(Function),
    Property(Property),
    Role,
    Key,
}

struct Rule {
    kind: RuleKind,
    pattern: Regex,
}

/// The rule catalog in application order: functions and properties in
/// registry order, then `ROLE`, then `KEY`.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let functions = Function::ALL.iter().map(|&f| Rule {
        kind: RuleKind::Function(f),
        pattern: Regex::new(&format!(r"{TRIPLE}\.{}\(([^)]*)\)", regex::escape(f.name())))
            .expect("function regex"),
    });
    let properties = Property::ALL.iter().map(|&p| Rule {
        kind: RuleKind::Property(p),
        pattern: Regex::new(&format!(r"{TRIPLE}\.{}\b", regex::escape(p.name())))
            .expect("property regex"),
    });
    let lookups = [
        Rule {
            kind: RuleKind::Role,
            pattern: Regex::new(r"\bROLE\((\w+)\)").expect("role regex"),
        },
        Rule {
            kind: RuleKind::Key,
            pattern: Regex::new(r"\bKEY\(([0-9]+)\)").expect("key regex"),
        },
    ];
    functions.chain(properties).chain(lookups).collect()
});

impl Rule {
    /// Evaluate one match. `Ok(None)` is a lookup miss.
    fn evaluate(
        &self,
        caps: &Captures<'_>,
        palette: &Palette,
    ) -> std::result::Result<Option<String>, ArgError> {
        match self.kind {
            RuleKind::Function(function) => {
                let color = parse_triple(&caps[1])?;
                let args = parse_args(&caps[2])?;
                Ok(Some(format_triple(function.apply(color, &args)?)))
            }
            RuleKind::Property(property) => {
                let color = parse_triple(&caps[1])?;
                Ok(Some(property.apply(color)))
            }
            RuleKind::Role => Ok(palette.resolve_role(&caps[1]).map(format_triple)),
            // An index too large for usize cannot name a palette slot either.
            RuleKind::Key => Ok(caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| palette.resolve_key(index))
                .map(format_triple)),
        }
    }

    /// Rewrite every non-overlapping match in `text`, left to right.
    ///
    /// Returns the new text (if anything was replaced) and bumps
    /// `substitutions` once per match whose replacement differs from it.
    fn apply(
        &self,
        text: &str,
        palette: &Palette,
        substitutions: &mut usize,
        skipped: &mut SkipLog,
    ) -> Option<String> {
        let rewritten = self.pattern.replace_all(text, |caps: &Captures<'_>| {
            let matched = &caps[0];
            match self.evaluate(caps, palette) {
                Ok(Some(replacement)) => {
                    if replacement != matched {
                        trace!(rule = ?self.kind, from = matched, to = %replacement, "rewrite");
                        *substitutions += 1;
                    }
                    replacement
                }
                Ok(None) => matched.to_string(),
                Err(error) => {
                    skipped.record(matched, error);
                    matched.to_string()
                }
            }
        });
        match rewritten {
            Cow::Owned(next) => Some(next),
            Cow::Borrowed(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How many passes may still perform substitutions before a render is
    /// abandoned as non-terminating.
    pub max_passes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

/// An expression that matched a rule but could not be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    /// The matched text, left in the output unchanged.
    pub expression: String,
    pub error: ArgError,
}

/// Distinct malformed expressions in first-seen order.
#[derive(Default)]
struct SkipLog {
    seen: HashSet<String>,
    entries: Vec<Skipped>,
}

impl SkipLog {
    fn record(&mut self, expression: &str, error: ArgError) {
        if self.seen.contains(expression) {
            return;
        }
        warn!(expression, %error, "expression left unrewritten");
        self.seen.insert(expression.to_string());
        self.entries.push(Skipped {
            expression: expression.to_string(),
            error,
        });
    }
}

/// A successful render with its statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    pub text: String,
    /// Passes executed, including the final pass that changed nothing.
    pub passes: usize,
    /// Total rule substitutions across all passes (variables excluded).
    pub substitutions: usize,
    /// Distinct malformed expressions, in first-seen order.
    pub skipped: Vec<Skipped>,
}

/// Rewrites templates against a palette. Cheap to copy and share.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteEngine {
    config: EngineConfig,
}

impl RewriteEngine {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Render `template` with the palette's own variables.
    ///
    /// # Errors
    ///
    /// See [`render_report`](Self::render_report).
    pub fn render(&self, template: &str, palette: &Palette) -> Result<String> {
        self.render_report(template, palette, palette.variables())
            .map(|rendering| rendering.text)
    }

    /// Render `template`, substituting `variables` first, and report what
    /// happened.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NonTermination`] if pass `max_passes + 1`
    /// still substitutes, and [`RenderError::Variables`] if the variable
    /// names cannot be compiled into a matcher.
    pub fn render_report(
        &self,
        template: &str,
        palette: &Palette,
        variables: &Variables,
    ) -> Result<Rendering> {
        let mut text = substitute_variables(template, variables)?;
        let mut skipped = SkipLog::default();
        let mut total = 0;
        let limit = self.config.max_passes;

        let mut pass = 0;
        loop {
            pass += 1;
            let mut substitutions = 0;
            for rule in RULES.iter() {
                if let Some(next) = rule.apply(&text, palette, &mut substitutions, &mut skipped) {
                    text = next;
                }
            }
            debug!(pass, substitutions, "rewrite pass");

            if substitutions == 0 {
                return Ok(Rendering {
                    text,
                    passes: pass,
                    substitutions: total,
                    skipped: skipped.entries,
                });
            }
            total += substitutions;

            if pass > limit {
                warn!(limit, "template did not reach a fixed point");
                return Err(RenderError::NonTermination { limit, text });
            }
        }
    }
}

/// Render with the default engine and explicit variables.
///
/// # Errors
///
/// See [`RewriteEngine::render_report`].
pub fn render(template: &str, palette: &Palette, variables: &Variables) -> Result<String> {
    RewriteEngine::default()
        .render_report(template, palette, variables)
        .map(|rendering| rendering.text)
}

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// Replace `NAME.REPLACE` for every variable in one scan.
///
/// All names go into a single alternation (longest first), so text inserted
/// for one variable is never matched again by another.
fn substitute_variables(text: &str, variables: &Variables) -> Result<String> {
    if variables.is_empty() {
        return Ok(text.to_string());
    }
    let pattern = variables.matcher()?;

    let mut count = 0usize;
    let out = pattern.replace_all(text, |caps: &Captures<'_>| {
        variables.get(&caps[1]).map_or_else(
            || caps[0].to_string(),
            |value| {
                count += 1;
                value.to_string()
            },
        )
    });
    debug!(substitutions = count, "variable pass");
    Ok(out.into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use tinct_color::Color;

    use super::*;

    fn palette() -> Palette {
        let keys = vec![
            Color::from_hex("#ff0000").unwrap(),
            Color::from_hex("#000000").unwrap(),
            Color::from_hex("#336699").unwrap(),
        ];
        let roles = BTreeMap::from([
            ("accent".to_string(), Color::from_hex("#00ff00").unwrap()),
            ("neutral".to_string(), Color::from_hex("#808080").unwrap()),
        ]);
        Palette::new(keys, roles)
    }

    fn render_ok(template: &str) -> String {
        RewriteEngine::default().render(template, &palette()).unwrap()
    }

    // ── Single rules ─────────────────────────────────────────────────────

    #[test]
    fn key_resolves_to_triple() {
        assert_eq!(render_ok("KEY(0)"), "255, 0, 0");
        assert_eq!(render_ok("a KEY(2) b"), "a 51, 102, 153 b");
    }

    #[test]
    fn role_resolves_to_triple() {
        assert_eq!(render_ok("ROLE(accent)"), "0, 255, 0");
    }

    #[test]
    fn function_on_literal() {
        assert_eq!(render_ok("255, 0, 0.COMPLEMENTARY()"), "0, 255, 255");
        assert_eq!(render_ok("255,0,0.SHADE(1)"), "0, 0, 0");
        assert_eq!(render_ok("255, 0, 0.HUE_SHIFT(0.5)"), "0, 255, 255");
    }

    #[test]
    fn property_on_literal() {
        assert_eq!(render_ok("color: 18, 52, 86.HEX;"), "color: 123456;");
        assert_eq!(render_ok("255, 0, 0.CMYK"), "cmyk(0%, 100%, 100%, 0%)");
    }

    #[test]
    fn property_needs_word_boundary() {
        assert_eq!(render_ok("1, 2, 3.HEXAGON"), "1, 2, 3.HEXAGON");
    }

    #[test]
    fn cmyk_output_is_terminal() {
        assert_eq!(
            render_ok("255, 0, 0.CMYK.HEX"),
            "cmyk(0%, 100%, 100%, 0%).HEX"
        );
        assert_eq!(render_ok("KEY(1).CMYK"), "cmyk(0%, 0%, 0%, 100%)");
    }

    #[test]
    fn literal_does_not_span_lines() {
        assert_eq!(render_ok("rows: 10,\n20,\n30.HEX"), "rows: 10,\n20,\n30.HEX");
        assert_eq!(render_ok("rows: 10,\t20, 30.HEX"), "rows: 0a141e");
    }

    #[test]
    fn hue_does_not_match_hue_shift() {
        let out = render_ok("255, 0, 0.HUE_SHIFT(0.25)");
        let direct = format_triple(Color::from_rgb(255, 0, 0).hue_shift(0.25));
        assert_eq!(out, direct);
    }

    // ── Chaining ─────────────────────────────────────────────────────────

    #[test]
    fn chains_through_rewritten_text() {
        assert_eq!(render_ok("KEY(0).HEX"), "ff0000");
        assert_eq!(render_ok("KEY(1).TINT(1.0).HEX"), "ffffff");
        assert_eq!(render_ok("ROLE(accent).SHADE(1).HEX"), "000000");
    }

    #[test]
    fn long_chain_matches_direct_computation() {
        let out = render_ok("KEY(2).TINT(0.2).TRIADIC(1).SHADE(0.3).HEX");
        let [r, g, b] = Color::from_hex("#336699").unwrap().tint(0.2).rgb();
        let step = Color::from_rgb(r, g, b).triadic(1.0);
        let [r, g, b] = step.rgb();
        let expected = Color::from_rgb(r, g, b).shade(0.3).hex();
        assert_eq!(out, expected);
    }

    #[test]
    fn report_counts_passes() {
        let report = RewriteEngine::default()
            .render_report("KEY(0).HEX", &palette(), &Variables::new())
            .unwrap();
        assert_eq!(report.text, "ff0000");
        // KEY, then HEX, then a clean pass.
        assert_eq!(report.passes, 3);
        assert_eq!(report.substitutions, 2);
        assert!(report.skipped.is_empty());
    }

    // ── Misses and failures ──────────────────────────────────────────────

    #[test]
    fn unresolved_lookups_stay() {
        assert_eq!(render_ok("ROLE(nonexistent)"), "ROLE(nonexistent)");
        assert_eq!(render_ok("KEY(7).HEX"), "KEY(7).HEX");
        assert_eq!(render_ok("KEY(99999999999999999999999)"), "KEY(99999999999999999999999)");
    }

    #[test]
    fn lookups_need_word_boundary() {
        assert_eq!(render_ok("MYKEY(0) XROLE(accent)"), "MYKEY(0) XROLE(accent)");
    }

    #[test]
    fn malformed_arguments_are_skipped_locally() {
        let engine = RewriteEngine::default();
        let report = engine
            .render_report(
                "a: 1, 2, 3.TINT(x)\nb: KEY(0).HEX\nc: 300, 0, 0.HEX\nd: 0, 0, 0.LERP(1)",
                &palette(),
                &Variables::new(),
            )
            .unwrap();
        assert_eq!(
            report.text,
            "a: 1, 2, 3.TINT(x)\nb: ff0000\nc: 300, 0, 0.HEX\nd: 0, 0, 0.LERP(1)"
        );
        // Registry order: LERP is tried before TINT, functions before HEX.
        let bad: Vec<&str> = report.skipped.iter().map(|s| s.expression.as_str()).collect();
        assert_eq!(bad, vec!["0, 0, 0.LERP(1)", "1, 2, 3.TINT(x)", "300, 0, 0.HEX"]);
        assert_eq!(report.skipped[1].error, ArgError::NotANumber("x".into()));
        assert_eq!(report.skipped[2].error, ArgError::Channel("300".into()));
    }

    #[test]
    fn many_distinct_malformed_expressions() {
        let template: String = (0..20_000)
            .map(|i| format!("1, 2, 3.TINT(x{i})\n"))
            .collect();
        let report = RewriteEngine::default()
            .render_report(&template, &palette(), &Variables::new())
            .unwrap();
        assert_eq!(report.text, template);
        assert_eq!(report.passes, 1);
        assert_eq!(report.skipped.len(), 20_000);
        assert_eq!(report.skipped[19_999].expression, "1, 2, 3.TINT(x19999)");
    }

    #[test]
    fn repeated_malformed_expression_reported_once() {
        let report = RewriteEngine::default()
            .render_report("1, 2, 3.TINT(x) 1, 2, 3.TINT(x) KEY(0)", &palette(), &Variables::new())
            .unwrap();
        assert_eq!(report.passes, 2);
        assert_eq!(report.skipped.len(), 1);
    }

    // ── Variables ────────────────────────────────────────────────────────

    #[test]
    fn variables_substitute_case_insensitively() {
        let vars = Variables::parse("Theme=midnight");
        let out = render("name: theme.REPLACE / THEME.REPLACE", &palette(), &vars).unwrap();
        assert_eq!(out, "name: midnight / midnight");
    }

    #[test]
    fn variables_are_not_recursive() {
        let vars = Variables::parse("A=B.REPLACE;B=oops");
        assert_eq!(render("A.REPLACE", &palette(), &vars).unwrap(), "B.REPLACE");
    }

    #[test]
    fn variable_output_is_still_rewritten_as_color_text() {
        let vars = Variables::parse("bg=KEY(0)");
        assert_eq!(render("bg.REPLACE.HEX", &palette(), &vars).unwrap(), "ff0000");
    }

    #[test]
    fn longer_variable_names_win() {
        let vars = Variables::parse("a=short;ab=long");
        assert_eq!(render("ab.REPLACE a.REPLACE", &palette(), &vars).unwrap(), "long short");
    }

    #[test]
    fn variable_names_are_literal() {
        let vars = Variables::parse("a.b=dotted;a+b=plus");
        let out = render("a.b.REPLACE a+b.REPLACE axb.REPLACE", &palette(), &vars).unwrap();
        assert_eq!(out, "dotted plus axb.REPLACE");
    }

    #[test]
    fn palette_variables_are_used_by_render() {
        let palette = palette().with_variables(Variables::parse("x=KEY(0)"));
        assert_eq!(RewriteEngine::default().render("x.REPLACE", &palette).unwrap(), "255, 0, 0");
    }

    // ── Termination ──────────────────────────────────────────────────────

    #[test]
    fn pass_limit_reports_non_termination() {
        let engine = RewriteEngine::new(EngineConfig { max_passes: 1 });
        let err = engine.render("KEY(0).HEX", &palette()).unwrap_err();
        assert_eq!(
            err,
            RenderError::NonTermination {
                limit: 1,
                text: "ff0000".into()
            }
        );
    }

    #[test]
    fn exact_pass_budget_succeeds() {
        let engine = RewriteEngine::new(EngineConfig { max_passes: 2 });
        assert_eq!(engine.render("KEY(0).HEX", &palette()).unwrap(), "ff0000");
    }

    #[test]
    fn plain_text_is_untouched() {
        let text = "no expressions here: 1, 2 and 3.5, KEY() ROLE()";
        assert_eq!(render_ok(text), text);
    }

    #[test]
    fn empty_template() {
        assert_eq!(render_ok(""), "");
    }

    // ── Properties ───────────────────────────────────────────────────────

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn key_hex_matches_color_hex(r: u8, g: u8, b: u8) {
                let color = Color::from_rgb(r, g, b);
                let palette = Palette::new(vec![color], BTreeMap::new());
                let out = RewriteEngine::default().render("KEY(0).HEX", &palette).unwrap();
                prop_assert_eq!(out, color.hex());
            }

            #[test]
            fn rendering_is_a_fixed_point(
                r in any::<u8>(),
                g in any::<u8>(),
                b in any::<u8>(),
                t in 0.0f64..=1.0
            ) {
                let palette = Palette::new(vec![Color::from_rgb(r, g, b)], BTreeMap::new());
                let engine = RewriteEngine::default();
                let once = engine.render(&format!("KEY(0).TINT({t}).HEX"), &palette).unwrap();
                let twice = engine.render(&once, &palette).unwrap();
                prop_assert_eq!(once, twice);
            }
        }
    }
}
