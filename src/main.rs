// SPDX-License-Identifier: MIT
//
// tinct — apply an image-derived color palette to text templates.
//
// This is the binary that wires the library crates to the command line:
//
//   tinct-color → HSV color value and its operations
//   tinct-theme → palette, rewrite engine, harmonies, batch rendering
//
// A `render` run flows through:
//
//   palette JSON + --vars → Palette
//   inputs (files, directory entries) → Documents
//   render_batch (parallel, failures isolated) → output dir or stdout
//
// Any document that fails is reported on stderr and the process exits 1,
// after every other document has still been written.

mod cli;
mod config;
mod swatch;

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tinct_theme::{Document, Palette, PaletteHarmonies, RewriteEngine, Variables, render_batch};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use cli::{Cli, Command, LogLevel};
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tinct: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&cli, &config);

    match run(cli.command, config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("tinct: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `--log-level`, then `--verbose`, then `RUST_LOG`, then the config file,
/// then `warn`. Logs always go to stderr.
fn init_logging(cli: &Cli, config: &Config) {
    let flag = cli.log_level.or(cli.verbose.then_some(LogLevel::Debug));
    let filter = match flag {
        Some(level) => EnvFilter::builder()
            .with_default_directive(LevelFilter::from(level).into())
            .parse_lossy(""),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::from(config.log_level.unwrap_or(LogLevel::Warn)).into())
            .from_env_lossy(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Run one subcommand. `Ok(false)` means some documents failed but the
/// rest were processed.
fn run(command: Command, config: Config) -> Result<bool> {
    match command {
        Command::Render {
            palette,
            vars,
            output,
            max_passes,
            inputs,
        } => {
            let config = config.with_max_passes(max_passes)?;
            let palette = load_palette(Some(&palette), vars.as_deref())?;
            let files = collect_inputs(&inputs)?;
            if files.len() > 1 && output.is_none() {
                bail!("--output is required when rendering {} documents", files.len());
            }
            render_files(RewriteEngine::new(config.engine), &palette, &files, output.as_deref())
        }
        Command::Eval {
            expression,
            palette,
            vars,
            max_passes,
        } => {
            let config = config.with_max_passes(max_passes)?;
            let palette = load_palette(palette.as_deref(), vars.as_deref())?;
            let text = RewriteEngine::new(config.engine).render(&expression, &palette)?;
            println!("{text}");
            Ok(true)
        }
        Command::Harmonies { palette, json } => {
            let palette = load_palette(Some(&palette), None)?;
            let all = PaletteHarmonies::of(&palette);
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                swatch::report(&mut io::stdout().lock(), &all)?;
            }
            Ok(true)
        }
    }
}

/// Read a palette file (or start empty) and attach `NAME=VALUE;` variables.
fn load_palette(path: Option<&Path>, vars: Option<&str>) -> Result<Palette> {
    let palette = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading palette {}", path.display()))?;
            Palette::from_json(&json).with_context(|| format!("in palette {}", path.display()))?
        }
        None => Palette::default(),
    };
    let variables = vars.map(Variables::parse).unwrap_or_default();
    debug!(
        keys = palette.keys().len(),
        variables = variables.len(),
        "palette loaded"
    );
    Ok(palette.with_variables(variables))
}

/// Expand directories into the regular files directly inside them, sorted.
/// Other inputs are taken as given.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(input).with_context(|| format!("listing {}", input.display()))? {
                let path = entry?.path();
                if path.is_file() {
                    entries.push(path);
                }
            }
            entries.sort();
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Render `files` and write each result under `output` (same file name),
/// or to stdout when there is no output directory. When two inputs share a
/// file name, the first one keeps the output and the later one fails.
fn render_files(
    engine: RewriteEngine,
    palette: &Palette,
    files: &[PathBuf],
    output: Option<&Path>,
) -> Result<bool> {
    let mut ok = true;
    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        match fs::read_to_string(path) {
            Ok(text) => documents.push(Document::new(path.display().to_string(), text)),
            Err(e) => {
                eprintln!("tinct: {}: {e}", path.display());
                ok = false;
            }
        }
    }

    if let Some(dir) = output {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut written = HashSet::new();
    for outcome in render_batch(&engine, palette, documents) {
        let rendering = match outcome.result {
            Ok(rendering) => rendering,
            Err(e) => {
                eprintln!("tinct: {}: {e}", outcome.name);
                ok = false;
                continue;
            }
        };
        info!(
            document = %outcome.name,
            passes = rendering.passes,
            substitutions = rendering.substitutions,
            skipped = rendering.skipped.len(),
            "rendered"
        );
        let Some(dir) = output else {
            io::stdout().lock().write_all(rendering.text.as_bytes())?;
            continue;
        };
        let Some(name) = Path::new(&outcome.name).file_name() else {
            eprintln!("tinct: {}: no file name", outcome.name);
            ok = false;
            continue;
        };
        let target = dir.join(name);
        if !written.insert(target.clone()) {
            eprintln!(
                "tinct: {}: {} is already written by another input",
                outcome.name,
                target.display()
            );
            ok = false;
            continue;
        }
        if let Err(e) = fs::write(&target, &rendering.text) {
            eprintln!("tinct: {}: {e}", target.display());
            ok = false;
        }
    }
    Ok(ok)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tinct_theme::EngineConfig;

    const PALETTE: &str = r##"{"Colors": ["#1e1e2e", "#cdd6f4"], "Roles": {"accent": "#f38ba8"}}"##;

    fn palette() -> Palette {
        Palette::from_json(PALETTE).unwrap()
    }

    // ── Inputs ──

    #[test]
    fn directories_expand_to_sorted_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.conf"), "").unwrap();
        fs::write(dir.path().join("a.conf"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.conf"), "").unwrap();
        let single = dir.path().join("nested").join("c.conf");

        let files = collect_inputs(&[dir.path().to_path_buf(), single.clone()]).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.conf"), dir.path().join("b.conf"), single]
        );
    }

    #[test]
    fn missing_file_passes_through() {
        let files = collect_inputs(&[PathBuf::from("does/not/exist")]).unwrap();
        assert_eq!(files.len(), 1);
    }

    // ── Palette ──

    #[test]
    fn palette_file_with_variables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colors.json");
        fs::write(&path, PALETTE).unwrap();
        let palette = load_palette(Some(&path), Some("font=Iosevka;")).unwrap();
        assert_eq!(palette.keys().len(), 2);
        assert_eq!(palette.resolve_variable("FONT"), Some("Iosevka"));
    }

    #[test]
    fn missing_palette_is_an_error() {
        assert!(load_palette(Some(Path::new("no/such/colors.json")), None).is_err());
    }

    #[test]
    fn no_palette_is_empty() {
        let palette = load_palette(None, None).unwrap();
        assert!(palette.keys().is_empty());
    }

    // ── Rendering ──

    #[test]
    fn writes_each_document_to_output() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let a = src.path().join("a.conf");
        let b = src.path().join("b.conf");
        fs::write(&a, "bg = #KEY(0).HEX\n").unwrap();
        fs::write(&b, "accent = ROLE(accent)\n").unwrap();

        let ok = render_files(RewriteEngine::default(), &palette(), &[a, b], Some(out.path())).unwrap();
        assert!(ok);
        assert_eq!(
            fs::read_to_string(out.path().join("a.conf")).unwrap(),
            "bg = #1e1e2e\n"
        );
        assert_eq!(
            fs::read_to_string(out.path().join("b.conf")).unwrap(),
            "accent = 243, 139, 168\n"
        );
    }

    #[test]
    fn failed_document_does_not_stop_others() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let chain = src.path().join("chain.conf");
        let plain = src.path().join("plain.conf");
        fs::write(&chain, "KEY(0).TINT(0.1).SHADE(0.1).TINT(0.1).SHADE(0.1).HEX").unwrap();
        fs::write(&plain, "KEY(1).HEX").unwrap();
        let missing = src.path().join("missing.conf");

        let engine = RewriteEngine::new(EngineConfig { max_passes: 2 });
        let ok = render_files(engine, &palette(), &[chain, missing, plain], Some(out.path())).unwrap();
        assert!(!ok);
        assert!(!out.path().join("chain.conf").exists());
        assert!(!out.path().join("missing.conf").exists());
        assert_eq!(
            fs::read_to_string(out.path().join("plain.conf")).unwrap(),
            "cdd6f4"
        );
    }

    #[test]
    fn same_file_name_from_two_directories_fails_the_second() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::create_dir(src.path().join("one")).unwrap();
        fs::create_dir(src.path().join("two")).unwrap();
        let first = src.path().join("one").join("theme.conf");
        let second = src.path().join("two").join("theme.conf");
        fs::write(&first, "KEY(0).HEX").unwrap();
        fs::write(&second, "KEY(1).HEX").unwrap();

        let ok = render_files(RewriteEngine::default(), &palette(), &[first, second], Some(out.path())).unwrap();
        assert!(!ok);
        assert_eq!(
            fs::read_to_string(out.path().join("theme.conf")).unwrap(),
            "1e1e2e"
        );
    }
}
