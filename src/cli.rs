// SPDX-License-Identifier: MIT
//
// Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for the CLI and config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::OFF,
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tinct")]
#[command(about = "Apply an image-derived color palette to text templates")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (defaults to ./tinct.toml when present)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Shortcut for --log-level=debug
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render template files or directories against a palette
    Render {
        /// Palette JSON ({"Colors": [...], "Roles": {...}})
        #[arg(short, long)]
        palette: PathBuf,

        /// Template variables for NAME.REPLACE
        #[arg(long, value_name = "NAME=VALUE;...")]
        vars: Option<String>,

        /// Output directory (required for more than one document)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rewriting pass limit per document
        #[arg(long)]
        max_passes: Option<usize>,

        /// Template files, or directories whose files are all rendered
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Render a single inline expression and print the result
    Eval {
        /// Expression text, e.g. "KEY(0).TINT(0.2).HEX"
        expression: String,

        /// Palette JSON (an empty palette if omitted)
        #[arg(short, long)]
        palette: Option<PathBuf>,

        /// Template variables for NAME.REPLACE
        #[arg(long, value_name = "NAME=VALUE;...")]
        vars: Option<String>,

        /// Rewriting pass limit
        #[arg(long)]
        max_passes: Option<usize>,
    },

    /// Show harmonies (complementary, triadic, tints, …) for a palette
    Harmonies {
        /// Palette JSON
        #[arg(short, long)]
        palette: PathBuf,

        /// Print JSON instead of terminal swatches
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render() {
        let cli = Cli::parse_from([
            "tinct", "render", "-p", "colors.json", "--vars", "a=b;", "-o", "out", "a.conf", "themes/",
        ]);
        match cli.command {
            Command::Render { palette, vars, output, inputs, max_passes } => {
                assert_eq!(palette, PathBuf::from("colors.json"));
                assert_eq!(vars.as_deref(), Some("a=b;"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert_eq!(inputs.len(), 2);
                assert_eq!(max_passes, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn render_requires_inputs() {
        assert!(Cli::try_parse_from(["tinct", "render", "-p", "colors.json"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tinct", "eval", "KEY(0)", "-v", "--log-level", "trace"]);
        assert!(cli.verbose);
        assert_eq!(cli.log_level, Some(LogLevel::Trace));
    }

    #[test]
    fn level_filter_mapping() {
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::OFF);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
    }
}
