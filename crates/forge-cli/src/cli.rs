//! Command-line argument definitions.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tracing::level_filters::LevelFilter;

use forge_model::ContentKind;
use forge_store::SortOrder;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "forge",
    version,
    about = "Author homebrew classes, races and backgrounds",
    long_about = "Author homebrew classes, races and backgrounds.\n\n\
                  Records are kept as JSON files in the data directory and can be\n\
                  exported as JSON, Markdown, standalone HTML or a printable PDF."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file to use instead of the platform default.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machines).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging setup for these flags. `--log-level` beats `-v`/`-q`, and
    /// either one switches off the `RUST_LOG` override.
    pub fn log_config(&self) -> LogConfig {
        let explicit = self.log_level.map(LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter: explicit.unwrap_or_else(|| self.verbosity.tracing_level_filter()),
            use_env_filter: explicit.is_none() && !self.verbosity.is_present(),
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            with_ansi,
            ..LogConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new draft record.
    New(NewArgs),

    /// Print a record as a Markdown preview.
    Show(ShowArgs),

    /// List stored records.
    List(ListArgs),

    /// Run every wizard step's checks against a record.
    Validate(IdArgs),

    /// Apply a JSON merge patch to a record.
    Set(SetArgs),

    /// Delete a record.
    Delete(IdArgs),

    /// Export a record to a file.
    Export(ExportArgs),

    /// List the supported export formats.
    Formats,

    /// Fetch reference content from the configured lookup API.
    Lookup(LookupArgs),
}

#[derive(Parser)]
pub struct NewArgs {
    /// Kind of content to create.
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Display name.
    #[arg(long = "name")]
    pub name: String,

    /// Short description shown under the title.
    #[arg(long = "description", default_value = "")]
    pub description: String,
}

#[derive(Parser)]
pub struct IdArgs {
    /// Record id.
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Record id.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Spell ability names out in full.
    #[arg(long = "full-names")]
    pub full_names: bool,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Only list records of this kind.
    #[arg(long = "kind", value_enum)]
    pub kind: Option<KindArg>,

    /// Only list records whose name contains this text.
    #[arg(long = "name", value_name = "TEXT")]
    pub name: Option<String>,

    /// Sort order.
    #[arg(long = "sort", value_enum, default_value = "updated")]
    pub sort: SortArg,
}

#[derive(Parser)]
pub struct SetArgs {
    /// Record id.
    #[arg(value_name = "ID")]
    pub id: String,

    /// JSON merge patch, e.g. '{"name": "Stormborn"}'.
    #[arg(value_name = "PATCH")]
    pub patch: String,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Record id.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Export format: structured, markup, hypertext, document (or json, md, html, pdf).
    #[arg(long = "format", short = 'f')]
    pub format: Option<String>,

    /// File name stem; defaults to dnd-<kind>-<name>.
    #[arg(long = "stem")]
    pub stem: Option<String>,

    /// Output directory (default: export.output_dir from settings).
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Spell ability names out in full.
    #[arg(long = "full-names")]
    pub full_names: bool,
}

#[derive(Parser)]
pub struct LookupArgs {
    /// Resource type, e.g. classes, races, spells.
    #[arg(value_name = "RESOURCE")]
    pub resource: String,

    /// Resource index, e.g. wizard.
    #[arg(value_name = "INDEX")]
    pub index: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Class,
    Race,
    Background,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Class => ContentKind::Class,
            KindArg::Race => ContentKind::Race,
            KindArg::Background => ContentKind::Background,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Name,
    NameDesc,
    Updated,
    Created,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Name => SortOrder::NameAsc,
            SortArg::NameDesc => SortOrder::NameDesc,
            SortArg::Updated => SortOrder::UpdatedDesc,
            SortArg::Created => SortOrder::CreatedAsc,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
