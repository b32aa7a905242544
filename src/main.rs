//! typelist - list files recursively, grouped and sorted by content type.
//!
//! Usage:
//!   typelist [OPTION]... [PATH]...
//!
//! Every entry under the given paths (the current directory by default) is
//! printed once, grouped by its content type, with groups in ascending
//! order of their label.

mod logging;

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, CommandFactory, Parser};
use color_eyre::eyre::Result;

use typelist_core::{BucketOrder, Emitter, LineTerminator, ListConfig, OutputFormat};
use typelist_scan::{SignatureClassifier, TypeScanner};

#[derive(Parser)]
#[command(
    name = "typelist",
    version,
    about = "List FILEs (the current directory by default) recursively, sorted by content-type.",
    disable_help_flag = true
)]
struct Cli {
    /// Paths to list (defaults to the current directory)
    ///
    /// Options are only read before the first path.
    #[arg(value_name = "FILE", trailing_var_arg = true)]
    paths: Vec<PathBuf>,

    /// Do not ignore entries starting with .
    #[arg(short, long)]
    all: bool,

    /// Output using the format "<mime>: <file>"
    #[arg(short, long, conflicts_with = "json")]
    mime: bool,

    /// Output the groups as a JSON array
    #[arg(short, long)]
    json: bool,

    /// Use null instead of new-line to separate output lines
    #[arg(short = '0', long)]
    null: bool,

    /// Warn about paths that cannot be opened instead of failing
    #[arg(short, long)]
    ignore_inaccessible: bool,

    /// List each group in the order entries were found (default: newest first)
    #[arg(long)]
    discovery_order: bool,

    /// Display this help and exit
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    /// Resolve the listing configuration.
    fn into_config(self) -> Result<ListConfig> {
        let roots = if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths
        };

        let format = if self.json {
            OutputFormat::Json
        } else if self.mime {
            OutputFormat::Labeled
        } else {
            OutputFormat::Name
        };

        let config = ListConfig::builder()
            .roots(roots)
            .format(format)
            .terminator(if self.null {
                LineTerminator::Nul
            } else {
                LineTerminator::Newline
            })
            .include_hidden(self.all)
            .ignore_inaccessible(self.ignore_inaccessible)
            .bucket_order(if self.discovery_order {
                BucketOrder::Discovery
            } else {
                BucketOrder::NewestFirst
            })
            .build()
            .map_err(typelist_core::ScanError::from)?;

        Ok(config)
    }
}

fn main() -> ExitCode {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return exit_for_parse_error(&err),
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Scan every root, then print the sorted listing.
fn run(cli: Cli) -> Result<()> {
    color_eyre::install()?;

    let config = cli.into_config()?;
    let scanner = TypeScanner::new(SignatureClassifier::new());
    let report = scanner.scan(&config)?;

    let out = BufWriter::new(io::stdout().lock());
    let written = Emitter::from_config(&config).emit(&report.index, out)?;

    tracing::debug!(
        written,
        labels = report.index.label_count(),
        warnings = report.warnings.len(),
        "listed in {:.2}s",
        report.duration.as_secs_f64()
    );

    Ok(())
}

/// Report a command-line error. `--help` also ends with a failure status.
fn exit_for_parse_error(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp => {
            eprint!("{}", Cli::command().render_long_help());
            ExitCode::FAILURE
        }
        ErrorKind::DisplayVersion => {
            print!("{}", Cli::command().render_version());
            ExitCode::SUCCESS
        }
        _ => {
            tracing::error!("{}", describe_parse_error(err));
            ExitCode::FAILURE
        }
    }
}

/// One-line description of a parse error, without usage text.
fn describe_parse_error(err: &clap::Error) -> String {
    if err.kind() == ErrorKind::UnknownArgument {
        if let Some(ContextValue::String(arg)) = err.get(ContextKind::InvalidArg) {
            return format!("Invalid parameter: {arg}");
        }
    }

    let rendered = err.render().to_string();
    rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}
