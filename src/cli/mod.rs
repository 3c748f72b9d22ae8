//! The gen-string command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, Format, GenStringArgs};
use crate::expansion::{ExpansionRequest, Marker};
use crate::faux::{StringKind, STRING_TYPES};
use crate::generator::{Callable, ValueGenerator};
use crate::prelude::*;
use crate::runner::TestRunner;

pub mod args;
pub mod output;
pub mod selftest;

/// The main entry point for the CLI. Returns the process exit code.
pub fn run() -> miette::Result<i32> {
    let args = GenStringArgs::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let session = Session::new(config);

    match args.command {
        Command::Preview {
            count,
            kind,
            length,
            bulk,
            format,
        } => handle_preview(&session, count, kind.as_deref(), length, bulk, format),
        Command::Kinds => {
            let names: Vec<&str> = STRING_TYPES.iter().map(StringKind::as_str).collect();
            output::print_kinds(&names, atty::is(atty::Stream::Stdout)).into_diagnostic()?;
            Ok(0)
        }
        Command::Selftest => handle_selftest(session),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "gen_string=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Config file, then environment, then command-line flags.
fn load_config(args: &GenStringArgs) -> Result<GenConfig, GenStringError> {
    let config = match &args.config {
        Some(path) => GenConfig::load(path)?,
        None => GenConfig::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

/// Handles the `preview` subcommand.
fn handle_preview(
    session: &Session,
    count: i64,
    kind: Option<&str>,
    length: Option<i64>,
    bulk: bool,
    format: Format,
) -> miette::Result<i32> {
    let mut options = GenArgs::new();
    if let Some(length) = length {
        options = options.kwarg("length", length);
    }

    let marker = Marker::gen_string().arg(count);
    let marker = match (kind, bulk) {
        (Some(name), false) => marker.arg(name),
        (Some(name), true) => {
            let kind: StringKind = name.parse()?;
            marker.arg(Callable::for_kind(kind))
        }
        (None, false) => marker.arg(ValueGenerator::random(options.clone(), session)),
        (None, true) => {
            let kind = crate::faux::choose_one_of(&STRING_TYPES, session)
                .copied()
                .unwrap_or(StringKind::Alpha);
            marker.arg(Callable::for_kind(kind))
        }
    };
    // A prebuilt generator already carries its options.
    let marker = if kind.is_none() && !bulk {
        marker
    } else {
        options
            .keywords
            .into_iter()
            .fold(marker, |m, (name, value)| m.kwarg(&name, value))
    };

    let values = ExpansionRequest::from_marker(&marker)?.expand(session)?;
    output::print_values(&values, format).into_diagnostic()?;
    Ok(0)
}

/// Handles the `selftest` subcommand.
fn handle_selftest(session: Session) -> miette::Result<i32> {
    let suite = selftest::suite()?;
    let runner = TestRunner::new(session);
    let report = runner.run(&suite);
    report.print(runner.config().use_colors).into_diagnostic()?;
    Ok(report.exit_code())
}
