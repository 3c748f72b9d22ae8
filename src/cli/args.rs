//! Defines the command-line arguments and subcommands for the gen-string CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "gen-string",
    version,
    about = "Preview randomized string parametrization."
)]
pub struct GenStringArgs {
    /// YAML configuration file (seed, default_length, default_tries).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed the random source; overrides the config file and GEN_STRING_SEED.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Emit debug logs on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand a gen_string marker and print the generated values.
    Preview {
        /// Number of values to generate.
        #[arg(short = 'n', long, default_value_t = 1, allow_negative_numbers = true)]
        count: i64,
        /// String kind to generate; picked at random when omitted.
        #[arg(short, long)]
        kind: Option<String>,
        /// Length of every generated string.
        #[arg(short, long)]
        length: Option<i64>,
        /// Generate through the bulk callable, yielding one list value.
        #[arg(long)]
        bulk: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List the supported string kinds.
    Kinds,
    /// Run the bundled gen_string example suite.
    Selftest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}
