//! Handles all user-facing output for the CLI.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::Format;
use crate::prelude::*;

/// Prints generated values, one per line in text mode.
pub fn print_values(values: &[Value], format: Format) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(values)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(out, "{}", json)
        }
        Format::Text => {
            for value in values {
                match value {
                    Value::Str(s) => writeln!(out, "{}", s)?,
                    Value::List(_) => writeln!(out, "{}", value)?,
                }
            }
            Ok(())
        }
    }
}

/// Prints a header followed by the list of kind names.
pub fn print_kinds(names: &[&str], use_colors: bool) -> io::Result<()> {
    let choice = if use_colors {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(stdout, "Supported string kinds:")?;
    stdout.reset()?;
    for name in names {
        writeln!(stdout, "  {}", name)?;
    }
    Ok(())
}
