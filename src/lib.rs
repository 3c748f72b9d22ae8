//! Declarative randomized string parametrization for test runners.
//!
//! A test carries a `gen_string` marker saying how many values to generate
//! and which kind of generator to use. During collection the host runner
//! calls [`expansion::generate_tests`], which expands the marker into one
//! parametrized invocation per generated value.
//!
//! ```rust
//! use gen_string::prelude::*;
//! use gen_string::expansion::Marker;
//! use gen_string::runner::{TestFunction, TestRunner};
//!
//! let test = TestFunction::new("test_alpha", &["value"], |bindings| {
//!     let value = bindings.str("value")?;
//!     if value.len() == 12 { Ok(()) } else { Err(format!("bad length {}", value.len())) }
//! })
//! .mark(Marker::gen_string().arg(4).arg("alpha").kwarg("length", 12));
//!
//! let runner = TestRunner::new(Session::seeded(1));
//! let report = runner.run(&[test]);
//! assert_eq!(report.passed(), 4);
//! ```

pub use crate::diagnostics::{ErrorContext, ErrorType, GenStringError};

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod expansion;
pub mod faux;
pub mod generator;
pub mod prelude;
pub mod runner;
pub mod value;
