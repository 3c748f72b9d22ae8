//! Common imports for the gen-string crate.

pub use crate::config::{GenConfig, Session};
pub use crate::diagnostics::{ErrorContext, ErrorType, GenStringError};
pub use crate::expansion::MarkerArg;
pub use crate::value::{Arg, GenArgs, Value};
pub use crate::{err_help, err_msg};
