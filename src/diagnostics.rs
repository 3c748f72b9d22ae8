//! gen-string error handling.
//!
//! Every failure the crate can raise is a [`GenStringError`]. Errors are raised
//! while a test is being collected and abort only that test's collection; the
//! host runner reports them and moves on to the next test.
//!
//! # Error Construction
//!
//! - **Use `err_msg!` for message-only errors.**
//!   - `err_msg!(Usage, "count must be > 0, got {}", count)`
//!
//! - **Use `err_help!` when the user can be told how to fix it.**
//!   - `err_help!(InvalidSpecKind, "bogus is not a supported kind", "use one of ...")`
//!
//! Do not build `ErrorContext` by hand unless neither macro fits.

use miette::Diagnostic;
use thiserror::Error;

/// Type-safe error classification that mirrors the `GenStringError` variants.
/// Tests and the runner match on this instead of on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A value generator was built from an unusable kind
    InvalidSpecKind,
    /// Malformed `gen_string` marker arguments
    Usage,
    /// The type specification contained nothing that can generate values
    NoGeneratorFound,
    /// A string generation option was rejected
    InvalidOption,
    /// The host runner refused the parametrization
    Collection,
    /// Configuration could not be loaded
    Config,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidSpecKind => "InvalidSpecKind",
            ErrorType::Usage => "UsageError",
            ErrorType::NoGeneratorFound => "NoGeneratorFoundError",
            ErrorType::InvalidOption => "InvalidOption",
            ErrorType::Collection => "CollectionError",
            ErrorType::Config => "ConfigError",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extra context attached to an error for diagnostics.
#[derive(Debug, Default, Clone)]
pub struct ErrorContext {
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty error context.
    pub fn none() -> Self {
        Self { help: None }
    }

    /// Creates a context carrying a help message.
    pub fn with_help(help: impl Into<String>) -> Self {
        Self {
            help: Some(help.into()),
        }
    }
}

/// Unified error type for every gen-string failure mode.
#[derive(Debug, Error)]
pub enum GenStringError {
    #[error("Invalid spec kind: {message}")]
    InvalidSpecKind { message: String, ctx: ErrorContext },
    #[error("Usage error: {message}")]
    Usage { message: String, ctx: ErrorContext },
    #[error("No generator found: {message}")]
    NoGeneratorFound { message: String, ctx: ErrorContext },
    #[error("Invalid option: {message}")]
    InvalidOption { message: String, ctx: ErrorContext },
    #[error("Collection error: {message}")]
    Collection { message: String, ctx: ErrorContext },
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl GenStringError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            GenStringError::InvalidSpecKind { ctx, .. } => ctx,
            GenStringError::Usage { ctx, .. } => ctx,
            GenStringError::NoGeneratorFound { ctx, .. } => ctx,
            GenStringError::InvalidOption { ctx, .. } => ctx,
            GenStringError::Collection { ctx, .. } => ctx,
            GenStringError::Config { ctx, .. } => ctx,
        }
    }

    /// Returns the bare message without the classification prefix.
    pub fn message(&self) -> &str {
        match self {
            GenStringError::InvalidSpecKind { message, .. }
            | GenStringError::Usage { message, .. }
            | GenStringError::NoGeneratorFound { message, .. }
            | GenStringError::InvalidOption { message, .. }
            | GenStringError::Collection { message, .. }
            | GenStringError::Config { message, .. } => message,
        }
    }

    /// Returns the type-safe error classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            GenStringError::InvalidSpecKind { .. } => ErrorType::InvalidSpecKind,
            GenStringError::Usage { .. } => ErrorType::Usage,
            GenStringError::NoGeneratorFound { .. } => ErrorType::NoGeneratorFound,
            GenStringError::InvalidOption { .. } => ErrorType::InvalidOption,
            GenStringError::Collection { .. } => ErrorType::Collection,
            GenStringError::Config { .. } => ErrorType::Config,
        }
    }

    /// Wraps a foreign error as a configuration failure.
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        GenStringError::Config {
            message: message.into(),
            ctx: ErrorContext::none(),
            source: Some(Box::new(source)),
        }
    }
}

impl Diagnostic for GenStringError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self {
            GenStringError::InvalidSpecKind { .. } => "gen_string::invalid_spec_kind",
            GenStringError::Usage { .. } => "gen_string::usage",
            GenStringError::NoGeneratorFound { .. } => "gen_string::no_generator_found",
            GenStringError::InvalidOption { .. } => "gen_string::invalid_option",
            GenStringError::Collection { .. } => "gen_string::collection",
            GenStringError::Config { .. } => "gen_string::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }
}

/// Constructs a GenStringError variant with a formatted message and no help.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:literal $(, $arg:expr)* $(,)?) => {
        $crate::GenStringError::$variant {
            message: format!($msg $(, $arg)*),
            ctx: $crate::ErrorContext::none(),
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::GenStringError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::none(),
        }
    };
}

/// Constructs a GenStringError variant with a message and a help line.
#[macro_export]
macro_rules! err_help {
    ($variant:ident, $msg:expr, $help:expr) => {
        $crate::GenStringError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_help(format!("{}", $help)),
        }
    };
}
