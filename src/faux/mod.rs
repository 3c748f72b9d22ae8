//! Random string generation facility.
//!
//! This is the collaborator the expansion engine calls for every named kind.
//! It knows how to sample each character class and how to apply the
//! `length`/`validator`/`default`/`tries` options; it knows nothing about
//! markers or test collection.
//!
//! ## Kinds Provided
//!
//! - **ASCII**: `alpha`, `alphanumeric`, `numeric`, `punctuation`
//! - **Unicode**: `latin1`, `cjk`, `utf8`
//! - **Markup**: `html`

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;

use crate::prelude::*;

mod charsets;
mod options;

pub use options::{StringOptions, Validator};

/// The fixed set of named string kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    Alpha,
    Alphanumeric,
    Cjk,
    Html,
    Latin1,
    Numeric,
    Utf8,
    Punctuation,
}

/// Every named kind, in the order they are listed to users.
pub const STRING_TYPES: [StringKind; 8] = [
    StringKind::Alpha,
    StringKind::Alphanumeric,
    StringKind::Cjk,
    StringKind::Html,
    StringKind::Latin1,
    StringKind::Numeric,
    StringKind::Utf8,
    StringKind::Punctuation,
];

impl StringKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringKind::Alpha => "alpha",
            StringKind::Alphanumeric => "alphanumeric",
            StringKind::Cjk => "cjk",
            StringKind::Html => "html",
            StringKind::Latin1 => "latin1",
            StringKind::Numeric => "numeric",
            StringKind::Utf8 => "utf8",
            StringKind::Punctuation => "punctuation",
        }
    }

    /// Comma separated list of every kind name.
    pub fn valid_names() -> String {
        STRING_TYPES
            .iter()
            .map(StringKind::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for StringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StringKind {
    type Err = GenStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STRING_TYPES
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                err_help!(
                    InvalidSpecKind,
                    format!("{} is not a supported string type", s),
                    format!("Valid string types are {}.", StringKind::valid_names())
                )
            })
    }
}

/// Picks one element uniformly at random. Returns `None` for an empty slice.
pub fn choose_one_of<'a, T>(choices: &'a [T], session: &Session) -> Option<&'a T> {
    session.with_rng(|rng| choices.choose(rng))
}

/// Generates one string of `kind` using the options in `args`.
///
/// Each call draws fresh randomness from the session.
pub fn generate_string(
    kind: StringKind,
    args: &GenArgs,
    session: &Session,
) -> Result<String, GenStringError> {
    let options = StringOptions::from_args(args, session.config())?;
    let value = options.generate(session, |rng| {
        charsets::sample(kind, options.length, options.smp, rng)
    });
    tracing::trace!(kind = %kind, value = %value, "generated string");
    Ok(value)
}

macro_rules! kind_callables {
    ($($(#[$doc:meta])* $name:ident => $kind:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(args: &GenArgs, session: &Session) -> Result<Value, GenStringError> {
                generate_string($kind, args, session).map(Value::Str)
            }
        )*
    };
}

// Library callables, usable wherever a `Callable` type spec is accepted.
kind_callables! {
    /// Generates an ASCII letter string.
    gen_alpha_string => StringKind::Alpha;
    /// Generates an ASCII letter-and-digit string.
    gen_alphanumeric_string => StringKind::Alphanumeric;
    /// Generates a CJK ideograph string.
    gen_cjk_string => StringKind::Cjk;
    /// Generates an alpha string wrapped in a random HTML tag.
    gen_html_string => StringKind::Html;
    /// Generates a Latin-1 letter string.
    gen_latin1_string => StringKind::Latin1;
    /// Generates a digit string.
    gen_numeric_string => StringKind::Numeric;
    /// Generates a string of Unicode letters.
    gen_utf8_string => StringKind::Utf8;
    /// Generates an ASCII punctuation string.
    gen_punctuation_string => StringKind::Punctuation;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in STRING_TYPES {
            assert_eq!(kind.as_str().parse::<StringKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_lists_valid_names() {
        let err = "bogus".parse::<StringKind>().unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidSpecKind);
        assert!(err.message().contains("bogus"));
        let help = miette::Diagnostic::help(&err).map(|h| h.to_string());
        assert_eq!(
            help.as_deref(),
            Some("Valid string types are alpha,alphanumeric,cjk,html,latin1,numeric,utf8,punctuation.")
        );
    }

    #[test]
    fn test_choose_one_of_empty() {
        let session = Session::seeded(1);
        let empty: [StringKind; 0] = [];
        assert!(choose_one_of(&empty, &session).is_none());
        assert!(STRING_TYPES.contains(choose_one_of(&STRING_TYPES, &session).unwrap()));
    }

    #[test]
    fn test_default_length_comes_from_config() {
        let session = Session::new(GenConfig {
            default_length: 4,
            ..GenConfig::default()
        });
        let value = generate_string(StringKind::Alpha, &GenArgs::new(), &session).unwrap();
        assert_eq!(value.chars().count(), 4);
    }
}
