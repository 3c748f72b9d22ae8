use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::config::SmallRng;
use crate::prelude::*;

/// Accepts or rejects a generated string.
#[derive(Clone)]
pub enum Validator {
    Predicate(Rc<dyn Fn(&str) -> bool>),
    /// Matches when the pattern matches at the start of the value.
    Pattern(Regex),
}

impl Validator {
    pub fn predicate(f: impl Fn(&str) -> bool + 'static) -> Self {
        Validator::Predicate(Rc::new(f))
    }

    pub fn pattern(pattern: &str) -> Result<Self, GenStringError> {
        Regex::new(&format!("^(?:{})", pattern))
            .map(Validator::Pattern)
            .map_err(|e| err_msg!(InvalidOption, "invalid validator pattern {:?}: {}", pattern, e))
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Validator::Predicate(f) => f(value),
            Validator::Pattern(re) => re.is_match(value),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Predicate(_) => write!(f, "Validator::Predicate(..)"),
            Validator::Pattern(re) => write!(f, "Validator::Pattern({:?})", re.as_str()),
        }
    }
}

/// Options that may also be passed positionally, in this order.
const POSITIONAL_OPTIONS: [&str; 4] = ["length", "validator", "default", "tries"];

/// Options accepted by every named kind.
#[derive(Debug, Clone)]
pub struct StringOptions {
    pub length: usize,
    pub validator: Option<Validator>,
    pub default: Option<String>,
    pub tries: usize,
    /// Include supplementary-plane letters (utf8 only).
    pub smp: bool,
}

impl StringOptions {
    /// Reads options from bound generation arguments.
    ///
    /// `length`, `validator`, `default` and `tries` may be given positionally.
    pub fn from_args(args: &GenArgs, config: &GenConfig) -> Result<Self, GenStringError> {
        if args.positional.len() > POSITIONAL_OPTIONS.len() {
            return Err(err_msg!(
                InvalidOption,
                "expected at most {} positional options ({}), got {}",
                POSITIONAL_OPTIONS.len(),
                POSITIONAL_OPTIONS.join(", "),
                args.positional.len()
            ));
        }
        let positional: Vec<(&str, &Arg)> = POSITIONAL_OPTIONS
            .iter()
            .copied()
            .zip(&args.positional)
            .collect();
        if let Some((name, _)) = positional.iter().find(|(name, _)| args.get(name).is_some()) {
            return Err(err_msg!(InvalidOption, "got multiple values for option '{}'", name));
        }

        let mut options = StringOptions {
            length: config.default_length,
            validator: None,
            default: None,
            tries: config.default_tries,
            smp: true,
        };

        let keywords = args.keywords.iter().map(|(name, arg)| (name.as_str(), arg));
        for (name, arg) in positional.into_iter().chain(keywords) {
            match (name, arg) {
                ("length", arg) => options.length = positive("length", arg)?,
                ("tries", arg) => options.tries = positive("tries", arg)?,
                ("default", Arg::Str(s)) => options.default = Some(s.clone()),
                ("validator", Arg::Validator(v)) => options.validator = Some(v.clone()),
                ("validator", Arg::Str(pattern)) => {
                    options.validator = Some(Validator::pattern(pattern)?)
                }
                ("smp", Arg::Bool(b)) => options.smp = *b,
                ("default" | "validator" | "smp", other) => {
                    return Err(err_msg!(
                        InvalidOption,
                        "option '{}' does not accept a {}",
                        name,
                        other.type_name()
                    ));
                }
                (unknown, _) => {
                    return Err(err_help!(
                        InvalidOption,
                        format!("unexpected option '{}'", unknown),
                        "Supported options are length, validator, default, tries and smp."
                    ));
                }
            }
        }

        if options.validator.is_some() && options.default.is_none() {
            return Err(err_msg!(
                InvalidOption,
                "if 'validator' is given 'default' must be given as well"
            ));
        }
        Ok(options)
    }

    /// Generates candidates until one validates, falling back to `default`.
    pub(crate) fn generate(
        &self,
        session: &Session,
        mut sample: impl FnMut(&mut SmallRng) -> String,
    ) -> String {
        let Some(validator) = &self.validator else {
            return session.with_rng(&mut sample);
        };
        for _ in 0..self.tries {
            let candidate = session.with_rng(&mut sample);
            if validator.accepts(&candidate) {
                return candidate;
            }
        }
        tracing::debug!(tries = self.tries, "validator rejected every candidate, using default");
        self.default.clone().unwrap_or_default()
    }
}

fn positive(name: &str, arg: &Arg) -> Result<usize, GenStringError> {
    match arg {
        Arg::Int(n) if *n > 0 => Ok(*n as usize),
        Arg::Int(n) => Err(err_msg!(InvalidOption, "{} is an invalid {}", n, name)),
        other => Err(err_msg!(
            InvalidOption,
            "option '{}' expects an integer, got a {}",
            name,
            other.type_name()
        )),
    }
}
