//! The `gen_string` marker and its parametrization expansion.
//!
//! The host runner calls [`generate_tests`] once per collected test. When the
//! test carries a `gen_string` marker, its arguments are interpreted, values
//! are generated, and the host is asked to parametrize the `value` input with
//! them. Tests without the marker are left alone.

use std::collections::BTreeMap;
use std::fmt;

use crate::generator::{Callable, LazySequence, ValueGenerator};
use crate::prelude::*;

/// Name of the marker this crate expands.
pub const MARKER_NAME: &str = "gen_string";

/// Test input that receives the generated values.
pub const VALUE_ARG: &str = "value";

/// Kind used when the marker does not name one.
pub const DEFAULT_KIND: &str = "alpha";

/// A positional marker argument. Markers accept loosely shaped arguments, so
/// their shape is only checked during expansion.
#[derive(Debug, Clone)]
pub enum MarkerArg {
    None,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Validator(crate::faux::Validator),
    Callable(Callable),
    Lazy(LazySequence),
    Generator(ValueGenerator),
    Collection(Vec<MarkerArg>),
}

impl MarkerArg {
    pub fn type_name(&self) -> &'static str {
        match self {
            MarkerArg::None => "none",
            MarkerArg::Int(_) => "int",
            MarkerArg::Float(_) => "float",
            MarkerArg::Bool(_) => "bool",
            MarkerArg::Str(_) => "str",
            MarkerArg::Validator(_) => "validator",
            MarkerArg::Callable(_) => "callable",
            MarkerArg::Lazy(_) => "generator",
            MarkerArg::Generator(_) => "ValueGenerator",
            MarkerArg::Collection(_) => "collection",
        }
    }
}

impl fmt::Display for MarkerArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerArg::None => write!(f, "None"),
            MarkerArg::Int(n) => write!(f, "{}", n),
            MarkerArg::Float(x) => write!(f, "{}", x),
            MarkerArg::Bool(b) => write!(f, "{}", b),
            MarkerArg::Str(s) => write!(f, "{:?}", s),
            MarkerArg::Validator(v) => write!(f, "{:?}", v),
            MarkerArg::Callable(c) => write!(f, "{:?}", c),
            MarkerArg::Lazy(seq) => write!(f, "{:?}", seq),
            MarkerArg::Generator(_) => write!(f, "ValueGenerator(..)"),
            MarkerArg::Collection(items) => write!(f, "[{} items]", items.len()),
        }
    }
}

macro_rules! marker_arg_from {
    ($($ty:ty => |$v:ident| $body:expr;)*) => {
        $(
            impl From<$ty> for MarkerArg {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

marker_arg_from! {
    i64 => |v| MarkerArg::Int(v);
    i32 => |v| MarkerArg::Int(v as i64);
    f64 => |v| MarkerArg::Float(v);
    bool => |v| MarkerArg::Bool(v);
    &str => |v| MarkerArg::Str(v.to_string());
    String => |v| MarkerArg::Str(v);
    Callable => |v| MarkerArg::Callable(v);
    LazySequence => |v| MarkerArg::Lazy(v);
    ValueGenerator => |v| MarkerArg::Generator(v);
    Vec<MarkerArg> => |v| MarkerArg::Collection(v);
    Vec<ValueGenerator> => |v| MarkerArg::Collection(v.into_iter().map(MarkerArg::Generator).collect());
}

impl TryFrom<MarkerArg> for Arg {
    type Error = GenStringError;

    fn try_from(arg: MarkerArg) -> Result<Self, Self::Error> {
        match arg {
            MarkerArg::Int(n) => Ok(Arg::Int(n)),
            MarkerArg::Str(s) => Ok(Arg::Str(s)),
            MarkerArg::Bool(b) => Ok(Arg::Bool(b)),
            MarkerArg::Validator(v) => Ok(Arg::Validator(v)),
            other => Err(err_msg!(
                Usage,
                "extra marker arguments must be plain options, got a {}: {}",
                other.type_name(),
                other
            )),
        }
    }
}

/// A marker attached to a test function.
#[derive(Debug, Clone)]
pub struct Marker {
    pub name: String,
    pub args: Vec<MarkerArg>,
    pub kwargs: BTreeMap<String, Arg>,
}

impl Marker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    /// An empty `gen_string` marker.
    pub fn gen_string() -> Self {
        Self::new(MARKER_NAME)
    }

    pub fn arg(mut self, value: impl Into<MarkerArg>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: &str, value: impl Into<Arg>) -> Self {
        self.kwargs.insert(name.to_string(), value.into());
        self
    }
}

/// The shapes a type specification can take, resolved once per expansion.
#[derive(Debug, Clone)]
pub enum TypeSpec {
    NamedKind(String),
    Callable(Callable),
    LazySequence(LazySequence),
    ValueGenerator(ValueGenerator),
    CollectionOfSpecs(Vec<MarkerArg>),
}

impl TypeSpec {
    pub fn resolve(arg: MarkerArg) -> Result<Self, GenStringError> {
        match arg {
            MarkerArg::Str(name) => Ok(TypeSpec::NamedKind(name)),
            MarkerArg::Callable(f) => Ok(TypeSpec::Callable(f)),
            MarkerArg::Lazy(seq) => Ok(TypeSpec::LazySequence(seq)),
            MarkerArg::Generator(g) => Ok(TypeSpec::ValueGenerator(g)),
            MarkerArg::Collection(items) => Ok(TypeSpec::CollectionOfSpecs(items)),
            other => Err(err_msg!(
                NoGeneratorFound,
                "no generator type ({}) found to be applied",
                other.type_name()
            )),
        }
    }
}

/// Marker arguments after defaults and validation.
#[derive(Debug, Clone)]
pub struct ExpansionRequest {
    pub count: usize,
    pub type_spec: TypeSpec,
    /// Trailing positional marker arguments, kept as given.
    pub extra_args: Vec<MarkerArg>,
    pub extra_kwargs: BTreeMap<String, Arg>,
}

impl ExpansionRequest {
    /// Interprets `gen_string(count?, type_spec?, *extra_args, **extra_kwargs)`.
    pub fn from_marker(marker: &Marker) -> Result<Self, GenStringError> {
        let mut args = marker.args.iter().cloned();
        let count = args.next().unwrap_or(MarkerArg::Int(1));
        let type_spec = args
            .next()
            .unwrap_or_else(|| MarkerArg::Str(DEFAULT_KIND.to_string()));

        let count = match count {
            MarkerArg::Int(n) if n >= 1 => n as usize,
            MarkerArg::Int(n) => {
                return Err(err_msg!(Usage, "count must be > 0, got {}", n));
            }
            other => {
                return Err(err_help!(
                    Usage,
                    format!(
                        "count must be an integer, got a {}: {}",
                        other.type_name(),
                        other
                    ),
                    "Pass the number of values first, e.g. gen_string(10)."
                ));
            }
        };

        Ok(Self {
            count,
            type_spec: TypeSpec::resolve(type_spec)?,
            extra_args: args.collect(),
            extra_kwargs: marker.kwargs.clone(),
        })
    }

    /// Options for an implicitly constructed generator.
    fn bound_args(&self) -> Result<GenArgs, GenStringError> {
        Ok(GenArgs {
            positional: self
                .extra_args
                .iter()
                .cloned()
                .map(Arg::try_from)
                .collect::<Result<_, _>>()?,
            keywords: self.extra_kwargs.clone(),
        })
    }

    /// Produces the flattened value sequence for this request.
    pub fn expand(self, session: &Session) -> Result<Vec<Value>, GenStringError> {
        let count = self.count;
        let generator = match &self.type_spec {
            TypeSpec::ValueGenerator(generator) => generator.clone(),
            TypeSpec::CollectionOfSpecs(items) => {
                return expand_collection(items, count, session);
            }
            TypeSpec::NamedKind(name) => ValueGenerator::named(name, self.bound_args()?)?,
            TypeSpec::Callable(f) => ValueGenerator::callable(f.clone(), self.bound_args()?),
            TypeSpec::LazySequence(seq) => ValueGenerator::construct(
                Some(MarkerArg::Lazy(seq.clone())),
                self.bound_args()?,
                session,
            )?,
        };
        let values = generator.produce(count, session).collect();
        values
    }
}

// Only value generators in a collection are honored; other entries are dropped.
fn expand_collection(
    items: &[MarkerArg],
    count: usize,
    session: &Session,
) -> Result<Vec<Value>, GenStringError> {
    let generators: Vec<&ValueGenerator> = items
        .iter()
        .filter_map(|item| match item {
            MarkerArg::Generator(g) => Some(g),
            _ => None,
        })
        .collect();
    if generators.len() < items.len() {
        tracing::debug!(
            skipped = items.len() - generators.len(),
            "ignoring collection entries that are not value generators"
        );
    }
    let values = generators
        .into_iter()
        .flat_map(|g| g.produce(count, session))
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err(err_help!(
            NoGeneratorFound,
            "no generator found",
            "A collection type spec must contain at least one ValueGenerator."
        ));
    }
    Ok(values)
}

/// The collection-time view of one test function, provided by the host runner.
pub trait Metafunc {
    /// Name of the test function being collected.
    fn function_name(&self) -> &str;

    /// Returns the first marker with the given name.
    fn get_marker(&self, name: &str) -> Option<&Marker>;

    /// Registers one test invocation per value, bound to `argname`.
    fn parametrize(&mut self, argname: &str, values: Vec<Value>) -> Result<(), GenStringError>;
}

/// Expands the `gen_string` marker of one test, if it has one.
pub fn generate_tests<M: Metafunc + ?Sized>(
    metafunc: &mut M,
    session: &Session,
) -> Result<(), GenStringError> {
    let Some(marker) = metafunc.get_marker(MARKER_NAME) else {
        return Ok(());
    };
    let request = ExpansionRequest::from_marker(marker)?;
    tracing::debug!(
        test = metafunc.function_name(),
        count = request.count,
        "expanding gen_string marker"
    );
    let values = request.expand(session)?;
    tracing::debug!(
        test = metafunc.function_name(),
        values = values.len(),
        "parametrizing"
    );
    metafunc.parametrize(VALUE_ARG, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let request = ExpansionRequest::from_marker(&Marker::gen_string()).unwrap();
        assert_eq!(request.count, 1);
        assert!(matches!(request.type_spec, TypeSpec::NamedKind(ref k) if k == "alpha"));

        let request = ExpansionRequest::from_marker(&Marker::gen_string().arg(7)).unwrap();
        assert_eq!(request.count, 7);
        assert!(matches!(request.type_spec, TypeSpec::NamedKind(ref k) if k == "alpha"));
    }

    #[test]
    fn test_bool_count_is_not_an_integer() {
        let err = ExpansionRequest::from_marker(&Marker::gen_string().arg(true)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Usage);
        assert!(err.message().starts_with("count must be an integer"));
    }

    #[test]
    fn test_extra_positional_forwarded() {
        let marker = Marker::gen_string().arg(2).arg("numeric").arg(6);
        let request = ExpansionRequest::from_marker(&marker).unwrap();
        assert!(matches!(request.extra_args[..], [MarkerArg::Int(6)]));
        let values = request.expand(&Session::seeded(8)).unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.as_str().unwrap().len() == 6));
    }

    #[test]
    fn test_extra_positional_must_be_plain() {
        let marker = Marker::gen_string()
            .arg(2)
            .arg("alpha")
            .arg(vec![MarkerArg::Int(1)]);
        let request = ExpansionRequest::from_marker(&marker).unwrap();
        let err = request.expand(&Session::seeded(8)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Usage);
    }

    #[test]
    fn test_prebuilt_generator_ignores_extra_positional() {
        let generator = ValueGenerator::named("alpha", GenArgs::new().kwarg("length", 5)).unwrap();
        let marker = Marker::gen_string()
            .arg(2)
            .arg(generator)
            .arg(MarkerArg::Float(1.5));
        let values = ExpansionRequest::from_marker(&marker)
            .unwrap()
            .expand(&Session::seeded(9))
            .unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.as_str().unwrap().len() == 5));
    }

    #[test]
    fn test_int_type_spec_checked_before_extra_positional() {
        let marker = Marker::gen_string().arg(1).arg(2).arg(MarkerArg::Float(1.5));
        let err = ExpansionRequest::from_marker(&marker).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NoGeneratorFound);
        assert_eq!(err.message(), "no generator type (int) found to be applied");
    }

    #[test]
    fn test_none_type_spec_has_no_generator() {
        let marker = Marker::gen_string().arg(1).arg(MarkerArg::None);
        let err = ExpansionRequest::from_marker(&marker).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NoGeneratorFound);
        assert_eq!(err.message(), "no generator type (none) found to be applied");
    }
}
