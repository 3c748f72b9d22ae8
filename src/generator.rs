//! Value generators: bound recipes that produce parameter values.
//!
//! A [`ValueGenerator`] pairs a kind with the arguments it was constructed
//! with. Producing from it never mutates it, so the same generator can be
//! shared between collections and produced from repeatedly.
//!
//! | kind             | `produce(n)` yields                                  |
//! |------------------|------------------------------------------------------|
//! | named kind       | `n` strings, one generation call each                |
//! | callable         | one list of `n` callable results                     |
//! | lazy sequence    | every element of `n` runs of the sequence, resolved  |
//! | value generator  | whatever the inner generator yields for `n`          |
//!
//! Lazy sequences come in two flavors. [`LazySequence::from_fn`] restarts
//! its sequence on every run. [`LazySequence::once`] wraps a single iterator
//! that is drained by the first run, so later runs yield nothing.
//!
//! A value generator used as the kind of another one is not treated as a
//! callable. The outer generator delegates to it, so it yields the inner
//! generator's values for `n` rather than one list of `n` inner results.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::faux::{self, StringKind, STRING_TYPES};
use crate::prelude::*;

/// Result stream returned by [`ValueGenerator::produce`].
pub type Produced<'a> = Box<dyn Iterator<Item = Result<Value, GenStringError>> + 'a>;

type CallableFn = dyn Fn(&GenArgs, &Session) -> Result<Value, GenStringError>;

/// A user function invoked with the generator's bound arguments.
#[derive(Clone)]
pub struct Callable {
    name: String,
    func: Rc<CallableFn>,
}

impl Callable {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&GenArgs, &Session) -> Result<Value, GenStringError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// The library callable that generates one string of `kind` per call.
    pub fn for_kind(kind: StringKind) -> Self {
        Self::new(format!("gen_{}_string", kind), move |args, session| {
            faux::generate_string(kind, args, session).map(Value::Str)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &GenArgs, session: &Session) -> Result<Value, GenStringError> {
        (self.func)(args, session)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

/// An item yielded by a lazy sequence: a literal value or a nested generator
/// that is resolved when reached.
#[derive(Debug, Clone)]
pub enum Element {
    Value(Value),
    Generator(ValueGenerator),
}

impl From<Value> for Element {
    fn from(v: Value) -> Self {
        Element::Value(v)
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element::Value(Value::from(s))
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Element::Value(Value::Str(s))
    }
}

impl From<Vec<&str>> for Element {
    fn from(items: Vec<&str>) -> Self {
        Element::Value(Value::from(items))
    }
}

impl From<ValueGenerator> for Element {
    fn from(g: ValueGenerator) -> Self {
        Element::Generator(g)
    }
}

/// Something that can start a finite, possibly one-shot, run of elements.
pub trait SequenceSource {
    fn start(&self) -> Box<dyn Iterator<Item = Element> + '_>;
}

struct GeneratorFn<F>(F);

impl<F, I> SequenceSource for GeneratorFn<F>
where
    F: Fn() -> I,
    I: IntoIterator<Item = Element>,
    I::IntoIter: 'static,
{
    fn start(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        Box::new((self.0)().into_iter())
    }
}

struct OneShot<I> {
    inner: RefCell<I>,
}

impl<I: Iterator<Item = Element>> SequenceSource for OneShot<I> {
    fn start(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        Box::new(std::iter::from_fn(move || self.inner.borrow_mut().next()))
    }
}

/// A lazily evaluated sequence of elements.
#[derive(Clone)]
pub struct LazySequence {
    source: Rc<dyn SequenceSource>,
    restartable: bool,
}

impl LazySequence {
    /// A generator function: `f` is called again for every run.
    pub fn from_fn<F, I>(f: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = Element> + 'static,
        I::IntoIter: 'static,
    {
        Self {
            source: Rc::new(GeneratorFn(f)),
            restartable: true,
        }
    }

    /// A generator object: the iterator is shared and drained once.
    pub fn once<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Element>,
        I::IntoIter: 'static,
    {
        Self {
            source: Rc::new(OneShot {
                inner: RefCell::new(iter.into_iter()),
            }),
            restartable: false,
        }
    }

    pub fn is_restartable(&self) -> bool {
        self.restartable
    }

    pub fn start(&self) -> Box<dyn Iterator<Item = Element> + '_> {
        self.source.start()
    }
}

impl fmt::Debug for LazySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.restartable {
            write!(f, "LazySequence(fn)")
        } else {
            write!(f, "LazySequence(once)")
        }
    }
}

/// The kind a value generator was constructed from.
#[derive(Debug, Clone)]
pub enum Kind {
    Named(StringKind),
    Callable(Callable),
    Lazy(LazySequence),
    Nested(Box<ValueGenerator>),
}

/// A bound recipe for producing values.
#[derive(Debug, Clone)]
pub struct ValueGenerator {
    kind: Kind,
    args: GenArgs,
}

impl ValueGenerator {
    /// Builds a generator from a dynamically shaped kind.
    ///
    /// `None` picks a named kind at random. Strings must name a member of
    /// [`STRING_TYPES`]; callables, lazy sequences and generators are taken
    /// as is. Every other shape is rejected.
    pub fn construct(
        kind: Option<MarkerArg>,
        args: GenArgs,
        session: &Session,
    ) -> Result<Self, GenStringError> {
        match kind {
            None | Some(MarkerArg::None) => Ok(Self::random(args, session)),
            Some(MarkerArg::Str(name)) => Self::named(&name, args),
            Some(MarkerArg::Callable(f)) => Ok(Self::callable(f, args)),
            Some(MarkerArg::Lazy(seq)) => Ok(Self::with_kind(Kind::Lazy(seq), args)),
            Some(MarkerArg::Generator(inner)) => {
                Ok(Self::with_kind(Kind::Nested(Box::new(inner)), args))
            }
            Some(other) => Err(err_help!(
                InvalidSpecKind,
                format!(
                    "kind must be a string, callable or generator, got a {}",
                    other.type_name()
                ),
                format!("Valid string types are {}.", StringKind::valid_names())
            )),
        }
    }

    /// A generator for a kind given by name.
    pub fn named(name: &str, args: GenArgs) -> Result<Self, GenStringError> {
        Ok(Self::of_kind(name.parse()?, args))
    }

    pub fn of_kind(kind: StringKind, args: GenArgs) -> Self {
        Self::with_kind(Kind::Named(kind), args)
    }

    /// A named kind chosen uniformly at random.
    pub fn random(args: GenArgs, session: &Session) -> Self {
        let kind = faux::choose_one_of(&STRING_TYPES, session)
            .copied()
            .unwrap_or(StringKind::Alpha);
        tracing::debug!(kind = %kind, "picked random string kind");
        Self::of_kind(kind, args)
    }

    pub fn callable(f: Callable, args: GenArgs) -> Self {
        Self::with_kind(Kind::Callable(f), args)
    }

    /// Lazy sequences are started without arguments.
    pub fn lazy(seq: LazySequence) -> Self {
        Self::with_kind(Kind::Lazy(seq), GenArgs::new())
    }

    fn with_kind(kind: Kind, args: GenArgs) -> Self {
        Self { kind, args }
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn args(&self) -> &GenArgs {
        &self.args
    }

    /// Lazily produces values for `items` repetitions of the recipe.
    pub fn produce<'a>(&'a self, items: usize, session: &'a Session) -> Produced<'a> {
        match &self.kind {
            Kind::Named(kind) => {
                let kind = *kind;
                Box::new((0..items).map(move |_| {
                    faux::generate_string(kind, &self.args, session).map(Value::Str)
                }))
            }
            Kind::Callable(f) => Box::new(std::iter::once_with(move || {
                (0..items)
                    .map(|_| f.call(&self.args, session))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            })),
            Kind::Lazy(seq) => Box::new(
                (0..items)
                    .flat_map(move |_| seq.start())
                    .map(move |element| resolve(element, session)),
            ),
            Kind::Nested(inner) => inner.produce(items, session),
        }
    }
}

/// Resolves a yielded element to a concrete value.
///
/// Nested generators are produced once; a single result is unwrapped, any
/// other number of results is kept as a list.
pub fn resolve(element: Element, session: &Session) -> Result<Value, GenStringError> {
    match element {
        Element::Value(value) => Ok(value),
        Element::Generator(generator) => {
            let mut values = generator
                .produce(1, session)
                .collect::<Result<Vec<_>, _>>()?;
            if values.len() == 1 {
                Ok(values.remove(0))
            } else {
                Ok(Value::List(values))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn collect(generator: &ValueGenerator, items: usize, session: &Session) -> Vec<Value> {
        generator
            .produce(items, session)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_produce_is_lazy() {
        let session = Session::seeded(3);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let generator = ValueGenerator::lazy(LazySequence::from_fn(move || {
            counter.set(counter.get() + 1);
            vec![Element::from("a")]
        }));
        let mut produced = generator.produce(3, &session);
        assert_eq!(calls.get(), 0);
        assert_eq!(produced.next().unwrap().unwrap(), Value::from("a"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_nested_kind_delegates() {
        let session = Session::seeded(3);
        let inner = ValueGenerator::named("numeric", GenArgs::new().kwarg("length", 5)).unwrap();
        let outer =
            ValueGenerator::construct(Some(MarkerArg::Generator(inner)), GenArgs::new(), &session)
                .unwrap();
        let values = collect(&outer, 3, &session);
        assert_eq!(values.len(), 3);
        assert!(values
            .iter()
            .all(|v| v.as_str().map_or(false, |s| s.len() == 5)));
    }

    #[test]
    fn test_resolve_unwraps_single_value() {
        let session = Session::seeded(3);
        let nested = ValueGenerator::of_kind(StringKind::Alpha, GenArgs::new().kwarg("length", 2));
        let value = resolve(Element::from(nested), &session).unwrap();
        assert_eq!(value.as_str().map(str::len), Some(2));
    }

    #[test]
    fn test_resolve_keeps_empty_result_as_list() {
        let session = Session::seeded(3);
        let drained = ValueGenerator::lazy(LazySequence::once(Vec::<Element>::new()));
        let value = resolve(Element::from(drained), &session).unwrap();
        assert_eq!(value, Value::List(vec![]));
    }

    #[test]
    fn test_callable_error_propagates() {
        let session = Session::seeded(3);
        let failing = Callable::new("failing", |_, _| Err(err_msg!(InvalidOption, "nope")));
        let generator = ValueGenerator::callable(failing, GenArgs::new());
        let result: Result<Vec<_>, _> = generator.produce(2, &session).collect();
        assert_eq!(result.unwrap_err().message(), "nope");
    }
}
