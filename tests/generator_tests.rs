//! Value generator construction and production.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{is_numeric, strings};
use gen_string::faux::{gen_numeric_string, StringKind, STRING_TYPES};
use gen_string::generator::{Callable, Element, Kind, LazySequence, ValueGenerator};
use gen_string::prelude::*;

fn collect(generator: &ValueGenerator, items: usize, session: &Session) -> Vec<Value> {
    generator
        .produce(items, session)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn named_kind_yields_items_strings() {
    let session = Session::seeded(21);
    for kind in STRING_TYPES {
        let generator = ValueGenerator::of_kind(kind, GenArgs::new().kwarg("length", 8));
        for n in [1, 3, 7] {
            let values = collect(&generator, n, &session);
            assert_eq!(values.len(), n, "{kind}");
            assert!(values.iter().all(|v| v.as_str().is_some()), "{kind}");
        }
    }
}

#[test]
fn named_kind_respects_class_and_length() {
    let session = Session::seeded(22);
    let generator = ValueGenerator::named("numeric", GenArgs::new().kwarg("length", 24)).unwrap();
    let values = collect(&generator, 5, &session);
    for s in strings(&values) {
        assert_eq!(s.len(), 24);
        assert!(is_numeric(s));
    }
}

#[test]
fn absent_kind_is_always_in_set() {
    let session = Session::default();
    for _ in 0..50 {
        let generator = ValueGenerator::construct(None, GenArgs::new(), &session).unwrap();
        match generator.kind() {
            Kind::Named(kind) => assert!(STRING_TYPES.contains(kind)),
            other => panic!("expected a named kind, got {:?}", other),
        }
    }
}

#[test]
fn absent_kind_varies_across_constructions() {
    let session = Session::seeded(23);
    let kinds: std::collections::HashSet<StringKind> = (0..200)
        .map(|_| match ValueGenerator::random(GenArgs::new(), &session).kind() {
            Kind::Named(kind) => *kind,
            _ => unreachable!(),
        })
        .collect();
    assert!(kinds.len() > 1);
}

#[test]
fn non_string_kinds_are_rejected() {
    let session = Session::seeded(24);
    for kind in [
        MarkerArg::Int(2),
        MarkerArg::Float(1.5),
        MarkerArg::Bool(true),
        MarkerArg::Collection(vec![]),
    ] {
        let err = ValueGenerator::construct(Some(kind), GenArgs::new(), &session).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidSpecKind);
        assert!(err.message().starts_with("kind must be a string, callable or generator"));
    }
}

#[test]
fn unknown_kind_names_are_rejected() {
    let session = Session::seeded(25);
    for name in ["", "Alpha", "ascii", "numbers"] {
        let err = ValueGenerator::construct(Some(MarkerArg::from(name)), GenArgs::new(), &session)
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidSpecKind);
        assert!(err.message().contains("is not a supported string type"));
    }
}

#[test]
fn callable_yields_one_list_of_independent_draws() {
    let session = Session::default();
    let f = Callable::new("gen_numeric_string", gen_numeric_string);
    let generator = ValueGenerator::construct(
        Some(MarkerArg::Callable(f)),
        GenArgs::new().kwarg("length", 24),
        &session,
    )
    .unwrap();

    let values = collect(&generator, 4, &session);
    assert_eq!(values.len(), 1);
    let items = values[0].as_list().unwrap();
    assert_eq!(items.len(), 4);
    let draws = strings(items);
    assert!(draws.iter().all(|s| s.len() == 24 && is_numeric(s)));
    assert_ne!(draws[0], draws[1]);
}

#[test]
fn callable_receives_bound_args() {
    let session = Session::seeded(26);
    let echo = Callable::new("echo", |args, _| match args.get("word") {
        Some(Arg::Str(word)) => Ok(Value::from(word.as_str())),
        _ => Ok(Value::from("missing")),
    });
    let generator = ValueGenerator::callable(echo, GenArgs::new().kwarg("word", "hi"));
    assert_eq!(
        collect(&generator, 2, &session),
        vec![Value::from(vec!["hi", "hi"])]
    );
}

#[test]
fn generator_function_yields_runs_of_resolved_elements() {
    let session = Session::seeded(27);
    let seq = LazySequence::from_fn(|| {
        vec![
            Element::from("literal"),
            Element::from(ValueGenerator::of_kind(
                StringKind::Alpha,
                GenArgs::new().kwarg("length", 3),
            )),
            Element::from(vec!["aa", "ab"]),
        ]
    });
    let generator =
        ValueGenerator::construct(Some(MarkerArg::Lazy(seq)), GenArgs::new(), &session).unwrap();

    let values = collect(&generator, 4, &session);
    assert_eq!(values.len(), 12);
    for run in values.chunks(3) {
        assert_eq!(run[0], Value::from("literal"));
        assert_eq!(run[1].as_str().map(str::len), Some(3));
        assert_eq!(run[2], Value::from(vec!["aa", "ab"]));
    }
}

#[test]
fn generator_function_restarts_every_run() {
    let session = Session::seeded(28);
    let starts = Rc::new(Cell::new(0));
    let counter = starts.clone();
    let generator = ValueGenerator::lazy(LazySequence::from_fn(move || {
        counter.set(counter.get() + 1);
        vec![Element::from("x"), Element::from("y")]
    }));
    let values = collect(&generator, 3, &session);
    assert_eq!(values.len(), 6);
    assert_eq!(starts.get(), 3);
}

#[test]
fn generator_object_is_drained_by_first_run() {
    let session = Session::seeded(29);
    let seq = LazySequence::once(vec![Element::from("a"), Element::from("b")]);
    assert!(!seq.is_restartable());
    let generator = ValueGenerator::lazy(seq);

    let values = collect(&generator, 3, &session);
    assert_eq!(values, vec![Value::from("a"), Value::from("b")]);
    assert!(collect(&generator, 2, &session).is_empty());
}

#[test]
fn nested_callable_keeps_list_shape() {
    let session = Session::seeded(30);
    let inner = ValueGenerator::callable(
        Callable::for_kind(StringKind::Numeric),
        GenArgs::new().kwarg("length", 4),
    );
    let generator = ValueGenerator::lazy(LazySequence::from_fn(move || {
        vec![Element::from(inner.clone())]
    }));
    let values = collect(&generator, 1, &session);
    assert_eq!(values.len(), 1);
    let items = values[0].as_list().unwrap();
    assert_eq!(items.len(), 1);
    assert!(is_numeric(items[0].as_str().unwrap()));
}

#[test]
fn produce_is_repeatable_for_named_kinds() {
    let session = Session::seeded(31);
    let generator = ValueGenerator::of_kind(StringKind::Alpha, GenArgs::new());
    assert_eq!(collect(&generator, 2, &session).len(), 2);
    assert_eq!(collect(&generator, 2, &session).len(), 2);
}

#[test]
fn option_errors_surface_from_produce() {
    let session = Session::seeded(32);
    let generator = ValueGenerator::of_kind(StringKind::Alpha, GenArgs::new().kwarg("length", 0));
    let err = generator
        .produce(1, &session)
        .collect::<Result<Vec<_>, _>>()
        .unwrap_err();
    assert_eq!(err.error_type(), ErrorType::InvalidOption);
}

#[test]
fn seeded_sessions_reproduce_values() {
    let generator = ValueGenerator::of_kind(StringKind::Utf8, GenArgs::new().kwarg("length", 6));
    let a = collect(&generator, 3, &Session::seeded(33));
    let b = collect(&generator, 3, &Session::seeded(33));
    assert_eq!(a, b);
}
