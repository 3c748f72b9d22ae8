//! The bundled example suite run by `gen-string selftest`.
//!
//! Each function exercises one way of writing a `gen_string` marker.

use crate::expansion::Marker;
use crate::faux::{gen_numeric_string, Validator};
use crate::generator::{Callable, Element, LazySequence, ValueGenerator};
use crate::prelude::*;
use crate::runner::{Bindings, TestFunction};

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_numeric())
}

fn check(cond: bool, message: impl FnOnce() -> String) -> Result<(), String> {
    if cond {
        Ok(())
    } else {
        Err(message())
    }
}

fn numeric_list(bindings: &Bindings) -> Result<(), String> {
    let items = bindings.list("value")?;
    check(items.len() == 2, || format!("expected 2 values, got {}", items.len()))?;
    for item in items {
        let s = item.as_str().ok_or("list item is not a str")?;
        check(s.chars().count() == 24 && is_numeric(s), || {
            format!("{:?} is not a 24 digit string", s)
        })?;
    }
    check(items[0] != items[1], || "both values are equal".to_string())
}

fn numeric_callable() -> Callable {
    Callable::new("gen_numeric_string", gen_numeric_string)
}

pub fn suite() -> Result<Vec<TestFunction>, GenStringError> {
    let gen_string_list = vec![
        ValueGenerator::named("alpha", GenArgs::new().kwarg("length", 12))?,
        ValueGenerator::named("html", GenArgs::new().kwarg("length", 20))?,
        ValueGenerator::named("utf8", GenArgs::new().kwarg("length", 10))?,
        ValueGenerator::callable(numeric_callable(), GenArgs::new().kwarg("length", 24)),
    ];

    let simple_function_generator = LazySequence::from_fn(|| {
        vec![
            Element::from(ValueGenerator::of_kind(
                crate::faux::StringKind::Numeric,
                GenArgs::new().kwarg("length", 24),
            )),
            Element::from(vec!["aa", "ab"]),
        ]
    });

    Ok(vec![
        TestFunction::new("test_gen_alpha_string_with_no_arguments", &["value"], |b| {
            check(!b.str("value")?.is_empty(), || "empty value".to_string())
        })
        .mark(Marker::gen_string()),
        TestFunction::new("test_gen_alpha_string_with_limit_arguments", &["value"], |b| {
            check(!b.str("value")?.is_empty(), || "empty value".to_string())
        })
        .mark(Marker::gen_string().arg(1)),
        TestFunction::new("test_gen_alpha_string_with_length", &["value"], |b| {
            let value = b.str("value")?;
            check(value.len() == 12, || format!("{:?} is not 12 long", value))
        })
        .mark(Marker::gen_string().arg(4).arg("alpha").kwarg("length", 12)),
        TestFunction::new("test_gen_alpha_string_with_validator", &["value"], |b| {
            let value = b.str("value")?;
            check(value == "1", || format!("expected the default, got {:?}", value))
        })
        .mark(
            Marker::gen_string()
                .arg(1)
                .arg("punctuation")
                .kwarg("length", 12)
                .kwarg("validator", Validator::predicate(is_numeric))
                .kwarg("default", "1"),
        ),
        TestFunction::new("test_gen_string_with_gen_string_instance", &["value"], |b| {
            let value = b.str("value")?;
            check(value.len() == 12, || format!("{:?} is not 12 long", value))
        })
        .mark(
            Marker::gen_string()
                .arg(2)
                .arg(ValueGenerator::named("alpha", GenArgs::new().kwarg("length", 12))?),
        ),
        TestFunction::new("test_something_from_gen_string_list", &["value"], |_| Ok(()))
            .mark(Marker::gen_string().arg(1).arg(gen_string_list)),
        TestFunction::new("test_gen_something_from_callable", &["value"], numeric_list).mark(
            Marker::gen_string().arg(2).arg(ValueGenerator::callable(
                numeric_callable(),
                GenArgs::new().kwarg("length", 24),
            )),
        ),
        TestFunction::new(
            "test_gen_something_from_direct_callable",
            &["value"],
            numeric_list,
        )
        .mark(
            Marker::gen_string()
                .arg(2)
                .arg(numeric_callable())
                .kwarg("length", 24),
        ),
        TestFunction::new("test_gen_something_from_generator", &["value"], |b| {
            match b.get("value") {
                Some(Value::List(items)) => check(
                    items == &[Value::from("aa"), Value::from("ab")],
                    || format!("unexpected list {:?}", items),
                ),
                Some(Value::Str(s)) => check(s.len() == 24 && is_numeric(s), || {
                    format!("{:?} is not a 24 digit string", s)
                }),
                None => Err("'value' is not bound".to_string()),
            }
        })
        .mark(Marker::gen_string().arg(1).arg(simple_function_generator)),
    ])
}
