//! Generated values and generation arguments.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::faux::Validator;

/// A concrete parameter value bound to a test.
///
/// Named kinds produce strings; bulk callables and nested generators that
/// yield more than one element produce lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            Value::Str(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "str",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// A single option forwarded to a generation call.
#[derive(Debug, Clone)]
pub enum Arg {
    Int(i64),
    Str(String),
    Bool(bool),
    Validator(Validator),
}

impl Arg {
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Int(_) => "int",
            Arg::Str(_) => "str",
            Arg::Bool(_) => "bool",
            Arg::Validator(_) => "validator",
        }
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Int(v as i64)
    }
}

impl From<usize> for Arg {
    fn from(v: usize) -> Self {
        Arg::Int(v as i64)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Str(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Str(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<Validator> for Arg {
    fn from(v: Validator) -> Self {
        Arg::Validator(v)
    }
}

/// Positional and keyword options bound to a generator at construction.
#[derive(Debug, Clone, Default)]
pub struct GenArgs {
    pub positional: Vec<Arg>,
    pub keywords: BTreeMap<String, Arg>,
}

impl GenArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Arg>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: &str, value: impl Into<Arg>) -> Self {
        self.keywords.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.keywords.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested_list() {
        let value = Value::from(vec![Value::from("aa"), Value::from(vec!["b", "c"])]);
        assert_eq!(value.to_string(), r#"["aa", ["b", "c"]]"#);
    }

    #[test]
    fn test_serialize_untagged() {
        let value = Value::from(vec!["aa", "ab"]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"["aa","ab"]"#);
    }

    #[test]
    fn test_gen_args_builder() {
        let args = GenArgs::new().arg(12).kwarg("default", "1");
        assert!(matches!(args.positional[0], Arg::Int(12)));
        assert!(matches!(args.get("default"), Some(Arg::Str(s)) if s == "1"));
        assert!(!args.is_empty());
    }
}
