//! Shared helpers for gen-string integration tests.
#![allow(dead_code)]

use gen_string::expansion::{generate_tests, Marker, Metafunc};
use gen_string::prelude::*;

/// A bare `Metafunc` that records what it is asked to parametrize.
pub struct RecordingMetafunc {
    pub name: String,
    pub markers: Vec<Marker>,
    pub parametrized: Vec<(String, Vec<Value>)>,
}

impl RecordingMetafunc {
    pub fn new(marker: Option<Marker>) -> Self {
        Self {
            name: "test_recorded".to_string(),
            markers: marker.into_iter().collect(),
            parametrized: Vec::new(),
        }
    }
}

impl Metafunc for RecordingMetafunc {
    fn function_name(&self) -> &str {
        &self.name
    }

    fn get_marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.name == name)
    }

    fn parametrize(&mut self, argname: &str, values: Vec<Value>) -> Result<(), GenStringError> {
        self.parametrized.push((argname.to_string(), values));
        Ok(())
    }
}

/// Expands `marker` and returns the values bound to `value`.
pub fn expand(marker: Marker, session: &Session) -> Result<Vec<Value>, GenStringError> {
    let mut metafunc = RecordingMetafunc::new(Some(marker));
    generate_tests(&mut metafunc, session)?;
    let (argname, values) = metafunc
        .parametrized
        .pop()
        .expect("marker expansion must parametrize");
    assert_eq!(argname, "value");
    Ok(values)
}

pub fn strings(values: &[Value]) -> Vec<&str> {
    values
        .iter()
        .map(|v| v.as_str().expect("expected a str value"))
        .collect()
}

pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
