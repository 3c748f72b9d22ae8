//! A minimal host test runner.
//!
//! The runner owns test definitions, collection and execution. It calls the
//! expansion hook once per test function during collection, the same way a
//! plugin hook is called by a full test framework, and turns every
//! parametrized value into its own test item.
//!
//! # Execution Model
//!
//! 1. **Collection**: each [`TestFunction`] gets a [`Collection`] (the
//!    [`Metafunc`] handed to [`generate_tests`]); parametrizations become items
//! 2. **Interruption**: collection errors stop the run before any test body
//!    executes, unless `continue_on_collection_errors` is set
//! 3. **Execution**: every item's declared parameters are bound and its body runs
//! 4. **Reporting**: outcomes are counted and rendered by [`report`]

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::expansion::{generate_tests, Marker, Metafunc};
use crate::prelude::*;

pub mod report;

pub use report::{Outcome, RunReport, TestReport};

/// Body of a test. Returning `Err` fails the test with that message.
pub type TestBody = Rc<dyn Fn(&Bindings) -> Result<(), String>>;

/// A test definition with declared parameters and markers.
#[derive(Clone)]
pub struct TestFunction {
    pub name: String,
    pub params: Vec<String>,
    pub markers: Vec<Marker>,
    body: TestBody,
}

impl TestFunction {
    pub fn new(
        name: impl Into<String>,
        params: &[&str],
        body: impl Fn(&Bindings) -> Result<(), String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            markers: Vec::new(),
            body: Rc::new(body),
        }
    }

    /// Attaches a marker.
    pub fn mark(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn declares(&self, param: &str) -> bool {
        self.params.iter().any(|p| p == param)
    }
}

impl fmt::Debug for TestFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestFunction")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

/// Parameter values bound to one test item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, Value>,
}

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The bound string, or a failure message when it is missing or a list.
    pub fn str(&self, name: &str) -> Result<&str, String> {
        match self.values.get(name) {
            Some(Value::Str(s)) => Ok(s),
            Some(other) => Err(format!("'{}' is a {}, not a str", name, other.type_name())),
            None => Err(format!("'{}' is not bound", name)),
        }
    }

    /// The bound list, or a failure message when it is missing or a string.
    pub fn list(&self, name: &str) -> Result<&[Value], String> {
        match self.values.get(name) {
            Some(Value::List(items)) => Ok(items),
            Some(other) => Err(format!("'{}' is a {}, not a list", name, other.type_name())),
            None => Err(format!("'{}' is not bound", name)),
        }
    }

    fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }
}

/// Collection-time state for one test function.
pub struct Collection<'a> {
    function: &'a TestFunction,
    parametrizations: Vec<(String, Vec<Value>)>,
}

impl<'a> Collection<'a> {
    pub fn new(function: &'a TestFunction) -> Self {
        Self {
            function,
            parametrizations: Vec::new(),
        }
    }

    /// Turns the registered parametrizations into test items.
    ///
    /// Multiple parametrizations combine as a cartesian product; none yields a
    /// single unparametrized item. A parametrization with no values yields one
    /// skipped item.
    pub fn into_items(self) -> Vec<TestItem> {
        if let Some((argname, _)) = self.parametrizations.iter().find(|(_, v)| v.is_empty()) {
            return vec![TestItem {
                id: format!("{}[NOTSET]", self.function.name),
                params: self.function.params.clone(),
                bindings: Bindings::default(),
                body: self.function.body.clone(),
                skip: Some(format!(
                    "got empty parameter set ['{}'], function {}",
                    argname, self.function.name
                )),
            }];
        }

        let mut combos: Vec<(Vec<String>, Bindings)> = vec![(Vec::new(), Bindings::default())];
        for (argname, values) in &self.parametrizations {
            let mut next = Vec::with_capacity(combos.len() * values.len());
            for (ids, bindings) in &combos {
                for (i, value) in values.iter().enumerate() {
                    let mut ids = ids.clone();
                    ids.push(format!("{}{}", argname, i));
                    let mut bindings = bindings.clone();
                    bindings.insert(argname, value.clone());
                    next.push((ids, bindings));
                }
            }
            combos = next;
        }

        combos
            .into_iter()
            .map(|(ids, bindings)| {
                let id = if ids.is_empty() {
                    self.function.name.clone()
                } else {
                    format!("{}[{}]", self.function.name, ids.join("-"))
                };
                TestItem {
                    id,
                    params: self.function.params.clone(),
                    bindings,
                    body: self.function.body.clone(),
                    skip: None,
                }
            })
            .collect()
    }
}

impl Metafunc for Collection<'_> {
    fn function_name(&self) -> &str {
        &self.function.name
    }

    fn get_marker(&self, name: &str) -> Option<&Marker> {
        self.function.markers.iter().find(|m| m.name == name)
    }

    fn parametrize(&mut self, argname: &str, values: Vec<Value>) -> Result<(), GenStringError> {
        if !self.function.declares(argname) {
            return Err(err_msg!(
                Collection,
                "In {}: function uses no argument '{}'",
                self.function.name,
                argname
            ));
        }
        if self.parametrizations.iter().any(|(name, _)| name == argname) {
            return Err(err_msg!(
                Collection,
                "In {}: duplicate parametrization of '{}'",
                self.function.name,
                argname
            ));
        }
        self.parametrizations.push((argname.to_string(), values));
        Ok(())
    }
}

/// One runnable test invocation.
#[derive(Clone)]
pub struct TestItem {
    pub id: String,
    params: Vec<String>,
    bindings: Bindings,
    body: TestBody,
    skip: Option<String>,
}

impl TestItem {
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Binds parameters and runs the body.
    pub fn run(&self) -> Outcome {
        if let Some(reason) = &self.skip {
            return Outcome::Skipped(reason.clone());
        }
        if let Some(missing) = self.params.iter().find(|p| self.bindings.get(p).is_none()) {
            return Outcome::Error(format!("fixture '{}' not found", missing));
        }
        match (self.body)(&self.bindings) {
            Ok(()) => Outcome::Passed,
            Err(message) => Outcome::Failed(message),
        }
    }
}

impl fmt::Debug for TestItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestItem")
            .field("id", &self.id)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

/// Configuration for collection and reporting.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub use_colors: bool,
    pub continue_on_collection_errors: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
            continue_on_collection_errors: false,
        }
    }
}

/// Collects and runs test functions against one generation session.
#[derive(Debug)]
pub struct TestRunner {
    session: Session,
    config: RunnerConfig,
}

impl TestRunner {
    pub fn new(session: Session) -> Self {
        Self::with_config(session, RunnerConfig::default())
    }

    pub fn with_config(session: Session, config: RunnerConfig) -> Self {
        Self { session, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the expansion hook for one function and returns its items.
    pub fn collect(&self, function: &TestFunction) -> Result<Vec<TestItem>, GenStringError> {
        let mut collection = Collection::new(function);
        generate_tests(&mut collection, &self.session)?;
        Ok(collection.into_items())
    }

    /// Collects every function, then runs the collected items.
    pub fn run(&self, functions: &[TestFunction]) -> RunReport {
        let mut report = RunReport::default();
        let mut items = Vec::new();

        for function in functions {
            match self.collect(function) {
                Ok(collected) => items.extend(collected),
                Err(error) => {
                    tracing::debug!(test = %function.name, %error, "collection failed");
                    report.push_collection_error(&function.name, error);
                }
            }
        }

        if report.has_collection_errors() && !self.config.continue_on_collection_errors {
            report.interrupted = true;
            return report;
        }

        for item in &items {
            let outcome = item.run();
            tracing::trace!(test = %item.id, ?outcome, "test finished");
            report.push(TestReport {
                id: item.id.clone(),
                outcome,
            });
        }
        report
    }
}
