//! Parsed argument values handed to command handlers

use std::collections::BTreeMap;

use serde::Serialize;

use super::handler::HandlerError;

/// A single parsed value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Optional argument that was not given and has no default
    None,
    Bool(bool),
    Count(u64),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::None => "nothing",
            Value::Bool(_) => "a flag",
            Value::Count(_) => "a count",
            Value::Int(_) => "an integer",
            Value::Float(_) => "a number",
            Value::Str(_) => "a string",
            Value::List(_) => "a list",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

/// Typed bag of parsed arguments for one command invocation.
///
/// Keys are argument destinations (see
/// [`ArgSpec::dest_name`](super::ArgSpec::dest_name)). Every declared argument
/// has an entry, so asking for an undeclared name is an error rather than a
/// silent `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedArgs {
    command: String,
    values: BTreeMap<String, Value>,
}

impl ParsedArgs {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            values: BTreeMap::new(),
        }
    }

    /// Name of the command these arguments were parsed for
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn insert(&mut self, dest: impl Into<String>, value: Value) {
        self.values.insert(dest.into(), value);
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, dest: impl Into<String>, value: Value) -> Self {
        self.insert(dest, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the value for a declared argument
    pub fn value(&self, name: &str) -> Result<&Value, HandlerError> {
        self.values.get(name).ok_or_else(|| {
            HandlerError::InvalidArgument(format!(
                "command '{}' has no argument '{}'",
                self.command, name
            ))
        })
    }

    pub fn str(&self, name: &str) -> Result<Option<&str>, HandlerError> {
        match self.value(name)? {
            Value::None => Ok(None),
            Value::Str(s) => Ok(Some(s)),
            other => Err(self.mismatch(name, "a string", other)),
        }
    }

    /// Like [`str`](Self::str) but fails when the value is absent
    pub fn require_str(&self, name: &str) -> Result<&str, HandlerError> {
        self.str(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn int(&self, name: &str) -> Result<Option<i64>, HandlerError> {
        match self.value(name)? {
            Value::None => Ok(None),
            Value::Int(n) => Ok(Some(*n)),
            other => Err(self.mismatch(name, "an integer", other)),
        }
    }

    pub fn require_int(&self, name: &str) -> Result<i64, HandlerError> {
        self.int(name)?.ok_or_else(|| self.missing(name))
    }

    pub fn float(&self, name: &str) -> Result<Option<f64>, HandlerError> {
        match self.value(name)? {
            Value::None => Ok(None),
            Value::Float(n) => Ok(Some(*n)),
            Value::Int(n) => Ok(Some(*n as f64)),
            other => Err(self.mismatch(name, "a number", other)),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool, HandlerError> {
        match self.value(name)? {
            Value::Bool(b) => Ok(*b),
            other => Err(self.mismatch(name, "a flag", other)),
        }
    }

    pub fn count(&self, name: &str) -> Result<u64, HandlerError> {
        match self.value(name)? {
            Value::Count(n) => Ok(*n),
            other => Err(self.mismatch(name, "a count", other)),
        }
    }

    /// Returns a list value; an absent optional list reads as empty
    pub fn list(&self, name: &str) -> Result<&[Value], HandlerError> {
        match self.value(name)? {
            Value::None => Ok(&[]),
            Value::List(items) => Ok(items),
            other => Err(self.mismatch(name, "a list", other)),
        }
    }

    /// Returns a list of strings
    pub fn strings(&self, name: &str) -> Result<Vec<&str>, HandlerError> {
        self.list(name)?
            .iter()
            .map(|item| match item {
                Value::Str(s) => Ok(s.as_str()),
                other => Err(self.mismatch(name, "a list of strings", other)),
            })
            .collect()
    }

    fn mismatch(&self, name: &str, expected: &str, found: &Value) -> HandlerError {
        HandlerError::InvalidArgument(format!(
            "argument '{}' of command '{}' is {}, not {}",
            name,
            self.command,
            found.kind(),
            expected
        ))
    }

    fn missing(&self, name: &str) -> HandlerError {
        HandlerError::InvalidArgument(format!(
            "argument '{}' of command '{}' was not given",
            name, self.command
        ))
    }
}
