//! Argument declarations
//!
//! An [`ArgSpec`] is the declarative form of one command-line argument: its
//! names plus the parser options that go with them. Specs are plain data; they
//! are turned into clap arguments only when a command group is loaded.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches};

use super::args::Value;

/// Destination name reserved for dispatch
pub const RESERVED_DEST: &str = "func";

const RESERVED_FLAGS: [&str; 2] = ["-h", "--help"];

/// What the parser does when it meets the argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Store the value (the default)
    #[default]
    Store,
    /// Set to `true` when present
    StoreTrue,
    /// Set to `false` when present
    StoreFalse,
    /// Count occurrences (`-vvv`)
    Count,
    /// Collect every occurrence into a list
    Append,
}

/// Type values are converted to while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    String,
    Int,
    Float,
}

/// How many values the argument consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nargs {
    /// Zero or one value
    Optional,
    /// Any number of values
    ZeroOrMore,
    /// At least one value
    OneOrMore,
    /// Exactly this many values
    Exactly(usize),
}

/// Declaration of a single argument
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArgSpec {
    names: Vec<String>,
    action: Action,
    value_type: ValueType,
    help: Option<String>,
    metavar: Option<String>,
    dest: Option<String>,
    required: bool,
    default: Option<String>,
    choices: Vec<String>,
    nargs: Option<Nargs>,
    env: Option<String>,
}

/// Declares an argument for a single command.
///
/// `names` is either one positional name (`"path"`) or one or more flags
/// (`"-v"`, `"--verbose"`).
pub fn argument<I, S>(names: I) -> ArgSpec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ArgSpec {
        names: names.into_iter().map(Into::into).collect(),
        ..ArgSpec::default()
    }
}

/// Declares an argument shared by every command of a group.
///
/// This only builds the declaration; nothing is registered until the group's
/// module lists it with [`GroupModule::global`](super::GroupModule::global).
pub fn global_arg<I, S>(names: I) -> ArgSpec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    argument(names)
}

impl ArgSpec {
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Overrides the name the parsed value is stored under
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn nargs(mut self, nargs: Nargs) -> Self {
        self.nargs = Some(nargs);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Reads the value from an environment variable when not given
    pub fn env(mut self, var: impl Into<String>) -> Self {
        self.env = Some(var.into());
        self
    }

    /// Shorthand for `action(Action::StoreTrue)`
    pub fn flag(self) -> Self {
        self.action(Action::StoreTrue)
    }

    /// Shorthand for `action(Action::Count)`
    pub fn count(self) -> Self {
        self.action(Action::Count)
    }

    /// Shorthand for `action(Action::Append)`
    pub fn append(self) -> Self {
        self.action(Action::Append)
    }

    /// Shorthand for `value_type(ValueType::Int)`
    pub fn int(self) -> Self {
        self.value_type(ValueType::Int)
    }

    /// Shorthand for `value_type(ValueType::Float)`
    pub fn float(self) -> Self {
        self.value_type(ValueType::Float)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_positional(&self) -> bool {
        self.names.len() == 1 && !self.names[0].starts_with('-')
    }

    /// Returns the name the parsed value is stored under.
    ///
    /// Falls back to the positional name, then the first long flag, then the
    /// first short flag, with dashes turned into underscores.
    pub fn dest_name(&self) -> String {
        if let Some(dest) = &self.dest {
            return dest.clone();
        }

        let name = self
            .names
            .iter()
            .find(|n| n.starts_with("--"))
            .or_else(|| self.names.first())
            .map(String::as_str)
            .unwrap_or_default();

        name.trim_start_matches('-').replace('-', "_")
    }

    /// Returns true when the parsed value is a list
    pub fn is_multiple(&self) -> bool {
        self.action == Action::Append
            || matches!(
                self.nargs,
                Some(Nargs::ZeroOrMore | Nargs::OneOrMore)
            )
            || matches!(self.nargs, Some(Nargs::Exactly(n)) if n > 1)
    }

    fn takes_value(&self) -> bool {
        matches!(self.action, Action::Store | Action::Append)
    }

    /// Checks the declaration is consistent, returning a description of the
    /// first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let label = self.names.join("/");

        if self.names.is_empty() {
            return Err("argument declared without a name".to_string());
        }

        if self.names.iter().any(|n| n.is_empty() || n == "-" || n == "--") {
            return Err(format!("argument '{}' has an empty name", label));
        }

        if self.names.len() > 1 && self.names.iter().any(|n| !n.starts_with('-')) {
            return Err(format!(
                "argument '{}' mixes a positional name with flags",
                label
            ));
        }

        for name in &self.names {
            if !name.starts_with("--") && name.starts_with('-') && name.chars().count() != 2 {
                return Err(format!(
                    "short flag '{}' must be a single character",
                    name
                ));
            }
        }

        if let Some(name) = self.names.iter().find(|n| RESERVED_FLAGS.contains(&n.as_str())) {
            return Err(format!("flag '{}' is reserved for help output", name));
        }

        if self.required && self.default.is_some() {
            return Err(format!(
                "argument '{}' cannot be required and have a default",
                label
            ));
        }

        let dest = self.dest_name();
        if dest.is_empty() {
            return Err(format!("argument '{}' has an empty destination", label));
        }
        if dest == RESERVED_DEST {
            return Err(format!(
                "argument '{}' uses the reserved destination '{}'",
                label, RESERVED_DEST
            ));
        }

        if self.is_positional() && !self.takes_value() {
            return Err(format!(
                "positional argument '{}' must take a value",
                label
            ));
        }

        if !self.takes_value() {
            if self.default.is_some()
                || !self.choices.is_empty()
                || self.nargs.is_some()
                || self.required
                || self.env.is_some()
            {
                return Err(format!(
                    "flag '{}' does not take a value and accepts no value options",
                    label
                ));
            }
        }

        if !self.choices.is_empty() && self.value_type != ValueType::String {
            return Err(format!(
                "argument '{}' declares choices but is not a string",
                label
            ));
        }

        if let Some(default) = &self.default {
            let parses = match self.value_type {
                ValueType::String => true,
                ValueType::Int => default.parse::<i64>().is_ok(),
                ValueType::Float => default.parse::<f64>().is_ok(),
            };
            if !parses {
                return Err(format!(
                    "default '{}' of argument '{}' does not match its type",
                    default, label
                ));
            }
        }

        if matches!(self.nargs, Some(Nargs::Exactly(0))) {
            return Err(format!("argument '{}' expects zero values", label));
        }

        Ok(())
    }

    /// Builds the clap argument for this declaration
    pub fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.dest_name());

        if !self.is_positional() {
            let mut longs = self.names.iter().filter_map(|n| n.strip_prefix("--"));
            let mut shorts = self
                .names
                .iter()
                .filter(|n| !n.starts_with("--"))
                .filter_map(|n| n.chars().nth(1));

            if let Some(long) = longs.next() {
                arg = arg.long(long.to_string());
            }
            for alias in longs {
                arg = arg.visible_alias(alias.to_string());
            }
            if let Some(short) = shorts.next() {
                arg = arg.short(short);
            }
            for alias in shorts {
                arg = arg.visible_short_alias(alias);
            }
        }

        arg = arg.action(match self.action {
            Action::Store if self.is_multiple() => ArgAction::Append,
            Action::Store => ArgAction::Set,
            Action::StoreTrue => ArgAction::SetTrue,
            Action::StoreFalse => ArgAction::SetFalse,
            Action::Count => ArgAction::Count,
            Action::Append => ArgAction::Append,
        });

        if self.takes_value() {
            arg = match self.value_type {
                ValueType::String if !self.choices.is_empty() => {
                    arg.value_parser(PossibleValuesParser::new(self.choices.clone()))
                }
                ValueType::String => arg.value_parser(clap::value_parser!(String)),
                ValueType::Int => arg.value_parser(clap::value_parser!(i64)),
                ValueType::Float => arg.value_parser(clap::value_parser!(f64)),
            };

            arg = match self.nargs {
                Some(Nargs::Optional) => arg.num_args(0..=1),
                Some(Nargs::ZeroOrMore) => arg.num_args(0..),
                Some(Nargs::OneOrMore) => arg.num_args(1..),
                Some(Nargs::Exactly(n)) => arg.num_args(n),
                None => arg,
            };

            let required = if self.is_positional() {
                self.default.is_none()
                    && !matches!(self.nargs, Some(Nargs::Optional | Nargs::ZeroOrMore))
            } else {
                self.required
            };
            arg = arg.required(required);

            if let Some(default) = &self.default {
                arg = arg.default_value(default.clone());
            }
            if let Some(metavar) = &self.metavar {
                arg = arg.value_name(metavar.clone());
            }
            if let Some(var) = &self.env {
                arg = arg.env(var.clone());
            }
        }

        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }

        arg
    }

    /// Reads this argument's parsed value out of clap matches
    pub fn extract(&self, matches: &ArgMatches) -> Value {
        let id = self.dest_name();

        match self.action {
            Action::StoreTrue | Action::StoreFalse => {
                let default = self.action == Action::StoreFalse;
                let set = matches.try_get_one::<bool>(&id).ok().flatten().copied();
                return Value::Bool(set.unwrap_or(default));
            }
            Action::Count => {
                let count = matches.try_get_one::<u8>(&id).ok().flatten().copied();
                return Value::Count(u64::from(count.unwrap_or(0)));
            }
            Action::Store | Action::Append => {}
        }

        if self.is_multiple() {
            let values = match self.value_type {
                ValueType::String => many::<String>(matches, &id, Value::Str),
                ValueType::Int => many::<i64>(matches, &id, Value::Int),
                ValueType::Float => many::<f64>(matches, &id, Value::Float),
            };
            return Value::List(values.unwrap_or_default());
        }

        let value = match self.value_type {
            ValueType::String => one::<String>(matches, &id, Value::Str),
            ValueType::Int => one::<i64>(matches, &id, Value::Int),
            ValueType::Float => one::<f64>(matches, &id, Value::Float),
        };
        value.unwrap_or(Value::None)
    }
}

fn one<T>(matches: &ArgMatches, id: &str, wrap: impl Fn(T) -> Value) -> Option<Value>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .try_get_one::<T>(id)
        .ok()
        .flatten()
        .cloned()
        .map(wrap)
}

fn many<T>(matches: &ArgMatches, id: &str, wrap: impl Fn(T) -> Value) -> Option<Vec<Value>>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .try_get_many::<T>(id)
        .ok()
        .flatten()
        .map(|values| values.cloned().map(&wrap).collect())
}
