//! Command declarations
//!
//! A command is a name, a help text, its arguments and the handler that runs
//! when the command is selected. Commands are declared with [`command`] and
//! collected by a group module; the orchestrator turns them into parsers when
//! the group loads.

use std::collections::HashSet;

use clap::{ArgMatches, Command};
use tracing::debug;

use super::args::ParsedArgs;
use super::argument::ArgSpec;
use super::handler::{Handler, HandlerResult};
use super::module::ConfigError;
use super::outcome::Outcome;

/// Declaration of a single command
#[derive(Debug, Clone)]
pub struct CommandSpec {
    name: String,
    about: Option<String>,
    args: Vec<ArgSpec>,
    handler: Handler,
}

/// Declares a command bound to `handler`
pub fn command<F>(name: impl Into<String>, handler: F) -> CommandSpec
where
    F: Fn(&ParsedArgs) -> HandlerResult + 'static,
{
    CommandSpec {
        name: name.into(),
        about: None,
        args: Vec::new(),
        handler: Handler::new(handler),
    }
}

impl CommandSpec {
    /// Sets the help text shown for the command
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Adds an argument; may be repeated
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub fn arguments(&self) -> &[ArgSpec] {
        &self.args
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Checks the command and its arguments, together with the group-wide
    /// `shared` arguments it will also accept.
    pub fn validate(&self, shared: &[ArgSpec]) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("command declared without a name".to_string());
        }
        if self.name.starts_with('-') || self.name.chars().any(char::is_whitespace) {
            return Err(format!("'{}' is not a valid command name", self.name));
        }

        let mut dests = HashSet::new();
        let mut flags = HashSet::new();

        for spec in self.args.iter().chain(shared) {
            spec.validate()
                .map_err(|reason| format!("command '{}': {}", self.name, reason))?;

            let dest = spec.dest_name();
            if !dests.insert(dest.clone()) {
                return Err(format!(
                    "command '{}' declares argument '{}' more than once",
                    self.name, dest
                ));
            }

            if !spec.is_positional() {
                for flag in spec.names() {
                    if !flags.insert(flag.clone()) {
                        return Err(format!(
                            "command '{}' declares flag '{}' more than once",
                            self.name, flag
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Builds the dedicated parser for this command, including `shared`
    pub fn parser(&self, shared: &[ArgSpec]) -> Command {
        let mut cmd = Command::new(self.name.clone());
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }

        for spec in self.args.iter().chain(shared) {
            cmd = cmd.arg(spec.to_arg());
        }

        cmd
    }

    /// Collects the typed argument bag from this command's matches
    pub fn parsed_args(&self, shared: &[ArgSpec], matches: &ArgMatches) -> ParsedArgs {
        let mut args = ParsedArgs::new(self.name.clone());
        for spec in self.args.iter().chain(shared) {
            args.insert(spec.dest_name(), spec.extract(matches));
        }
        args
    }

    /// Runs the handler against parsed matches
    pub fn invoke(&self, shared: &[ArgSpec], matches: &ArgMatches) -> Outcome {
        let args = self.parsed_args(shared, matches);
        debug!(command = %self.name, arguments = args.len(), "invoking handler");

        match self.handler.call(&args) {
            Ok(()) => Outcome::Completed,
            Err(err) => {
                debug!(command = %self.name, error = %err, "handler failed");
                Outcome::HandlerError {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Builds a standalone parser for this command alone.
    ///
    /// Detached commands need no registry or CLI, which makes handlers easy
    /// to exercise directly.
    pub fn detached(self) -> Result<DetachedCommand, ConfigError> {
        self.validate(&[])
            .map_err(|reason| ConfigError::InvalidCommand {
                group: "detached command".to_string(),
                reason,
            })?;
        let parser = self.parser(&[]).disable_help_subcommand(true);
        Ok(DetachedCommand { spec: self, parser })
    }
}

/// A command parsed and dispatched on its own
#[derive(Debug, Clone)]
pub struct DetachedCommand {
    spec: CommandSpec,
    parser: Command,
}

impl DetachedCommand {
    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// Parses `args` (without the command name) and runs the handler
    pub fn invoke<I, S>(&self, args: I) -> Outcome
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = std::iter::once(self.spec.name.clone()).chain(args.into_iter().map(Into::into));

        match self.parser.clone().try_get_matches_from(argv) {
            Ok(matches) => self.spec.invoke(&[], &matches),
            Err(err) => Outcome::from_clap(&err, self.parser.clone().render_help().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{argument, HandlerError};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (Rc<RefCell<Vec<ParsedArgs>>>, CommandSpec) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&calls);
        let spec = command("bar", move |args| {
            seen.borrow_mut().push(args.clone());
            Ok(())
        })
        .about("Bar the foo")
        .arg(argument(["--x"]).required(true).help("Value of x"));
        (calls, spec)
    }

    #[test]
    fn detached_invoke_passes_arguments() {
        let (calls, spec) = recording();
        let detached = spec.detached().unwrap();

        let outcome = detached.invoke(["--x", "hello"]);

        assert_eq!(outcome, Outcome::Completed);
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].str("x").unwrap(), Some("hello"));
        assert_eq!(calls[0].len(), 1);
    }

    #[test]
    fn detached_missing_argument() {
        let (calls, spec) = recording();
        let detached = spec.detached().unwrap();

        let outcome = detached.invoke(Vec::<String>::new());

        assert!(outcome.is_usage_error());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn detached_handler_error() {
        let spec = command("fail", |_| Err(HandlerError::failed("it broke")));
        let outcome = spec.detached().unwrap().invoke(Vec::<String>::new());
        assert_eq!(
            outcome,
            Outcome::HandlerError {
                message: "it broke".into()
            }
        );
    }

    #[test]
    fn duplicate_destination_rejected() {
        let spec = command("bar", |_| Ok(()))
            .arg(argument(["--x"]))
            .arg(argument(["--y"]).dest("x"));
        let err = spec.validate(&[]).unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn clash_with_shared_argument_rejected() {
        let spec = command("bar", |_| Ok(())).arg(argument(["-v", "--verbose"]).flag());
        let shared = vec![argument(["-v", "--verbose"]).flag()];
        assert!(spec.validate(&shared).is_err());
    }

    #[test]
    fn invalid_command_name_rejected() {
        assert!(command("--bar", |_| Ok(())).validate(&[]).is_err());
        assert!(command("two words", |_| Ok(())).validate(&[]).is_err());
        assert!(command("", |_| Ok(())).validate(&[]).is_err());
    }

    #[test]
    fn parser_carries_help_text() {
        let (_, spec) = recording();
        let help = spec.parser(&[]).render_help().to_string();
        assert!(help.contains("Bar the foo"));
        assert!(help.contains("Value of x"));
    }
}
