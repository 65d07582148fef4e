//! Command group modules
//!
//! A [`GroupModule`] is what a command-group source module provides: an
//! optional documentation string, the `ARGUMENTS` list applied to every
//! command of the group, and the commands themselves.

use thiserror::Error;

use super::argument::ArgSpec;
use super::command::CommandSpec;

/// Errors that stop an application from being assembled
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Base commands module not found in: {package}.base")]
    BaseNotFound { package: String },

    #[error("{0} package not found")]
    PackageNotFound(String),

    #[error("Command group module not found: {0}")]
    ModuleNotFound(String),

    #[error("Invalid command definition in {group}: {reason}")]
    InvalidCommand { group: String, reason: String },
}

/// Declarative contents of one command-group module
#[derive(Debug, Clone, Default)]
pub struct GroupModule {
    doc: Option<String>,
    arguments: Vec<ArgSpec>,
    commands: Vec<CommandSpec>,
}

impl GroupModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the group's documentation (its help text)
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Adds an argument accepted by every command of the group
    pub fn global(mut self, spec: ArgSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    pub fn command(mut self, spec: CommandSpec) -> Self {
        self.commands.push(spec);
        self
    }

    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// The group-wide `ARGUMENTS` list
    pub fn arguments(&self) -> &[ArgSpec] {
        &self.arguments
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Checks every command against the group-wide arguments and rejects
    /// duplicate command names.
    pub fn validate(&self, group: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidCommand {
            group: group.to_string(),
            reason,
        };

        let mut seen = std::collections::HashSet::new();
        for cmd in &self.commands {
            if !seen.insert(cmd.name()) {
                return Err(invalid(format!(
                    "command '{}' is declared more than once",
                    cmd.name()
                )));
            }
            cmd.validate(&self.arguments).map_err(invalid)?;
        }

        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Option<String>, Vec<ArgSpec>, Vec<CommandSpec>) {
        (self.doc, self.arguments, self.commands)
    }
}
