//! Command groups
//!
//! A [`CommandGroup`] is one discovered module. Loading it imports the module
//! and builds the group parser plus one dedicated parser per command; this
//! happens at most once per group no matter how often `load` is called.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use clap::{ArgMatches, Command};
use tracing::debug;

use super::catalog::ModuleCatalog;
use crate::domain::{ArgSpec, CommandSpec, ConfigError, Outcome};

/// Where a group sits in the parser tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRole {
    /// The base group, whose parser is the root parser
    Root,
    /// Any other group, attached under the root by name
    Subcommand,
}

/// One command-group module and its lazily built parsers
#[derive(Debug)]
pub struct CommandGroup {
    path: String,
    name: String,
    loaded: OnceCell<LoadedGroup>,
}

impl CommandGroup {
    /// Creates an unloaded group for a dotted module path
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('.').next().unwrap_or_default().to_string();

        Self {
            path,
            name,
            loaded: OnceCell::new(),
        }
    }

    /// Keyword used for the group on the command line
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Returns the loaded state, if `load` has run
    pub fn loaded(&self) -> Option<&LoadedGroup> {
        self.loaded.get()
    }

    /// Imports the module and builds the parsers.
    ///
    /// Only the first call does any work; later calls return the same state
    /// regardless of `program` and `role`.
    pub fn load(
        &self,
        catalog: &ModuleCatalog,
        program: &str,
        role: GroupRole,
    ) -> Result<&LoadedGroup, ConfigError> {
        if let Some(loaded) = self.loaded.get() {
            return Ok(loaded);
        }

        let (title, placeholder, parser_name, bin_name) = match role {
            GroupRole::Root => (
                "base commands",
                "base_command",
                program.to_string(),
                program.to_string(),
            ),
            GroupRole::Subcommand => (
                "commands",
                "command",
                self.name.clone(),
                format!("{} {}", program, self.name),
            ),
        };

        let parser = Command::new(parser_name)
            .bin_name(bin_name.clone())
            .subcommand_help_heading(title)
            .subcommand_value_name(placeholder)
            .disable_help_subcommand(true);

        let module = catalog.import(&self.path)?;
        module.validate(&self.path)?;
        let (description, shared, specs) = module.into_parts();

        let mut commands = BTreeMap::new();
        let mut parsers = BTreeMap::new();
        for spec in specs {
            let cmd_parser = spec
                .parser(&[])
                .bin_name(format!("{} {}", bin_name, spec.name()));
            parsers.insert(spec.name().to_string(), cmd_parser);
            commands.insert(spec.name().to_string(), spec);
        }

        debug!(group = %self.path, ?role, commands = commands.len(), "loaded command group");

        let loaded = LoadedGroup {
            name: self.name.clone(),
            role,
            parser,
            description,
            shared,
            commands,
            parsers,
            populated: OnceCell::new(),
        };
        Ok(self.loaded.get_or_init(|| loaded))
    }
}

/// Parser state of a loaded group
#[derive(Debug)]
pub struct LoadedGroup {
    name: String,
    role: GroupRole,
    parser: Command,
    description: Option<String>,
    shared: Vec<ArgSpec>,
    commands: BTreeMap<String, CommandSpec>,
    parsers: BTreeMap<String, Command>,
    populated: OnceCell<Command>,
}

impl LoadedGroup {
    pub fn role(&self) -> GroupRole {
        self.role
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The group-wide arguments appended to every command
    pub fn shared_arguments(&self) -> &[ArgSpec] {
        &self.shared
    }

    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Returns the complete group parser.
    ///
    /// The module documentation becomes the parser description and every
    /// group-wide argument is appended to every command parser. Built once.
    pub fn populate(&self) -> &Command {
        self.populated.get_or_init(|| {
            let mut parser = self.parser.clone();
            if let Some(description) = &self.description {
                parser = parser.about(description.clone());
            }

            for cmd_parser in self.parsers.values() {
                let mut cmd = cmd_parser.clone();
                for spec in &self.shared {
                    cmd = cmd.arg(spec.to_arg());
                }
                parser = parser.subcommand(cmd);
            }

            parser
        })
    }

    /// Attaches this group under `root` as a named subcommand
    pub fn register(&self, root: Command) -> Command {
        debug!(group = %self.name, "registering command group");
        root.subcommand(self.populate().clone())
    }

    /// Help text of the group parser
    pub fn help(&self) -> String {
        self.populate().clone().render_help().to_string()
    }

    /// Help text of one command parser
    pub fn command_help(&self, name: &str) -> Option<String> {
        self.populate()
            .find_subcommand(name)
            .map(|cmd| cmd.clone().render_help().to_string())
    }

    /// Usage error reported against this group's parser
    pub fn error(&self, message: impl Into<String>) -> Outcome {
        Outcome::usage(message, self.help())
    }

    /// Runs the named command with its matches, if the group has it
    pub fn invoke(&self, name: &str, matches: &ArgMatches) -> Option<Outcome> {
        self.commands
            .get(name)
            .map(|spec| spec.invoke(&self.shared, matches))
    }
}
