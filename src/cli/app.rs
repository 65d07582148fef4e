//! Root orchestrator
//!
//! [`Cli`] discovers the command groups of an application, builds the root
//! parser from the `base` group, attaches every other group under it on first
//! use and dispatches invocations to handlers.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgMatches, Command};
use tracing::debug;

use super::output;
use crate::domain::{ConfigError, Outcome};
use crate::registry::{CommandGroup, GroupRegistry, GroupRole, LoadedGroup, ModuleCatalog};

/// Name of the group whose commands sit directly under the program
pub const BASE_GROUP: &str = "base";

/// Reported when a known group is given without a known command
pub const INVALID_ARGUMENTS: &str = "invalid number of arguments";

/// Reported when the first token names neither a base command nor a group
pub const INVALID_BASE_COMMAND: &str = "invalid base command";

pub const DEFAULT_MESSAGE: &str = "Welcome!";
pub const DEFAULT_PACKAGE: &str = "commands";
pub const DEFAULT_PROMPT: &str = ">> ";

/// A command-line application assembled from command-group modules
#[derive(Debug)]
pub struct Cli {
    name: String,
    version: String,
    pub(super) message: String,
    pub(super) prompt: String,
    catalog: ModuleCatalog,
    registry: GroupRegistry,
    groups: BTreeMap<String, Rc<CommandGroup>>,
    base: Rc<CommandGroup>,
    base_parser: Command,
    root: OnceCell<Command>,
    pub(super) interactive_mode: bool,
}

/// Builder for [`Cli`]
#[derive(Debug)]
pub struct CliBuilder {
    name: String,
    version: String,
    message: String,
    package: String,
    prompt: String,
    catalog: ModuleCatalog,
    registry: GroupRegistry,
}

impl CliBuilder {
    /// Message printed when interactive mode starts
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Package holding the command-group modules, relative to the app name
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Prompt shown in interactive mode
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn catalog(mut self, catalog: ModuleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Uses a shared registry instead of a fresh one
    pub fn registry(mut self, registry: GroupRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Discovers the command groups and loads the base group.
    ///
    /// Fails when the package is missing, when no `base` module exists or
    /// when the base module cannot be loaded.
    pub fn build(self) -> Result<Cli, ConfigError> {
        let paths = self.catalog.discover(&self.name, &self.package)?;

        let mut groups = BTreeMap::new();
        for path in paths {
            let group = self.registry.get_or_create(&path);
            groups.insert(group.name().to_string(), group);
        }

        let base = groups
            .remove(BASE_GROUP)
            .ok_or_else(|| ConfigError::BaseNotFound {
                package: self.package.clone(),
            })?;

        let base_parser = base
            .load(&self.catalog, &self.name, GroupRole::Root)?
            .populate()
            .clone()
            .version(self.version.clone());

        debug!(
            app = %self.name,
            package = %self.package,
            groups = groups.len(),
            "command line assembled"
        );

        Ok(Cli {
            name: self.name,
            version: self.version,
            message: self.message,
            prompt: self.prompt,
            catalog: self.catalog,
            registry: self.registry,
            groups,
            base,
            base_parser,
            root: OnceCell::new(),
            interactive_mode: false,
        })
    }
}

impl Cli {
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> CliBuilder {
        CliBuilder {
            name: name.into(),
            version: version.into(),
            message: DEFAULT_MESSAGE.to_string(),
            package: DEFAULT_PACKAGE.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            catalog: ModuleCatalog::new(),
            registry: GroupRegistry::new(),
        }
    }

    /// Builds a CLI from `catalog`, sharing groups through `registry`
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        message: impl Into<String>,
        package: impl Into<String>,
        catalog: ModuleCatalog,
        registry: &GroupRegistry,
    ) -> Result<Self, ConfigError> {
        Self::builder(name, version)
            .message(message)
            .package(package)
            .catalog(catalog)
            .registry(registry.clone())
            .build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive_mode
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    pub fn base(&self) -> &Rc<CommandGroup> {
        &self.base
    }

    /// Looks up a non-base group by its command-line name
    pub fn group(&self, name: &str) -> Option<&Rc<CommandGroup>> {
        self.groups.get(name)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Loads every non-base group and returns the complete root parser.
    ///
    /// Runs once; later calls return the same parser.
    pub fn load_all(&self) -> Result<&Command, ConfigError> {
        if let Some(root) = self.root.get() {
            return Ok(root);
        }

        let base = self.load_base()?;
        let mut root = self.base_parser.clone();

        for (name, group) in &self.groups {
            if base.command(name).is_some() {
                return Err(ConfigError::InvalidCommand {
                    group: self.base.path().to_string(),
                    reason: format!("base command '{}' collides with a command group", name),
                });
            }

            let loaded = self.load_group(group)?;
            loaded.populate();
            root = loaded.register(root);
        }

        debug!(groups = self.groups.len(), "all command groups loaded");
        Ok(self.root.get_or_init(|| root))
    }

    /// Parses `args` and runs the selected handler.
    ///
    /// Nothing is printed; the returned [`Outcome`] says what happened.
    pub fn dispatch<S: AsRef<str>>(&self, args: &[S]) -> Result<Outcome, ConfigError> {
        let root = self.load_all()?;
        let tokens: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        debug!(?tokens, "dispatching");

        let argv = std::iter::once(self.name.as_str()).chain(tokens.iter().copied());
        match root.clone().try_get_matches_from(argv) {
            Ok(matches) => self.resolve(root, &matches),
            Err(err) => self.parse_failure(root, &tokens, &err),
        }
    }

    /// Runs one invocation and reports its outcome.
    ///
    /// Without arguments this enters interactive mode, unless it is already
    /// active. Returns the exit status the invocation asks for.
    pub fn run<S: AsRef<str>>(&mut self, args: &[S]) -> Result<i32, ConfigError> {
        if args.is_empty() {
            if self.interactive_mode {
                return Ok(0);
            }
            return self.interactive();
        }

        let outcome = self.dispatch(args)?;
        Ok(output::report(&outcome))
    }

    fn resolve(&self, root: &Command, matches: &ArgMatches) -> Result<Outcome, ConfigError> {
        let Some((name, sub_matches)) = matches.subcommand() else {
            return Ok(root_error(root));
        };

        if let Some(outcome) = self.load_base()?.invoke(name, sub_matches) {
            return Ok(outcome);
        }

        let Some(group) = self.groups.get(name) else {
            return Ok(root_error(root));
        };
        let group = self.load_group(group)?;

        let outcome = match sub_matches.subcommand() {
            Some((command, command_matches)) => group
                .invoke(command, command_matches)
                .unwrap_or_else(|| group.error(INVALID_ARGUMENTS)),
            None => group.error(INVALID_ARGUMENTS),
        };
        Ok(outcome)
    }

    fn parse_failure(
        &self,
        root: &Command,
        tokens: &[&str],
        err: &clap::Error,
    ) -> Result<Outcome, ConfigError> {
        // Parsers without subcommands report a stray word as an unknown argument.
        let stray_word = match err.kind() {
            ErrorKind::InvalidSubcommand => true,
            ErrorKind::UnknownArgument => !rejects_flag(err),
            _ => false,
        };

        if stray_word {
            if let Some(first) = tokens.first() {
                if let Some(group) = self.groups.get(*first) {
                    let group = self.load_group(group)?;
                    let known = tokens.get(1).is_some_and(|t| group.command(t).is_some());
                    if !known {
                        return Ok(group.error(INVALID_ARGUMENTS));
                    }
                } else if self.load_base()?.command(first).is_none() {
                    return Ok(root_error(root));
                }
            }
        }

        Ok(Outcome::from_clap(err, help_for(root, tokens)))
    }

    fn load_base(&self) -> Result<&LoadedGroup, ConfigError> {
        self.base.load(&self.catalog, &self.name, GroupRole::Root)
    }

    fn load_group<'a>(&'a self, group: &'a CommandGroup) -> Result<&'a LoadedGroup, ConfigError> {
        group.load(&self.catalog, &self.name, GroupRole::Subcommand)
    }
}

/// True when clap rejected an option rather than a plain word
fn rejects_flag(err: &clap::Error) -> bool {
    matches!(
        err.get(ContextKind::InvalidArg),
        Some(ContextValue::String(arg)) if arg.starts_with('-')
    )
}

fn root_error(root: &Command) -> Outcome {
    Outcome::usage(INVALID_BASE_COMMAND, root.clone().render_help().to_string())
}

/// Help of the deepest parser the tokens reach (root, group or command)
fn help_for(root: &Command, tokens: &[&str]) -> String {
    let mut cmd = root;
    for token in tokens.iter().take(2) {
        match cmd.find_subcommand(token) {
            Some(sub) => cmd = sub,
            None => break,
        }
    }
    cmd.clone().render_help().to_string()
}
