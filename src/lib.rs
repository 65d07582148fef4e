//! reticular - command-line applications assembled from command-group modules
//!
//! An application lists its command groups as modules of one package. The
//! `base` module supplies the top-level commands; every other public module
//! becomes a subcommand group named after it. Parsers are built lazily, the
//! first time a group is needed, and running the program without arguments
//! starts an interactive prompt.

pub mod cli;
pub mod domain;
pub mod registry;
pub mod settings;

pub use cli::{say, section, Cli, CliBuilder};
pub use domain::{
    argument, command, global_arg, superuser, ConfigError, GroupModule, HandlerError,
    HandlerResult, Outcome, ParsedArgs, Value,
};
pub use registry::{GroupRegistry, ModuleCatalog};
pub use settings::Settings;
