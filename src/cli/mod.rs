//! # Command-Line Interface
//!
//! The root orchestrator, interactive mode and console output.
//!
//! ## Invocation Shapes
//!
//! | Tokens | Runs | Example |
//! |--------|------|---------|
//! | `<base-command> [args]` | Command from the `base` module | `app status` |
//! | `<group> <command> [args]` | Command from module `<group>` | `app greet hello --name Ann` |
//! | *(none)* | Interactive mode | `app` |
//!
//! ## Errors
//!
//! - Usage errors print `error: <message>` and the relevant help on stderr
//!   and exit with status 2.
//! - Handler errors print `ERROR: <message>` on stdout and exit with 0.
//! - Configuration errors (missing package, missing `base` module, invalid
//!   registrations) are returned to the caller as [`ConfigError`].
//!
//! ## Interactive Mode
//!
//! Each line is split on whitespace and run as a full invocation. Ctrl-D
//! ends the session with status 0, Ctrl-C with status 1.
//!
//! [`ConfigError`]: crate::domain::ConfigError

mod app;
mod input;
mod output;
mod repl;

pub use app::{
    Cli, CliBuilder, BASE_GROUP, DEFAULT_MESSAGE, DEFAULT_PACKAGE, DEFAULT_PROMPT,
    INVALID_ARGUMENTS, INVALID_BASE_COMMAND,
};
pub use input::{default_reader, LineReader, ReadLine, ScriptedReader, StdinReader, TerminalReader};
pub use output::{indent, indentation, indented, report, report_to, say, section, Indent};
pub use repl::tokenize;
