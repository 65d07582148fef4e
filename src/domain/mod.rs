//! Declarative building blocks for command groups
//!
//! Contains the argument, command and module declarations plus the values
//! that flow through dispatch, without any discovery or terminal concerns.

mod args;
mod argument;
mod command;
mod handler;
mod module;
mod outcome;

pub use args::{ParsedArgs, Value};
pub use argument::{argument, global_arg, Action, ArgSpec, Nargs, ValueType, RESERVED_DEST};
pub use command::{command, CommandSpec, DetachedCommand};
pub use handler::{
    is_superuser, superuser, superuser_with, Handler, HandlerError, HandlerResult,
    SUPERUSER_REQUIRED,
};
pub use module::{ConfigError, GroupModule};
pub use outcome::{Outcome, USAGE_EXIT_CODE};
