//! Command groups of the `reticular` binary
//!
//! | Module | Invoked as | Commands |
//! |--------|------------|----------|
//! | `base` | `reticular <command>` | `status`, `echo` |
//! | `greet` | `reticular greet <command>` | `hello`, `bye` |
//! | `system` | `reticular system <command>` | `whoami`, `reboot` |
//!
//! `_helpers` is private: discovery skips it, so it never becomes a group.

mod base;
mod greet;
mod helpers;
mod system;

use reticular::ModuleCatalog;

pub const APP: &str = "reticular";
pub const PACKAGE: &str = "commands";

/// Catalog holding the `reticular.commands` package
pub fn catalog() -> ModuleCatalog {
    let package = format!("{}.{}", APP, PACKAGE);

    ModuleCatalog::new()
        .module(package.as_str(), "base", base::module)
        .module(package.as_str(), "greet", greet::module)
        .module(package.as_str(), "system", system::module)
        .module(package.as_str(), "_helpers", helpers::module)
}
