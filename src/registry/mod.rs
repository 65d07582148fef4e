//! # Command Group Registry
//!
//! Discovery and lazy construction of command groups.
//!
//! ## Overview
//!
//! Command groups are declared in packages of modules. The application
//! registers its packages in a [`ModuleCatalog`]; at startup the CLI lists the
//! public modules of its package and creates one [`CommandGroup`] per module
//! path in a [`GroupRegistry`].
//!
//! ## Sharing
//!
//! A registry is an explicit handle. Every CLI built from clones of the same
//! handle shares one `CommandGroup` per path, so each group's parser is built
//! at most once:
//!
//! ```text
//! GroupRegistry ──┬── app.commands.base ── CommandGroup (root parser)
//!                 ├── app.commands.foo  ── CommandGroup
//!                 └── app.commands.bar  ── CommandGroup
//! ```
//!
//! ## Key Types
//!
//! - [`ModuleCatalog`] - Packages, modules and discovery
//! - [`GroupRegistry`] - Path to group table
//! - [`CommandGroup`] / [`LoadedGroup`] - One group and its parsers

mod catalog;
mod group;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

pub use catalog::{ModuleCatalog, ModuleLoader};
pub use group::{CommandGroup, GroupRole, LoadedGroup};

/// Shared table mapping module paths to their command groups
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: Rc<RefCell<BTreeMap<String, Rc<CommandGroup>>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the group for `path`, creating an unloaded one if needed
    pub fn get_or_create(&self, path: &str) -> Rc<CommandGroup> {
        let mut groups = self.groups.borrow_mut();
        let group = groups.entry(path.to_string()).or_insert_with(|| {
            debug!(group = %path, "registering new command group");
            Rc::new(CommandGroup::new(path))
        });
        Rc::clone(group)
    }

    /// Looks up a group without creating it
    pub fn get(&self, path: &str) -> Option<Rc<CommandGroup>> {
        self.groups.borrow().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.groups.borrow().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.groups.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.borrow().is_empty()
    }

    /// Registered paths in sorted order
    pub fn paths(&self) -> Vec<String> {
        self.groups.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_reuses_group() {
        let registry = GroupRegistry::new();
        let a = registry.get_or_create("app.commands.foo");
        let b = registry.get_or_create("app.commands.foo");

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let registry = GroupRegistry::new();
        let other = registry.clone();
        let a = registry.get_or_create("app.commands.foo");

        let b = other.get("app.commands.foo").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn get_does_not_insert() {
        let registry = GroupRegistry::new();
        assert!(registry.get("app.commands.foo").is_none());
        assert!(registry.is_empty());
        assert!(!registry.contains("app.commands.foo"));
    }

    #[test]
    fn paths_are_sorted() {
        let registry = GroupRegistry::new();
        registry.get_or_create("app.commands.zeta");
        registry.get_or_create("app.commands.alpha");
        assert_eq!(
            registry.paths(),
            vec!["app.commands.alpha", "app.commands.zeta"]
        );
    }
}
