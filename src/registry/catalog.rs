//! Module catalog and discovery
//!
//! Command groups live in packages. A package is registered under its dotted
//! path (`<app>.<package>`) and holds modules keyed by name, each with a
//! loader that produces the module's declarations. Discovery lists the public
//! modules of a package; importing runs a module's loader.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::domain::{ConfigError, GroupModule};

/// Produces a module's declarations when the module is imported
pub type ModuleLoader = Rc<dyn Fn() -> GroupModule>;

/// Table of packages and their command-group modules
#[derive(Clone, Default)]
pub struct ModuleCatalog {
    packages: BTreeMap<String, BTreeMap<String, ModuleLoader>>,
}

impl ModuleCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a package, which may stay empty
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.add_package(package);
        self
    }

    /// Adds a module to a package, declaring the package if needed
    pub fn module<F>(mut self, package: impl Into<String>, name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> GroupModule + 'static,
    {
        self.add_module(package, name, loader);
        self
    }

    pub fn add_package(&mut self, package: impl Into<String>) {
        self.packages.entry(package.into()).or_default();
    }

    /// Adds a module; a later module with the same name replaces the earlier one
    pub fn add_module<F>(&mut self, package: impl Into<String>, name: impl Into<String>, loader: F)
    where
        F: Fn() -> GroupModule + 'static,
    {
        self.packages
            .entry(package.into())
            .or_default()
            .insert(name.into(), Rc::new(loader));
    }

    /// Lists the command-group modules of `<app>.<package>` as dotted paths.
    ///
    /// Modules whose name starts with an underscore are private and skipped.
    /// A package that exists but holds no modules yields an empty list; a
    /// package that does not exist is an error.
    pub fn discover(&self, app: &str, package: &str) -> Result<Vec<String>, ConfigError> {
        let package_path = format!("{}.{}", app, package);

        let modules = self
            .packages
            .get(&package_path)
            .ok_or_else(|| ConfigError::PackageNotFound(package_path.clone()))?;

        let paths: Vec<String> = modules
            .keys()
            .filter(|name| !name.starts_with('_'))
            .map(|name| format!("{}.{}", package_path, name))
            .collect();

        debug!(package = %package_path, modules = paths.len(), "discovered command groups");
        Ok(paths)
    }

    /// Imports the module at a dotted path
    pub fn import(&self, path: &str) -> Result<GroupModule, ConfigError> {
        let loader = self
            .loader(path)
            .ok_or_else(|| ConfigError::ModuleNotFound(path.to_string()))?;

        debug!(module = %path, "importing command group module");
        Ok(loader())
    }

    /// Returns true when a module exists at the dotted path
    pub fn contains(&self, path: &str) -> bool {
        self.loader(path).is_some()
    }

    fn loader(&self, path: &str) -> Option<&ModuleLoader> {
        let (package, name) = path.rsplit_once('.')?;
        self.packages.get(package)?.get(name)
    }
}

impl fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (package, modules) in &self.packages {
            map.entry(package, &modules.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ModuleCatalog {
        ModuleCatalog::new()
            .module("app.commands", "base", GroupModule::new)
            .module("app.commands", "foo", || GroupModule::new().doc("Foo commands"))
            .module("app.commands", "_private", GroupModule::new)
            .package("app.empty")
    }

    #[test]
    fn discover_lists_public_modules() {
        let paths = catalog().discover("app", "commands").unwrap();
        assert_eq!(paths, vec!["app.commands.base", "app.commands.foo"]);
    }

    #[test]
    fn discover_empty_package() {
        let paths = catalog().discover("app", "empty").unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn discover_missing_package() {
        let err = catalog().discover("app", "missing").unwrap_err();
        assert_eq!(err, ConfigError::PackageNotFound("app.missing".into()));
        assert_eq!(err.to_string(), "app.missing package not found");
    }

    #[test]
    fn import_runs_loader() {
        let module = catalog().import("app.commands.foo").unwrap();
        assert_eq!(module.documentation(), Some("Foo commands"));
    }

    #[test]
    fn import_private_module() {
        assert!(catalog().import("app.commands._private").is_ok());
    }

    #[test]
    fn import_missing_module() {
        let err = catalog().import("app.commands.nope").unwrap_err();
        assert_eq!(err, ConfigError::ModuleNotFound("app.commands.nope".into()));
        assert!(!catalog().contains("nodots"));
    }
}
