//! Plugin-based directory registry
//!
//! The registry lets ad directories be registered at runtime instead of
//! being selected through a hardcoded match in the binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use adsync_core::registry::DirectoryRegistry;
//! use adsync_core::config::DirectoryConfig;
//!
//! let registry = DirectoryRegistry::with_builtin();
//! adsync_provider_adwords::register(&registry);
//!
//! let directory = registry.create_directory(&DirectoryConfig::Memory)?;
//! ```
//!
//! ## Registration
//!
//! Directory crates expose a `register` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &DirectoryRegistry) {
//!     registry.register_directory("adwords", Box::new(AdwordsDirectoryFactory));
//! }
//! ```

use crate::config::DirectoryConfig;
use crate::directory::MemoryDirectoryFactory;
use crate::error::{Error, Result};
use crate::traits::{AdDirectory, AdDirectoryFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Directory registry keyed by directory type name
///
/// Interior mutability through RwLock allows concurrent reads and
/// exclusive writes.
#[derive(Default)]
pub struct DirectoryRegistry {
    directories: RwLock<HashMap<String, Box<dyn AdDirectoryFactory>>>,
}

impl DirectoryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the in-process `memory` directory registered
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_directory("memory", Box::new(MemoryDirectoryFactory));
        registry
    }

    /// Register a directory factory
    ///
    /// # Parameters
    ///
    /// - `name`: Directory type name (e.g., "adwords", "memory")
    /// - `factory`: Factory object for creating directory instances
    ///
    /// Registering a name twice replaces the earlier factory.
    pub fn register_directory(
        &self,
        name: impl Into<String>,
        factory: Box<dyn AdDirectoryFactory>,
    ) {
        let mut directories = self
            .directories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        directories.insert(name.into(), factory);
    }

    /// Create a directory from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn AdDirectory>)`: Created directory instance
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_directory(&self, config: &DirectoryConfig) -> Result<Box<dyn AdDirectory>> {
        let directory_type = config.type_name();
        let directories = self
            .directories
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = directories.get(directory_type).ok_or_else(|| {
            Error::config(format!("Unknown directory type: {}", directory_type))
        })?;

        factory.create(config)
    }

    /// List all registered directory types
    pub fn list_directories(&self) -> Vec<String> {
        let directories = self
            .directories
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = directories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a directory type is registered
    pub fn has_directory(&self, name: &str) -> bool {
        self.directories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingFactory;

    impl AdDirectoryFactory for FailingFactory {
        fn create(&self, _config: &DirectoryConfig) -> Result<Box<dyn AdDirectory>> {
            Err(Error::not_found("failing directory not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = DirectoryRegistry::new();
        assert!(!registry.has_directory("failing"));

        registry.register_directory("failing", Box::new(FailingFactory));

        assert!(registry.has_directory("failing"));
        assert_eq!(registry.list_directories(), vec!["failing".to_string()]);
    }

    #[test]
    fn test_builtin_memory_directory() {
        let registry = DirectoryRegistry::with_builtin();
        let directory = registry.create_directory(&DirectoryConfig::Memory).unwrap();
        assert_eq!(directory.directory_name(), "memory");
    }

    #[test]
    fn test_custom_directory_uses_factory_name() {
        let registry = DirectoryRegistry::new();
        registry.register_directory("failing", Box::new(FailingFactory));

        let config = DirectoryConfig::Custom {
            factory: "failing".to_string(),
            config: serde_json::json!({}),
        };
        assert!(matches!(
            registry.create_directory(&config),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_directory_is_config_error() {
        let registry = DirectoryRegistry::new();
        let err = registry
            .create_directory(&DirectoryConfig::Memory)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("memory"));
    }
}
