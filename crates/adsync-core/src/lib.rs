// # adsync-core
//
// Core library for importing a CSV ad hierarchy into a remote ad account.
//
// ## Architecture Overview
//
// - **loader**: Reads campaigns, ad groups and keywords from one CSV file
// - **sanitize**: Strips characters the remote API refuses
// - **AdDirectory**: Trait for listing and creating entities in an account
// - **DirectoryReader**: Paginated listing and name → id resolution
// - **SyncEngine**: Creates what is missing, top-down, never touching
//   what already exists
// - **DirectoryRegistry**: Plugin-based registry of directory factories
//
// ## Design Principles
//
// 1. **Additive**: Runs only create; nothing is updated or removed
// 2. **Idempotent**: Existence is checked against the account before each
//    creation, so a second run creates nothing
// 3. **Library-First**: The binary only parses arguments and prints

pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod registry;
pub mod sanitize;
pub mod traits;

// Re-export core types for convenience
pub use config::{
    CustomerId, Delimiter, DirectoryConfig, EngineConfig, HeadingMap, InputConfig,
    ListingStrategy, MappingFile, SyncConfig, TargetingMap,
};
pub use directory::{DirectoryReader, MemoryDirectory};
pub use engine::{KindReport, SyncEngine, SyncEvent, SyncReport};
pub use error::{Error, Result};
pub use loader::SyncPlan;
pub use model::{AdGroup, Campaign, Keyword, MatchType};
pub use registry::DirectoryRegistry;
pub use traits::{AdDirectory, AdDirectoryFactory};
