// # Directory Access
//
// Read helpers over the AdDirectory trait plus the in-memory
// implementation.

pub mod memory;
pub mod reader;

pub use memory::{MemoryDirectory, MemoryDirectoryFactory};
pub use reader::{DirectoryReader, find_ad_group, find_campaign, has_keyword_text};
