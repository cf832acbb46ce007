//! Core traits for adsync
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`AdDirectory`]: List and create entities in the remote ad account

pub mod ad_directory;

pub use ad_directory::{
    AdDirectory, AdDirectoryFactory, AdGroupRecord, CampaignRecord, EntityId, EntityStatus,
    KeywordRecord, Page, PageRequest,
};
