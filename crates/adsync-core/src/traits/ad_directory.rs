// # Ad Directory Trait
//
// Defines the interface to the remote advertising account.
//
// ## Implementations
//
// - AdWords over HTTP: `adsync-provider-adwords` crate
// - In-process: `adsync_core::directory::MemoryDirectory`
//
// ## Usage
//
// ```rust,ignore
// use adsync_core::traits::{AdDirectory, PageRequest};
//
// async fn count(directory: &dyn AdDirectory) -> adsync_core::Result<u64> {
//     let page = directory.list_campaigns(PageRequest::first(1000)).await?;
//     Ok(page.total_num_entries)
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{AdGroup, Campaign, Keyword, MatchType};

/// Remote entity identifier
pub type EntityId = i64;

/// Window of a paginated listing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based index of the first entry
    pub start_index: u32,
    /// Maximum number of entries to return
    pub page_size: u32,
}

impl PageRequest {
    /// First page of the given size
    pub fn first(page_size: u32) -> Self {
        Self {
            start_index: 0,
            page_size,
        }
    }

    /// The page following this one
    pub fn next(&self) -> Self {
        Self {
            start_index: self.start_index.saturating_add(self.page_size),
            page_size: self.page_size,
        }
    }
}

/// One page of a listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Entries on this page
    pub entries: Vec<T>,
    /// Number of entries matching the query across all pages
    pub total_num_entries: u64,
}

impl<T> Page<T> {
    /// Slice a full result set into the requested window
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total_num_entries = all.len() as u64;
        let entries = all
            .into_iter()
            .skip(request.start_index as usize)
            .take(request.page_size as usize)
            .collect();
        Self {
            entries,
            total_num_entries,
        }
    }
}

/// Serving status of a remote campaign or ad group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    /// Serving
    Enabled,
    /// Paused by the advertiser
    Paused,
    /// Removed (still listed by the API)
    Removed,
    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

/// A campaign as listed by the remote account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// Remote id
    pub id: EntityId,
    /// Campaign name
    pub name: String,
    /// Serving status
    pub status: EntityStatus,
}

/// An ad group as listed by the remote account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdGroupRecord {
    /// Remote id
    pub id: EntityId,
    /// Ad group name
    pub name: String,
    /// Serving status
    pub status: EntityStatus,
}

/// A keyword criterion as listed by the remote account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Remote criterion id
    pub id: EntityId,
    /// Criterion type, always `KEYWORD` for listed keywords
    pub criteria_type: String,
    /// Match type as stored remotely
    pub match_type: MatchType,
    /// Keyword text as stored remotely
    pub text: String,
}

/// Capability object for the remote advertising account
///
/// Implementations wrap the vendor transport. They perform exactly one
/// remote operation per call and never retry: a failed call is returned
/// to the caller, which aborts the run.
///
/// Listing calls honour the [`PageRequest`] window and report the total
/// number of matching entries so callers can accumulate pages.
/// Creation calls only append; nothing in this interface updates or
/// deletes remote entities.
#[async_trait]
pub trait AdDirectory: Send + Sync {
    /// List campaigns of the account
    async fn list_campaigns(&self, page: PageRequest) -> crate::Result<Page<CampaignRecord>>;

    /// List ad groups of one campaign
    async fn list_ad_groups(
        &self,
        campaign_id: EntityId,
        page: PageRequest,
    ) -> crate::Result<Page<AdGroupRecord>>;

    /// List keyword criteria of one ad group, ascending by text
    async fn list_keywords(
        &self,
        ad_group_id: EntityId,
        page: PageRequest,
    ) -> crate::Result<Page<KeywordRecord>>;

    /// Create a campaign together with its own non-shared budget
    async fn create_campaign(&self, campaign: &Campaign) -> crate::Result<CampaignRecord>;

    /// Create an ad group with a manual CPC bid
    async fn create_ad_group(
        &self,
        campaign_id: EntityId,
        ad_group: &AdGroup,
    ) -> crate::Result<AdGroupRecord>;

    /// Create a biddable keyword criterion
    ///
    /// Implementations send [`Keyword::remote_text`] and
    /// [`Keyword::remote_match_type`].
    async fn create_keyword(
        &self,
        ad_group_id: EntityId,
        keyword: &Keyword,
    ) -> crate::Result<KeywordRecord>;

    /// Directory name (for logging/debugging)
    fn directory_name(&self) -> &'static str;
}

/// Helper trait for constructing directories from configuration
pub trait AdDirectoryFactory: Send + Sync {
    /// Create an AdDirectory instance from configuration
    fn create(
        &self,
        config: &crate::config::DirectoryConfig,
    ) -> crate::Result<Box<dyn AdDirectory>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_slice_reports_total() {
        let page = Page::slice((0..25).collect::<Vec<_>>(), PageRequest {
            start_index: 10,
            page_size: 10,
        });
        assert_eq!(page.entries, (10..20).collect::<Vec<_>>());
        assert_eq!(page.total_num_entries, 25);
    }

    #[test]
    fn next_page_advances_by_page_size() {
        let page = PageRequest::first(1000).next().next();
        assert_eq!(page.start_index, 2000);
        assert_eq!(page.page_size, 1000);
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let status: EntityStatus = serde_json::from_str("\"UNKNOWN_FUTURE_STATUS\"").unwrap();
        assert_eq!(status, EntityStatus::Unknown);
    }
}
