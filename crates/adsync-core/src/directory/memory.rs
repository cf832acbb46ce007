// # Memory Directory
//
// In-memory implementation of AdDirectory.
//
// ## Purpose
//
// Stands in for a remote account that starts empty. Useful for tests and
// for rehearsing an import without touching a real account.
//
// ## Behaviour
//
// - Ids are assigned sequentially starting at 1
// - Listing honours the page window and reports the total entry count
// - Keywords are listed ascending by text
// - Duplicate names are rejected the way the remote API rejects them

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::model::{AdGroup, Campaign, Keyword};
use crate::traits::ad_directory::{
    AdDirectory, AdDirectoryFactory, AdGroupRecord, CampaignRecord, EntityId, EntityStatus,
    KeywordRecord, Page, PageRequest,
};

const DIRECTORY_NAME: &str = "memory";

#[derive(Debug, Default)]
struct Account {
    next_id: EntityId,
    campaigns: Vec<CampaignRecord>,
    ad_groups: Vec<(EntityId, AdGroupRecord)>,
    keywords: Vec<(EntityId, KeywordRecord)>,
}

impl Account {
    fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory ad account
///
/// Clones share the same account.
///
/// # Example
///
/// ```rust,no_run
/// use adsync_core::directory::MemoryDirectory;
/// use adsync_core::model::Campaign;
/// use adsync_core::traits::{AdDirectory, PageRequest};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let directory = MemoryDirectory::new();
///     directory.create_campaign(&Campaign::new("Shoes")).await?;
///
///     let page = directory.list_campaigns(PageRequest::first(1000)).await?;
///     assert_eq!(page.total_num_entries, 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    inner: Arc<RwLock<Account>>,
}

impl MemoryDirectory {
    /// Create an empty account
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of campaigns in the account
    pub async fn campaign_count(&self) -> usize {
        self.inner.read().await.campaigns.len()
    }

    /// Number of ad groups in the account
    pub async fn ad_group_count(&self) -> usize {
        self.inner.read().await.ad_groups.len()
    }

    /// Number of keywords in the account
    pub async fn keyword_count(&self) -> usize {
        self.inner.read().await.keywords.len()
    }
}

#[async_trait]
impl AdDirectory for MemoryDirectory {
    async fn list_campaigns(&self, page: PageRequest) -> Result<Page<CampaignRecord>, Error> {
        let guard = self.inner.read().await;
        Ok(Page::slice(guard.campaigns.clone(), page))
    }

    async fn list_ad_groups(
        &self,
        campaign_id: EntityId,
        page: PageRequest,
    ) -> Result<Page<AdGroupRecord>, Error> {
        let guard = self.inner.read().await;
        let ad_groups = guard
            .ad_groups
            .iter()
            .filter(|(parent, _)| *parent == campaign_id)
            .map(|(_, record)| record.clone())
            .collect();
        Ok(Page::slice(ad_groups, page))
    }

    async fn list_keywords(
        &self,
        ad_group_id: EntityId,
        page: PageRequest,
    ) -> Result<Page<KeywordRecord>, Error> {
        let guard = self.inner.read().await;
        let mut keywords: Vec<KeywordRecord> = guard
            .keywords
            .iter()
            .filter(|(parent, _)| *parent == ad_group_id)
            .map(|(_, record)| record.clone())
            .collect();
        keywords.sort_by(|a, b| a.text.cmp(&b.text));
        Ok(Page::slice(keywords, page))
    }

    async fn create_campaign(&self, campaign: &Campaign) -> Result<CampaignRecord, Error> {
        let mut guard = self.inner.write().await;
        if guard.campaigns.iter().any(|c| c.name == campaign.name) {
            return Err(Error::directory(
                DIRECTORY_NAME,
                format!("DUPLICATE_CAMPAIGN_NAME: {}", campaign.name),
            ));
        }

        let record = CampaignRecord {
            id: guard.allocate_id(),
            name: campaign.name.clone(),
            status: EntityStatus::Enabled,
        };
        guard.campaigns.push(record.clone());
        Ok(record)
    }

    async fn create_ad_group(
        &self,
        campaign_id: EntityId,
        ad_group: &AdGroup,
    ) -> Result<AdGroupRecord, Error> {
        let mut guard = self.inner.write().await;
        if !guard.campaigns.iter().any(|c| c.id == campaign_id) {
            return Err(Error::not_found(format!("campaign id {}", campaign_id)));
        }
        if guard
            .ad_groups
            .iter()
            .any(|(parent, g)| *parent == campaign_id && g.name == ad_group.name)
        {
            return Err(Error::directory(
                DIRECTORY_NAME,
                format!("DUPLICATE_ADGROUP_NAME: {}", ad_group.name),
            ));
        }

        let record = AdGroupRecord {
            id: guard.allocate_id(),
            name: ad_group.name.clone(),
            status: EntityStatus::Enabled,
        };
        guard.ad_groups.push((campaign_id, record.clone()));
        Ok(record)
    }

    async fn create_keyword(
        &self,
        ad_group_id: EntityId,
        keyword: &Keyword,
    ) -> Result<KeywordRecord, Error> {
        let mut guard = self.inner.write().await;
        if !guard.ad_groups.iter().any(|(_, g)| g.id == ad_group_id) {
            return Err(Error::not_found(format!("ad group id {}", ad_group_id)));
        }

        let text = keyword.remote_text();
        let match_type = keyword.remote_match_type();
        if guard.keywords.iter().any(|(parent, k)| {
            *parent == ad_group_id && k.text == text && k.match_type == match_type
        }) {
            return Err(Error::directory(
                DIRECTORY_NAME,
                format!("CRITERION_ALREADY_EXISTS: {}", text),
            ));
        }

        let record = KeywordRecord {
            id: guard.allocate_id(),
            criteria_type: "KEYWORD".to_string(),
            match_type,
            text,
        };
        guard.keywords.push((ad_group_id, record.clone()));
        Ok(record)
    }

    fn directory_name(&self) -> &'static str {
        DIRECTORY_NAME
    }
}

/// Factory for memory directories
pub struct MemoryDirectoryFactory;

impl AdDirectoryFactory for MemoryDirectoryFactory {
    fn create(
        &self,
        _config: &crate::config::DirectoryConfig,
    ) -> Result<Box<dyn AdDirectory>, Error> {
        Ok(Box::new(MemoryDirectory::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatchType;

    #[tokio::test]
    async fn test_memory_directory_basic() {
        let directory = MemoryDirectory::new();
        assert_eq!(directory.campaign_count().await, 0);

        let campaign = directory.create_campaign(&Campaign::new("Shoes")).await.unwrap();
        let ad_group = directory
            .create_ad_group(campaign.id, &AdGroup::new("Running", "Shoes"))
            .await
            .unwrap();
        directory
            .create_keyword(ad_group.id, &Keyword::new("red shoes", MatchType::Exact, "Running"))
            .await
            .unwrap();

        assert_eq!(directory.campaign_count().await, 1);
        assert_eq!(directory.ad_group_count().await, 1);
        assert_eq!(directory.keyword_count().await, 1);
        assert_ne!(campaign.id, ad_group.id);
    }

    #[tokio::test]
    async fn test_memory_directory_rejects_duplicates() {
        let directory = MemoryDirectory::new();
        directory.create_campaign(&Campaign::new("Shoes")).await.unwrap();
        let err = directory.create_campaign(&Campaign::new("Shoes")).await.unwrap_err();
        assert!(err.to_string().contains("DUPLICATE_CAMPAIGN_NAME"));
    }

    #[tokio::test]
    async fn test_memory_directory_unknown_parent() {
        let directory = MemoryDirectory::new();
        let err = directory
            .create_ad_group(42, &AdGroup::new("Running", "Shoes"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_memory_directory_stores_bpe_as_broad() {
        let directory = MemoryDirectory::new();
        let campaign = directory.create_campaign(&Campaign::new("Shoes")).await.unwrap();
        let ad_group = directory
            .create_ad_group(campaign.id, &AdGroup::new("Running", "Shoes"))
            .await
            .unwrap();
        let record = directory
            .create_keyword(ad_group.id, &Keyword::new("red shoes", MatchType::Bpe, "Running"))
            .await
            .unwrap();

        assert_eq!(record.text, "+red +shoes");
        assert_eq!(record.match_type, MatchType::Broad);
    }

    #[tokio::test]
    async fn test_memory_directory_ad_groups_scoped_to_campaign() {
        let directory = MemoryDirectory::new();
        let a = directory.create_campaign(&Campaign::new("A")).await.unwrap();
        let b = directory.create_campaign(&Campaign::new("B")).await.unwrap();
        directory
            .create_ad_group(a.id, &AdGroup::new("g", "A"))
            .await
            .unwrap();

        let page = directory
            .list_ad_groups(b.id, PageRequest::first(1000))
            .await
            .unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.total_num_entries, 0);
    }
}
