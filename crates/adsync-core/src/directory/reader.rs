//! Paginated reads over an [`AdDirectory`]
//!
//! The reader turns the page-at-a-time listing calls into complete lists
//! and adds name → id resolution on top of them.

use std::future::Future;

use tracing::debug;

use crate::error::Result;
use crate::model::without_broad_modifiers;
use crate::traits::{
    AdDirectory, AdGroupRecord, CampaignRecord, EntityId, KeywordRecord, Page, PageRequest,
};

/// Read-side view of a remote account
pub struct DirectoryReader<'a> {
    directory: &'a dyn AdDirectory,
    page_size: u32,
}

impl<'a> DirectoryReader<'a> {
    /// Create a reader requesting `page_size` entries per call
    pub fn new(directory: &'a dyn AdDirectory, page_size: u32) -> Self {
        Self {
            directory,
            page_size: page_size.max(1),
        }
    }

    /// All campaigns of the account
    pub async fn list_campaigns(&self) -> Result<Vec<CampaignRecord>> {
        self.collect_pages("campaigns", |page| self.directory.list_campaigns(page))
            .await
    }

    /// All ad groups of a campaign
    pub async fn list_ad_groups(&self, campaign_id: EntityId) -> Result<Vec<AdGroupRecord>> {
        self.collect_pages("ad groups", |page| {
            self.directory.list_ad_groups(campaign_id, page)
        })
        .await
    }

    /// All keyword criteria of an ad group, ascending by text
    pub async fn list_keywords(&self, ad_group_id: EntityId) -> Result<Vec<KeywordRecord>> {
        let mut keywords = self
            .collect_pages("keywords", |page| {
                self.directory.list_keywords(ad_group_id, page)
            })
            .await?;

        keywords.retain(|keyword| keyword.criteria_type == "KEYWORD");
        // Directories sort server-side; a stable sort keeps their order on ties
        keywords.sort_by(|a, b| a.text.cmp(&b.text));
        Ok(keywords)
    }

    /// Id of the first campaign with this exact name
    pub async fn resolve_campaign_id(&self, name: &str) -> Result<Option<EntityId>> {
        let campaigns = self.list_campaigns().await?;
        Ok(find_campaign(&campaigns, name))
    }

    /// Id of the first ad group with this exact name within a campaign
    pub async fn resolve_ad_group_id(
        &self,
        name: &str,
        campaign_id: EntityId,
    ) -> Result<Option<EntityId>> {
        let ad_groups = self.list_ad_groups(campaign_id).await?;
        Ok(find_ad_group(&ad_groups, name))
    }

    async fn collect_pages<T, F, Fut>(&self, what: &str, mut fetch: F) -> Result<Vec<T>>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        let mut request = PageRequest::first(self.page_size);
        let mut all = Vec::new();

        loop {
            let page = fetch(request).await?;
            let received = page.entries.len();
            debug!(
                "Listed {} {} at offset {} (total {})",
                received, what, request.start_index, page.total_num_entries
            );
            all.extend(page.entries);

            let next = request.next();
            if received < self.page_size as usize
                || u64::from(next.start_index) >= page.total_num_entries
            {
                break;
            }
            request = next;
        }

        Ok(all)
    }
}

/// First campaign id with this exact name
pub fn find_campaign(campaigns: &[CampaignRecord], name: &str) -> Option<EntityId> {
    campaigns
        .iter()
        .find(|campaign| campaign.name == name)
        .map(|campaign| campaign.id)
}

/// First ad group id with this exact name
pub fn find_ad_group(ad_groups: &[AdGroupRecord], name: &str) -> Option<EntityId> {
    ad_groups
        .iter()
        .find(|ad_group| ad_group.name == name)
        .map(|ad_group| ad_group.id)
}

/// Whether a keyword with this text is listed, whatever its match type
///
/// Broad-modifier prefixes are ignored on both sides, so `+red +shoes`
/// and `red shoes` name the same keyword.
pub fn has_keyword_text(keywords: &[KeywordRecord], text: &str) -> bool {
    let wanted = without_broad_modifiers(text);
    keywords
        .iter()
        .any(|keyword| without_broad_modifiers(&keyword.text) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;
    use crate::model::{AdGroup, Campaign, Keyword, MatchType};

    #[tokio::test]
    async fn accumulates_every_page() {
        let directory = MemoryDirectory::new();
        for i in 0..7 {
            directory
                .create_campaign(&Campaign::new(format!("c{}", i)))
                .await
                .unwrap();
        }

        let reader = DirectoryReader::new(&directory, 3);
        let campaigns = reader.list_campaigns().await.unwrap();
        assert_eq!(campaigns.len(), 7);
        assert_eq!(campaigns[6].name, "c6");
    }

    #[tokio::test]
    async fn exact_page_multiple_stops_on_total() {
        let directory = MemoryDirectory::new();
        for i in 0..4 {
            directory
                .create_campaign(&Campaign::new(format!("c{}", i)))
                .await
                .unwrap();
        }

        let reader = DirectoryReader::new(&directory, 2);
        assert_eq!(reader.list_campaigns().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn keywords_are_sorted_by_text() {
        let directory = MemoryDirectory::new();
        let campaign = directory.create_campaign(&Campaign::new("c")).await.unwrap();
        let ad_group = directory
            .create_ad_group(campaign.id, &AdGroup::new("g", "c"))
            .await
            .unwrap();
        for text in ["zebra", "apple", "mango"] {
            directory
                .create_keyword(ad_group.id, &Keyword::new(text, MatchType::Exact, "g"))
                .await
                .unwrap();
        }

        let reader = DirectoryReader::new(&directory, 1000);
        let texts: Vec<_> = reader
            .list_keywords(ad_group.id)
            .await
            .unwrap()
            .into_iter()
            .map(|k| k.text)
            .collect();
        assert_eq!(texts, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn keyword_text_ignores_broad_modifiers() {
        let listed = vec![KeywordRecord {
            id: 1,
            criteria_type: "KEYWORD".to_string(),
            match_type: MatchType::Broad,
            text: "+red +shoes".to_string(),
        }];
        assert!(has_keyword_text(&listed, "red shoes"));
        assert!(has_keyword_text(&listed, "+red +shoes"));
        assert!(!has_keyword_text(&listed, "red"));
    }

    #[tokio::test]
    async fn resolves_names_to_ids() {
        let directory = MemoryDirectory::new();
        let campaign = directory.create_campaign(&Campaign::new("Shoes")).await.unwrap();
        let ad_group = directory
            .create_ad_group(campaign.id, &AdGroup::new("Running", "Shoes"))
            .await
            .unwrap();

        let reader = DirectoryReader::new(&directory, 1000);
        assert_eq!(reader.resolve_campaign_id("Shoes").await.unwrap(), Some(campaign.id));
        assert_eq!(reader.resolve_campaign_id("shoes").await.unwrap(), None);
        assert_eq!(
            reader.resolve_ad_group_id("Running", campaign.id).await.unwrap(),
            Some(ad_group.id)
        );
        assert_eq!(reader.resolve_ad_group_id("Trail", campaign.id).await.unwrap(), None);
    }
}
