//! Test doubles and common utilities for contract tests
//!
//! The doubles wrap a [`MemoryDirectory`] and record how the engine talks
//! to it, so tests can assert on call counts and creation order without a
//! real account.

#![allow(dead_code)]

use adsync_core::directory::MemoryDirectory;
use adsync_core::error::{Error, Result};
use adsync_core::model::{AdGroup, Campaign, Keyword};
use adsync_core::traits::{
    AdDirectory, AdGroupRecord, CampaignRecord, EntityId, KeywordRecord, Page, PageRequest,
};
use std::collections::HashSet;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A directory that records every call made to it
#[derive(Clone)]
pub struct RecordingDirectory {
    /// Backing account
    inner: MemoryDirectory,
    /// Call counter for list_*()
    list_call_count: Arc<AtomicUsize>,
    /// Call counter for create_*()
    create_call_count: Arc<AtomicUsize>,
    /// Successful creations as "kind:name", in call order
    created: Arc<Mutex<Vec<String>>>,
    /// Name whose creation fails
    fail_on: Option<String>,
    /// Entity kind whose new records never show up in listings
    hide_created: Option<&'static str>,
    /// Ids of records created but left out of listings
    hidden: Arc<Mutex<HashSet<EntityId>>>,
}

impl RecordingDirectory {
    pub fn new() -> Self {
        Self::over(MemoryDirectory::new())
    }

    /// Record calls against an existing account
    pub fn over(inner: MemoryDirectory) -> Self {
        Self {
            inner,
            list_call_count: Arc::new(AtomicUsize::new(0)),
            create_call_count: Arc::new(AtomicUsize::new(0)),
            created: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
            hide_created: None,
            hidden: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Fail the creation of any entity with this name or text
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.fail_on = Some(name.into());
        self
    }

    /// Accept creations of this kind ("campaign" or "ad_group") but leave
    /// the new records out of every listing
    pub fn hiding_created(mut self, kind: &'static str) -> Self {
        self.hide_created = Some(kind);
        self
    }

    /// The backing account
    pub fn account(&self) -> &MemoryDirectory {
        &self.inner
    }

    /// Get the number of listing calls
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of creation calls, failed ones included
    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    /// Get the successful creations in call order
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    fn before_create(&self, name: &str) -> Result<()> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.as_deref() == Some(name) {
            return Err(Error::http(format!("injected failure for '{}'", name)));
        }
        Ok(())
    }

    fn hide_if_needed(&self, kind: &str, id: EntityId) {
        if self.hide_created == Some(kind) {
            self.hidden.lock().unwrap().insert(id);
        }
    }

    fn visible<T>(&self, page: Page<T>, id_of: impl Fn(&T) -> EntityId) -> Page<T> {
        let hidden = self.hidden.lock().unwrap();
        let before = page.entries.len();
        let entries: Vec<T> = page
            .entries
            .into_iter()
            .filter(|entry| !hidden.contains(&id_of(entry)))
            .collect();
        let removed = (before - entries.len()) as u64;
        Page {
            entries,
            total_num_entries: page.total_num_entries.saturating_sub(removed),
        }
    }

    fn record(&self, kind: &str, name: &str) {
        self.created
            .lock()
            .unwrap()
            .push(format!("{}:{}", kind, name));
    }
}

#[async_trait::async_trait]
impl AdDirectory for RecordingDirectory {
    async fn list_campaigns(&self, page: PageRequest) -> Result<Page<CampaignRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        let page = self.inner.list_campaigns(page).await?;
        Ok(self.visible(page, |campaign| campaign.id))
    }

    async fn list_ad_groups(
        &self,
        campaign_id: EntityId,
        page: PageRequest,
    ) -> Result<Page<AdGroupRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        let page = self.inner.list_ad_groups(campaign_id, page).await?;
        Ok(self.visible(page, |ad_group| ad_group.id))
    }

    async fn list_keywords(
        &self,
        ad_group_id: EntityId,
        page: PageRequest,
    ) -> Result<Page<KeywordRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.list_keywords(ad_group_id, page).await
    }

    async fn create_campaign(&self, campaign: &Campaign) -> Result<CampaignRecord> {
        self.before_create(&campaign.name)?;
        let record = self.inner.create_campaign(campaign).await?;
        self.hide_if_needed("campaign", record.id);
        self.record("campaign", &campaign.name);
        Ok(record)
    }

    async fn create_ad_group(
        &self,
        campaign_id: EntityId,
        ad_group: &AdGroup,
    ) -> Result<AdGroupRecord> {
        self.before_create(&ad_group.name)?;
        let record = self.inner.create_ad_group(campaign_id, ad_group).await?;
        self.hide_if_needed("ad_group", record.id);
        self.record("ad_group", &ad_group.name);
        Ok(record)
    }

    async fn create_keyword(
        &self,
        ad_group_id: EntityId,
        keyword: &Keyword,
    ) -> Result<KeywordRecord> {
        self.before_create(&keyword.text)?;
        let record = self.inner.create_keyword(ad_group_id, keyword).await?;
        self.record("keyword", &keyword.text);
        Ok(record)
    }

    fn directory_name(&self) -> &'static str {
        "recording"
    }
}

/// Write a CSV fixture to a temporary `.csv` file
pub fn csv_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(contents.as_bytes()).expect("write temp csv");
    file
}

/// Semicolon-delimited export using the default French headings
pub const SAMPLE_CSV: &str = "\
Campagne;Groupe;Ciblage;Expression
Chaussures;Running;Exact;chaussures running
Chaussures;Running;Large modifié;chaussures trail
Chaussures;Ville;Expression;chaussures cuir
Sacs;Voyage;Large;sac de voyage
";
