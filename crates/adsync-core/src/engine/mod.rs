//! Reconciliation engine
//!
//! The SyncEngine is responsible for:
//! - Walking the plan campaign → ad group → keyword, in CSV order
//! - Checking the remote account before every creation
//! - Creating only what is missing, never updating or deleting
//! - Counting what it created
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  SyncPlan   │─── campaigns / ad groups / keywords ───┐
//! └─────────────┘                                        │
//!                                                        ▼
//!                                               ┌──────────────┐
//!                                               │  SyncEngine  │
//!                                               └──────────────┘
//!                                                        │
//!              ┌─────────────────────────────────────────┼──────────────────┐
//!              │                                         │                  │
//!              ▼                                         ▼                  ▼
//!     ┌─────────────────┐                       ┌──────────────┐    ┌─────────────┐
//!     │ DirectoryReader │                       │ AdDirectory  │    │   Events    │
//!     │ (list, resolve) │                       │ (create)     │    │  (notify)   │
//!     └─────────────────┘                       └──────────────┘    └─────────────┘
//! ```
//!
//! ## Listing strategies
//!
//! [`ListingStrategy::Refetch`] lists the relevant level again before every
//! existence check, so each check sees the engine's own earlier creations
//! without any local bookkeeping. It costs one listing round trip per CSV
//! entity, which is fine for CSV-sized inputs.
//!
//! [`ListingStrategy::Cached`] lists each level once and appends the record
//! returned by every successful creation to a local set. Both strategies
//! assume a single sequential writer and leave the account in the same
//! state.
//!
//! ## Failure
//!
//! The first failed remote call aborts the run. Entities created before
//! the failure stay; the next run finds them and carries on.

use crate::config::{EngineConfig, ListingStrategy};
use crate::directory::{DirectoryReader, find_ad_group, find_campaign, has_keyword_text};
use crate::error::{Error, Result};
use crate::loader::SyncPlan;
use crate::model::{AdGroup, Campaign, Keyword, MatchType};
use crate::traits::{AdDirectory, AdGroupRecord, CampaignRecord, EntityId, KeywordRecord};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

/// Events emitted by the SyncEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Run started
    Started {
        campaigns: usize,
        ad_groups: usize,
        keywords: usize,
    },

    /// Campaign created
    CampaignCreated { name: String },

    /// Campaign already existed
    CampaignFound { name: String },

    /// Ad group created
    AdGroupCreated { campaign: String, name: String },

    /// Ad group already existed
    AdGroupFound { campaign: String, name: String },

    /// Keyword created
    KeywordCreated {
        ad_group: String,
        text: String,
        match_type: MatchType,
    },

    /// Keyword text already existed in the ad group
    KeywordFound {
        ad_group: String,
        text: String,
        match_type: MatchType,
    },

    /// Run finished
    Finished { report: SyncReport },
}

/// Counts for one entity kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindReport {
    /// Entities created during the run
    pub created: usize,
    /// Entities described by the CSV
    pub found: usize,
}

/// Outcome of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub campaigns: KindReport,
    pub ad_groups: KindReport,
    pub keywords: KindReport,
}

impl SyncReport {
    fn for_plan(plan: &SyncPlan) -> Self {
        Self {
            campaigns: KindReport {
                created: 0,
                found: plan.campaigns.len(),
            },
            ad_groups: KindReport {
                created: 0,
                found: plan.ad_groups.len(),
            },
            keywords: KindReport {
                created: 0,
                found: plan.keywords.len(),
            },
        }
    }

    /// Total entities created
    pub fn total_created(&self) -> usize {
        self.campaigns.created + self.ad_groups.created + self.keywords.created
    }
}

/// Hierarchical reconciliation engine
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Call [`SyncEngine::run()`] with a loaded plan
/// 3. Read the returned [`SyncReport`]
///
/// `run` holds no state between calls; running the same plan twice
/// creates nothing the second time.
pub struct SyncEngine {
    /// Remote account
    directory: Box<dyn AdDirectory>,

    /// How existence is tracked
    listing: ListingStrategy,

    /// Entries per listing page
    page_size: u32,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<SyncEvent>,
}

impl SyncEngine {
    /// Create a new engine
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        directory: Box<dyn AdDirectory>,
        config: EngineConfig,
    ) -> Result<(Self, mpsc::Receiver<SyncEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let engine = Self {
            directory,
            listing: config.listing,
            page_size: config.page_size,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Reconcile the remote account with the plan
    pub async fn run(&self, plan: &SyncPlan) -> Result<SyncReport> {
        self.emit_event(SyncEvent::Started {
            campaigns: plan.campaigns.len(),
            ad_groups: plan.ad_groups.len(),
            keywords: plan.keywords.len(),
        });
        info!(
            "Reconciling {} campaign(s), {} ad group(s), {} keyword(s) against {} [listing: {:?}]",
            plan.campaigns.len(),
            plan.ad_groups.len(),
            plan.keywords.len(),
            self.directory.directory_name(),
            self.listing
        );

        let mut report = SyncReport::for_plan(plan);
        match self.listing {
            ListingStrategy::Refetch => self.run_refetch(plan, &mut report).await?,
            ListingStrategy::Cached => self.run_cached(plan, &mut report).await?,
        }

        self.emit_event(SyncEvent::Finished { report });
        Ok(report)
    }

    async fn run_refetch(&self, plan: &SyncPlan, report: &mut SyncReport) -> Result<()> {
        let reader = self.reader();
        let mut account_campaigns = reader.list_campaigns().await?;

        for campaign in &plan.campaigns {
            if find_campaign(&account_campaigns, &campaign.name).is_none() {
                self.create_campaign(campaign).await?;
                account_campaigns = reader.list_campaigns().await?;
                report.campaigns.created += 1;
            } else {
                self.campaign_found(campaign);
            }

            let campaign_id = reader
                .resolve_campaign_id(&campaign.name)
                .await?
                .ok_or_else(|| Error::not_found(format!("campaign '{}'", campaign.name)))?;

            for ad_group in plan.ad_groups_of(campaign) {
                let account_ad_groups = reader.list_ad_groups(campaign_id).await?;
                if find_ad_group(&account_ad_groups, &ad_group.name).is_none() {
                    self.create_ad_group(campaign_id, ad_group).await?;
                    report.ad_groups.created += 1;
                } else {
                    self.ad_group_found(ad_group);
                }

                let ad_group_id = reader
                    .resolve_ad_group_id(&ad_group.name, campaign_id)
                    .await?
                    .ok_or_else(|| {
                        Error::not_found(format!(
                            "ad group '{}' in campaign '{}'",
                            ad_group.name, campaign.name
                        ))
                    })?;

                for keyword in plan.keywords_of(ad_group) {
                    let account_keywords = reader.list_keywords(ad_group_id).await?;
                    if has_keyword_text(&account_keywords, &keyword.text) {
                        self.keyword_found(keyword);
                    } else {
                        self.create_keyword(ad_group_id, keyword).await?;
                        report.keywords.created += 1;
                    }
                }
            }
        }

        Ok(())
    }

    async fn run_cached(&self, plan: &SyncPlan, report: &mut SyncReport) -> Result<()> {
        let reader = self.reader();
        let mut account_campaigns = reader.list_campaigns().await?;

        for campaign in &plan.campaigns {
            let (campaign_id, campaign_is_new) =
                match find_campaign(&account_campaigns, &campaign.name) {
                    Some(id) => {
                        self.campaign_found(campaign);
                        (id, false)
                    }
                    None => {
                        let record = self.create_campaign(campaign).await?;
                        report.campaigns.created += 1;
                        let id = record.id;
                        account_campaigns.push(record);
                        (id, true)
                    }
                };

            // A campaign created in this run has no ad groups yet
            let mut account_ad_groups = if campaign_is_new {
                Vec::new()
            } else {
                reader.list_ad_groups(campaign_id).await?
            };

            for ad_group in plan.ad_groups_of(campaign) {
                let (ad_group_id, ad_group_is_new) =
                    match find_ad_group(&account_ad_groups, &ad_group.name) {
                        Some(id) => {
                            self.ad_group_found(ad_group);
                            (id, false)
                        }
                        None => {
                            let record = self.create_ad_group(campaign_id, ad_group).await?;
                            report.ad_groups.created += 1;
                            let id = record.id;
                            account_ad_groups.push(record);
                            (id, true)
                        }
                    };

                let mut account_keywords = if ad_group_is_new {
                    Vec::new()
                } else {
                    reader.list_keywords(ad_group_id).await?
                };

                for keyword in plan.keywords_of(ad_group) {
                    if has_keyword_text(&account_keywords, &keyword.text) {
                        self.keyword_found(keyword);
                    } else {
                        let record = self.create_keyword(ad_group_id, keyword).await?;
                        report.keywords.created += 1;
                        account_keywords.push(record);
                    }
                }
            }
        }

        Ok(())
    }

    fn reader(&self) -> DirectoryReader<'_> {
        DirectoryReader::new(self.directory.as_ref(), self.page_size)
    }

    async fn create_campaign(&self, campaign: &Campaign) -> Result<CampaignRecord> {
        info!("Create '{}' campaign", campaign.name);
        let record = self
            .directory
            .create_campaign(campaign)
            .await
            .map_err(|e| self.creation_error("campaign", &campaign.name, e))?;

        self.emit_event(SyncEvent::CampaignCreated {
            name: campaign.name.clone(),
        });
        Ok(record)
    }

    async fn create_ad_group(
        &self,
        campaign_id: EntityId,
        ad_group: &AdGroup,
    ) -> Result<AdGroupRecord> {
        info!("Create '{}' ads group", ad_group.name);
        let record = self
            .directory
            .create_ad_group(campaign_id, ad_group)
            .await
            .map_err(|e| self.creation_error("ad group", &ad_group.name, e))?;

        self.emit_event(SyncEvent::AdGroupCreated {
            campaign: ad_group.campaign_name.clone(),
            name: ad_group.name.clone(),
        });
        Ok(record)
    }

    async fn create_keyword(
        &self,
        ad_group_id: EntityId,
        keyword: &Keyword,
    ) -> Result<KeywordRecord> {
        info!(
            "Create '{}' keyword [Targeting : {}]",
            keyword.text, keyword.targeting
        );
        let record = self
            .directory
            .create_keyword(ad_group_id, keyword)
            .await
            .map_err(|e| self.creation_error("keyword", &keyword.text, e))?;

        self.emit_event(SyncEvent::KeywordCreated {
            ad_group: keyword.ad_group_name.clone(),
            text: keyword.text.clone(),
            match_type: keyword.targeting,
        });
        Ok(record)
    }

    fn campaign_found(&self, campaign: &Campaign) {
        debug!("Campaign '{}' already exists", campaign.name);
        self.emit_event(SyncEvent::CampaignFound {
            name: campaign.name.clone(),
        });
    }

    fn ad_group_found(&self, ad_group: &AdGroup) {
        debug!("Ad group '{}' already exists", ad_group.name);
        self.emit_event(SyncEvent::AdGroupFound {
            campaign: ad_group.campaign_name.clone(),
            name: ad_group.name.clone(),
        });
    }

    fn keyword_found(&self, keyword: &Keyword) {
        debug!(
            "Keyword '{}' already exists in '{}'",
            keyword.text, keyword.ad_group_name
        );
        self.emit_event(SyncEvent::KeywordFound {
            ad_group: keyword.ad_group_name.clone(),
            text: keyword.text.clone(),
            match_type: keyword.targeting,
        });
    }

    fn creation_error(&self, kind: &str, name: &str, error: Error) -> Error {
        Error::directory(
            self.directory.directory_name(),
            format!("failed to create {} '{}': {}", kind, name, error),
        )
    }

    /// Emit an engine event
    fn emit_event(&self, event: SyncEvent) {
        // Send event, logging warning if channel is full (backpressure)
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(
                    "Event channel full, dropping event. Consider increasing event_channel_capacity."
                );
            }
            // Nobody is listening
            Err(TrySendError::Closed(_)) => {}
        }
    }
}
