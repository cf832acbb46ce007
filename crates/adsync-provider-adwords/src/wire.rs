//! AdWords v201809 JSON shapes
//!
//! Request bodies are built with `serde_json::json!`, responses are parsed
//! into the small structs below. The API reports ids and counts either as
//! JSON numbers or as decimal strings, so both are accepted.

use adsync_core::model::{AdGroup, Campaign, Keyword, MatchType};
use adsync_core::traits::{
    AdGroupRecord, CampaignRecord, EntityId, EntityStatus, KeywordRecord, Page, PageRequest,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

/// API version segment of every service path
pub const API_VERSION: &str = "v201809";

/// Days between campaign creation and its end date
pub const CAMPAIGN_LIFETIME_DAYS: i64 = 365;

/// Remote services used by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Budget,
    Campaign,
    AdGroup,
    AdGroupCriterion,
}

impl Service {
    /// Service name as it appears in the URL
    pub fn name(self) -> &'static str {
        match self {
            Service::Budget => "BudgetService",
            Service::Campaign => "CampaignService",
            Service::AdGroup => "AdGroupService",
            Service::AdGroupCriterion => "AdGroupCriterionService",
        }
    }
}

fn paging(page: PageRequest) -> Value {
    json!({
        "startIndex": page.start_index.to_string(),
        "numberResults": page.page_size.to_string(),
    })
}

fn equals(field: &str, value: impl Into<Value>) -> Value {
    json!({ "field": field, "operator": "EQUALS", "values": [value.into()] })
}

/// Selector listing every campaign of the account
pub fn campaign_selector(page: PageRequest) -> Value {
    json!({
        "selector": {
            "fields": ["Id", "Name", "Status"],
            "paging": paging(page),
        }
    })
}

/// Selector listing the ad groups of one campaign
pub fn ad_group_selector(campaign_id: EntityId, page: PageRequest) -> Value {
    json!({
        "selector": {
            "fields": ["Id", "Name", "Status"],
            "predicates": [equals("CampaignId", campaign_id.to_string())],
            "paging": paging(page),
        }
    })
}

/// Selector listing the keyword criteria of one ad group, by text
pub fn keyword_selector(ad_group_id: EntityId, page: PageRequest) -> Value {
    json!({
        "selector": {
            "fields": ["Id", "CriteriaType", "KeywordMatchType", "KeywordText"],
            "predicates": [
                equals("AdGroupId", ad_group_id.to_string()),
                equals("CriteriaType", "KEYWORD"),
            ],
            "paging": paging(page),
            "ordering": [{ "field": "KeywordText", "sortOrder": "ASCENDING" }],
        }
    })
}

fn add(operand: Value) -> Value {
    json!({ "operations": [{ "operator": "ADD", "operand": operand }] })
}

/// Budget reserved to a single campaign
pub fn budget_operation(campaign: &Campaign) -> Value {
    add(json!({
        "name": campaign.name,
        "amount": { "microAmount": campaign.budget },
        "deliveryMethod": "STANDARD",
        "isExplicitlyShared": false,
    }))
}

/// Search campaign with manual CPC bidding
pub fn campaign_operation(campaign: &Campaign, budget_id: EntityId, today: NaiveDate) -> Value {
    let end_date = today + chrono::Duration::days(CAMPAIGN_LIFETIME_DAYS);

    add(json!({
        "name": campaign.name,
        "status": "ENABLED",
        "advertisingChannelType": "SEARCH",
        "biddingStrategyConfiguration": { "biddingStrategyType": "MANUAL_CPC" },
        "endDate": end_date.format("%Y%m%d").to_string(),
        "budget": { "budgetId": budget_id },
        "networkSetting": {
            "targetGoogleSearch": true,
            "targetSearchNetwork": true,
            "targetContentNetwork": false,
            "targetPartnerSearchNetwork": false,
        },
    }))
}

/// Ad group with a CPC bid
pub fn ad_group_operation(campaign_id: EntityId, ad_group: &AdGroup) -> Value {
    add(json!({
        "campaignId": campaign_id,
        "name": ad_group.name,
        "status": "ENABLED",
        "biddingStrategyConfiguration": {
            "bids": [{
                "xsi_type": "CpcBid",
                "bid": { "microAmount": ad_group.bid_amount },
            }]
        },
        "settings": [{
            "xsi_type": "TargetingSetting",
            "details": [
                {
                    "xsi_type": "TargetingSettingDetail",
                    "criterionTypeGroup": "PLACEMENT",
                    "targetAll": false
                },
                {
                    "xsi_type": "TargetingSettingDetail",
                    "criterionTypeGroup": "VERTICAL",
                    "targetAll": true
                },
            ]
        }],
    }))
}

/// Biddable keyword criterion, in its remote form
pub fn keyword_operation(ad_group_id: EntityId, keyword: &Keyword) -> Value {
    add(json!({
        "xsi_type": "BiddableAdGroupCriterion",
        "adGroupId": ad_group_id,
        "criterion": {
            "xsi_type": "Keyword",
            "matchType": keyword.remote_match_type().as_str(),
            "text": keyword.remote_text(),
        },
    }))
}

/// Response of a `get` call
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse<T> {
    #[serde(deserialize_with = "number_or_string")]
    pub total_num_entries: u64,
    #[serde(default = "Vec::new")]
    pub entries: Vec<T>,
}

impl<T> GetResponse<T> {
    /// Convert entries into directory records
    pub fn into_page<R>(self, convert: impl FnMut(T) -> R) -> Page<R> {
        Page {
            entries: self.entries.into_iter().map(convert).collect(),
            total_num_entries: self.total_num_entries,
        }
    }
}

/// Response of a `mutate` call
#[derive(Debug, Deserialize)]
pub struct MutateResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    #[serde(deserialize_with = "number_or_string")]
    pub budget_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct NamedEntry {
    #[serde(deserialize_with = "number_or_string")]
    pub id: i64,
    pub name: String,
    #[serde(default = "unknown_status")]
    pub status: EntityStatus,
}

impl From<NamedEntry> for CampaignRecord {
    fn from(entry: NamedEntry) -> Self {
        CampaignRecord {
            id: entry.id,
            name: entry.name,
            status: entry.status,
        }
    }
}

impl From<NamedEntry> for AdGroupRecord {
    fn from(entry: NamedEntry) -> Self {
        AdGroupRecord {
            id: entry.id,
            name: entry.name,
            status: entry.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CriterionEntry {
    pub criterion: KeywordCriterion,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCriterion {
    #[serde(deserialize_with = "number_or_string")]
    pub id: i64,
    // Selectors already filter on KEYWORD; some responses omit the field
    #[serde(rename = "type", default = "keyword_type")]
    pub criteria_type: String,
    pub match_type: MatchType,
    pub text: String,
}

impl From<CriterionEntry> for KeywordRecord {
    fn from(entry: CriterionEntry) -> Self {
        let criterion = entry.criterion;
        KeywordRecord {
            id: criterion.id,
            criteria_type: criterion.criteria_type,
            match_type: criterion.match_type,
            text: criterion.text,
        }
    }
}

fn keyword_type() -> String {
    "KEYWORD".to_string()
}

fn unknown_status() -> EntityStatus {
    EntityStatus::Unknown
}

fn number_or_string<'de, D, N>(deserializer: D) -> Result<N, D::Error>
where
    D: Deserializer<'de>,
    N: TryFrom<u64> + TryFrom<i64> + std::str::FromStr,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Unsigned(u64),
        Signed(i64),
        Text(String),
    }

    let parsed = match Raw::deserialize(deserializer)? {
        Raw::Unsigned(n) => N::try_from(n).ok(),
        Raw::Signed(n) => N::try_from(n).ok(),
        Raw::Text(s) => s.trim().parse().ok(),
    };
    parsed.ok_or_else(|| serde::de::Error::custom("expected an integer or an integer string"))
}
