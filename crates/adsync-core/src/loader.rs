//! CSV loader and validator
//!
//! Reads the input file into deduplicated lists of campaigns, ad groups
//! and keywords. Each loader re-reads the file on its own so it can be
//! called independently.
//!
//! ## Validation
//!
//! Validation is fail-fast: the first problem aborts the load and nothing
//! is returned. Errors carry the 1-based data row number (the row right
//! after the header is row 1).
//!
//! - Header named by the heading map is absent → [`Error::MissingColumn`]
//! - Required cell is empty → [`Error::MissingField`]
//! - Targeting label not in the targeting map → [`Error::InvalidTargeting`]

use crate::config::{Delimiter, HeadingMap, InputConfig, TargetingMap};
use crate::error::{Error, Result};
use crate::model::{AdGroup, Campaign, Keyword};
use crate::sanitize::clear_for_api;
use csv::StringRecord;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Load the campaigns described by the file, without duplicates
pub fn load_campaigns(
    path: impl AsRef<Path>,
    headings: &HeadingMap,
    delimiter: Delimiter,
) -> Result<Vec<Campaign>> {
    let mut reader = open(path.as_ref(), delimiter)?;
    let header = reader.headers()?.clone();
    let campaign_col = column(&header, "campaign", &headings.campaign)?;

    let mut campaigns = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 1;

        let name = required_text(&record, campaign_col, row, "campaign", "name")?;
        push_unique(&mut campaigns, Campaign::new(name));
    }

    debug!("Loaded {} campaign(s) from CSV", campaigns.len());
    Ok(campaigns)
}

/// Load the ad groups described by the file, without duplicates
pub fn load_ad_groups(
    path: impl AsRef<Path>,
    headings: &HeadingMap,
    delimiter: Delimiter,
) -> Result<Vec<AdGroup>> {
    let mut reader = open(path.as_ref(), delimiter)?;
    let header = reader.headers()?.clone();
    let ad_group_col = column(&header, "ads_group", &headings.ads_group)?;
    let campaign_col = column(&header, "campaign", &headings.campaign)?;

    let mut ad_groups = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 1;

        let name = required_text(&record, ad_group_col, row, "ad group", "name")?;
        let campaign = required_text(&record, campaign_col, row, "ad group", "campaign")?;
        push_unique(&mut ad_groups, AdGroup::new(name, campaign));
    }

    debug!("Loaded {} ad group(s) from CSV", ad_groups.len());
    Ok(ad_groups)
}

/// Load the keywords described by the file, without duplicates
pub fn load_keywords(
    path: impl AsRef<Path>,
    headings: &HeadingMap,
    targeting: &TargetingMap,
    delimiter: Delimiter,
) -> Result<Vec<Keyword>> {
    let mut reader = open(path.as_ref(), delimiter)?;
    let header = reader.headers()?.clone();
    let targeting_col = column(&header, "targeting", &headings.targeting)?;
    let text_col = column(&header, "text", &headings.text)?;
    let ad_group_col = column(&header, "ads_group", &headings.ads_group)?;

    let mut keywords = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 1;

        let label = cell(&record, targeting_col);
        if label.is_empty() {
            return Err(Error::missing_field(row, "keyword", "targeting"));
        }
        let text = required_text(&record, text_col, row, "keyword", "text")?;
        let ad_group = required_text(&record, ad_group_col, row, "keyword", "ad group")?;

        let match_type = targeting
            .resolve(label)
            .ok_or_else(|| Error::invalid_targeting(row, label))?;

        push_unique(&mut keywords, Keyword::new(text, match_type, ad_group));
    }

    debug!("Loaded {} keyword(s) from CSV", keywords.len());
    Ok(keywords)
}

/// Everything a run should make exist remotely, in CSV order
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Campaigns, deduplicated by name
    pub campaigns: Vec<Campaign>,
    /// Ad groups, deduplicated by name
    pub ad_groups: Vec<AdGroup>,
    /// Keywords, deduplicated by text and match type
    pub keywords: Vec<Keyword>,
}

impl SyncPlan {
    /// Build a plan from already-loaded entities
    pub fn new(campaigns: Vec<Campaign>, ad_groups: Vec<AdGroup>, keywords: Vec<Keyword>) -> Self {
        Self {
            campaigns,
            ad_groups,
            keywords,
        }
    }

    /// Load and validate all three entity lists from the input file
    pub fn load(input: &InputConfig) -> Result<Self> {
        input.validate()?;

        let campaigns = load_campaigns(&input.path, &input.headings, input.delimiter)?;
        let ad_groups = load_ad_groups(&input.path, &input.headings, input.delimiter)?;
        let keywords = load_keywords(
            &input.path,
            &input.headings,
            &input.targeting,
            input.delimiter,
        )?;

        Ok(Self::new(campaigns, ad_groups, keywords))
    }

    /// Ad groups belonging to a campaign, in plan order
    pub fn ad_groups_of<'a>(&'a self, campaign: &'a Campaign) -> impl Iterator<Item = &'a AdGroup> {
        self.ad_groups
            .iter()
            .filter(move |ad_group| ad_group.campaign_name == campaign.name)
    }

    /// Keywords belonging to an ad group, in plan order
    pub fn keywords_of<'a>(&'a self, ad_group: &'a AdGroup) -> impl Iterator<Item = &'a Keyword> {
        self.keywords
            .iter()
            .filter(move |keyword| keyword.ad_group_name == ad_group.name)
    }
}

fn open(path: &Path, delimiter: Delimiter) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| {
        Error::invalid_input(format!("Cannot open CSV file {}: {}", path.display(), e))
    })?;

    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(file))
}

fn column(header: &StringRecord, field: &'static str, name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == name)
        .ok_or_else(|| Error::missing_column(field, name))
}

// Short rows in a flexible reader read as empty cells
fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

fn required_text(
    record: &StringRecord,
    index: usize,
    row: usize,
    entity: &'static str,
    field: &'static str,
) -> Result<String> {
    let cleaned = clear_for_api(cell(record, index));
    if cleaned.is_empty() {
        return Err(Error::missing_field(row, entity, field));
    }
    Ok(cleaned)
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
