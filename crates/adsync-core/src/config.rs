//! Configuration types for adsync
//!
//! This module defines all configuration structures used throughout the crate.

use crate::model::MatchType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default number of entries requested per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Main adsync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote directory configuration
    pub directory: DirectoryConfig,

    /// CSV input configuration
    pub input: InputConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.input.validate()?;
        self.directory.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

/// CSV field delimiter (a single ASCII byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Delimiter(u8);

impl Delimiter {
    /// Comma delimiter
    pub const COMMA: Delimiter = Delimiter(b',');

    /// Semicolon delimiter
    pub const SEMICOLON: Delimiter = Delimiter(b';');

    /// Raw byte for the CSV reader
    pub fn as_byte(&self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::COMMA
    }
}

impl FromStr for Delimiter {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Shells make a literal tab awkward to pass
        if s == "\\t" || s.eq_ignore_ascii_case("tab") {
            return Ok(Delimiter(b'\t'));
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => {
                Ok(Delimiter(c as u8))
            }
            _ => Err(crate::Error::invalid_input(format!(
                "CSV delimiter must be a single ASCII character, for example , or ; (got '{}')",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Delimiter> for String {
    fn from(delimiter: Delimiter) -> Self {
        match delimiter.0 {
            b'\t' => "\\t".to_string(),
            b => (b as char).to_string(),
        }
    }
}

/// Mapping from logical field names to the headers found in the CSV file
///
/// Defaults match a French-localized export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingMap {
    /// Header of the campaign name column
    #[serde(default = "default_campaign_heading")]
    pub campaign: String,

    /// Header of the ad group name column
    #[serde(default = "default_ads_group_heading")]
    pub ads_group: String,

    /// Header of the keyword match type column
    #[serde(default = "default_targeting_heading")]
    pub targeting: String,

    /// Header of the keyword text column
    #[serde(default = "default_text_heading")]
    pub text: String,
}

impl Default for HeadingMap {
    fn default() -> Self {
        Self {
            campaign: default_campaign_heading(),
            ads_group: default_ads_group_heading(),
            targeting: default_targeting_heading(),
            text: default_text_heading(),
        }
    }
}

fn default_campaign_heading() -> String {
    "Campagne".to_string()
}

fn default_ads_group_heading() -> String {
    "Groupe".to_string()
}

fn default_targeting_heading() -> String {
    "Ciblage".to_string()
}

fn default_text_heading() -> String {
    "Expression".to_string()
}

/// Mapping from canonical match types to the labels used in the CSV file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingMap {
    /// Label for broad match
    #[serde(rename = "BROAD", default = "default_broad_label")]
    pub broad: String,

    /// Label for phrase match
    #[serde(rename = "PHRASE", default = "default_phrase_label")]
    pub phrase: String,

    /// Label for exact match
    #[serde(rename = "EXACT", default = "default_exact_label")]
    pub exact: String,

    /// Label for broad match modifier
    #[serde(rename = "BPE", default = "default_bpe_label")]
    pub bpe: String,
}

impl TargetingMap {
    /// Label configured for a match type
    pub fn label(&self, match_type: MatchType) -> &str {
        match match_type {
            MatchType::Broad => &self.broad,
            MatchType::Phrase => &self.phrase,
            MatchType::Exact => &self.exact,
            MatchType::Bpe => &self.bpe,
        }
    }

    /// Match type for a raw CSV value (case-sensitive)
    ///
    /// Labels are consulted in BROAD, PHRASE, EXACT, BPE order; the first
    /// match wins.
    pub fn resolve(&self, value: &str) -> Option<MatchType> {
        MatchType::ALL
            .into_iter()
            .find(|match_type| self.label(*match_type) == value)
    }
}

impl Default for TargetingMap {
    fn default() -> Self {
        Self {
            broad: default_broad_label(),
            phrase: default_phrase_label(),
            exact: default_exact_label(),
            bpe: default_bpe_label(),
        }
    }
}

fn default_broad_label() -> String {
    "Large".to_string()
}

fn default_phrase_label() -> String {
    "Expression".to_string()
}

fn default_exact_label() -> String {
    "Exact".to_string()
}

fn default_bpe_label() -> String {
    "Large modifié".to_string()
}

/// Heading and targeting overrides read from a JSON file
///
/// ```json
/// {
///   "headings": { "campaign": "Campaign", "ads_group": "Ad group", "targeting": "Match", "text": "Keyword" },
///   "targeting": { "BROAD": "Broad", "PHRASE": "Phrase", "EXACT": "Exact", "BPE": "Modified" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingFile {
    /// Heading map
    #[serde(default)]
    pub headings: HeadingMap,

    /// Targeting map
    #[serde(default)]
    pub targeting: TargetingMap,
}

impl MappingFile {
    /// Read a mapping file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config(format!(
                "Failed to read mapping file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            crate::Error::config(format!("Invalid mapping file {}: {}", path.display(), e))
        })
    }
}

/// CSV input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the CSV file
    pub path: PathBuf,

    /// Field delimiter
    #[serde(default)]
    pub delimiter: Delimiter,

    /// Heading map
    #[serde(default)]
    pub headings: HeadingMap,

    /// Targeting map
    #[serde(default)]
    pub targeting: TargetingMap,
}

impl InputConfig {
    /// Create an input configuration with the default maps
    pub fn new(path: impl Into<PathBuf>, delimiter: Delimiter) -> Self {
        Self {
            path: path.into(),
            delimiter,
            headings: HeadingMap::default(),
            targeting: TargetingMap::default(),
        }
    }

    /// Replace heading and targeting maps
    pub fn with_mapping(mut self, mapping: MappingFile) -> Self {
        self.headings = mapping.headings;
        self.targeting = mapping.targeting;
        self
    }

    /// Validate the input configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        let is_csv = self
            .path
            .extension()
            .is_some_and(|ext| ext == "csv");
        if !is_csv {
            return Err(crate::Error::invalid_input(format!(
                "The data file must be a CSV type format: {}",
                self.path.display()
            )));
        }
        Ok(())
    }
}

/// Ten-digit advertising account identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    /// Parse an account id, accepting `123-456-7891` or `1234567891`
    pub fn parse(raw: &str) -> Result<Self, crate::Error> {
        let digits = raw.replace('-', "");
        if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(crate::Error::invalid_input(format!(
                "This account ID is not valid: '{}'. It must be 10 digits, i.e. 123-456-7891 or 1234567891",
                raw
            )));
        }
        Ok(Self(digits))
    }

    /// Digits only
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", &self.0[..3], &self.0[3..6], &self.0[6..])
    }
}

impl TryFrom<String> for CustomerId {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

/// Remote directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectoryConfig {
    /// AdWords account reached over HTTP
    Adwords {
        /// Target account
        customer_id: CustomerId,
        /// OAuth access token
        access_token: String,
        /// API developer token
        developer_token: String,
        /// API base URL override
        api_base: Option<String>,
    },

    /// In-process account that starts empty
    Memory,

    /// Custom directory
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl DirectoryConfig {
    /// Validate the directory configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            DirectoryConfig::Adwords {
                access_token,
                developer_token,
                ..
            } => {
                if access_token.is_empty() {
                    return Err(crate::Error::config("AdWords access token cannot be empty"));
                }
                if developer_token.is_empty() {
                    return Err(crate::Error::config(
                        "AdWords developer token cannot be empty",
                    ));
                }
                Ok(())
            }
            DirectoryConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom directory factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom directory config cannot be null",
                    ));
                }
                Ok(())
            }
            DirectoryConfig::Memory => Ok(()),
        }
    }

    /// Get the directory type name
    pub fn type_name(&self) -> &str {
        match self {
            DirectoryConfig::Adwords { .. } => "adwords",
            DirectoryConfig::Memory => "memory",
            DirectoryConfig::Custom { factory, .. } => factory,
        }
    }
}

/// How the engine keeps track of what already exists remotely
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStrategy {
    /// List the remote level again before every existence check
    #[default]
    Refetch,

    /// List each level once and track creations locally
    Cached,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Listing strategy
    #[serde(default)]
    pub listing: ListingStrategy,

    /// Entries requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Capacity of the engine event channel
    ///
    /// When full, events are dropped with a warning log.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.page_size == 0 {
            return Err(crate::Error::config("page_size must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event_channel_capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            listing: ListingStrategy::default(),
            page_size: default_page_size(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_event_channel_capacity() -> usize {
    1000
}
