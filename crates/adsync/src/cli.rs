//! Command-line arguments and their translation into a [`SyncConfig`].

use adsync_core::config::{
    CustomerId, Delimiter, DirectoryConfig, EngineConfig, InputConfig, ListingStrategy,
    MappingFile, SyncConfig,
};
use adsync_core::{Error, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "adsync",
    version,
    about = "Import campaigns, ad groups and keywords from a CSV file into an ad account"
)]
pub struct Cli {
    /// CSV file holding the keywords, ad groups and campaigns
    #[arg(short = 'c', long)]
    pub csv: PathBuf,

    /// Account receiving the entities, e.g. 123-456-7891 or 1234567891
    #[arg(short = 'a', long)]
    pub account: String,

    /// CSV delimiter, for example , or ; (use \t or tab for tabs)
    #[arg(short = 'd', long)]
    pub delimiter: String,

    /// JSON file overriding the heading and targeting maps
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Import without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "ADSYNC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Account backend
    #[arg(long, value_enum, default_value_t = DirectoryKind::Adwords)]
    pub directory: DirectoryKind,

    /// How existing entities are tracked during the run
    #[arg(long, value_enum, default_value_t = ListingKind::Refetch)]
    pub listing: ListingKind,

    /// OAuth access token.
    /// WARNING: passing via --access-token is visible in process listings.
    /// Prefer the ADSYNC_ACCESS_TOKEN environment variable instead.
    #[arg(long, env = "ADSYNC_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// API developer token
    #[arg(long, env = "ADSYNC_DEVELOPER_TOKEN", hide_env_values = true)]
    pub developer_token: Option<String>,

    /// API base URL override
    #[arg(long, env = "ADSYNC_API_BASE")]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectoryKind {
    /// AdWords API
    Adwords,
    /// Empty in-process account, nothing leaves the machine
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListingKind {
    /// List again before every existence check
    Refetch,
    /// List each level once and track creations locally
    Cached,
}

impl From<ListingKind> for ListingStrategy {
    fn from(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Refetch => ListingStrategy::Refetch,
            ListingKind::Cached => ListingStrategy::Cached,
        }
    }
}

impl Cli {
    /// Build and validate the run configuration
    pub fn to_config(&self) -> Result<SyncConfig> {
        let delimiter: Delimiter = self.delimiter.parse()?;
        let customer_id = CustomerId::parse(&self.account)?;

        let mut input = InputConfig::new(self.csv.clone(), delimiter);
        if let Some(path) = &self.mapping {
            input = input.with_mapping(MappingFile::from_path(path)?);
        }

        let directory = match self.directory {
            DirectoryKind::Adwords => DirectoryConfig::Adwords {
                customer_id,
                access_token: required_secret(&self.access_token, "ADSYNC_ACCESS_TOKEN")?,
                developer_token: required_secret(&self.developer_token, "ADSYNC_DEVELOPER_TOKEN")?,
                api_base: self.api_base.clone(),
            },
            DirectoryKind::Memory => DirectoryConfig::Memory,
        };

        let config = SyncConfig {
            directory,
            input,
            engine: EngineConfig {
                listing: self.listing.into(),
                ..EngineConfig::default()
            },
        };
        config.validate()?;
        Ok(config)
    }
}

fn required_secret(value: &Option<String>, variable: &str) -> Result<String> {
    match value {
        Some(secret) if !secret.is_empty() => Ok(secret.clone()),
        _ => Err(Error::config(format!(
            "{} is required. Set it via: export {}=...",
            variable, variable
        ))),
    }
}
