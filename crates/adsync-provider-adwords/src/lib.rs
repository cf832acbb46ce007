// # AdWords Directory
//
// This crate provides the AdWords implementation of `AdDirectory`.
//
// ## Behaviour
//
// - One HTTP request per listing page, two per campaign creation (budget,
//   then campaign), one per ad group or keyword creation
// - Errors are mapped by status code and returned to the engine as-is
// - No retry, no backoff, no caching: the engine owns sequencing and a
//   failed call aborts the run
//
// ## Security
//
// - Access and developer tokens never appear in logs or in `Debug` output
// - Tokens are read from the environment by the binary, never from files
//
// ## API Reference
//
// All calls are `POST {api_base}/v201809/{Service}/{get|mutate}` with a
// JSON body and these headers:
//
// ```http
// Authorization: Bearer <access token>
// developerToken: <developer token>
// clientCustomerId: <10 digits>
// ```
//
// - List: `get` with a `selector` (fields, predicates, paging, ordering)
// - Create: `mutate` with an `ADD` operation

pub mod wire;

use adsync_core::config::{CustomerId, DirectoryConfig};
use adsync_core::model::{AdGroup, Campaign, Keyword};
use adsync_core::traits::{
    AdDirectory, AdDirectoryFactory, AdGroupRecord, CampaignRecord, EntityId, KeywordRecord,
    Page, PageRequest,
};
use adsync_core::{DirectoryRegistry, Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use wire::{BudgetEntry, CriterionEntry, GetResponse, MutateResponse, NamedEntry, Service};

/// Directory type name
pub const DIRECTORY_NAME: &str = "adwords";

/// AdWords API base URL
pub const ADWORDS_API_BASE: &str = "https://adwords.google.com/api/adwords/cm";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// AdWords account reached over HTTP
///
/// Stateless between calls. Every method maps to one or two API requests.
///
/// # Security
///
/// The Debug implementation does NOT expose either token.
pub struct AdwordsDirectory {
    /// Target account
    customer_id: CustomerId,

    /// OAuth access token
    /// ⚠️ NEVER log this value
    access_token: String,

    /// API developer token
    /// ⚠️ NEVER log this value
    developer_token: String,

    /// Base URL, without the version segment
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the tokens
impl std::fmt::Debug for AdwordsDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdwordsDirectory")
            .field("customer_id", &self.customer_id)
            .field("access_token", &"<REDACTED>")
            .field("developer_token", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl AdwordsDirectory {
    /// Create a new AdWords directory
    ///
    /// # Parameters
    ///
    /// - `customer_id`: Account to import into
    /// - `access_token`: OAuth access token
    /// - `developer_token`: API developer token
    /// - `api_base`: Base URL override, mainly for tests
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a token is empty and `Error::Http` when
    /// the HTTP client cannot be built.
    pub fn new(
        customer_id: CustomerId,
        access_token: impl Into<String>,
        developer_token: impl Into<String>,
        api_base: Option<String>,
    ) -> Result<Self> {
        let access_token = access_token.into();
        let developer_token = developer_token.into();

        if access_token.is_empty() {
            return Err(Error::config("AdWords access token cannot be empty"));
        }
        if developer_token.is_empty() {
            return Err(Error::config("AdWords developer token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        let api_base = api_base
            .unwrap_or_else(|| ADWORDS_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            customer_id,
            access_token,
            developer_token,
            api_base,
            client,
        })
    }

    fn url(&self, service: Service, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.api_base,
            wire::API_VERSION,
            service.name(),
            action
        )
    }

    /// POST a JSON body to a service and decode the response
    async fn call<T: DeserializeOwned>(
        &self,
        service: Service,
        action: &str,
        body: &Value,
    ) -> Result<T> {
        let url = self.url(service, action);
        tracing::debug!("POST {} [customer: {}]", url, self.customer_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("developerToken", &self.developer_token)
            .header("clientCustomerId", self.customer_id.as_str())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                Error::http(format!(
                    "{} {} request failed: {}",
                    service.name(),
                    action,
                    e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status.as_u16(), service, action, &error_text));
        }

        response.json::<T>().await.map_err(|e| {
            Error::directory(
                DIRECTORY_NAME,
                format!("Failed to parse {} {} response: {}", service.name(), action, e),
            )
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        service: Service,
        selector: &Value,
    ) -> Result<GetResponse<T>> {
        self.call(service, "get", selector).await
    }

    /// Run a single ADD operation and return the created entity
    async fn mutate_one<T: DeserializeOwned>(
        &self,
        service: Service,
        operations: &Value,
    ) -> Result<T> {
        let response: MutateResponse<T> = self.call(service, "mutate", operations).await?;
        response.value.into_iter().next().ok_or_else(|| {
            Error::directory(
                DIRECTORY_NAME,
                format!("{} mutate returned no value", service.name()),
            )
        })
    }
}

/// Map a non-success HTTP status to an error
fn status_error(status: u16, service: Service, action: &str, body: &str) -> Error {
    let call = format!("{} {}", service.name(), action);
    match status {
        401 | 403 => Error::auth(format!(
            "{}: invalid token or insufficient permissions. Status: {}",
            call, status
        )),
        404 => Error::not_found(format!("{}: {}", call, body)),
        429 => Error::rate_limited(format!(
            "{}: rate limit exceeded. Please retry later. Status: {}",
            call, status
        )),
        500..=599 => Error::directory(
            DIRECTORY_NAME,
            format!("{}: server error (transient): {} - {}", call, status, body),
        ),
        _ => Error::directory(
            DIRECTORY_NAME,
            format!("{} failed: {} - {}", call, status, body),
        ),
    }
}

#[async_trait]
impl AdDirectory for AdwordsDirectory {
    async fn list_campaigns(&self, page: PageRequest) -> Result<Page<CampaignRecord>> {
        let response: GetResponse<NamedEntry> = self
            .get(Service::Campaign, &wire::campaign_selector(page))
            .await?;
        Ok(response.into_page(Into::into))
    }

    async fn list_ad_groups(
        &self,
        campaign_id: EntityId,
        page: PageRequest,
    ) -> Result<Page<AdGroupRecord>> {
        let response: GetResponse<NamedEntry> = self
            .get(Service::AdGroup, &wire::ad_group_selector(campaign_id, page))
            .await?;
        Ok(response.into_page(Into::into))
    }

    async fn list_keywords(
        &self,
        ad_group_id: EntityId,
        page: PageRequest,
    ) -> Result<Page<KeywordRecord>> {
        let response: GetResponse<CriterionEntry> = self
            .get(
                Service::AdGroupCriterion,
                &wire::keyword_selector(ad_group_id, page),
            )
            .await?;
        Ok(response.into_page(Into::into))
    }

    /// Create the campaign's exclusive budget, then the campaign itself
    ///
    /// A failure after the budget call leaves an unused budget behind.
    async fn create_campaign(&self, campaign: &Campaign) -> Result<CampaignRecord> {
        let budget: BudgetEntry = self
            .mutate_one(Service::Budget, &wire::budget_operation(campaign))
            .await?;
        tracing::debug!(
            "Created budget {} for campaign '{}'",
            budget.budget_id,
            campaign.name
        );

        let today = chrono::Local::now().date_naive();
        let created: NamedEntry = self
            .mutate_one(
                Service::Campaign,
                &wire::campaign_operation(campaign, budget.budget_id, today),
            )
            .await?;
        Ok(created.into())
    }

    async fn create_ad_group(
        &self,
        campaign_id: EntityId,
        ad_group: &AdGroup,
    ) -> Result<AdGroupRecord> {
        let created: NamedEntry = self
            .mutate_one(
                Service::AdGroup,
                &wire::ad_group_operation(campaign_id, ad_group),
            )
            .await?;
        Ok(created.into())
    }

    async fn create_keyword(
        &self,
        ad_group_id: EntityId,
        keyword: &Keyword,
    ) -> Result<KeywordRecord> {
        let created: CriterionEntry = self
            .mutate_one(
                Service::AdGroupCriterion,
                &wire::keyword_operation(ad_group_id, keyword),
            )
            .await?;
        Ok(created.into())
    }

    fn directory_name(&self) -> &'static str {
        DIRECTORY_NAME
    }
}

/// Factory for creating AdWords directories
pub struct AdwordsDirectoryFactory;

impl AdDirectoryFactory for AdwordsDirectoryFactory {
    fn create(&self, config: &DirectoryConfig) -> Result<Box<dyn AdDirectory>> {
        match config {
            DirectoryConfig::Adwords {
                customer_id,
                access_token,
                developer_token,
                api_base,
            } => Ok(Box::new(AdwordsDirectory::new(
                customer_id.clone(),
                access_token.clone(),
                developer_token.clone(),
                api_base.clone(),
            )?)),
            _ => Err(Error::config("Invalid config for AdWords directory")),
        }
    }
}

/// Register the AdWords directory with a registry
///
/// # Example
///
/// ```rust
/// use adsync_core::DirectoryRegistry;
///
/// let registry = DirectoryRegistry::new();
/// adsync_provider_adwords::register(&registry);
/// assert!(registry.has_directory("adwords"));
/// ```
pub fn register(registry: &DirectoryRegistry) {
    registry.register_directory(DIRECTORY_NAME, Box::new(AdwordsDirectoryFactory));
}
