//! Order Fetch Coordinator
//!
//! Issues filtered/paginated order fetches and feeds successful results
//! into the store. Requests supersede, they never queue: only the latest
//! filter/page state is authoritative, so issuing a new fetch cancels
//! the in-flight one and a late result from a superseded request is
//! discarded instead of overwriting newer state.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::store::SharedOrderStore;
use shared::models::Order;
use shared::query::{OrderFilters, OrderQuery, PaginatedResponse};

/// Backend order listing seam; mocked in tests
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn fetch_orders(&self, query: &OrderQuery) -> ClientResult<PaginatedResponse<Order>>;
}

/// HTTP implementation of the fetch contract
#[derive(Debug, Clone)]
pub struct HttpOrderApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpOrderApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn fetch_orders(&self, query: &OrderQuery) -> ClientResult<PaginatedResponse<Order>> {
        let url = format!("{}/orders", self.base_url);
        let mut req = self.client.get(&url).query(query);
        if let Some(token) = &self.token {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                _ => Err(ClientError::InvalidResponse(text)),
            };
        }

        Ok(response.json().await?)
    }
}

/// What happened to a fetch: applied to the store, or silently discarded
/// because a newer request superseded it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Superseded,
}

/// Coordinates fetches against the store's current filter/pagination
/// state. At most one fetch is logically current at a time.
pub struct OrderFetchCoordinator {
    api: Arc<dyn OrderApi>,
    store: SharedOrderStore,
    /// Monotonic request generation; only the newest may write the store
    generation: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
}

impl OrderFetchCoordinator {
    pub fn new(api: Arc<dyn OrderApi>, store: SharedOrderStore) -> Self {
        Self {
            api,
            store,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Fetch with the store's current filters and pagination.
    ///
    /// Cancels any in-flight request first. A superseded or cancelled
    /// request resolves silently with [`FetchOutcome::Superseded`] and
    /// leaves the store untouched; a failed request returns the error
    /// without mutating the store — stale data is preferred over
    /// blanking the UI.
    pub async fn fetch_orders(&self) -> ClientResult<FetchOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .expect("fetch token lock poisoned")
            .replace(cancel.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let query = self.store.read().await.query();
        tracing::debug!(generation, page = query.page, "Fetching orders");

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(generation, "Fetch superseded in flight");
                return Ok(FetchOutcome::Superseded);
            }
            result = self.api.fetch_orders(&query) => result,
        };

        // A newer request owns the store now; discard late results
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding result of superseded fetch");
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(response) => {
                self.store.write().await.replace_all(response);
                Ok(FetchOutcome::Applied)
            }
            Err(ClientError::Cancelled) => Ok(FetchOutcome::Superseded),
            Err(e) => {
                tracing::warn!(generation, "Order fetch failed: {e}");
                Err(e)
            }
        }
    }

    /// Apply new filters (page resets to 1) and re-fetch
    pub async fn set_filters(&self, filters: OrderFilters) -> ClientResult<FetchOutcome> {
        self.store.write().await.set_filters(filters);
        self.fetch_orders().await
    }

    /// Jump to a page and re-fetch
    pub async fn set_page(&self, page: u32) -> ClientResult<FetchOutcome> {
        self.store.write().await.set_page(page);
        self.fetch_orders().await
    }

    /// Change the page size (page resets to 1) and re-fetch
    pub async fn set_limit(&self, limit: u32) -> ClientResult<FetchOutcome> {
        self.store.write().await.set_limit(limit);
        self.fetch_orders().await
    }

    /// Restore default filters and pagination, then re-fetch
    pub async fn reset_filters(&self) -> ClientResult<FetchOutcome> {
        self.store.write().await.reset_filters();
        self.fetch_orders().await
    }
}
