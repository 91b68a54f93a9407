//! In-memory purchase capability.
//!
//! Behaves like a platform store backed by a fixed catalog: products must be
//! fetched before they can be bought, and each product answers purchases
//! with a scripted [`PurchaseOutcome`].

use crate::client::PurchaseClient;
use crate::error::{ClientError, Result};
use crate::types::Product;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// How the simulated store answers a purchase of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The purchase succeeds.
    Approved,

    /// The purchase ends without success (user cancelled, pending approval).
    Declined,

    /// The purchase fails with this message.
    Error(String),
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    product: Product,
    outcome: PurchaseOutcome,
}

/// Simulated platform store.
///
/// Clones share the set of loaded products.
///
/// # Example
///
/// ```
/// use storefront::{Product, PurchaseClient, PurchaseOutcome, SimulatedStore};
///
/// # async fn example() -> Result<(), storefront::ClientError> {
/// let store = SimulatedStore::new()
///     .with_product(Product::new("a", "Product A", "$0.99"), PurchaseOutcome::Approved);
///
/// let products = store.fetch_products(&["a".to_string()]).await?;
/// assert_eq!(products.len(), 1);
/// assert!(store.purchase("a").await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedStore {
    catalog: Vec<CatalogEntry>,
    loaded: Arc<RwLock<Vec<Product>>>,
    latency: Duration,
    fetch_failure: Option<String>,
}

impl SimulatedStore {
    /// Creates an empty store with no latency
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog matching [`PRODUCT_IDS`](crate::PRODUCT_IDS): one product per outcome.
    #[must_use]
    pub fn demo() -> Self {
        Self::new()
            .with_product(
                Product::new("com.temp.productA", "Product A", "$0.99"),
                PurchaseOutcome::Approved,
            )
            .with_product(
                Product::new("com.temp.productB", "Product B", "$1.99"),
                PurchaseOutcome::Declined,
            )
            .with_product(
                Product::new("com.temp.productC", "Product C", "$4.99"),
                PurchaseOutcome::Error("payment method unavailable".to_string()),
            )
    }

    /// Adds a product, replacing any entry with the same id
    #[must_use]
    pub fn with_product(mut self, product: Product, outcome: PurchaseOutcome) -> Self {
        self.catalog.retain(|entry| entry.product.id != product.id);
        self.catalog.push(CatalogEntry { product, outcome });
        self
    }

    /// Delay applied before every fetch and purchase
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every fetch fail with this message
    #[must_use]
    pub fn with_fetch_failure(mut self, message: impl Into<String>) -> Self {
        self.fetch_failure = Some(message.into());
        self
    }

    /// Products returned by the most recent successful fetch
    pub async fn loaded_products(&self) -> Vec<Product> {
        self.loaded.read().await.clone()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn outcome_for(&self, product_id: &str) -> Option<&PurchaseOutcome> {
        self.catalog
            .iter()
            .find(|entry| entry.product.id == product_id)
            .map(|entry| &entry.outcome)
    }
}

impl PurchaseClient for SimulatedStore {
    fn fetch_products(&self, ids: &[String]) -> impl Future<Output = Result<Vec<Product>>> + Send {
        async move {
            self.simulate_latency().await;

            if let Some(message) = &self.fetch_failure {
                return Err(ClientError::fetch(message.clone()));
            }

            let products: Vec<Product> = ids
                .iter()
                .filter_map(|id| {
                    self.catalog
                        .iter()
                        .find(|entry| &entry.product.id == id)
                        .map(|entry| entry.product.clone())
                })
                .collect();

            tracing::debug!(
                requested = ids.len(),
                found = products.len(),
                "Fetched products"
            );

            *self.loaded.write().await = products.clone();
            Ok(products)
        }
    }

    fn purchase(&self, product_id: &str) -> impl Future<Output = Result<bool>> + Send {
        async move {
            self.simulate_latency().await;

            let is_loaded = self
                .loaded
                .read()
                .await
                .iter()
                .any(|product| product.id == product_id);

            let outcome = match self.outcome_for(product_id) {
                Some(outcome) if is_loaded => outcome,
                _ => return Err(ClientError::ProductNotFound(product_id.to_string())),
            };

            match outcome {
                PurchaseOutcome::Approved => Ok(true),
                PurchaseOutcome::Declined => Ok(false),
                PurchaseOutcome::Error(message) => Err(ClientError::purchase(message.clone())),
            }
        }
    }

    fn observe_purchased(&self) -> BoxStream<'static, Vec<Product>> {
        // No purchase ledger yet: a single empty batch, then the stream ends.
        async_stream::stream! {
            yield Vec::new();
        }
        .boxed()
    }

    fn start_entitlement_sync(&self) -> impl Future<Output = ()> + Send {
        async {
            tracing::debug!("Entitlement sync started, no transactions to observe");
        }
    }
}
