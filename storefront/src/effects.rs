//! Command execution for the purchase screen.
//!
//! Every command becomes one asynchronous task that ends by feeding exactly
//! one action back to the store. Capability failures never escape: they are
//! turned into a status line here.

use crate::client::PurchaseClient;
use crate::error::ClientError;
use crate::types::{MainAction, PurchaseStatus, StoreCommand};
use std::sync::Arc;
use storeflow_core::{effect::Effect, executor::CommandExecutor};

/// Executes [`StoreCommand`]s against a [`PurchaseClient`]
#[derive(Debug)]
pub struct PurchaseExecutor<C> {
    client: Arc<C>,
}

impl<C: PurchaseClient> PurchaseExecutor<C> {
    /// Creates an executor owning `client`
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::from_arc(Arc::new(client))
    }

    /// Creates an executor sharing an existing client
    #[must_use]
    pub const fn from_arc(client: Arc<C>) -> Self {
        Self { client }
    }

    /// The capability commands run against
    #[must_use]
    pub const fn client(&self) -> &Arc<C> {
        &self.client
    }
}

impl<C> Clone for PurchaseExecutor<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: PurchaseClient> CommandExecutor for PurchaseExecutor<C> {
    type Command = StoreCommand;
    type Action = MainAction;

    fn execute(&self, command: StoreCommand) -> Effect<MainAction> {
        let client = Arc::clone(&self.client);

        match command {
            StoreCommand::FetchProducts { ids } => {
                Effect::future(async move { Some(load_products(client.as_ref(), ids).await) })
            },
            StoreCommand::Purchase { product_id } => Effect::future(async move {
                Some(purchase_product(client.as_ref(), &product_id).await.into())
            }),
        }
    }
}

/// Fetch products and turn the outcome into the follow-up action.
///
/// Products the client returns but nobody asked for are dropped, so state
/// only ever holds requested identifiers. A failed fetch becomes a
/// [`PurchaseStatus::LoadFailed`] status and leaves products untouched.
pub async fn load_products<C: PurchaseClient>(client: &C, ids: Vec<String>) -> MainAction {
    match client.fetch_products(&ids).await {
        Ok(products) => {
            let (requested, unexpected): (Vec<_>, Vec<_>) = products
                .into_iter()
                .partition(|product| ids.contains(&product.id));

            if !unexpected.is_empty() {
                tracing::warn!(
                    dropped = unexpected.len(),
                    "Fetch returned products that were not requested"
                );
            }

            MainAction::ProductsReceived(requested)
        },
        Err(error) => {
            tracing::warn!(error = %error, "Product fetch failed");
            PurchaseStatus::LoadFailed(error.to_string()).into()
        },
    }
}

/// Attempt one purchase and classify the outcome.
///
/// Single attempt, no retry.
pub async fn purchase_product<C: PurchaseClient>(client: &C, product_id: &str) -> PurchaseStatus {
    match client.purchase(product_id).await {
        Ok(true) => PurchaseStatus::Purchased(product_id.to_string()),
        Ok(false) => PurchaseStatus::Declined(product_id.to_string()),
        Err(ClientError::ProductNotFound(id)) => {
            tracing::warn!(product_id = %id, "Purchase of unknown product");
            PurchaseStatus::NotFound(id)
        },
        Err(error) => {
            tracing::warn!(product_id = %product_id, error = %error, "Purchase failed");
            PurchaseStatus::Failed(error.to_string())
        },
    }
}
