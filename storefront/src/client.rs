//! The purchase capability.
//!
//! This is the boundary to the platform store. The reducer never sees it;
//! [`PurchaseExecutor`](crate::PurchaseExecutor) receives an implementation
//! at construction time and calls it while executing commands.
//!
//! Implementations:
//! - [`SimulatedStore`](crate::SimulatedStore): in-memory catalog for demos and tests

use crate::error::Result;
use crate::types::Product;
use futures::stream::BoxStream;
use std::future::Future;

/// Platform purchasing operations.
pub trait PurchaseClient: Send + Sync + 'static {
    /// Fetch metadata for the given identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Fetch`](crate::ClientError::Fetch) when the
    /// store cannot be reached.
    fn fetch_products(&self, ids: &[String]) -> impl Future<Output = Result<Vec<Product>>> + Send;

    /// Attempt to buy a product.
    ///
    /// Resolves to `true` when the purchase went through and `false` when it
    /// ended without success (for example the user cancelled).
    ///
    /// # Errors
    ///
    /// - [`ClientError::ProductNotFound`](crate::ClientError::ProductNotFound)
    ///   if the product was not loaded
    /// - [`ClientError::Purchase`](crate::ClientError::Purchase) for any other failure
    fn purchase(&self, product_id: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Live sequence of purchased-product batches.
    ///
    /// The stream cannot be restarted once consumed.
    fn observe_purchased(&self) -> BoxStream<'static, Vec<Product>>;

    /// Begin observing entitlements in the background.
    ///
    /// Has no defined output; callers usually spawn it.
    fn start_entitlement_sync(&self) -> impl Future<Output = ()> + Send;
}
