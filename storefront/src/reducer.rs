//! Reducer for the purchase screen.
//!
//! The reducer only records results and asks for work. Fetching and buying
//! are returned as [`StoreCommand`]s and carried out by
//! [`PurchaseExecutor`](crate::PurchaseExecutor).

use crate::types::{MainAction, MainState, PRODUCT_IDS, StoreCommand};
use storeflow_core::{reducer::Reducer, smallvec, SmallVec};

/// Reducer for the purchase screen
#[derive(Clone, Debug)]
pub struct MainReducer {
    product_ids: Vec<String>,
}

impl MainReducer {
    /// Creates a reducer that loads [`PRODUCT_IDS`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_product_ids(PRODUCT_IDS)
    }

    /// Creates a reducer that loads a custom set of identifiers
    #[must_use]
    pub fn with_product_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            product_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Identifiers requested when the view loads
    #[must_use]
    pub fn product_ids(&self) -> &[String] {
        &self.product_ids
    }
}

impl Default for MainReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for MainReducer {
    type State = MainState;
    type Action = MainAction;
    type Command = StoreCommand;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
    ) -> SmallVec<[Self::Command; 4]> {
        match action {
            MainAction::ViewLoaded => {
                tracing::debug!(count = self.product_ids.len(), "Requesting products");
                smallvec![StoreCommand::FetchProducts {
                    ids: self.product_ids.clone(),
                }]
            },
            MainAction::PurchaseButtonTapped(product_id) => {
                tracing::debug!(product_id = %product_id, "Purchase tapped");
                smallvec![StoreCommand::Purchase { product_id }]
            },
            MainAction::ProductsReceived(products) => {
                tracing::debug!(count = products.len(), "Products received");
                state.products = products;
                SmallVec::new()
            },
            MainAction::StatusReceived(status) => {
                tracing::debug!(status = %status, "Status received");
                state.status = status;
                SmallVec::new()
            },
        }
    }
}
