//! Domain types for the storefront.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product identifiers requested when the view loads.
pub const PRODUCT_IDS: [&str; 3] = [
    "com.temp.productA",
    "com.temp.productB",
    "com.temp.productC",
];

/// A purchasable item as reported by the purchase capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identifier, e.g. `com.temp.productA`.
    pub id: String,

    /// Localized name shown in the list.
    pub display_name: String,

    /// Localized, formatted price.
    pub display_price: String,
}

impl Product {
    /// Creates a new `Product`
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        display_price: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            display_price: display_price.into(),
        }
    }
}

/// Application state for the purchase screen.
///
/// Created empty at startup; only [`MainReducer`](crate::MainReducer) mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MainState {
    /// Products in fetch response order.
    pub products: Vec<Product>,

    /// Outcome of the most recent load or purchase attempt.
    pub status: String,
}

/// Everything that can happen to the purchase screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainAction {
    /// The view became visible.
    ViewLoaded,

    /// The user tapped "Buy" on a product.
    PurchaseButtonTapped(String),

    /// The product fetch finished.
    ProductsReceived(Vec<Product>),

    /// A load or purchase attempt reached a terminal outcome.
    StatusReceived(String),
}

/// Side effects the reducer can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// Fetch metadata for these identifiers.
    FetchProducts {
        /// Identifiers to request, in order.
        ids: Vec<String>,
    },

    /// Attempt a single purchase.
    Purchase {
        /// Identifier of the product to buy.
        product_id: String,
    },
}

/// Terminal outcome of a load or purchase attempt.
///
/// `Display` renders the status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseStatus {
    /// The purchase went through.
    Purchased(String),

    /// The purchase completed without success (cancelled, pending, ...).
    Declined(String),

    /// The product was not among the loaded products.
    NotFound(String),

    /// The purchase failed with an error.
    Failed(String),

    /// Loading products failed.
    LoadFailed(String),
}

impl PurchaseStatus {
    /// Marker prefixed to successful outcomes.
    pub const SUCCESS_MARKER: &'static str = "🟢";

    /// Marker prefixed to every other outcome.
    pub const FAILURE_MARKER: &'static str = "🔴";

    /// Whether this status reports a completed purchase.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Purchased(_))
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ok = Self::SUCCESS_MARKER;
        let failed = Self::FAILURE_MARKER;
        match self {
            Self::Purchased(id) => write!(f, "{ok} {id}"),
            Self::Declined(id) => write!(f, "{failed} {id}"),
            Self::NotFound(id) => write!(f, "{failed} product not found: {id}"),
            Self::Failed(message) => write!(f, "{failed} purchase error: {message}"),
            Self::LoadFailed(message) => write!(f, "{failed} load error: {message}"),
        }
    }
}

impl From<PurchaseStatus> for MainAction {
    fn from(status: PurchaseStatus) -> Self {
        Self::StatusReceived(status.to_string())
    }
}
