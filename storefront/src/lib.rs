//! In-app purchase flow built on Storeflow.
//!
//! The screen loads a fixed list of products, lets the user tap "Buy", and
//! shows the outcome of the most recent attempt as a single status line.
//!
//! - [`MainReducer`]: state transitions; returns [`StoreCommand`]s, never does I/O
//! - [`PurchaseExecutor`]: runs commands against a [`PurchaseClient`]
//! - [`SimulatedStore`]: in-memory [`PurchaseClient`]
//! - [`MainView`] / [`ViewState`]: projection and user intents
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use storefront::{MainReducer, MainState, MainView, PurchaseExecutor, SimulatedStore};
//! use storeflow_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = PurchaseExecutor::new(SimulatedStore::demo());
//! let view = MainView::new(Store::new(MainState::default(), MainReducer::new(), executor));
//!
//! if let Some(mut handle) = view.appear().await? {
//!     handle.wait_with_timeout(Duration::from_secs(5)).await?;
//! }
//!
//! let mut handle = view.tap_buy("com.temp.productA").await?;
//! handle.wait_with_timeout(Duration::from_secs(5)).await?;
//!
//! println!("{}", view.view_state().await);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod effects;
pub mod error;
pub mod reducer;
pub mod simulated;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use client::PurchaseClient;
pub use effects::PurchaseExecutor;
pub use error::ClientError;
pub use reducer::MainReducer;
pub use simulated::{PurchaseOutcome, SimulatedStore};
pub use types::{MainAction, MainState, PRODUCT_IDS, Product, PurchaseStatus, StoreCommand};
pub use view::{MainView, ViewIntent, ViewState};

/// Store running the purchase screen against a concrete client.
pub type MainStore<C> = storeflow_runtime::Store<MainReducer, PurchaseExecutor<C>>;
