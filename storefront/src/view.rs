//! Presentation projection for the purchase screen.
//!
//! [`ViewState`] is a read-only copy of what the screen shows. [`MainView`]
//! owns the store and turns the two user intents into actions.

use crate::reducer::MainReducer;
use crate::types::{MainAction, MainState, Product, StoreCommand};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use storeflow_core::executor::CommandExecutor;
use storeflow_runtime::{EffectHandle, Store, StoreError};

/// What the purchase screen displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Products in the order they were fetched.
    pub products: Vec<Product>,

    /// Status line.
    pub status: String,
}

impl From<&MainState> for ViewState {
    fn from(state: &MainState) -> Self {
        Self::project(state)
    }
}

impl ViewState {
    /// Copy what the screen shows out of `state`
    #[must_use]
    pub fn project(state: &MainState) -> Self {
        Self {
            products: state.products.clone(),
            status: state.status.clone(),
        }
    }

    /// Plain-text rendering of the screen
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ViewState {
    /// One row per product followed by the status line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for product in &self.products {
            writeln!(
                f,
                "{:<24} {:>10}  [Buy]",
                product.display_name, product.display_price
            )?;
        }
        write!(f, "{}", self.status)
    }
}

/// User intents the screen can dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewIntent {
    /// The screen was displayed.
    Appeared,

    /// "Buy" was tapped for this product id.
    BuyTapped(String),
}

impl From<ViewIntent> for MainAction {
    fn from(intent: ViewIntent) -> Self {
        match intent {
            ViewIntent::Appeared => Self::ViewLoaded,
            ViewIntent::BuyTapped(product_id) => Self::PurchaseButtonTapped(product_id),
        }
    }
}

/// The purchase screen bound to a running store.
pub struct MainView<X>
where
    X: CommandExecutor<Command = StoreCommand, Action = MainAction>,
{
    store: Store<MainReducer, X>,
    appeared: AtomicBool,
}

impl<X> MainView<X>
where
    X: CommandExecutor<Command = StoreCommand, Action = MainAction> + Send + Sync + 'static,
{
    /// Binds a view to `store`
    #[must_use]
    pub const fn new(store: Store<MainReducer, X>) -> Self {
        Self {
            store,
            appeared: AtomicBool::new(false),
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &Store<MainReducer, X> {
        &self.store
    }

    /// Current projection of the store's state
    pub async fn view_state(&self) -> ViewState {
        self.store.state(ViewState::project).await
    }

    /// Signal that the screen is visible.
    ///
    /// Only the first call dispatches [`MainAction::ViewLoaded`]; later calls
    /// return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn appear(&self) -> Result<Option<EffectHandle>, StoreError> {
        if self.appeared.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.dispatch(ViewIntent::Appeared).await.map(Some)
    }

    /// Handle a tap on a product's "Buy" button.
    ///
    /// Every tap starts its own purchase attempt.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn tap_buy(&self, product_id: impl Into<String>) -> Result<EffectHandle, StoreError> {
        self.dispatch(ViewIntent::BuyTapped(product_id.into())).await
    }

    async fn dispatch(&self, intent: ViewIntent) -> Result<EffectHandle, StoreError> {
        tracing::debug!(intent = ?intent, "Dispatching intent");
        self.store.send(intent.into()).await
    }
}

impl<X> fmt::Debug for MainView<X>
where
    X: CommandExecutor<Command = StoreCommand, Action = MainAction>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainView")
            .field("store", &self.store)
            .field("appeared", &self.appeared.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use storeflow_testing::ScriptedExecutor;

    type TestExecutor = ScriptedExecutor<StoreCommand, MainAction>;

    fn view(executor: TestExecutor) -> MainView<TestExecutor> {
        MainView::new(Store::new(MainState::default(), MainReducer::new(), executor))
    }

    #[test]
    fn test_projection_copies_state() {
        let state = MainState {
            products: vec![
                Product::new("b", "B", "$2"),
                Product::new("a", "A", "$1"),
            ],
            status: "🟢 a".to_string(),
        };

        let view_state = ViewState::project(&state);

        assert_eq!(view_state.products, state.products);
        assert_eq!(view_state.status, state.status);
        assert_eq!(ViewState::from(&state), view_state);
    }

    #[test]
    fn test_render() {
        let view_state = ViewState {
            products: vec![Product::new("a", "Product A", "$0.99")],
            status: "🟢 a".to_string(),
        };

        let rendered = view_state.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Product A"));
        assert!(lines[0].ends_with("$0.99  [Buy]"));
        assert_eq!(lines[1], "🟢 a");
    }

    #[test]
    fn test_render_empty_state() {
        let view_state = ViewState::from(&MainState::default());
        assert_eq!(view_state.to_string(), "");
    }

    #[test]
    fn test_intents_map_to_actions() {
        assert_eq!(MainAction::from(ViewIntent::Appeared), MainAction::ViewLoaded);
        assert_eq!(
            MainAction::from(ViewIntent::BuyTapped("a".into())),
            MainAction::PurchaseButtonTapped("a".into())
        );
    }

    #[tokio::test]
    async fn test_appear_dispatches_view_loaded_once() {
        let executor = ScriptedExecutor::silent();
        let view = view(executor.clone());

        assert!(matches!(view.appear().await, Ok(Some(_))));
        assert!(matches!(view.appear().await, Ok(None)));

        assert_eq!(
            executor.commands(),
            vec![StoreCommand::FetchProducts {
                ids: MainReducer::new().product_ids().to_vec(),
            }]
        );
    }

    #[tokio::test]
    async fn test_every_tap_dispatches() {
        let executor = ScriptedExecutor::silent();
        let view = view(executor.clone());

        let _ = view.tap_buy("a").await;
        let _ = view.tap_buy("a").await;

        assert_eq!(executor.commands().len(), 2);
    }

    #[tokio::test]
    async fn test_view_state_follows_feedback() {
        let executor = ScriptedExecutor::new(|command: &StoreCommand| match command {
            StoreCommand::FetchProducts { .. } => Some(MainAction::ProductsReceived(vec![
                Product::new("a", "A", "$1"),
            ])),
            StoreCommand::Purchase { product_id } => {
                Some(MainAction::StatusReceived(format!("🟢 {product_id}")))
            },
        });
        let view = view(executor);

        if let Ok(Some(mut handle)) = view.appear().await {
            let _ = handle.wait_with_timeout(Duration::from_secs(1)).await;
        }
        if let Ok(mut handle) = view.tap_buy("a").await {
            let _ = handle.wait_with_timeout(Duration::from_secs(1)).await;
        }

        let view_state = view.view_state().await;
        assert_eq!(view_state.products, vec![Product::new("a", "A", "$1")]);
        assert_eq!(view_state.status, "🟢 a");
    }
}
