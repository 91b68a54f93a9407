//! Storefront demo binary
//!
//! Runs the purchase screen against the simulated store and prints the
//! rendered view after every interaction.

use std::sync::Arc;
use std::time::Duration;
use storeflow_runtime::Store;
use storefront::{
    MainReducer, MainState, MainStore, MainView, PRODUCT_IDS, PurchaseClient, PurchaseExecutor,
    SimulatedStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EFFECT_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,storeflow_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Storefront: in-app purchase flow ===\n");

    let client = Arc::new(SimulatedStore::demo().with_latency(Duration::from_millis(150)));

    tokio::spawn({
        let client = Arc::clone(&client);
        async move { client.start_entitlement_sync().await }
    });

    let executor = PurchaseExecutor::from_arc(client);
    let store: MainStore<SimulatedStore> =
        Store::new(MainState::default(), MainReducer::new(), executor);
    let view = MainView::new(store);

    println!(">>> View appeared");
    if let Some(mut handle) = view.appear().await? {
        handle.wait_with_timeout(EFFECT_TIMEOUT).await?;
    }
    println!("{}\n", view.view_state().await.render());

    for product_id in PRODUCT_IDS.into_iter().chain(["com.temp.productZ"]) {
        println!(">>> Buy {product_id}");
        let mut handle = view.tap_buy(product_id).await?;
        handle.wait_with_timeout(EFFECT_TIMEOUT).await?;
        println!("{}\n", view.view_state().await.render());
    }

    view.store().shutdown_default().await?;
    println!("=== Demo Complete ===");
    Ok(())
}
