//! StoreState tests: backend selection, demo seeding, shutdown

use order_store::{Config, FatalShutdown, StoreBackend, StoreState};
use tempfile::TempDir;

#[tokio::test]
async fn test_memory_backend_seeds_demo_orders() {
    let mut config = Config::with_overrides("/nonexistent", StoreBackend::Memory);
    config.seed_demo_orders = true;

    let state = StoreState::initialize(&config).await.unwrap();
    let orders = state.store().fetch_orders().await.unwrap();
    let ids: Vec<_> = orders.iter().filter_map(|o| o.id.as_deref()).collect();
    assert_eq!(ids, vec!["abc123", "def456"]);

    // Not empty any more
    assert_eq!(state.seed_demo_orders().await, 0);
    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_durable_backend_persists_between_runs() {
    let dir = TempDir::new().unwrap();
    let work_dir = dir.path().join("work");
    let mut config =
        Config::with_overrides(work_dir.to_string_lossy().to_string(), StoreBackend::Durable);
    config.seed_demo_orders = true;

    let state = StoreState::initialize(&config).await.unwrap();
    assert_eq!(state.store().fetch_orders().await.unwrap().len(), 2);
    state.shutdown().await.unwrap();
    assert!(config.db_path().exists());

    // Second run finds the seeded orders and does not seed again
    let state = StoreState::initialize(&config).await.unwrap();
    let orders = state.store().fetch_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].first_name, "Amy");
    state.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_refuses_while_store_in_use() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::with_overrides(
        dir.path().to_string_lossy().to_string(),
        StoreBackend::Durable,
    );
    config.seed_demo_orders = false;

    let state = StoreState::initialize(&config).await.unwrap();
    let held = state.store();
    assert!(held.fetch_orders().await.unwrap().is_empty());

    let result = state.shutdown().await;
    assert!(matches!(result, Err(FatalShutdown::InUse(1))));
    drop(held);
}
