use std::sync::Arc;

use crate::core::{Config, StoreBackend};
use crate::orders::memory::demo_orders;
use crate::orders::{
    DurableOrdersStore, FatalShutdown, MemOrdersStore, OrdersStore, StorageError,
};

/// Opened store backend
enum Backend {
    Memory(Arc<MemOrdersStore>),
    Durable(Arc<DurableOrdersStore>),
}

/// 存储状态 - 持有已打开的订单存储
///
/// 按配置打开内存或 redb 存储，通过 [`store()`](Self::store) 以
/// `Arc<dyn OrdersStore>` 形式注入给 worker 等消费者。
///
/// # 使用示例
///
/// ```ignore
/// let state = StoreState::initialize(&config).await?;
/// let worker = OrdersWorker::new(state.store(), dispatcher);
/// // ... drop every consumer, then
/// state.shutdown().await?;
/// ```
pub struct StoreState {
    pub config: Config,
    backend: Backend,
}

impl StoreState {
    /// Open the configured backend, creating the work dir if needed
    ///
    /// Seeds the demo orders into an empty store when
    /// `config.seed_demo_orders` is set.
    pub async fn initialize(config: &Config) -> Result<Self, StorageError> {
        let backend = match config.backend {
            StoreBackend::Memory => Backend::Memory(Arc::new(MemOrdersStore::new())),
            StoreBackend::Durable => {
                if let Err(e) = std::fs::create_dir_all(&config.work_dir) {
                    tracing::warn!(work_dir = %config.work_dir, error = %e, "Failed to create work dir");
                }
                Backend::Durable(Arc::new(DurableOrdersStore::open(
                    config.db_path(),
                    config.queue_capacity,
                )?))
            }
        };
        tracing::info!(backend = ?config.backend, "Order store initialized");

        let state = Self {
            config: config.clone(),
            backend,
        };
        if config.seed_demo_orders {
            state.seed_demo_orders().await;
        }
        Ok(state)
    }

    /// Store handle for consumers
    pub fn store(&self) -> Arc<dyn OrdersStore> {
        match &self.backend {
            Backend::Memory(store) => store.clone(),
            Backend::Durable(store) => store.clone(),
        }
    }

    /// Insert the demo orders if the store holds none
    ///
    /// Returns how many orders were seeded.
    pub async fn seed_demo_orders(&self) -> usize {
        let store = self.store();
        match store.fetch_orders().await {
            Ok(existing) if !existing.is_empty() => return 0,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Skipping demo seed, store not readable");
                return 0;
            }
        }

        let mut seeded = 0;
        for order in demo_orders() {
            match store.create_order(order).await {
                Ok(_) => seeded += 1,
                Err(e) => tracing::warn!(error = %e, "Failed to seed demo order"),
            }
        }
        tracing::info!(count = seeded, "Seeded demo orders");
        seeded
    }

    /// Close the store
    ///
    /// Every handle from [`store()`](Self::store) must be dropped first; an
    /// error means durable writes may be lost.
    pub async fn shutdown(self) -> Result<(), FatalShutdown> {
        match self.backend {
            Backend::Memory(_) => Ok(()),
            Backend::Durable(store) => match Arc::try_unwrap(store) {
                Ok(store) => store.shutdown().await,
                Err(store) => Err(FatalShutdown::InUse(Arc::strong_count(&store) - 1)),
            },
        }
    }
}
