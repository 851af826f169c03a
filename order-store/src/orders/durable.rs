//! Durable order store - redb 持久化订单存储
//!
//! All operations, reads included, go through one bounded queue into a
//! single writer task. The writer runs each operation to completion on the
//! blocking pool before taking the next one, so operations are serialized
//! and complete in the order they were issued. Every mutation is one redb
//! transaction.
//!
//! ```text
//! caller ──cmd──> mpsc queue ──> StoreWriter (one at a time)
//!    ^                               │ spawn_blocking
//!    └────────── oneshot reply ───── OrderStorage (redb)
//! ```

use super::identity::{calculate_order_total, generate_order_id};
use super::storage::{OrderStorage, StorageError, StorageResult};
use super::traits::OrdersStore;
use async_trait::async_trait;
use shared::order::{Order, StoreError, StoreResult};
use std::path::Path;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Default capacity of the command queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Store could not be closed safely
///
/// Unlike per-operation [`StoreError`]s this is unrecoverable: data may be
/// lost and the process must not carry on as if it were saved.
#[derive(Debug, Error)]
pub enum FatalShutdown {
    #[error("Failed to flush order storage: {0}")]
    Flush(#[from] StorageError),

    #[error("Store writer task failed: {0}")]
    Writer(#[from] tokio::task::JoinError),

    #[error("Store still referenced by {0} handle(s), cannot close")]
    InUse(usize),
}

/// Queued store command
enum StoreCommand {
    FetchAll {
        reply: oneshot::Sender<StoreResult<Vec<Order>>>,
    },
    Fetch {
        id: String,
        reply: oneshot::Sender<StoreResult<Order>>,
    },
    Create {
        order: Box<Order>,
        reply: oneshot::Sender<StoreResult<Order>>,
    },
    Update {
        order: Box<Order>,
        reply: oneshot::Sender<StoreResult<Order>>,
    },
    Delete {
        id: String,
        reply: oneshot::Sender<StoreResult<Order>>,
    },
}

/// Order store persisted in a redb database file
pub struct DurableOrdersStore {
    tx: mpsc::Sender<StoreCommand>,
    storage: OrderStorage,
    writer: JoinHandle<()>,
}

impl DurableOrdersStore {
    /// Open or create the database at `path` and start the writer task
    ///
    /// Must be called inside a tokio runtime.
    pub fn open(path: impl AsRef<Path>, queue_capacity: usize) -> StorageResult<Self> {
        let path = path.as_ref();
        let storage = OrderStorage::open(path)?;
        tracing::info!(path = %path.display(), "Order storage opened");
        Ok(Self::with_storage(storage, queue_capacity))
    }

    /// Store over an in-memory redb database
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::with_storage(
            OrderStorage::open_in_memory()?,
            DEFAULT_QUEUE_CAPACITY,
        ))
    }

    pub fn with_storage(storage: OrderStorage, queue_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let writer = StoreWriter {
            storage: storage.clone(),
        };
        let writer = tokio::spawn(writer.run(rx));
        Self {
            tx,
            storage,
            writer,
        }
    }

    /// Drain queued operations, stop the writer and flush storage
    ///
    /// An error here means writes may not be on disk; treat it as fatal.
    pub async fn shutdown(self) -> Result<(), FatalShutdown> {
        let Self {
            tx,
            storage,
            writer,
        } = self;
        drop(tx);
        writer.await?;

        let flushed = tokio::task::spawn_blocking(move || storage.flush()).await?;
        if let Err(e) = flushed {
            tracing::error!(error = %e, "Failed to flush order storage on shutdown, data may be lost");
            return Err(e.into());
        }
        tracing::info!("Order storage flushed and closed");
        Ok(())
    }

    /// Send a command and wait for its reply
    ///
    /// A closed queue or dropped reply maps to `on_closed`.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<StoreResult<T>>) -> StoreCommand,
        on_closed: impl FnOnce() -> StoreError,
    ) -> StoreResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(build(reply_tx)).await.is_err() {
            tracing::error!("Store writer is gone, command not queued");
            return Err(on_closed());
        }
        match reply_rx.await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("Store writer dropped a reply");
                Err(on_closed())
            }
        }
    }
}

#[async_trait]
impl OrdersStore for DurableOrdersStore {
    async fn fetch_orders(&self) -> StoreResult<Vec<Order>> {
        self.request(
            |reply| StoreCommand::FetchAll { reply },
            StoreError::fetch_all,
        )
        .await
    }

    async fn fetch_order(&self, id: &str) -> StoreResult<Order> {
        self.request(
            |reply| StoreCommand::Fetch {
                id: id.to_string(),
                reply,
            },
            || StoreError::fetch_miss(id),
        )
        .await
    }

    async fn create_order(&self, order: Order) -> StoreResult<Order> {
        let id = order.id_or_placeholder().to_string();
        self.request(
            |reply| StoreCommand::Create {
                order: Box::new(order),
                reply,
            },
            || StoreError::create_failed(&id),
        )
        .await
    }

    async fn update_order(&self, order: Order) -> StoreResult<Order> {
        let id = order.id_or_placeholder().to_string();
        self.request(
            |reply| StoreCommand::Update {
                order: Box::new(order),
                reply,
            },
            || StoreError::update_failed(&id),
        )
        .await
    }

    async fn delete_order(&self, id: &str) -> StoreResult<Order> {
        self.request(
            |reply| StoreCommand::Delete {
                id: id.to_string(),
                reply,
            },
            || StoreError::delete_failed(id),
        )
        .await
    }
}

// ========== Writer ==========

/// Single consumer of the command queue
struct StoreWriter {
    storage: OrderStorage,
}

impl StoreWriter {
    async fn run(self, mut rx: mpsc::Receiver<StoreCommand>) {
        tracing::debug!("Store writer started");
        while let Some(command) = rx.recv().await {
            let storage = self.storage.clone();
            // redb is synchronous; keep it off the async workers
            let handled = tokio::task::spawn_blocking(move || execute(&storage, command)).await;
            if let Err(e) = handled {
                tracing::error!(error = %e, "Store command panicked");
            }
        }
        tracing::debug!("Store queue closed, writer stopped");
    }
}

fn execute(storage: &OrderStorage, command: StoreCommand) {
    // A caller that stopped waiting is not an error
    match command {
        StoreCommand::FetchAll { reply } => {
            let _ = reply.send(fetch_all(storage));
        }
        StoreCommand::Fetch { id, reply } => {
            let _ = reply.send(fetch(storage, &id));
        }
        StoreCommand::Create { order, reply } => {
            let _ = reply.send(create(storage, *order));
        }
        StoreCommand::Update { order, reply } => {
            let _ = reply.send(update(storage, *order));
        }
        StoreCommand::Delete { id, reply } => {
            let _ = reply.send(delete(storage, &id));
        }
    }
}

fn fetch_all(storage: &OrderStorage) -> StoreResult<Vec<Order>> {
    storage.get_all_orders().map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch orders");
        StoreError::fetch_all()
    })
}

fn fetch(storage: &OrderStorage, id: &str) -> StoreResult<Order> {
    match storage.get_order(id) {
        Ok(Some(order)) => Ok(order),
        Ok(None) => Err(StoreError::fetch_miss(id)),
        Err(e) => {
            tracing::error!(order_id = %id, error = %e, "Failed to fetch order");
            Err(StoreError::fetch_miss(id))
        }
    }
}

/// Outcome of a write transaction that found nothing to act on
enum Missing {
    Duplicate,
    NotFound,
}

fn create(storage: &OrderStorage, mut order: Order) -> StoreResult<Order> {
    let requested_id = order.id_or_placeholder().to_string();
    let result = (|| -> StorageResult<Result<Order, Missing>> {
        let txn = storage.begin_write()?;
        if let Some(id) = order.id.as_deref()
            && storage.contains_order_txn(&txn, id)?
        {
            return Ok(Err(Missing::Duplicate));
        }
        generate_order_id(&mut order, |candidate| storage.contains_order_txn(&txn, candidate))?;
        calculate_order_total(&mut order);

        // Stored form (street2 and timestamp normalization); nothing may fail after commit
        let created = storage.insert_order(&txn, &order)?.to_order()?;
        txn.commit()?;
        Ok(Ok(created))
    })();

    match result {
        Ok(Ok(created)) => {
            tracing::debug!(order_id = %created.id_or_placeholder(), "Order created");
            Ok(created)
        }
        Ok(Err(_)) => {
            tracing::warn!(order_id = %requested_id, "Create rejected: id already exists");
            Err(StoreError::create_failed(&requested_id))
        }
        Err(e) => {
            tracing::error!(order_id = %requested_id, error = %e, "Failed to create order");
            Err(StoreError::create_failed(order.id_or_placeholder()))
        }
    }
}

fn update(storage: &OrderStorage, order: Order) -> StoreResult<Order> {
    let Some(id) = order.id.clone() else {
        return Err(StoreError::update_without_id());
    };

    let result = (|| -> StorageResult<Result<Order, Missing>> {
        let txn = storage.begin_write()?;
        let Some(record) = storage.replace_order(&txn, &order)? else {
            return Ok(Err(Missing::NotFound));
        };
        let updated = record.to_order()?;
        txn.commit()?;
        Ok(Ok(updated))
    })();

    match result {
        Ok(Ok(updated)) => {
            tracing::debug!(order_id = %id, "Order updated");
            Ok(updated)
        }
        Ok(Err(_)) => Err(StoreError::update_miss(&id)),
        Err(e) => {
            tracing::error!(order_id = %id, error = %e, "Failed to update order");
            Err(StoreError::update_failed(&id))
        }
    }
}

fn delete(storage: &OrderStorage, id: &str) -> StoreResult<Order> {
    let result = (|| -> StorageResult<Result<Order, Missing>> {
        let txn = storage.begin_write()?;
        let Some(removed) = storage.remove_order(&txn, id)? else {
            return Ok(Err(Missing::NotFound));
        };
        txn.commit()?;
        Ok(Ok(removed))
    })();

    match result {
        Ok(Ok(deleted)) => {
            tracing::debug!(order_id = %id, "Order deleted");
            Ok(deleted)
        }
        Ok(Err(_)) => Err(StoreError::delete_miss(id)),
        Err(e) => {
            tracing::error!(order_id = %id, error = %e, "Failed to delete order");
            Err(StoreError::delete_failed(id))
        }
    }
}
