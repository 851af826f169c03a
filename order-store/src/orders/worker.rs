//! Orders worker
//!
//! Calls an [`OrdersStore`] off the caller's context and redelivers the
//! outcome on a [`MainQueue`], the single execution context that owns UI
//! state. Failures are logged and flattened the way screens consume them:
//! an empty list for fetch-all, `None` for single-order operations.

use super::traits::OrdersStore;
use shared::order::{Order, StoreResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Unit of work run on the main queue
pub type Job = Box<dyn FnOnce() + Send + 'static>;

// ========== Main queue ==========

/// Handle for posting jobs onto a [`MainQueue`]
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Job>,
}

impl Dispatcher {
    /// Post a job; returns `false` if the queue has been dropped
    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) -> bool {
        self.tx.send(Box::new(job)).is_ok()
    }
}

/// Serial execution context; jobs run one at a time in posting order
pub struct MainQueue {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl MainQueue {
    pub fn channel() -> (Dispatcher, MainQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Dispatcher { tx }, MainQueue { rx })
    }

    /// Wait for the next job and run it; `false` once every dispatcher is gone
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run jobs that are already queued, without waiting
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Run until every dispatcher has been dropped
    pub async fn run(mut self) {
        while self.run_next().await {}
        tracing::debug!("Main queue closed");
    }
}

// ========== Worker ==========

/// Store adapter that redelivers results on the main queue
#[derive(Clone)]
pub struct OrdersWorker {
    store: Arc<dyn OrdersStore>,
    main: Dispatcher,
}

impl OrdersWorker {
    pub fn new(store: Arc<dyn OrdersStore>, main: Dispatcher) -> Self {
        Self { store, main }
    }

    pub fn store(&self) -> &Arc<dyn OrdersStore> {
        &self.store
    }

    pub fn fetch_orders(&self, completion: impl FnOnce(Vec<Order>) + Send + 'static) {
        let store = self.store.clone();
        self.deliver(
            async move { store.fetch_orders().await },
            "fetch_orders",
            move |result| completion(result.unwrap_or_default()),
        );
    }

    pub fn fetch_order(&self, id: &str, completion: impl FnOnce(Option<Order>) + Send + 'static) {
        let store = self.store.clone();
        let id = id.to_string();
        self.deliver(
            async move { store.fetch_order(&id).await },
            "fetch_order",
            move |result| completion(result.ok()),
        );
    }

    pub fn create_order(
        &self,
        order: Order,
        completion: impl FnOnce(Option<Order>) + Send + 'static,
    ) {
        let store = self.store.clone();
        self.deliver(
            async move { store.create_order(order).await },
            "create_order",
            move |result| completion(result.ok()),
        );
    }

    pub fn update_order(
        &self,
        order: Order,
        completion: impl FnOnce(Option<Order>) + Send + 'static,
    ) {
        let store = self.store.clone();
        self.deliver(
            async move { store.update_order(order).await },
            "update_order",
            move |result| completion(result.ok()),
        );
    }

    pub fn delete_order(&self, id: &str, completion: impl FnOnce(Option<Order>) + Send + 'static) {
        let store = self.store.clone();
        let id = id.to_string();
        self.deliver(
            async move { store.delete_order(&id).await },
            "delete_order",
            move |result| completion(result.ok()),
        );
    }

    /// Run `call` on the runtime, then hand its result to `completion` on
    /// the main queue
    fn deliver<T, F>(
        &self,
        call: F,
        operation: &'static str,
        completion: impl FnOnce(StoreResult<T>) + Send + 'static,
    ) where
        T: Send + 'static,
        F: Future<Output = StoreResult<T>> + Send + 'static,
    {
        let main = self.main.clone();
        tokio::spawn(async move {
            let result = call.await;
            if let Err(e) = &result {
                tracing::warn!(operation, error = %e, "Order store operation failed");
            }
            if !main.dispatch(move || completion(result)) {
                tracing::warn!(operation, "Main queue closed, result dropped");
            }
        });
    }
}
