//! Order store module
//!
//! - **traits**: the [`OrdersStore`] contract every backend implements
//! - **identity**: id/total assignment applied on create
//! - **memory**: in-memory store (default and test backend)
//! - **storage**: redb persistence layer and record translation
//! - **durable**: redb-backed store with a single serialized writer
//! - **worker**: adapter redelivering results on the main queue
//!
//! # Data Flow
//!
//! ```text
//! caller → OrdersWorker → OrdersStore → (MemOrdersStore | DurableOrdersStore)
//!                                               ↓
//! caller ← MainQueue ←──────── Order(s) | StoreError
//! ```

pub mod durable;
pub mod identity;
pub mod memory;
pub mod storage;
pub mod traits;
pub mod worker;

// Re-exports
pub use durable::{DurableOrdersStore, FatalShutdown};
pub use memory::MemOrdersStore;
pub use storage::{OrderStorage, StorageError, StorageResult};
pub use traits::OrdersStore;
pub use worker::{Dispatcher, MainQueue, OrdersWorker};

// Re-export shared types for convenience
pub use shared::order::{Order, StoreError, StoreResult};
