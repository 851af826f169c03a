//! Shared types for the CleanStore order store
//!
//! Wire-shaped order values and the store error taxonomy used by every
//! storage backend and by store consumers.

pub mod order;

// Re-exports
pub use order::{
    Address, Order, PaymentMethod, ShipmentMethod, ShippingSpeed, StoreError, StoreErrorKind,
    StoreResult,
};
pub use serde::{Deserialize, Serialize};
