//! Order domain types
//!
//! - Order value and its nested address/payment/shipment models
//! - Store error taxonomy shared by every storage backend

pub mod error;
pub mod types;

// Re-exports
pub use error::{StoreError, StoreErrorKind, StoreResult};
pub use types::*;
