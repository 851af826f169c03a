//! Order store error taxonomy
//!
//! Every store operation that can fail reports one of four kinds, each with
//! a deterministic message that embeds the offending id.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store operation errors
///
/// Equality compares both the kind and the message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StoreError {
    #[error("{0}")]
    CannotFetch(String),

    #[error("{0}")]
    CannotCreate(String),

    #[error("{0}")]
    CannotUpdate(String),

    #[error("{0}")]
    CannotDelete(String),
}

/// Error kind without the message (for log fields)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    Fetch,
    Create,
    Update,
    Delete,
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    // ========== Message constructors ==========

    pub fn fetch_miss(id: &str) -> Self {
        Self::CannotFetch(format!("Cannot fetch order with id {}", id))
    }

    pub fn fetch_all() -> Self {
        Self::CannotFetch("Cannot fetch orders".to_string())
    }

    pub fn create_failed(id: &str) -> Self {
        Self::CannotCreate(format!("Cannot create order with id {}", id))
    }

    pub fn update_miss(id: &str) -> Self {
        Self::CannotUpdate(format!("Cannot fetch order with id {} to update", id))
    }

    pub fn update_without_id() -> Self {
        Self::CannotUpdate("Cannot update order without an id".to_string())
    }

    pub fn update_failed(id: &str) -> Self {
        Self::CannotUpdate(format!("Cannot update order with id {}", id))
    }

    pub fn delete_miss(id: &str) -> Self {
        Self::CannotDelete(format!("Cannot fetch order with id {} to delete", id))
    }

    pub fn delete_failed(id: &str) -> Self {
        Self::CannotDelete(format!("Cannot delete order with id {}", id))
    }

    // ========== Accessors ==========

    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::CannotFetch(_) => StoreErrorKind::Fetch,
            Self::CannotCreate(_) => StoreErrorKind::Create,
            Self::CannotUpdate(_) => StoreErrorKind::Update,
            Self::CannotDelete(_) => StoreErrorKind::Delete,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::CannotFetch(msg)
            | Self::CannotCreate(msg)
            | Self::CannotUpdate(msg)
            | Self::CannotDelete(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_embed_id() {
        assert_eq!(
            StoreError::fetch_miss("abc123"),
            StoreError::CannotFetch("Cannot fetch order with id abc123".to_string())
        );
        assert_eq!(
            StoreError::delete_miss("x").message(),
            "Cannot fetch order with id x to delete"
        );
        assert_eq!(
            StoreError::update_miss("x").to_string(),
            "Cannot fetch order with id x to update"
        );
    }

    #[test]
    fn test_equality_compares_kind_and_message() {
        let msg = "same".to_string();
        assert_ne!(
            StoreError::CannotFetch(msg.clone()),
            StoreError::CannotDelete(msg.clone())
        );
        assert_ne!(
            StoreError::CannotFetch(msg.clone()),
            StoreError::CannotFetch("other".to_string())
        );
        assert_eq!(StoreError::CannotFetch(msg.clone()), StoreError::CannotFetch(msg));
    }

    #[test]
    fn test_kind() {
        assert_eq!(StoreError::fetch_all().kind(), StoreErrorKind::Fetch);
        assert_eq!(StoreError::create_failed("1").kind(), StoreErrorKind::Create);
        assert_eq!(StoreError::update_without_id().kind(), StoreErrorKind::Update);
        assert_eq!(StoreError::delete_failed("1").kind(), StoreErrorKind::Delete);
    }
}
