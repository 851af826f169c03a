//! redb-based persistence layer for orders
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `OrderRecord` (JSON) | Persisted orders |
//! | `sequence_counter` | `"order_seq"` | `u64` | Insertion sequence |
//!
//! # Durability
//!
//! redb commits are durable as soon as `commit()` returns and readers see
//! MVCC snapshots, so a read never observes a half-written transaction.
//! Callers that need several steps to be atomic share one
//! [`WriteTransaction`] between the `*_txn` methods.

use chrono::{DateTime, Utc};
use redb::backends::InMemoryBackend;
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, StorageBackend,
    TableDefinition, WriteTransaction,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::order::{Address, Order, PaymentMethod, ShipmentMethod, ShippingSpeed};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Table for storing orders: key = order_id, value = JSON-serialized OrderRecord
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for sequence counter: key = "order_seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const ORDER_SEQ_KEY: &str = "order_seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order has no id")]
    MissingId,

    #[error("Corrupted record for order {0}: {1}")]
    Corrupted(String, String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// ========== Persisted record ==========

/// Persisted shape of an [`Order`]
///
/// Flat columns, optional values stored as plain strings. `street2`
/// persists as `""` when absent and reads back as `Some("")`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Insertion sequence (fetch-all ordering)
    pub seq: u64,
    pub id: String,

    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,

    pub billing_street1: String,
    pub billing_street2: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_zip: String,

    pub shipment_street1: String,
    pub shipment_street2: String,
    pub shipment_city: String,
    pub shipment_state: String,
    pub shipment_zip: String,

    pub credit_card_number: String,
    /// Unix millis
    pub expiration_date: i64,
    pub cvv: String,

    pub shipment_speed: i32,
    /// Unix millis
    pub date: i64,
    /// Decimal string, `None` when unset
    pub total: Option<String>,
}

impl OrderRecord {
    pub fn from_order(seq: u64, order: &Order) -> StorageResult<Self> {
        let id = order.id.clone().ok_or(StorageError::MissingId)?;
        let billing = &order.billing_address;
        let shipment = &order.shipment_address;

        Ok(Self {
            seq,
            id,
            first_name: order.first_name.clone(),
            last_name: order.last_name.clone(),
            phone: order.phone.clone(),
            email: order.email.clone(),
            billing_street1: billing.street1.clone(),
            billing_street2: billing.street2.clone().unwrap_or_default(),
            billing_city: billing.city.clone(),
            billing_state: billing.state.clone(),
            billing_zip: billing.zip.clone(),
            shipment_street1: shipment.street1.clone(),
            shipment_street2: shipment.street2.clone().unwrap_or_default(),
            shipment_city: shipment.city.clone(),
            shipment_state: shipment.state.clone(),
            shipment_zip: shipment.zip.clone(),
            credit_card_number: order.payment_method.credit_card_number.clone(),
            expiration_date: order.payment_method.expiration_date.timestamp_millis(),
            cvv: order.payment_method.cvv.clone(),
            shipment_speed: order.shipment_method.speed.as_raw(),
            date: order.date.timestamp_millis(),
            total: order.total.map(|t| t.to_string()),
        })
    }

    pub fn to_order(&self) -> StorageResult<Order> {
        let speed = ShippingSpeed::from_raw(self.shipment_speed).ok_or_else(|| {
            self.corrupted(format!("unknown shipment speed {}", self.shipment_speed))
        })?;
        let total = self
            .total
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|e| self.corrupted(format!("invalid total: {}", e)))?;

        Ok(Order {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            billing_address: Address {
                street1: self.billing_street1.clone(),
                street2: Some(self.billing_street2.clone()),
                city: self.billing_city.clone(),
                state: self.billing_state.clone(),
                zip: self.billing_zip.clone(),
            },
            payment_method: PaymentMethod {
                credit_card_number: self.credit_card_number.clone(),
                expiration_date: self.millis_to_date(self.expiration_date, "expiration_date")?,
                cvv: self.cvv.clone(),
            },
            shipment_address: Address {
                street1: self.shipment_street1.clone(),
                street2: Some(self.shipment_street2.clone()),
                city: self.shipment_city.clone(),
                state: self.shipment_state.clone(),
                zip: self.shipment_zip.clone(),
            },
            shipment_method: ShipmentMethod::new(speed),
            id: Some(self.id.clone()),
            date: self.millis_to_date(self.date, "date")?,
            total,
        })
    }

    fn millis_to_date(&self, millis: i64, field: &str) -> StorageResult<DateTime<Utc>> {
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| self.corrupted(format!("{} out of range: {}", field, millis)))
    }

    fn corrupted(&self, reason: String) -> StorageError {
        StorageError::Corrupted(self.id.clone(), reason)
    }
}

// ========== Storage ==========

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl OrderStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, memory-only deployments)
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::open_with_backend(InMemoryBackend::new())
    }

    /// Open a database over a custom redb storage backend
    pub fn open_with_backend(backend: impl StorageBackend) -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(backend)?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(ORDER_SEQ_KEY)?.is_none() {
                seq_table.insert(ORDER_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Commit an empty write transaction so everything before it is on disk
    pub fn flush(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        txn.commit()?;
        Ok(())
    }

    // ========== Sequence Operations ==========

    /// Increment and return the insertion sequence
    pub fn increment_sequence(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table
            .get(ORDER_SEQ_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(ORDER_SEQ_KEY, next)?;
        Ok(next)
    }

    // ========== Order Operations ==========

    /// Check if an order exists (within transaction)
    pub fn contains_order_txn(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<bool> {
        let table = txn.open_table(ORDERS_TABLE)?;
        Ok(table.get(order_id)?.is_some())
    }

    /// Get the stored record (within transaction)
    pub fn get_record_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<OrderRecord>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => {
                let record: OrderRecord = serde_json::from_slice(value.value())?;
                Ok(Some(record.to_order()?))
            }
            None => Ok(None),
        }
    }

    /// Get all orders in insertion order
    pub fn get_all_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut records = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let record: OrderRecord = serde_json::from_slice(value.value())?;
            records.push(record);
        }

        records.sort_by_key(|r| r.seq);
        records.iter().map(OrderRecord::to_order).collect()
    }

    /// Number of stored orders
    pub fn count_orders(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        Ok(table.len()?)
    }

    /// Insert a new order under the next sequence number
    ///
    /// Returns the record as written.
    pub fn insert_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<OrderRecord> {
        let seq = self.increment_sequence(txn)?;
        let record = OrderRecord::from_order(seq, order)?;
        self.store_record(txn, &record)?;
        Ok(record)
    }

    /// Overwrite an existing order, keeping its position
    ///
    /// Returns the record as written, or `None` if no order with that id
    /// exists.
    pub fn replace_order(
        &self,
        txn: &WriteTransaction,
        order: &Order,
    ) -> StorageResult<Option<OrderRecord>> {
        let order_id = order.id.as_deref().ok_or(StorageError::MissingId)?;
        let Some(existing) = self.get_record_txn(txn, order_id)? else {
            return Ok(None);
        };
        let record = OrderRecord::from_order(existing.seq, order)?;
        self.store_record(txn, &record)?;
        Ok(Some(record))
    }

    /// Remove an order, returning what was stored
    pub fn remove_order(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<Option<Order>> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let removed = match table.remove(order_id)? {
            Some(value) => Some(serde_json::from_slice::<OrderRecord>(value.value())?),
            None => None,
        };
        removed.map(|r| r.to_order()).transpose()
    }

    fn store_record(&self, txn: &WriteTransaction, record: &OrderRecord) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(record)?;
        table.insert(record.id.as_str(), value.as_slice())?;
        Ok(())
    }
}
