//! Test seeds and contract checks shared by the store tests
#![allow(dead_code)]

use chrono::{TimeDelta, Utc};
use order_store::OrdersStore;
use rust_decimal::Decimal;
use shared::order::{Address, Order, PaymentMethod, ShipmentMethod, ShippingSpeed, StoreError};
use std::collections::HashSet;
use std::str::FromStr;

// ========== Seeds ==========

pub fn billing_address() -> Address {
    Address {
        street1: "1 Infinite Loop".to_string(),
        street2: Some(String::new()),
        city: "Cupertino".to_string(),
        state: "CA".to_string(),
        zip: "95014".to_string(),
    }
}

pub fn shipment_address() -> Address {
    Address {
        street1: "One Microsoft Way".to_string(),
        street2: Some(String::new()),
        city: "Redmond".to_string(),
        state: "WA".to_string(),
        zip: "98052-7329".to_string(),
    }
}

fn customer(first: &str, last: &str, phone: &str, total: &str) -> Order {
    Order {
        first_name: first.to_string(),
        last_name: last.to_string(),
        phone: phone.to_string(),
        email: format!(
            "{}.{}@clean-swift.com",
            first.to_lowercase(),
            last.to_lowercase()
        ),
        billing_address: billing_address(),
        payment_method: PaymentMethod {
            credit_card_number: "1234-123456-1234".to_string(),
            expiration_date: Utc::now(),
            cvv: "999".to_string(),
        },
        shipment_address: shipment_address(),
        shipment_method: ShipmentMethod::new(ShippingSpeed::Standard),
        id: None,
        date: Utc::now(),
        total: Some(Decimal::from_str(total).unwrap()),
    }
}

/// New orders (no id yet)
pub fn amy() -> Order {
    customer("Amy", "Apple", "111-111-1111", "1.23")
}

pub fn bob() -> Order {
    customer("Bob", "Battery", "222-222-2222", "2.22")
}

pub fn chris() -> Order {
    customer("Chris", "Camera", "333-333-3333", "3.33")
}

pub fn tomorrow() -> chrono::DateTime<Utc> {
    Utc::now() + TimeDelta::days(1)
}

// ========== Contract checks ==========
//
// Every backend must pass these; each store test file runs them against a
// freshly constructed store.

pub async fn check_empty_store_fetches_empty_list(store: &impl OrdersStore) {
    assert_eq!(store.fetch_orders().await, Ok(vec![]));
}

pub async fn check_create_then_fetch_round_trip(store: &impl OrdersStore) {
    let created = store.create_order(amy()).await.unwrap();
    let id = created.id.clone().expect("create assigns an id");
    assert_eq!(created.total, Some(Decimal::from_str("1.23").unwrap()));

    let fetched = store.fetch_order(&id).await.unwrap();
    assert_eq!(fetched, created);
}

pub async fn check_created_ids_are_unique(store: &impl OrdersStore) {
    let mut ids = HashSet::new();
    for _ in 0..20 {
        let created = store.create_order(bob()).await.unwrap();
        ids.insert(created.id.unwrap());
    }
    assert_eq!(ids.len(), 20);
    assert_eq!(store.fetch_orders().await.unwrap().len(), 20);
}

pub async fn check_default_total(store: &impl OrdersStore) {
    let mut order = chris();
    order.total = None;

    let created = store.create_order(order).await.unwrap();
    assert_eq!(created.total, Some(Decimal::ONE));

    let fetched = store.fetch_order(created.id.as_deref().unwrap()).await.unwrap();
    assert_eq!(fetched.total, Some(Decimal::ONE));
}

pub async fn check_fetch_all_completeness(store: &impl OrdersStore) {
    let a = store.create_order(amy()).await.unwrap();
    let b = store.create_order(bob()).await.unwrap();

    let orders = store.fetch_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.contains(&a));
    assert!(orders.contains(&b));
}

pub async fn check_update_miss_leaves_store_unchanged(store: &impl OrdersStore) {
    let existing = store.create_order(amy()).await.unwrap();
    let before = store.fetch_orders().await.unwrap();

    let mut ghost = bob();
    ghost.id = Some("no-such-order".to_string());
    assert_eq!(
        store.update_order(ghost).await,
        Err(StoreError::CannotUpdate(
            "Cannot fetch order with id no-such-order to update".to_string()
        ))
    );

    let after = store.fetch_orders().await.unwrap();
    assert_eq!(after, before);
    assert_eq!(after, vec![existing]);
}

pub async fn check_delete_then_fetch(store: &impl OrdersStore) {
    let created = store.create_order(amy()).await.unwrap();
    let id = created.id.clone().unwrap();

    let deleted = store.delete_order(&id).await.unwrap();
    assert_eq!(deleted, created);

    assert_eq!(
        store.fetch_order(&id).await,
        Err(StoreError::CannotFetch(format!("Cannot fetch order with id {}", id)))
    );
    assert_eq!(
        store.delete_order(&id).await,
        Err(StoreError::CannotDelete(format!(
            "Cannot fetch order with id {} to delete",
            id
        )))
    );
}

pub async fn check_fetch_miss_message(store: &impl OrdersStore) {
    assert_eq!(
        store.fetch_order("abc123").await,
        Err(StoreError::CannotFetch(
            "Cannot fetch order with id abc123".to_string()
        ))
    );
}

/// Create Amy, fetch her, move her date to tomorrow, delete her
pub async fn check_amy_scenario(store: &impl OrdersStore) {
    let created = store.create_order(amy()).await.unwrap();
    let id = created.id.clone().expect("create assigns an id");
    assert_eq!(created.first_name, "Amy");
    assert_eq!(created.total, Some(Decimal::from_str("1.23").unwrap()));

    let fetched = store.fetch_order(&id).await.unwrap();
    assert_eq!(fetched, created);

    let mut moved = fetched.clone();
    moved.date = tomorrow();
    let updated = store.update_order(moved.clone()).await.unwrap();
    assert_eq!(updated, moved);

    let refetched = store.fetch_order(&id).await.unwrap();
    assert_eq!(refetched, moved);
    assert_ne!(refetched, created, "date changed");
    let mut date_restored = refetched.clone();
    date_restored.date = created.date;
    assert_eq!(date_restored, created, "only the date changed");

    store.delete_order(&id).await.unwrap();
    assert!(matches!(
        store.fetch_order(&id).await,
        Err(StoreError::CannotFetch(_))
    ));
}

/// Run every contract check, each on a fresh store from `make`
pub async fn check_contract<S, F>(mut make: F)
where
    S: OrdersStore,
    F: FnMut() -> S,
{
    check_empty_store_fetches_empty_list(&make()).await;
    check_create_then_fetch_round_trip(&make()).await;
    check_created_ids_are_unique(&make()).await;
    check_default_total(&make()).await;
    check_fetch_all_completeness(&make()).await;
    check_update_miss_leaves_store_unchanged(&make()).await;
    check_delete_then_fetch(&make()).await;
    check_fetch_miss_message(&make()).await;
    check_amy_scenario(&make()).await;
}
