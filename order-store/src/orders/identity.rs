//! Identity and total assignment applied by stores on create

use rust_decimal::Decimal;
use shared::order::Order;

/// Total assigned to orders created without one
pub const DEFAULT_TOTAL: Decimal = Decimal::ONE;

/// Generate a fresh order id (UUID v4)
pub fn new_order_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Assign an id to a new order
///
/// Orders that already carry an id keep it. `is_taken` is asked about every
/// candidate so the new id never collides with an existing entry.
pub fn generate_order_id<E>(
    order: &mut Order,
    mut is_taken: impl FnMut(&str) -> Result<bool, E>,
) -> Result<(), E> {
    if order.id.is_some() {
        return Ok(());
    }
    loop {
        let candidate = new_order_id();
        if !is_taken(&candidate)? {
            order.id = Some(candidate);
            return Ok(());
        }
        tracing::warn!(order_id = %candidate, "Generated order id already taken, retrying");
    }
}

/// Replace an unset total with [`DEFAULT_TOTAL`]
pub fn calculate_order_total(order: &mut Order) {
    if order.total.is_none() {
        order.total = Some(DEFAULT_TOTAL);
    }
}
