//! Order value types
//!
//! An [`Order`] is plain data: contact info, billing/shipping addresses,
//! payment and shipment method, identity and total. Stores own the
//! authoritative copies; callers hand values in and get values back.

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two timestamps closer than this compare equal.
///
/// Persisted timestamps may lose sub-second precision, so order equality
/// tolerates it.
pub const DATE_EQUALITY_TOLERANCE: TimeDelta = TimeDelta::seconds(1);

/// Compare two instants with [`DATE_EQUALITY_TOLERANCE`]
pub fn same_instant(a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
    (*a - *b).abs() < DATE_EQUALITY_TOLERANCE
}

// ============================================================================
// Supporting models
// ============================================================================

/// Postal address (billing or shipment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Payment method. The store performs no validation on these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub credit_card_number: String,
    pub expiration_date: DateTime<Utc>,
    pub cvv: String,
}

impl PartialEq for PaymentMethod {
    fn eq(&self, other: &Self) -> bool {
        self.credit_card_number == other.credit_card_number
            && same_instant(&self.expiration_date, &other.expiration_date)
            && self.cvv == other.cvv
    }
}

/// Shipping speed
///
/// Raw values are stable: they are what the durable store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingSpeed {
    #[default]
    Standard = 0,
    OneDay = 1,
    TwoDay = 2,
}

impl ShippingSpeed {
    /// Order in which the create-order screen offers the speeds
    pub const PICKER_ORDER: [ShippingSpeed; 3] = [
        ShippingSpeed::Standard,
        ShippingSpeed::TwoDay,
        ShippingSpeed::OneDay,
    ];

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Standard),
            1 => Some(Self::OneDay),
            2 => Some(Self::TwoDay),
            _ => None,
        }
    }

    /// Fixed display label
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard Shipping",
            Self::OneDay => "One-Day Shipping",
            Self::TwoDay => "Two-Day Shipping",
        }
    }
}

/// Shipment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShipmentMethod {
    pub speed: ShippingSpeed,
}

impl ShipmentMethod {
    pub fn new(speed: ShippingSpeed) -> Self {
        Self { speed }
    }
}

impl fmt::Display for ShipmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.speed.label())
    }
}

// ============================================================================
// Order
// ============================================================================

/// Customer order
///
/// `id` is `None` until a store assigns one on create; after that it never
/// changes. `total == None` means "unset": stores replace it with
/// [`Decimal::ONE`] on create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    // Contact info
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,

    // Payment info
    pub billing_address: Address,
    pub payment_method: PaymentMethod,

    // Shipping info
    pub shipment_address: Address,
    pub shipment_method: ShipmentMethod,

    pub id: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub total: Option<Decimal>,
}

impl Order {
    /// True until a store has assigned an id
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Id for messages and log fields (`<none>` when unassigned)
    pub fn id_or_placeholder(&self) -> &str {
        self.id.as_deref().unwrap_or("<none>")
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.phone == other.phone
            && self.email == other.email
            && self.billing_address == other.billing_address
            && self.payment_method == other.payment_method
            && self.shipment_address == other.shipment_address
            && self.shipment_method == other.shipment_method
            && self.id == other.id
            && same_instant(&self.date, &other.date)
            && self.total == other.total
    }
}
