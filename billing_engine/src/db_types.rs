use std::{fmt::Display, str::FromStr};

pub use billing_common::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

/// The payment status that qualifies an order for confirmation. The comparison is exact and case-sensitive.
pub const PAID_STATUS: &str = "paid";
/// The status given to new payments when the caller does not supply one.
pub const DEFAULT_PAYMENT_STATUS: &str = "pending";
/// The quantity of an order item when none is given.
pub const DEFAULT_QUANTITY: i64 = 1;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------        Product        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub cost: Money,
}

//--------------------------------------      NewProduct       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub content: String,
    pub cost: Money,
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, content: S, cost: Money) -> Self {
        Self { name: name.into(), content: content.into(), cost }
    }
}

//--------------------------------------     ProductUpdate     ---------------------------------------------------------
/// A partial update of a product. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Money>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none() && self.cost.is_none()
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_cost(mut self, cost: Money) -> Self {
        self.cost = Some(cost);
        self
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The lifecycle of an order. Status only ever moves forward: `Created` -> `Confirmed` -> `Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order has been placed. This is the only status that can be confirmed.
    #[default]
    Created,
    /// A qualifying payment was found and the order was confirmed.
    Confirmed,
    /// The order has been fulfilled. Set by an operator only.
    Completed,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Created => write!(f, "created"),
            OrderStatusType::Confirmed => write!(f, "confirmed"),
            OrderStatusType::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------        Order       ---------------------------------------------------------
/// An order record. The order total is never stored; see [`crate::helpers::order_total`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn is_confirmed(&self) -> bool {
        self.status == OrderStatusType::Confirmed
    }
}

//--------------------------------------      OrderItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

//--------------------------------------     NewOrderItem     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    #[serde(alias = "product")]
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    DEFAULT_QUANTITY
}

impl NewOrderItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

//--------------------------------------       NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// The line items of the order, in the order they were submitted.
    pub items: Vec<NewOrderItem>,
    /// The time the order was placed
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(items: Vec<NewOrderItem>) -> Self {
        Self { items, created_at: Utc::now() }
    }
}

//--------------------------------------    PaymentMethod     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    BankTransfer,
    Paypal,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Paypal => write!(f, "paypal"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "bank_transfer" => Ok(Self::BankTransfer),
            "paypal" => Ok(Self::Paypal),
            s => Err(ConversionError(format!("Invalid payment method: {s}"))),
        }
    }
}

//--------------------------------------       Payment        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    /// The amount resolved when the payment was created. It is never recalculated.
    pub amount: Money,
    pub status: String,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// True if this payment qualifies its order for confirmation.
    pub fn is_paid(&self) -> bool {
        self.status == PAID_STATUS
    }
}

//--------------------------------------      NewPayment      ---------------------------------------------------------
/// A payment whose amount has already been resolved, ready to be written to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub order_id: i64,
    pub amount: Money,
    pub status: String,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl NewPayment {
    pub fn new(order_id: i64, amount: Money, status: String, payment_method: PaymentMethod) -> Self {
        Self { order_id, amount, status, payment_method, created_at: Utc::now() }
    }
}
