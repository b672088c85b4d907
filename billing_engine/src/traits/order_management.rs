use chrono::{DateTime, Utc};

use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderItem},
    traits::{BillingError, ConfirmationOutcome, PricedItem},
};

/// Behaviour for managing orders and their line items.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores the order and all of its items in a single atomic transaction. If any item references a product that
    /// does not exist, nothing is stored and [`BillingError::ProductNotFound`] is returned.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, BillingError>;

    /// Fetches the order with the given id. If it does not exist, `None` is returned.
    async fn fetch_order(&self, id: i64) -> Result<Option<Order>, BillingError>;

    /// Fetches all orders, in ascending id order.
    async fn fetch_orders(&self) -> Result<Vec<Order>, BillingError>;

    /// Fetches the items of an order in insertion order, each joined with the current name and cost of the product it
    /// references. An item whose product can not be resolved carries `None` for those fields.
    async fn fetch_priced_items(&self, order_id: i64) -> Result<Vec<PricedItem>, BillingError>;

    /// Adds an item to an order that still has status `created`.
    async fn insert_order_item(&self, order_id: i64, item: NewOrderItem) -> Result<OrderItem, BillingError>;

    /// Deletes the order, along with all of its items and payments. Returns the deleted record.
    async fn delete_order(&self, id: i64) -> Result<Order, BillingError>;

    /// Atomically moves the order from `created` to `confirmed`, stamping `confirmed_at`, if and only if at least one
    /// of its payments has a status exactly equal to `paid_status`.
    ///
    /// The guard and the status write happen in a single statement, so when several callers race to confirm the same
    /// order, exactly one of them sees [`ConfirmationOutcome::Confirmed`]. The others see
    /// [`ConfirmationOutcome::AlreadyConfirmed`].
    ///
    /// Returns [`BillingError::OrderNotFound`] if the order does not exist.
    async fn confirm_order(
        &self,
        id: i64,
        paid_status: &str,
        confirmed_at: DateTime<Utc>,
    ) -> Result<ConfirmationOutcome, BillingError>;

    /// Operator action that moves a confirmed order to `completed`. Orders in any other status are refused with
    /// [`BillingError::OrderModificationForbidden`].
    async fn complete_order(&self, id: i64) -> Result<Order, BillingError>;
}
