use serde::{Deserialize, Serialize};

use crate::db_types::{Money, Order};

/// Published exactly once per order, by the call that moved it from `created` to `confirmed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmedEvent {
    /// The order as it was stored by the transition, i.e. with `confirmed_at` set.
    pub order: Order,
    /// The order total at the moment of confirmation.
    pub total: Money,
}

impl OrderConfirmedEvent {
    pub fn new(order: Order, total: Money) -> Self {
        Self { order, total }
    }
}
