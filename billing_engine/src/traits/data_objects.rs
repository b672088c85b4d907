use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    db_types::{Money, Order},
    traits::BillingError,
};

/// An order item joined with the product it references.
///
/// `product_name` and `unit_cost` are `None` when the product can not be found, which is an integrity error as far as
/// totals are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PricedItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub product_name: Option<String>,
    pub unit_cost: Option<Money>,
}

impl PricedItem {
    /// unit cost × quantity
    pub fn line_total(&self) -> Result<Money, BillingError> {
        let cost = self.unit_cost.ok_or_else(|| {
            BillingError::IntegrityError(format!(
                "Item #{} of order #{} references product #{}, which does not exist",
                self.id, self.order_id, self.product_id
            ))
        })?;
        if self.quantity <= 0 {
            return Err(BillingError::IntegrityError(format!(
                "Item #{} of order #{} has a non-positive quantity ({})",
                self.id, self.order_id, self.quantity
            )));
        }
        cost.checked_mul(self.quantity)
            .ok_or_else(|| BillingError::ArithmeticOverflow(format!("the line total of item #{}", self.id)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// None of the order's payments has status `paid`.
    NoPaidPayment,
    /// The order has already moved past `confirmed`.
    OrderCompleted,
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::NoPaidPayment => write!(f, "The order has no paid payment"),
            RejectionReason::OrderCompleted => write!(f, "The order has already been completed"),
        }
    }
}

/// The result of an attempt to confirm an order. A refusal is an ordinary result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// This call moved the order to `confirmed`.
    Confirmed(Order),
    /// The order was already confirmed. Nothing was changed.
    AlreadyConfirmed(Order),
    /// The order can not be confirmed. Its status is unchanged.
    Rejected { order: Order, reason: RejectionReason },
}

impl ConfirmationOutcome {
    pub fn order(&self) -> &Order {
        match self {
            ConfirmationOutcome::Confirmed(order) => order,
            ConfirmationOutcome::AlreadyConfirmed(order) => order,
            ConfirmationOutcome::Rejected { order, .. } => order,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmationOutcome::Confirmed(_))
    }
}
