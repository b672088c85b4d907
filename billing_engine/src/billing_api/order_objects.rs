use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Money, NewOrderItem, Order},
    traits::{ConfirmationOutcome, PricedItem, RejectionReason},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrderRequest {
    #[serde(default)]
    pub items: Vec<NewOrderItem>,
}

/// An order, its items in insertion order, and its total as calculated at the time of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<PricedItem>,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Confirmed,
    AlreadyConfirmed,
    Rejected,
}

/// The serializable form of a [`ConfirmationOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationSummary {
    pub result: ConfirmationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub order: Order,
}

impl From<ConfirmationOutcome> for ConfirmationSummary {
    fn from(outcome: ConfirmationOutcome) -> Self {
        match outcome {
            ConfirmationOutcome::Confirmed(order) => {
                Self { result: ConfirmationStatus::Confirmed, reason: None, message: None, order }
            },
            ConfirmationOutcome::AlreadyConfirmed(order) => Self {
                result: ConfirmationStatus::AlreadyConfirmed,
                reason: None,
                message: Some(format!("Order #{} was already confirmed", order.id)),
                order,
            },
            ConfirmationOutcome::Rejected { order, reason } => Self {
                result: ConfirmationStatus::Rejected,
                reason: Some(reason),
                message: Some(reason.to_string()),
                order,
            },
        }
    }
}
