use serde::{Deserialize, Serialize};

use crate::db_types::{Money, Payment, PaymentMethod};

/// A request to record a payment against an order.
///
/// When `amount` is omitted, the payment takes the order's total at the moment it is created. An explicit amount,
/// including zero, is always honoured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(alias = "order")]
    pub order_id: i64,
    #[serde(default, alias = "payment_type")]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PaymentRequest {
    pub fn new(order_id: i64) -> Self {
        Self { order_id, payment_method: PaymentMethod::default(), amount: None, status: None }
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_status<S: Into<String>>(mut self, status: S) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }
}

/// The payments made against an order, along with their sum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentsResult {
    pub order_id: i64,
    pub total_payments: Money,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusUpdate {
    pub status: String,
}
