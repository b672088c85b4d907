use crate::{
    db_types::{NewPayment, Payment},
    traits::BillingError,
};

/// Behaviour for managing the payment ledger.
#[allow(async_fn_in_trait)]
pub trait PaymentManagement {
    /// Stores a payment whose amount has already been resolved. Returns [`BillingError::OrderNotFound`] if the order
    /// it references does not exist.
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, BillingError>;

    async fn fetch_payment(&self, id: i64) -> Result<Option<Payment>, BillingError>;

    async fn fetch_payments(&self) -> Result<Vec<Payment>, BillingError>;

    async fn fetch_payments_for_order(&self, order_id: i64) -> Result<Vec<Payment>, BillingError>;

    /// Sets the free-form status of a payment and returns the updated record.
    async fn update_payment_status(&self, id: i64, status: &str) -> Result<Payment, BillingError>;
}
