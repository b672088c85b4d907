use billing_common::MoneyConversionError;
use thiserror::Error;

use crate::traits::{CatalogManagement, OrderManagement, PaymentManagement};

/// The full set of behaviour a backend for the billing server provides.
#[allow(async_fn_in_trait)]
pub trait BillingDatabase: Clone + CatalogManagement + OrderManagement + PaymentManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Closes the connection to the database. The default implementation does nothing.
    async fn close(&mut self) -> Result<(), BillingError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum BillingError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("The requested product (id {0}) does not exist")]
    ProductNotFound(i64),
    #[error("The requested order (id {0}) does not exist")]
    OrderNotFound(i64),
    #[error("The requested payment (id {0}) does not exist")]
    PaymentNotFound(i64),
    #[error("Data integrity error. {0}")]
    IntegrityError(String),
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("Arithmetic overflow while calculating {0}")]
    ArithmeticOverflow(String),
    #[error("Order #{0} can no longer be modified, since it has status {1}")]
    OrderModificationForbidden(i64, String),
    #[error("The requested change would result in a no-op.")]
    ModificationNoOp,
}

impl From<sqlx::Error> for BillingError {
    fn from(e: sqlx::Error) -> Self {
        BillingError::DatabaseError(e.to_string())
    }
}

impl From<MoneyConversionError> for BillingError {
    fn from(e: MoneyConversionError) -> Self {
        BillingError::ValidationError(e.to_string())
    }
}
