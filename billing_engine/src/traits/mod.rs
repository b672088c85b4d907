//! # Backend contracts
//!
//! This module defines the behaviour a storage backend must expose in order to be supported by the billing engine.
//!
//! * [`CatalogManagement`] manages the product catalog.
//! * [`OrderManagement`] manages orders, their line items and the confirmation status transition.
//! * [`PaymentManagement`] manages the payment ledger.
//! * [`BillingDatabase`] ties the three together for backends that provide the whole lot.
//!
//! Every method reports failures as a [`BillingError`].
mod billing_database;
mod catalog_management;
mod data_objects;
mod order_management;
mod payment_management;

pub use billing_database::{BillingDatabase, BillingError};
pub use catalog_management::CatalogManagement;
pub use data_objects::{ConfirmationOutcome, PricedItem, RejectionReason};
pub use order_management::OrderManagement;
pub use payment_management::PaymentManagement;
