//! Billing Engine
//!
//! The billing engine holds the core logic of the billing backend: a product catalog, orders made up of line items,
//! payments against those orders and the confirmation workflow that ties them together. It is storage-agnostic;
//! SQLite is the only backend shipped today.
//!
//! The library is divided into the following sections:
//! 1. Data types ([`mod@db_types`]) shared by the API and the backends.
//! 2. Backend contracts ([`mod@traits`]). A storage backend implements [`CatalogManagement`], [`OrderManagement`]
//!    and [`PaymentManagement`] to act as a backend for the billing server.
//! 3. The public API ([`CatalogApi`] and [`OrderFlowApi`]). You should never need to talk to the database directly.
//!
//! The engine also emits events that can be subscribed to. When an order is confirmed, an
//! [`events::OrderConfirmedEvent`] is published to every registered hook, each of which runs on its own task.
mod billing_api;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use billing_api::{catalog_api::CatalogApi, order_flow_api::OrderFlowApi, order_objects, payment_objects};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{BillingDatabase, BillingError, CatalogManagement, OrderManagement, PaymentManagement};
