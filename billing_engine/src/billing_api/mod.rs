//! # Billing engine public API
//!
//! The API is modular, so that clients can pick the functionality they need.
//!
//! * [`catalog_api`] manages the product catalog.
//! * [`order_flow_api`] handles orders, payments and the confirmation workflow.
//!
//! The other submodules hold the request and response types used by the APIs.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits the API needs.
//!
//! ```rust,ignore
//! use billing_engine::{events::EventProducers, OrderFlowApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/billing.db", 5).await?;
//! let api = OrderFlowApi::new(db, EventProducers::default());
//! let order = api.order_details(1).await?;
//! println!("Order #{} totals {}", order.order.id, order.total);
//! ```
pub mod catalog_api;
pub mod order_flow_api;
pub mod order_objects;
pub mod payment_objects;
