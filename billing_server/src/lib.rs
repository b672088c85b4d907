//! # Billing server
//! This crate hosts the HTTP server for the billing backend. It is responsible for:
//! * Serving the public catalog, order and payment endpoints.
//! * Serving the administrative API under `/api`, which is guarded by a bearer token.
//! * Delivering the order-confirmation webhook once an order has been confirmed.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following public routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /products`, `GET /products/{id}`: The product catalog.
//! * `POST /orders`, `GET /orders/{id}`: Create and view orders.
//! * `POST /payments`: Record a payment against an order.
//!
//! The admin routes are listed in [routes](routes/index.html).
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod notifier;
pub mod routes;
pub mod server;
