mod admin;

pub use admin::{AdminAuthMiddlewareFactory, AdminAuthMiddlewareService};
