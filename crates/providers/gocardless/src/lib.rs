//! GoCardless Connect OAuth provider, a small REST client for the billing
//! request endpoints, and the operations built on top of them.

pub mod api;
pub mod connect;
pub mod environment;
pub mod models;
pub mod operations;

pub use api::{ApiClient, ApiError, BillingApi, API_VERSION};
pub use connect::GoCardlessConnect;
pub use environment::Environment;
pub use operations::{Lookup, Operations, OperationsError, DEFAULT_CURRENCY, MANDATE_CURRENCY};
