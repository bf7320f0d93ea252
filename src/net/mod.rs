//! Networking modules for the hosted REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs every request, `headers` assembles request headers,
//! `checkout` parses the checkout endpoint's loosely-shaped reply, `error`
//! defines the shared failure contract, and `types` defines the wire schema.

pub mod api;
pub mod checkout;
pub mod error;
pub mod headers;
pub mod types;

pub use api::{ApiCall, ApiClient};
pub use error::ApiError;
