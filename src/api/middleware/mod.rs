//! HTTP middleware for request processing and protection.
//!
//! Provides JWT authentication, the admin role gate, rate limiting and request tracing.

pub mod auth;
pub mod rate_limit;
pub mod tracing;
