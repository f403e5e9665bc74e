//! HTTP surface of the ministry platform: axum router, JWT authentication,
//! rate limiting, request metrics and the error envelope.

pub mod auth;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
