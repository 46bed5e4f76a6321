//! HTTP surface for Tokenward
//!
//! Exposes bearer-token verification and logout over Actix-web. The binary
//! in `main.rs` wires configuration, the revocation store and the
//! authenticator together; everything else lives here so tests can build
//! the same application.

pub mod app;
pub mod config;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod routes;
pub mod telemetry;
