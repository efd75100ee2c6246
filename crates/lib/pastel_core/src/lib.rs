//! # pastel_core
//!
//! Core account and session logic for Pastel: the account model, credential
//! stores, password hashing, token issuance and the auth service that ties
//! them together.

pub mod auth;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
