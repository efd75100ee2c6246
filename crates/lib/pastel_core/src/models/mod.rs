//! Domain models.
//!
//! These are internal domain types. The HTTP crate exposes its own request
//! types and serializes only the [`account::AccountView`] projection.

pub mod account;
pub mod auth;
