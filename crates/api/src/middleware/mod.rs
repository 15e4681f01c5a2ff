//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the caller resolved from a bearer token.

pub mod auth;
