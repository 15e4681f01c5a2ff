//! Astria REST client and the fallback policy around it.
//!
//! - [`api::AstriaApi`] -- thin typed wrapper over the Astria HTTP endpoints.
//! - [`service::AstriaService`] -- the four dispatcher operations, each
//!   returning a [`Sourced`](headshots_core::sourced::Sourced) value that is
//!   synthesized locally when Astria cannot be reached.
//! - [`config::AstriaConfig`] -- environment-driven settings.

pub mod api;
pub mod config;
pub mod service;

pub use api::{AstriaApi, AstriaApiError};
pub use config::AstriaConfig;
pub use service::AstriaService;
