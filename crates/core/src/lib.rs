//! Domain logic for the headshots backend.
//!
//! Everything in this crate is pure: no network, no database. The HTTP
//! layer and the external API clients lean on these modules for validation,
//! prompt building, synthetic-id rules and reaction scoring.

pub mod error;
pub mod prompt;
pub mod reaction;
pub mod sourced;
pub mod training;
pub mod types;
pub mod upload;
