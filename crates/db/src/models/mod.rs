//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Update DTOs where the row is mutable

pub mod credit;
pub mod image;
pub mod model;
pub mod profile;
pub mod sample;
pub mod user_headshot;
pub mod user_tune;
