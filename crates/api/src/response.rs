//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use headshots_core::sourced::Sourced;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A struct payload with a `simulated` flag merged into its fields.
#[derive(Debug, Serialize)]
pub struct Tagged<T: Serialize> {
    #[serde(flatten)]
    pub value: T,
    pub simulated: bool,
}

impl<T: Serialize> From<Sourced<T>> for Tagged<T> {
    fn from(sourced: Sourced<T>) -> Self {
        let simulated = sourced.is_simulated();
        Self {
            value: sourced.into_inner(),
            simulated,
        }
    }
}
