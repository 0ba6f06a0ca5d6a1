//! Shared response envelope types for API handlers.
//!
//! Management endpoints answer with a `{ "data": ... }` envelope. The
//! monitor trigger keeps its own body shape, see [`crate::handlers::monitor`].

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
