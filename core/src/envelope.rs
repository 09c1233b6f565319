//! Response envelope shared by every Momentum endpoint except weather.

use serde::{Deserialize, Serialize};

/// Wrapper around every enveloped response body.
///
/// `data` is the typed payload; `message` and `errors` carry whatever status
/// metadata the server chose to attach. Delete operations use
/// `WebResponse<serde_json::Value>` since their payload is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T> WebResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

/// The subset of an error body we read: `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
