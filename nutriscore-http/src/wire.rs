//! Envelope types that exist only on the wire.

use nutriscore_core::SearchHit;
use serde::Deserialize;

/// Body of a successful `GET /api/search` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    /// Matching dishes in service order.
    #[serde(default)]
    pub(crate) results: Vec<SearchHit>,
}
