//! `offset`/`limit` normalization shared by the list endpoints.

use serde::Deserialize;

/// Limit used when the caller gives none.
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest page a caller may request.
pub const MAX_LIMIT: i64 = 100;

/// A requested page, as received from the query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Page {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl Page {
    /// Clamp to a non-negative offset and a limit in `1..=MAX_LIMIT`.
    pub fn normalize(self) -> (i64, i64) {
        let offset = self.offset.unwrap_or(0).max(0);
        let limit = match self.limit {
            Some(limit) if limit > 0 => limit.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        (offset, limit)
    }
}
