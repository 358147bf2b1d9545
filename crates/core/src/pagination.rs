//! Limit/offset windows for list endpoints.

/// Page size when the client does not pass `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated `LIMIT`/`OFFSET` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Build a page from raw query values. `limit` is kept within
    /// `1..=MAX_PAGE_SIZE`; negative offsets become 0.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.map_or(DEFAULT_PAGE_SIZE, |l| l.clamp(1, MAX_PAGE_SIZE)),
            offset: offset.map_or(0, |o| o.max(0)),
        }
    }
}
