//! Query parameter types shared by several handler modules.

use gemeinde_core::pagination::Page;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)`.
    pub fn resolve(&self) -> (i64, i64) {
        let page = Page::new(self.limit, self.offset);
        (page.limit, page.offset)
    }
}

/// Body for the publish toggles (`{ "published": true }`).
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}
