use crate::services::error::{Error, Result};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    /// Applies defaults and bounds. A non-positive limit passes here and is rejected by
    /// whoever executes the page.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if page < 1 {
            return Err(Error::validation(format!("page must be >= 1, got {page}")));
        }
        if limit > MAX_LIMIT {
            return Err(Error::validation(format!(
                "limit must be <= {MAX_LIMIT}, got {limit}"
            )));
        }

        let offset = (page - 1).checked_mul(limit).ok_or_else(|| {
            Error::validation(format!("page {page} with limit {limit} is out of range"))
        })?;

        Ok(Self {
            page,
            limit,
            offset,
        })
    }

    pub fn total_pages(&self, total_items: i64) -> i64 {
        if total_items <= 0 || self.limit <= 0 {
            return 0;
        }
        (total_items - 1) / self.limit + 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
