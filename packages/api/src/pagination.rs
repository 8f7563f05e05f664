// ABOUTME: Query parameters for cursor-paged list endpoints
// ABOUTME: Validates limit and direction at the boundary before the executor runs

use pagewise_core::{is_valid_page_size, Direction, PageRequest, DEFAULT_PAGE_SIZE};
use serde::Deserialize;

use crate::error::AppError;

/// `?limit=&cursor=&time_desc=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Page size, defaults to DEFAULT_PAGE_SIZE. Signed so negative values
    /// surface as a limit error rather than a parse error.
    pub limit: Option<i64>,
    /// Opaque token from a previous page
    pub cursor: Option<String>,
    /// Newest first when true
    #[serde(default)]
    pub time_desc: bool,
}

impl ListQuery {
    pub fn into_page_request(self) -> Result<PageRequest, AppError> {
        let limit = match self.limit {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => usize::try_from(raw)
                .ok()
                .filter(|l| is_valid_page_size(*l))
                .ok_or(AppError::InvalidLimit(raw))?,
        };

        Ok(PageRequest {
            cursor: self.cursor,
            direction: Direction::from_time_desc(self.time_desc),
            limit,
        })
    }
}
