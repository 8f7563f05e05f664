// ABOUTME: Shared constants for page sizing and on-disk locations
// ABOUTME: Page bounds are enforced by the executor and validated again at the HTTP boundary

use std::env;
use std::path::PathBuf;

/// Default page size when the caller does not supply a limit
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Smallest page a caller may request
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: usize = 200;

/// Upper bound on the length of an incoming cursor token.
/// Every token this crate issues is well under 100 characters.
pub const MAX_CURSOR_LEN: usize = 256;

/// Get the path to the pagewise data directory (~/.pagewise)
pub fn pagewise_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".pagewise")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pagewise")
    }
}

/// Get the path to the default SQLite database (~/.pagewise/pagewise.db)
pub fn database_file() -> PathBuf {
    pagewise_dir().join("pagewise.db")
}

/// Returns true when `limit` is inside the accepted page-size range
pub fn is_valid_page_size(limit: usize) -> bool {
    (MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&limit)
}
