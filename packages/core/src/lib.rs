// ABOUTME: Keyset pagination core for pagewise
// ABOUTME: Ordering keys, the opaque cursor codec, traversal direction and the list executor

pub mod constants;
pub mod cursor;
pub mod error;
pub mod executor;
pub mod key;
pub mod memory;
pub mod ordering;
pub mod source;

// Re-export constants
pub use constants::{
    database_file, is_valid_page_size, pagewise_dir, DEFAULT_PAGE_SIZE, MAX_CURSOR_LEN,
    MAX_PAGE_SIZE, MIN_PAGE_SIZE,
};

// Re-export main types
pub use cursor::{decode_cursor, encode_cursor};
pub use error::{CursorError, KeyError, ListError};
pub use executor::{ListExecutor, Page, PageRequest};
pub use key::OrderingKey;
pub use memory::MemorySource;
pub use ordering::Direction;
pub use source::{Keyed, RangeQuery, RangeSource};
