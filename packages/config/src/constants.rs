// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across pagewise

// Server Configuration
pub const PAGEWISE_HOST: &str = "PAGEWISE_HOST";
pub const PAGEWISE_PORT: &str = "PAGEWISE_PORT";
pub const PAGEWISE_REQUEST_TIMEOUT_SECS: &str = "PAGEWISE_REQUEST_TIMEOUT_SECS";

// Database Configuration
pub const PAGEWISE_DATABASE_PATH: &str = "PAGEWISE_DATABASE_PATH";
pub const PAGEWISE_MAX_CONNECTIONS: &str = "PAGEWISE_MAX_CONNECTIONS";

// Error Reporting
pub const PAGEWISE_EXPOSE_ERROR_DETAIL: &str = "PAGEWISE_EXPOSE_ERROR_DETAIL";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
