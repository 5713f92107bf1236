// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Storyloom

// Backend endpoints
pub const STORYLOOM_RECORD_URL: &str = "STORYLOOM_RECORD_URL";
pub const STORYLOOM_API_URL: &str = "STORYLOOM_API_URL";

// HTTP client configuration
pub const STORYLOOM_HTTP_CONNECT_TIMEOUT_SECS: &str = "STORYLOOM_HTTP_CONNECT_TIMEOUT_SECS";
pub const STORYLOOM_HTTP_REQUEST_TIMEOUT_SECS: &str = "STORYLOOM_HTTP_REQUEST_TIMEOUT_SECS";

// Listing
pub const STORYLOOM_PAGE_SIZE: &str = "STORYLOOM_PAGE_SIZE";

// Session persistence
pub const STORYLOOM_AUTH_FILE: &str = "STORYLOOM_AUTH_FILE";

// System Environment Variables
pub const HOME: &str = "HOME";

// Defaults
pub const DEFAULT_RECORD_URL: &str = "http://127.0.0.1:8090";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: u32 = 5;
