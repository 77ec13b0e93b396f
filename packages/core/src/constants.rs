// ABOUTME: Environment variable names, default endpoints and client-side limits
// ABOUTME: Centralized so the client, controllers and CLI agree on one set of names

use std::path::PathBuf;

// Endpoint configuration
pub const ITMS_API_BASE_URL: &str = "ITMS_API_BASE_URL";
pub const VITE_API_BASE_URL: &str = "VITE_API_BASE_URL"; // Legacy
pub const ITMS_ORIGIN: &str = "ITMS_ORIGIN";

// HTTP behaviour
pub const ITMS_HTTP_TIMEOUT_SECS: &str = "ITMS_HTTP_TIMEOUT_SECS";

// Local files
pub const ITMS_TOKEN_FILE: &str = "ITMS_TOKEN_FILE";
pub const ITMS_CONFIG_FILE: &str = "ITMS_CONFIG_FILE";

/// Origin used when neither the base URL nor the origin is configured
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Same-origin prefix every REST path lives under
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Request timeout applied by the transport
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Rows per page when a list view does not say otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a list query may ask for
pub const MAX_PAGE_SIZE: u32 = 100;

/// Delay between a successful form submission and the follow-up navigation
pub const SUBMIT_REDIRECT_DELAY_MS: u64 = 2_000;

/// Path of the token refresh endpoint, relative to the base URL
pub const AUTH_REFRESH_PATH: &str = "/auth/refresh";

/// Get the directory holding local client state (`<config_dir>/itms`)
pub fn itms_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("itms")
}

/// Default location of the persisted token pair
pub fn token_file() -> PathBuf {
    itms_dir().join("auth.toml")
}

/// Default location of the optional client configuration file
pub fn config_file() -> PathBuf {
    itms_dir().join("config.toml")
}
