//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Gateway the console talks to when no config file overrides it
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";

/// Address the gateway binds to by default
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Same-origin path serving the catalog settings
pub const SETTINGS_PATH: &str = "/settings";

/// User-Agent sent by the console when executing endpoints
pub const DEFAULT_USER_AGENT: &str = "apidock-console";

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV_VAR: &str = "APIDOCK_CONFIG";

/// How long a toast stays on screen
pub const TOAST_TTL_MS: u64 = 3000;

/// Application name
pub const APP_NAME: &str = "API Dock";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
