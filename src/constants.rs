//! Application constants and configuration

pub const APP_NAME: &str = "Profile Scraper";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
/// Overrides the saved server url for one session
pub const SERVER_URL_ENV: &str = "PROFILE_SCRAPER_URL";

pub const START_SCRAPE_PATH: &str = "/api/start-scrape";
pub const PROFILES_PATH: &str = "/api/profiles";

/// Envelope status value that marks a successful response
pub const STATUS_SUCCESS: &str = "success";

pub const STATUS_IDLE_TEXT: &str = "Status: Idle";
pub const STATUS_SCRAPING_TEXT: &str = "Status: Scraping...";
pub const STATUS_COMPLETE_TEXT: &str = "Status: Scraping Complete!";
pub const STATUS_ERROR_PREFIX: &str = "Status: Error - ";

pub const VIEW_PROFILE_LABEL: &str = "View Profile";
