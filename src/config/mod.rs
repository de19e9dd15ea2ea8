use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_timeout_secs: u64,
    pub default_page_size: u32,
    pub search_debounce_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            api_url: env::var("API_URL")?,
            api_timeout_secs: env::var("API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| "40".to_string())
                .parse()
                .unwrap_or(40),
            search_debounce_ms: env::var("SEARCH_DEBOUNCE_MS")
                .unwrap_or_else(|_| "400".to_string())
                .parse()
                .unwrap_or(400),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".to_string(),
            api_timeout_secs: 30,
            default_page_size: 40,
            search_debounce_ms: 400,
        }
    }
}
