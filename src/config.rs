use std::num::NonZeroUsize;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::error::ListingError;

/// Settings for one listing session. The page size is fixed for the session.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub api_base_url: String,
    pub page_size: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ListingConfig {
    pub fn validate(self) -> Result<Self, ListingError> {
        self.page_size()?;
        if self.timeout.is_zero() {
            return Err(ListingError::Config("timeout must be positive".to_string()));
        }
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ListingError::Config(format!(
                "API base URL must be http(s): {url}"
            )));
        }
        Ok(self)
    }

    /// The session page size; zero is a config error, never clamped.
    pub fn page_size(&self) -> Result<NonZeroUsize, ListingError> {
        NonZeroUsize::new(self.page_size)
            .ok_or_else(|| ListingError::Config("page size must be positive".to_string()))
    }
}
