use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;

use crate::config::ListingConfig;
use crate::doctor::{RawDoctor, SearchResponse};
use crate::error::ListingError;
use crate::filters::SearchQuery;

/// Outbound doctor search. Implementations return the raw page in server order.
#[async_trait]
pub trait DoctorSearchApi: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawDoctor>, ListingError>;
}

#[async_trait]
impl<T: DoctorSearchApi + ?Sized> DoctorSearchApi for Arc<T> {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawDoctor>, ListingError> {
        (**self).search(query).await
    }
}

pub struct HttpDoctorSearch {
    client: Client,
    base_url: String,
}

impl HttpDoctorSearch {
    pub fn new(config: &ListingConfig) -> Result<Self, ListingError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ListingError::Config(format!("failed creating HTTP client: {e}")))?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim().to_string(),
        }
    }
}

#[async_trait]
impl DoctorSearchApi for HttpDoctorSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawDoctor>, ListingError> {
        tracing::debug!(url = %self.base_url, params = ?query.pairs(), "GET doctor search");

        let resp = self
            .client
            .get(&self.base_url)
            .header(ACCEPT, "*/*")
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(
                "doctor search returned {} for page {}. Body: {}",
                status,
                query.page,
                truncate_for_log(&body)
            );
            return Err(ListingError::HttpStatus(status));
        }

        let bytes = resp.bytes().await.map_err(transport_error)?;
        let body: SearchResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ListingError::MalformedResponse(e.to_string()))?;
        Ok(body.doctors)
    }
}

fn transport_error(err: reqwest::Error) -> ListingError {
    if err.is_timeout() {
        ListingError::Transport("request timed out".to_string())
    } else {
        ListingError::Transport(err.to_string())
    }
}

fn truncate_for_log(text: &str) -> String {
    let trimmed = text.trim();
    let max_len = 300usize;
    match trimmed.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
