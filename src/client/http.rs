//! HTTP plumbing for the Kong admin API
//!
//! Thin reqwest wrapper that turns wire status codes into the same outcome
//! vocabulary the simulator uses: 200/201 yield a record, 204 a unit, 404 an
//! absent result, 409 a [`KongError::Conflict`], everything else a generic
//! HTTP failure. Transient failures (transport errors, 429, 5xx) are retried
//! a bounded number of times with exponential backoff.

use crate::error::KongError;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

const RETRY_BASE_DELAY_MS: u64 = 250;

/// Connection settings for [`KongHttpClient`]
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Admin API root, e.g. `http://localhost:8001`
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Total request timeout (connect + read)
    pub timeout: Duration,
    /// Retries after the first attempt, for transient failures only
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

/// HTTP client wrapper for Kong admin API calls
#[derive(Clone)]
pub struct KongHttpClient {
    client: Client,
    base: Url,
    max_retries: u32,
}

impl KongHttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, KongError> {
        let client = Client::builder()
            .user_agent(concat!("kong-admin/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        // A trailing slash keeps Url::join from eating the last path segment
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .map_err(|e| KongError::Validation(format!("invalid admin URL {base_url}: {e}")))?;

        Ok(Self {
            client,
            base,
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, KongError> {
        self.base
            .join(path)
            .map_err(|e| KongError::Validation(format!("invalid endpoint path {path}: {e}")))
    }

    /// GET a collection; a 404 here is unexpected and surfaces as an error
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, KongError> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);

        let response = self
            .send_with_retry(self.client.get(url).query(query))
            .await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            status => Err(self.error_from(status, response).await),
        }
    }

    /// GET a single record; 404 means absent
    pub async fn get_optional(&self, path: &str) -> Result<Option<Value>, KongError> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);

        let response = self.send_with_retry(self.client.get(url)).await?;
        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(self.error_from(status, response).await),
        }
    }

    /// POST a new record; 409 becomes a Conflict
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, KongError> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);

        let response = self
            .send_with_retry(self.client.post(url).json(body))
            .await?;
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            status => Err(self.error_from(status, response).await),
        }
    }

    /// PATCH an existing record; 404 means absent, never an upsert
    pub async fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>, KongError> {
        let url = self.endpoint(path)?;
        tracing::debug!("PATCH {}", url);

        let response = self
            .send_with_retry(self.client.patch(url).json(body))
            .await?;
        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(self.error_from(status, response).await),
        }
    }

    /// DELETE a record; 404 is a no-op so deletes stay idempotent
    pub async fn delete(&self, path: &str) -> Result<(), KongError> {
        let url = self.endpoint(path)?;
        tracing::debug!("DELETE {}", url);

        let response = self.send_with_retry(self.client.delete(url)).await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Ok(()),
            status => Err(self.error_from(status, response).await),
        }
    }

    async fn send_with_retry(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, KongError> {
        let mut attempt = 0;
        loop {
            let next = request
                .try_clone()
                .ok_or_else(|| KongError::Validation("request is not retryable".into()))?;

            let outcome = next.send().await;
            let transient = match &outcome {
                Ok(response) => is_transient(response.status()),
                Err(_) => true,
            };
            if !transient || attempt >= self.max_retries {
                return Ok(outcome?);
            }

            attempt += 1;
            let delay = Duration::from_millis(RETRY_BASE_DELAY_MS << (attempt - 1));
            match &outcome {
                Ok(response) => tracing::warn!(
                    "transient status {} from admin API, retry {attempt}/{} in {delay:?}",
                    response.status(),
                    self.max_retries
                ),
                Err(e) => tracing::warn!(
                    "transport error talking to admin API ({e}), retry {attempt}/{} in {delay:?}",
                    self.max_retries
                ),
            }
            tokio::time::sleep(delay).await;
        }
    }

    async fn error_from(&self, status: StatusCode, response: reqwest::Response) -> KongError {
        if status == StatusCode::CONFLICT {
            let fields = match response.json::<Value>().await.ok() {
                Some(Value::Object(body)) => body.into_iter().collect(),
                _ => Vec::new(),
            };
            return KongError::conflict(fields);
        }
        tracing::error!("admin API error: {}", status);
        KongError::Http {
            status: status.as_u16(),
        }
    }
}

/// Statuses worth retrying: rate limiting and server-side failures
fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_gateway() {
        let config = HttpConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn base_url_gets_trailing_slash_for_joins() {
        let client = KongHttpClient::new(&HttpConfig::default()).unwrap();
        let url = client.endpoint("apis/Mockbin").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/apis/Mockbin");
    }

    #[test]
    fn transient_statuses_are_retryable() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_transient(StatusCode::CONFLICT));
        assert!(!is_transient(StatusCode::NOT_FOUND));
    }
}
