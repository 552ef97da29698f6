//! HTTP shim for the remote calculation service.
//!
//! The whole batch goes out in one `POST {base_url}/rank/batch`. The call
//! is a pure query, so retrying it is safe.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{RankRules, RemoteConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{BatchRankResult, Employee};

use super::strategy::{LocalStrategy, RankStrategy};

#[derive(Debug, Serialize)]
struct BatchRequestBody<'a> {
    employees: &'a [Employee],
    target_date: NaiveDate,
}

/// How a single request attempt failed.
#[derive(Debug)]
enum AttemptError {
    /// Connect failure, timeout or 5xx; worth retrying.
    Transient(String),
    /// Any other rejection; retrying will not help.
    Rejected(String),
    /// 401 or 403.
    Unauthorized(String),
}

/// Computes on the remote service, degrading to [`LocalStrategy`].
///
/// Transient failures are retried `max_retries` times, waiting
/// `n * retry_backoff_ms` before retry `n`. When the service stays
/// unreachable or rejects the request the batch is computed locally.
/// Rejected credentials are returned as `Unauthorized` and never degraded.
#[derive(Debug, Clone)]
pub struct RemoteStrategy {
    client: Client,
    config: RemoteConfig,
    fallback: LocalStrategy,
}

impl RemoteStrategy {
    /// Creates a remote strategy; `rules` drive the local fallback.
    ///
    /// # Errors
    ///
    /// `ConfigParseError` when the HTTP client cannot be built.
    pub fn new(config: RemoteConfig, rules: RankRules) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::ConfigParseError {
                path: "compute.remote".to_string(),
                message: format!("cannot build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            fallback: LocalStrategy::new(rules),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rank/batch", self.config.base_url.trim_end_matches('/'))
    }

    async fn attempt(
        &self,
        body: &BatchRequestBody<'_>,
    ) -> Result<BatchRankResult, AttemptError> {
        let mut request = self.client.post(self.endpoint()).json(body);
        if let Some(ref token) = self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::Transient(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let text = response.text().await.unwrap_or_default();
            return Err(AttemptError::Unauthorized(format!("{}: {}", status, text)));
        }
        if status.is_server_error() {
            return Err(AttemptError::Transient(format!("server returned {}", status)));
        }
        if !status.is_success() {
            return Err(AttemptError::Rejected(format!("server returned {}", status)));
        }

        response
            .json::<BatchRankResult>()
            .await
            .map_err(|e| AttemptError::Rejected(format!("invalid response body: {}", e)))
    }

    /// Calls the remote service without degrading.
    ///
    /// # Errors
    ///
    /// `Unauthorized` on 401/403; `RemoteUnavailable` once retries are
    /// exhausted or the request is rejected.
    pub async fn fetch_batch(
        &self,
        employees: &[Employee],
        target_date: NaiveDate,
    ) -> EngineResult<BatchRankResult> {
        let body = BatchRequestBody {
            employees,
            target_date,
        };

        let mut attempt = 0u32;
        loop {
            match self.attempt(&body).await {
                Ok(batch) => {
                    debug!(
                        endpoint = %self.endpoint(),
                        attempt,
                        employees = employees.len(),
                        "Remote batch computed"
                    );
                    return Ok(batch);
                }
                Err(AttemptError::Unauthorized(message)) => {
                    return Err(EngineError::Unauthorized { message });
                }
                Err(AttemptError::Rejected(message)) => {
                    return Err(EngineError::RemoteUnavailable { message });
                }
                Err(AttemptError::Transient(message)) => {
                    if attempt >= self.config.max_retries {
                        return Err(EngineError::RemoteUnavailable {
                            message: format!("{} after {} attempt(s)", message, attempt + 1),
                        });
                    }
                    attempt += 1;
                    warn!(
                        endpoint = %self.endpoint(),
                        attempt,
                        error = %message,
                        "Remote batch failed, retrying"
                    );
                    let backoff = self.config.retry_backoff_ms.saturating_mul(u64::from(attempt));
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
            }
        }
    }
}

#[async_trait]
impl RankStrategy for RemoteStrategy {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn compute_batch(
        &self,
        employees: &[Employee],
        target_date: NaiveDate,
    ) -> EngineResult<BatchRankResult> {
        match self.fetch_batch(employees, target_date).await {
            Err(EngineError::RemoteUnavailable { message }) => {
                warn!(
                    endpoint = %self.endpoint(),
                    error = %message,
                    "Remote calculation unavailable, computing locally"
                );
                self.fallback.compute_batch(employees, target_date).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let strategy =
            RemoteStrategy::new(RemoteConfig::new("http://hr.local/"), RankRules::default())
                .unwrap();
        assert_eq!(strategy.endpoint(), "http://hr.local/rank/batch");
    }

    #[test]
    fn test_request_body_shape() {
        let body = BatchRequestBody {
            employees: &[],
            target_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["target_date"], "2024-05-01");
        assert!(json["employees"].as_array().unwrap().is_empty());
    }
}
