//! HTTP client for the opportunities endpoint
//!
//! `CrmClient::submit` POSTs one JSON payload and retries transient
//! failures with a fixed backoff. Received responses are never retried;
//! status-code interpretation belongs to the caller.

pub mod resilience;

use anyhow::{Context, Result};
use thiserror::Error;

pub use resilience::RetryConfig;

use crate::import::payload::OpportunityPayload;

/// Submission failure after exhausting every attempt
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("request timed out after {attempts} attempt(s)")]
    TimedOut { attempts: u32 },
    #[error("request failed after {attempts} attempt(s): {source}")]
    Transport { attempts: u32, source: reqwest::Error },
}

/// Client bound to a single opportunities endpoint
#[derive(Debug, Clone)]
pub struct CrmClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CrmClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit one payload, retrying timeouts and transport failures
    ///
    /// Attempts are 1-indexed up to `retry.max_attempts`, separated by the
    /// fixed `retry.backoff`. The error of the final attempt is the one
    /// surfaced.
    // TODO: allow a per-attempt backoff schedule once the endpoint's rate
    // limits are documented; today every retry waits the same fixed interval.
    pub async fn submit(
        &self,
        payload: &OpportunityPayload,
        retry: &RetryConfig,
    ) -> Result<reqwest::Response, SubmitError> {
        let mut attempt = 1u32;
        loop {
            let result = self
                .http
                .post(&self.endpoint)
                .json(payload)
                .timeout(retry.request_timeout)
                .send()
                .await;

            match result {
                Ok(response) => return Ok(response),
                Err(err) if attempt >= retry.max_attempts => {
                    return Err(if err.is_timeout() {
                        SubmitError::TimedOut { attempts: attempt }
                    } else {
                        SubmitError::Transport {
                            attempts: attempt,
                            source: err,
                        }
                    });
                }
                Err(err) => {
                    log::warn!(
                        "attempt {attempt}/{} failed: {err}; retrying in {:?}",
                        retry.max_attempts,
                        retry.backoff
                    );
                    tokio::time::sleep(retry.backoff).await;
                }
            }

            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> OpportunityPayload {
        OpportunityPayload {
            name: "Acme".into(),
            contact_name: "Acme Inc".into(),
            tese: "x".into(),
            user_id: 5,
            team_id: 2,
            tag_ids: vec!["a".into(), "b".into()],
            stage_id: 10,
        }
    }

    fn fast_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            backoff: Duration::from_millis(1),
            request_timeout: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn submit_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/opportunities/"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "name": "Acme",
                "contact_name": "Acme Inc",
                "x_studio_tese": "x",
                "user_id": 5,
                "team_id": 2,
                "tag_ids": ["a", "b"],
                "stage_id": 10,
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = CrmClient::new(format!("{}/opportunities/", server.uri())).unwrap();
        let response = client.submit(&payload(), &fast_retry(3)).await.unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    #[tokio::test]
    async fn error_status_is_returned_without_retrying() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = CrmClient::new(server.uri()).unwrap();
        let response = client.submit(&payload(), &fast_retry(3)).await.unwrap();
        assert_eq!(response.status().as_u16(), 500);
    }

    #[tokio::test]
    async fn timeout_retries_up_to_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .expect(3)
            .mount(&server)
            .await;

        let client = CrmClient::new(server.uri()).unwrap();
        let err = client.submit(&payload(), &fast_retry(3)).await.unwrap_err();
        match err {
            SubmitError::TimedOut { attempts } => assert_eq!(attempts, 3),
            other => panic!("expected TimedOut, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_surfaces_as_transport_error() {
        // Nothing listens on port 1
        let client = CrmClient::new("http://127.0.0.1:1/opportunities/").unwrap();
        let err = client.submit(&payload(), &fast_retry(2)).await.unwrap_err();
        match err {
            SubmitError::Transport { attempts, .. } => assert_eq!(attempts, 2),
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_attempt_config_never_sleeps() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .expect(1)
            .mount(&server)
            .await;

        let client = CrmClient::new(server.uri()).unwrap();
        let retry = RetryConfig {
            max_attempts: 1,
            backoff: Duration::from_millis(1),
            request_timeout: Duration::from_millis(50),
        };
        let err = client.submit(&payload(), &retry).await.unwrap_err();
        match err {
            SubmitError::TimedOut { attempts } => assert_eq!(attempts, 1),
            other => panic!("expected TimedOut, got {other:?}"),
        }
    }
}
