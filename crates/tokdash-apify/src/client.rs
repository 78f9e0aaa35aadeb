//! HTTP client for the Apify REST API.
//!
//! Wraps `reqwest` with Apify-specific error handling, token management, and
//! typed response deserialization. Non-2xx responses carrying Apify's
//! structured `{"error": {...}}` envelope are surfaced as [`ApifyError::Api`].
//! Idempotent GETs (run polling, dataset items) are retried with back-off on
//! transient errors; run submission is a POST and is never retried.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ApifyError;
use crate::retry::retry_with_backoff;
use crate::types::{ActorInput, ActorRun, DatasetItem, RunEnvelope, RunStatus};

const DEFAULT_BASE_URL: &str = "https://api.apify.com/";

/// Pause between run-status polls, applied whether or not the server honors
/// the `waitForFinish` long-poll window.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Client for the Apify REST API.
///
/// Manages the HTTP client, API token, base URL, and retry policy. Use
/// [`ApifyClient::new`] for production or [`ApifyClient::with_base_url`] to
/// point at a mock server in tests.
pub struct ApifyClient {
    client: Client,
    api_token: String,
    base_url: Url,
    /// Maximum number of retry attempts after the first failure, for GETs only.
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ApifyClient {
    /// Creates a new client pointed at the production Apify API.
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_token: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ApifyError> {
        Self::with_base_url(
            api_token,
            timeout_secs,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApifyError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApifyError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_token: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, ApifyError> {
        // The request timeout must cover the `waitForFinish` long-poll window,
        // so the caller passes a timeout sized accordingly.
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tokdash/0.1 (profile-tracking)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends path segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApifyError::InvalidBaseUrl {
            base_url: normalised.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_token: api_token.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Starts an actor run for `input`, waiting up to `wait_secs` server-side
    /// for it to finish (`waitForFinish`; Apify caps this at 300 seconds).
    ///
    /// Returns the run in whatever state it reached within the window — the
    /// caller must check [`ActorRun::status`] or use
    /// [`Self::run_actor_to_completion`].
    ///
    /// # Errors
    ///
    /// - [`ApifyError::Api`] if Apify rejects the submission.
    /// - [`ApifyError::Http`] on network failure.
    /// - [`ApifyError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn run_actor(
        &self,
        actor_id: &str,
        input: &ActorInput,
        wait_secs: u64,
    ) -> Result<ActorRun, ApifyError> {
        let url = self.endpoint_url(
            &format!("v2/acts/{actor_id}/runs"),
            &[("waitForFinish", &wait_secs.to_string())],
        )?;
        let context = format!("runActor({actor_id})");

        let response = self.client.post(url).json(input).send().await?;
        let body = Self::parse_response(response, &context).await?;

        let envelope: RunEnvelope =
            serde_json::from_value(body).map_err(|e| ApifyError::Deserialize {
                context,
                source: e,
            })?;
        Ok(envelope.data)
    }

    /// Fetches the current state of a run, long-polling up to `wait_secs`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run_actor`]; transient errors are retried with back-off.
    pub async fn get_run(&self, run_id: &str, wait_secs: u64) -> Result<ActorRun, ApifyError> {
        let url = self.endpoint_url(
            &format!("v2/actor-runs/{run_id}"),
            &[("waitForFinish", &wait_secs.to_string())],
        )?;
        let context = format!("getRun({run_id})");

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let context = context.clone();
            async move { self.get_json(&url, &context).await }
        })
        .await?;

        let envelope: RunEnvelope =
            serde_json::from_value(body).map_err(|e| ApifyError::Deserialize {
                context,
                source: e,
            })?;
        Ok(envelope.data)
    }

    /// Submits a run and polls it to a terminal state, enforcing a hard
    /// deadline of `run_timeout_secs` across all polls.
    ///
    /// Each request long-polls via `waitForFinish`, so the loop normally makes
    /// very few round trips. A one-second pause between polls bounds the
    /// request rate even when responses come back immediately (proxies or a
    /// degraded API may ignore `waitForFinish`).
    ///
    /// # Errors
    ///
    /// - [`ApifyError::RunFailed`] if the run ends in any terminal state other
    ///   than `SUCCEEDED` (failed, aborted, timed out on the Apify side).
    /// - [`ApifyError::RunTimedOut`] if the deadline elapses first. The run is
    ///   left to finish or die on its own; this client imposes no abort.
    /// - Any submission/poll error from [`Self::run_actor`] / [`Self::get_run`].
    pub async fn run_actor_to_completion(
        &self,
        actor_id: &str,
        input: &ActorInput,
        wait_secs: u64,
        run_timeout_secs: u64,
    ) -> Result<ActorRun, ApifyError> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(run_timeout_secs);

        let mut run = self.run_actor(actor_id, input, wait_secs).await?;
        while !run.status.is_terminal() {
            if tokio::time::Instant::now() >= deadline {
                return Err(ApifyError::RunTimedOut {
                    run_id: run.id,
                    waited_secs: run_timeout_secs,
                });
            }
            tracing::debug!(run_id = %run.id, status = %run.status, "actor run in progress");
            tokio::time::sleep(POLL_INTERVAL).await;
            run = self.get_run(&run.id, wait_secs).await?;
        }

        if run.status != RunStatus::Succeeded {
            return Err(ApifyError::RunFailed {
                run_id: run.id,
                status: run.status,
            });
        }
        Ok(run)
    }

    /// Fetches all items from a run's default dataset.
    ///
    /// # Errors
    ///
    /// - [`ApifyError::Api`] if Apify rejects the request.
    /// - [`ApifyError::Http`] on network failure after retries.
    /// - [`ApifyError::Deserialize`] if the body is not an item array.
    pub async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<DatasetItem>, ApifyError> {
        let url = self.endpoint_url(
            &format!("v2/datasets/{dataset_id}/items"),
            &[("format", "json"), ("clean", "true")],
        )?;
        let context = format!("datasetItems({dataset_id})");

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let context = context.clone();
            async move { self.get_json(&url, &context).await }
        })
        .await?;

        serde_json::from_value(body).map_err(|e| ApifyError::Deserialize {
            context,
            source: e,
        })
    }

    /// Builds an endpoint URL with the token and any extra query parameters.
    fn endpoint_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ApifyError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApifyError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("token", &self.api_token);
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json(&self, url: &Url, context: &str) -> Result<serde_json::Value, ApifyError> {
        let response = self.client.get(url.clone()).send().await?;
        Self::parse_response(response, context).await
    }

    /// Checks the HTTP status and parses the body to JSON. Error messages
    /// never include the query string, which carries the API token.
    async fn parse_response(
        response: reqwest::Response,
        context: &str,
    ) -> Result<serde_json::Value, ApifyError> {
        let status = response.status();
        let safe_url = {
            let mut url = response.url().clone();
            url.set_query(None);
            url.to_string()
        };
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
                return Err(ApifyError::Api {
                    kind: envelope.error.kind,
                    message: envelope.error.message,
                });
            }
            return Err(ApifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: safe_url,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApifyError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
