//! Shared HTTP plumbing for the collaborator clients.

use std::time::Duration;

use reqwest::Client;
use tokio::time::timeout;

use super::{ClientError, StepOutcome};

/// Issues bounded `POST` requests with query parameters.
///
/// 2xx maps to `Accepted`, 4xx to `Declined` with the response body as the
/// reason, 5xx to `UnexpectedStatus`.
#[derive(Debug, Clone)]
pub struct HttpCaller {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCaller {
    /// Creates a caller for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self::with_client(Client::new(), base_url, request_timeout)
    }

    /// Creates a caller sharing an existing `reqwest` client.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: request_timeout,
        }
    }

    /// Returns the base URL of the service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts to `path` with the given query parameters.
    pub async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<StepOutcome, ClientError> {
        let url = format!("{}{}", self.base_url, path);

        let response = timeout(self.timeout, self.client.post(&url).query(query).send())
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))?
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(self.timeout)
                } else {
                    ClientError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        let body = timeout(self.timeout, response.text())
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))?
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        if status.is_success() {
            Ok(StepOutcome::Accepted)
        } else if status.is_client_error() {
            Ok(StepOutcome::Declined(body))
        } else {
            Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}
