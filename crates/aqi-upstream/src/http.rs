//! Shared reqwest plumbing for the service adapters.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::UpstreamError;

/// Build the shared HTTP client. Per-service timeouts are set per request.
pub fn build_client(user_agent: &str, connect_timeout: Duration) -> Result<Client, UpstreamError> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .connect_timeout(connect_timeout)
        .build()
        .map_err(|err| UpstreamError::from_reqwest("http client", err))
}

pub(crate) async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|err| UpstreamError::from_reqwest(service, err))?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("{} responded with HTTP {}", service, status);
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|err| UpstreamError::from_reqwest(service, err))
}

pub(crate) fn trim_base(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
