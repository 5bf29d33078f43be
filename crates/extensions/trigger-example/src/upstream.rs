//! HTTP client for the example upstream service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use hookline_protocols::error::UpstreamError;
use hookline_protocols::trigger::{
    Registration, RegistrationRequest, TriggerContext, UpstreamClient,
};
use hookline_protocols::types::{Credentials, Timestamp};

/// Credential key holding the bearer token.
pub(crate) const API_KEY: &str = "api_key";

#[derive(Debug, Default, Deserialize)]
struct RenewResponse {
    #[serde(default)]
    expires_at: Option<Timestamp>,
}

/// [`UpstreamClient`] speaking the example REST API:
///
/// - `POST /webhooks` registers a webhook
/// - `POST /webhooks/{id}/renew` extends its lease
/// - `DELETE /webhooks/{id}` removes it
/// - `GET /me` checks the API key
pub struct HttpUpstream {
    client: Client,
    base_url: Url,
}

impl HttpUpstream {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url =
            Url::parse(base_url).map_err(|e| UpstreamError::Transport(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::Transport(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Transport(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        match credentials.get_str(API_KEY) {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, resource: &str) -> Result<Response, UpstreamError> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(%status, resource, "Upstream responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => UpstreamError::NotFound(resource.to_string()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                UpstreamError::Unauthorized(format!("HTTP {}: {}", status.as_u16(), body))
            }
            _ => UpstreamError::Status {
                status: status.as_u16(),
                body,
            },
        })
    }
}

fn transport_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Transport(e.to_string())
    }
}

fn decode_error(e: impl std::fmt::Display) -> UpstreamError {
    UpstreamError::Decode(e.to_string())
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn register(
        &self,
        ctx: &TriggerContext,
        request: &RegistrationRequest,
    ) -> Result<Registration, UpstreamError> {
        let url = self.url(&["webhooks"])?;
        let builder = self.authorized(self.client.post(url).json(request), &ctx.credentials);
        let response = self.send(builder, "webhooks").await?;
        response.json::<Registration>().await.map_err(decode_error)
    }

    async fn renew(
        &self,
        ctx: &TriggerContext,
        external_id: &str,
    ) -> Result<Option<Timestamp>, UpstreamError> {
        let url = self.url(&["webhooks", external_id, "renew"])?;
        let builder = self.authorized(self.client.post(url), &ctx.credentials);
        let response = self.send(builder, external_id).await?;

        let body = response.text().await.map_err(transport_error)?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let renewed: RenewResponse = serde_json::from_str(&body).map_err(decode_error)?;
        Ok(renewed.expires_at)
    }

    async fn unregister(&self, ctx: &TriggerContext, external_id: &str) -> Result<(), UpstreamError> {
        let url = self.url(&["webhooks", external_id])?;
        let builder = self.authorized(self.client.delete(url), &ctx.credentials);
        self.send(builder, external_id).await?;
        Ok(())
    }

    async fn verify_credentials(&self, credentials: &Credentials) -> Result<(), UpstreamError> {
        let url = self.url(&["me"])?;
        let builder = self.authorized(self.client.get(url), credentials);
        self.send(builder, "me").await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "upstream_tests.rs"]
mod tests;
