use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{ClientError, ClientResult};
use crate::types::Ack;

/// Thin JSON client for the dashboard REST backend.
///
/// Every request carries the caller's bearer token and a fresh
/// `X-Request-Id` so backend logs can be correlated with ours.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// `timeout` of `None` keeps reqwest's transport default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ClientError::InvalidConfig("api base url is empty".into()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "api base url must start with http:// or https://, got '{base_url}'"
            )));
        }
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("invalid api base url '{base_url}': {e}")))?;

        let mut builder = Client::builder().user_agent(concat!(
            "admin-dashboard/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    /// Base URL with `segments` appended. Each segment is percent-encoded, so
    /// an opaque id containing `/` or `?` stays a single segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a hierarchical path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET the endpoint at `segments` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], token: &str) -> ClientResult<T> {
        let body = self.send(Method::GET, segments, token, None::<&()>).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// PUT a JSON body to the endpoint at `segments`. The acknowledgement is
    /// decoded leniently.
    pub async fn put_json<B: Serialize>(&self, segments: &[&str], token: &str, body: &B) -> ClientResult<Ack> {
        let body = self.send(Method::PUT, segments, token, Some(body)).await?;
        Ok(parse_ack(&body))
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        token: &str,
        body: Option<&B>,
    ) -> ClientResult<String> {
        let url = self.endpoint(segments);
        let request_id = Uuid::new_v4();
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .bearer_auth(token)
            .header("X-Request-Id", request_id.to_string());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(
            method = %method,
            path = %url.path(),
            status = status.as_u16(),
            request_id = %request_id,
            "backend call completed"
        );

        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), &text));
        }

        Ok(text)
    }
}

fn parse_ack(body: &str) -> Ack {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ack::default();
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Ack {
        success: None,
        message: Some(trimmed.to_string()),
    })
}
