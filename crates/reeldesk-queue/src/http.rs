//! HTTP client for the external publish collaborator.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dispatch::{PublishRequest, Publisher};
use crate::error::{QueueError, QueueResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct PublishPayload<'a> {
    platform: &'a str,
    video_url: &'a str,
    caption: &'a str,
    hashtags: &'a [String],
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    post_url: String,
}

/// Publisher backed by the hosted posting API.
///
/// When the endpoint or token is not configured, publish calls
/// short-circuit to a logged no-op success so local runs do not need
/// live credentials.
pub struct HttpPublisher {
    client: reqwest::Client,
    base_url: Option<String>,
    api_token: Option<String>,
}

impl HttpPublisher {
    pub fn new(base_url: Option<String>, api_token: Option<String>) -> QueueResult<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.filter(|s| !s.is_empty()),
            api_token: api_token.filter(|s| !s.is_empty()),
        })
    }

    pub fn from_env() -> QueueResult<Self> {
        Self::new(
            std::env::var("PUBLISHER_API_URL").ok(),
            std::env::var("PUBLISHER_API_TOKEN").ok(),
        )
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.base_url.as_deref()?, self.api_token.as_deref()?))
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(&self, request: &PublishRequest) -> QueueResult<String> {
        let Some((base_url, token)) = self.credentials() else {
            warn!(
                platform = %request.platform,
                "publisher not configured, skipping publish call"
            );
            return Ok(format!("noop://{}", request.platform));
        };

        let payload = PublishPayload {
            platform: request.platform.as_str(),
            video_url: &request.video_url,
            caption: &request.caption,
            hashtags: &request.hashtags,
        };
        let response = self
            .client
            .post(format!("{}/v1/posts", base_url.trim_end_matches('/')))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueueError::publish(format!(
                "posting API returned {}: {}",
                status, body
            )));
        }

        let parsed: PublishResponse = response.json().await?;
        info!(platform = %request.platform, post_url = %parsed.post_url, "publish accepted");
        Ok(parsed.post_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reeldesk_models::Platform;

    #[tokio::test]
    async fn unconfigured_publisher_is_a_logged_no_op() {
        let publisher = HttpPublisher::new(None, None).unwrap();
        let request = PublishRequest {
            platform: Platform::Instagram,
            video_url: "https://cdn.example/v.mp4".to_string(),
            caption: "Caption".to_string(),
            hashtags: vec![],
        };
        let url = publisher.publish(&request).await.unwrap();
        assert_eq!(url, "noop://instagram");
    }

    #[tokio::test]
    async fn empty_credentials_count_as_unconfigured() {
        let publisher =
            HttpPublisher::new(Some(String::new()), Some("token".to_string())).unwrap();
        assert!(publisher.credentials().is_none());
    }
}
