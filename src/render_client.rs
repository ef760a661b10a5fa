use std::time::Duration;

use crate::{
    constants::grid::SLOT_COUNT,
    models::render::{GenerateRequest, GenerateResponse},
};

#[derive(Debug, thiserror::Error)]
pub enum RenderClientError {
    #[error("request to render service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("render service answered with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// a rendered grid, downloaded and ready to attach.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    pub url: String,
    pub bytes: Vec<u8>,
}

/// talks to the render service from the bot side.
#[derive(Clone)]
pub struct RenderClient {
    client: reqwest::Client,
    base_url: String,
}

impl RenderClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// renders `slots` and downloads the resulting image.
    #[tracing::instrument(skip_all)]
    pub async fn render(
        &self,
        slots: &[Option<String>; SLOT_COUNT],
    ) -> Result<RenderedImage, RenderClientError> {
        let resp = self
            .client
            .post(format!("{}/generate", self.base_url))
            .timeout(Duration::from_secs(30))
            .json(&GenerateRequest {
                items: Some(slots.to_vec()),
            })
            .send()
            .await
            .inspect_err(
                |e| tracing::error!(err = ?e, "an error occurred when calling the render service"),
            )?;

        let resp: GenerateResponse = check_status(resp).await?.json().await.inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when decoding render response"),
        )?;

        let url = format!("{}{}", self.base_url, resp.url);

        let image = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .inspect_err(
                |e| tracing::error!(err = ?e, url = %url, "an error occurred when downloading rendered image"),
            )?;

        let bytes = check_status(image).await?.bytes().await?.to_vec();

        Ok(RenderedImage { url, bytes })
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, RenderClientError> {
    let status = resp.status();

    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::error!(status = %status, body = %body, "render service returned an error status");

    Err(RenderClientError::Status { status, body })
}
