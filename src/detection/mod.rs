pub mod mock;

use std::time::Duration;

use reqwest::{
    Client, Url,
    multipart::{Form, Part},
};

use crate::{
    config::DetectorConfig,
    error::{Error, Result},
    models::DetectionResult,
    upload::UploadedImage,
};

/// Multipart field the detection service reads the image from.
pub const IMAGE_FIELD: &str = "image";
const IMAGE_FILE_NAME: &str = "image.jpg";
const IMAGE_MIME: &str = "image/jpeg";

/// Talks to the external object-detection service.
#[derive(Debug, Clone)]
pub struct DetectionClient {
    client: Client,
}

impl DetectionClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        Self::new(config.timeout)
    }

    /// Run detection on `image`.
    ///
    /// In mock mode the canned fixture is returned after `config.mock_delay`
    /// and the endpoint is never contacted.
    pub async fn detect(
        &self,
        image: &UploadedImage,
        config: &DetectorConfig,
    ) -> Result<DetectionResult> {
        if config.use_mock {
            tracing::debug!(delay_ms = config.mock_delay.as_millis() as u64, "using mock detections");
            tokio::time::sleep(config.mock_delay).await;
            return Ok(mock::fixture());
        }

        let url = parse_endpoint(&config.endpoint)?;

        let part = Part::bytes(image.bytes().to_vec())
            .file_name(IMAGE_FILE_NAME)
            .mime_str(IMAGE_MIME)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        tracing::info!(endpoint = %url, bytes = image.bytes().len(), "sending detection request");

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(error = %e, "failed to read error response body");
                    String::new()
                }
            };
            tracing::warn!(status = status.as_u16(), "detection service returned an error");
            return Err(Error::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let result: DetectionResult = serde_json::from_slice(&body)?;
        result.validate().map_err(Error::Protocol)?;

        tracing::info!(
            detections = result.object_count(),
            processing_time = result.processing_time,
            "detection finished"
        );

        Ok(result)
    }
}

/// Only absolute http(s) URLs are usable as endpoints.
fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| Error::Config(format!("invalid endpoint {endpoint:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Config(format!(
            "endpoint must use http or https, not {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_http_endpoints() {
        assert!(parse_endpoint("http://localhost:5000/detect").is_ok());
        assert!(parse_endpoint(" https://example.com/detect ").is_ok());
    }

    #[test]
    fn rejects_bad_endpoints() {
        assert!(matches!(parse_endpoint("localhost:5000"), Err(Error::Config(_))));
        assert!(matches!(parse_endpoint("ftp://example.com"), Err(Error::Config(_))));
        assert!(matches!(parse_endpoint(""), Err(Error::Config(_))));
    }
}
