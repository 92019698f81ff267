use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, trace};

use crate::api::ConversionRequest;
use crate::config::ClientConfig;
use crate::error::ConversionError;

/// Raw request/response plumbing. Bodies are returned as-is, whatever the
/// HTTP status; interpreting them is the caller's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, path: &str, request: &ConversionRequest) -> Result<String, ConversionError>;
    async fn get_text(&self, path: &str) -> Result<String, ConversionError>;
    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ConversionError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ConversionError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn form(request: &ConversionRequest) -> Result<Form, ConversionError> {
        let audio = Part::bytes(request.audio().to_vec())
            .file_name(request.filename().to_string())
            .mime_str("application/octet-stream")?;

        Ok(Form::new()
            .text("output_format", request.format().as_str())
            .text("scale_pitch", request.pitch_scale().to_string())
            .text("scale_tempo", request.tempo_scale().to_string())
            .part("audio_file", audio))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, path: &str, request: &ConversionRequest) -> Result<String, ConversionError> {
        debug!(
            "POST {} ({} bytes, format={})",
            path,
            request.audio().len(),
            request.format()
        );
        let response = self
            .client
            .post(self.url(path))
            .multipart(Self::form(request)?)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        trace!("POST {} -> {}: {}", path, status, body);
        Ok(body)
    }

    async fn get_text(&self, path: &str) -> Result<String, ConversionError> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!("GET {} -> {}: {}", path, status, body);
        Ok(body)
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ConversionError> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            // Error bodies here are JSON, not audio.
            let body = response.text().await?;
            debug!("GET {} -> {}", path, status);
            return Err(crate::api::wire::parse_download_error(&body));
        }
        let bytes = response.bytes().await?;
        debug!("GET {} -> {} ({} bytes)", path, status, bytes.len());
        Ok(bytes.to_vec())
    }
}
