use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::{HEALTH_PATH, UPLOAD_FIELD, UPLOAD_PATH},
    protocol::HealthResponse,
};
use tracing::{debug, warn};

use crate::{error::TransportError, selection::SelectedFile};

/// Raw outcome of an exchange that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Sends `file` as the single multipart field of one POST.
    async fn send_file(&self, file: &SelectedFile) -> Result<HttpReply, TransportError>;
    async fn health(&self) -> Result<HealthResponse, TransportError>;
}

pub struct HttpUploadTransport {
    http: Client,
    server_url: String,
}

impl HttpUploadTransport {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim().trim_end_matches('/').to_string();
        Self { http, server_url }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }

    fn file_part(file: &SelectedFile, bytes: Vec<u8>) -> Result<Part, TransportError> {
        let part = Part::bytes(bytes).file_name(file.name().to_string());
        let mime_type = file.mime_type();
        if mime_type.is_empty() || mime_type.parse::<mime_guess::Mime>().is_err() {
            return Ok(part);
        }
        Ok(part.mime_str(mime_type)?)
    }
}

#[async_trait]
impl UploadTransport for HttpUploadTransport {
    async fn send_file(&self, file: &SelectedFile) -> Result<HttpReply, TransportError> {
        let bytes = file.read_contents().await?;
        let form = Form::new().part(UPLOAD_FIELD, Self::file_part(file, bytes)?);
        let url = self.endpoint(UPLOAD_PATH);
        debug!(%url, filename = file.name(), "upload: sending multipart request");

        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(HttpReply::new(status.as_u16(), body.to_vec()));
        }

        // The status alone decides a rejection; a cut-off body just leaves no detail.
        let body = match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(err) => {
                warn!(status = status.as_u16(), error = %err, "upload: rejection body unreadable");
                Vec::new()
            }
        };
        Ok(HttpReply::new(status.as_u16(), body))
    }

    async fn health(&self) -> Result<HealthResponse, TransportError> {
        let response = self
            .http
            .get(self.endpoint(HEALTH_PATH))
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| TransportError::InvalidBody(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
