//! HTTP client for the download queue server.

use std::time::Duration;

use async_trait::async_trait;
use dlqueue_proto::protocol::{
    AddUrlRequest, ApiReply, DeleteFileRequest, FileListSnapshot, QueueSnapshot, ADD_URL_PATH,
    DELETE_FILE_PATH, DOWNLOADED_FILES_PATH, STATUS_PATH,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::ClientError;

/// The four endpoints the client consumes.
///
/// `HttpApi` is the real implementation; tests substitute an in-memory fake.
#[async_trait]
pub trait ServerApi: Send + Sync {
    async fn queue_status(&self) -> Result<QueueSnapshot, ClientError>;

    async fn downloaded_files(&self) -> Result<FileListSnapshot, ClientError>;

    /// Non-2xx answers come back as `ClientError::Server` carrying the
    /// body's `error` field.
    async fn add_url(&self, url: &str) -> Result<ApiReply, ClientError>;

    async fn delete_file(&self, filename: &str) -> Result<ApiReply, ClientError>;

    /// Absolute URL for a server-relative path such as `/downloads/x.mp3`.
    fn resolve(&self, path: &str) -> String;
}

pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dlq/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::transport(base_url, e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self
            .client
            .get(self.resolve(path))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ClientError::transport(path, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(path, e))?;

        if !status.is_success() {
            return Err(server_error(path, status.as_u16(), &body));
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::decode(path, e))
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<ApiReply, ClientError> {
        let response = self
            .client
            .post(self.resolve(path))
            .json(payload)
            .send()
            .await
            .map_err(|e| ClientError::transport(path, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(path, e))?;
        debug!("POST {} -> {}", path, status);

        if !status.is_success() {
            return Err(server_error(path, status.as_u16(), &body));
        }
        parse_reply(&body).map_err(|e| ClientError::decode(path, e))
    }
}

#[async_trait]
impl ServerApi for HttpApi {
    async fn queue_status(&self) -> Result<QueueSnapshot, ClientError> {
        self.get_json(STATUS_PATH).await
    }

    async fn downloaded_files(&self) -> Result<FileListSnapshot, ClientError> {
        self.get_json(DOWNLOADED_FILES_PATH).await
    }

    async fn add_url(&self, url: &str) -> Result<ApiReply, ClientError> {
        let payload = AddUrlRequest {
            url: url.to_string(),
        };
        self.post_json(ADD_URL_PATH, &payload).await
    }

    async fn delete_file(&self, filename: &str) -> Result<ApiReply, ClientError> {
        let payload = DeleteFileRequest {
            filename: filename.to_string(),
        };
        self.post_json(DELETE_FILE_PATH, &payload).await
    }

    fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// An empty body counts as `{}`.
fn parse_reply(body: &[u8]) -> Result<ApiReply, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApiReply::default());
    }
    serde_json::from_slice(body)
}

fn server_error(path: &str, status: u16, body: &[u8]) -> ClientError {
    let message = parse_reply(body)
        .ok()
        .and_then(|reply| reply.error_text().map(str::to_string));
    ClientError::Server {
        path: path.to_string(),
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_without_double_slash() {
        let api = HttpApi::new("http://host:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://host:5000");
        assert_eq!(api.resolve(STATUS_PATH), "http://host:5000/api/status");
    }

    #[test]
    fn server_error_picks_up_error_field() {
        let err = server_error(
            ADD_URL_PATH,
            400,
            br#"{"success": false, "error": "URL is required."}"#,
        );
        assert_eq!(err.server_message(), Some("URL is required."));

        let err = server_error(ADD_URL_PATH, 502, b"<html>bad gateway</html>");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn blank_reply_is_empty_object() {
        assert_eq!(parse_reply(b"").unwrap(), ApiReply::default());
        assert_eq!(parse_reply(b" \n").unwrap(), ApiReply::default());
        assert!(parse_reply(b"nope").is_err());
    }
}
