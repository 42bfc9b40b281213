//! SubmissionController: URL intake and the add request.

use std::future::Future;
use std::sync::Arc;

use dlqueue_proto::protocol::ApiReply;
use tracing::{info, warn};

use crate::api::ServerApi;
use crate::error::ClientError;

pub const EMPTY_URL: &str = "Please enter a URL.";
pub const SUBMIT_FALLBACK: &str = "Failed to add URL.";
pub const SUBMIT_SUCCESS: &str = "URL successfully added to the queue!";

pub struct SubmissionController {
    api: Arc<dyn ServerApi>,
}

impl SubmissionController {
    pub fn new(api: Arc<dyn ServerApi>) -> Self {
        Self { api }
    }

    /// Trim the raw field value. Blank input never reaches the network.
    pub fn validate(raw: &str) -> Result<String, ClientError> {
        let url = raw.trim();
        if url.is_empty() {
            return Err(ClientError::Validation(EMPTY_URL.to_string()));
        }
        Ok(url.to_string())
    }

    /// POST an already-validated URL.
    ///
    /// The returned future owns everything it needs so the shell can spawn
    /// it and keep handling input.
    pub fn submit(
        &self,
        url: String,
    ) -> impl Future<Output = Result<ApiReply, ClientError>> + Send + 'static {
        let api = self.api.clone();
        async move {
            let outcome = match api.add_url(&url).await {
                Ok(reply) if reply.success == Some(false) => Err(ClientError::Submission(
                    reply.error_text().unwrap_or(SUBMIT_FALLBACK).to_string(),
                )),
                Ok(reply) => Ok(reply),
                Err(ClientError::Server { message, .. }) => Err(ClientError::Submission(
                    message.unwrap_or_else(|| SUBMIT_FALLBACK.to_string()),
                )),
                Err(other) => Err(other),
            };
            match &outcome {
                Ok(_) => info!("[submit] queued {}", url),
                Err(e) => warn!("[submit] {} rejected: {}", url, e),
            }
            outcome
        }
    }
}
